//! Carving 32-bit words out of raw entropy blocks.

use crate::config::Extraction;

/// Stride used by the second pass when no byte has a non-zero residue mod 10.
const FALLBACK_STRIDE: usize = 2;

/// Extract the words a block contributes to the buffer, in push order.
pub fn extract_words(block: &[u8], scheme: Extraction) -> Vec<u32> {
    match scheme {
        Extraction::TwoPass => {
            let stride = second_pass_stride(block);
            let mut words = Vec::with_capacity(block.len() * 2);
            // Pass 1: a little-endian word at every byte offset.
            words.extend(block.windows(4).map(le_word));
            // Pass 2: big-endian words over the same bytes, strided.
            words.extend(block.windows(4).step_by(stride).map(be_word));
            words
        }
        Extraction::Clean => block.chunks_exact(4).map(le_word).collect(),
    }
}

/// Residue mod 10 of the first byte not divisible by 10.
pub fn second_pass_stride(block: &[u8]) -> usize {
    block
        .iter()
        .map(|b| usize::from(b % 10))
        .find(|&r| r != 0)
        .unwrap_or(FALLBACK_STRIDE)
}

fn le_word(w: &[u8]) -> u32 {
    u32::from_le_bytes([w[0], w[1], w[2], w[3]])
}

fn be_word(w: &[u8]) -> u32 {
    u32::from_be_bytes([w[0], w[1], w[2], w[3]])
}
