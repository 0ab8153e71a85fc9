//! Secure byte sources feeding the entropy buffer.

use crate::error::{RandomError, RandomResult};

/// A source of raw secure bytes.
///
/// A call either fills all of `dest` or fails; partial reads are not part of
/// the contract.
pub trait ByteSource {
    fn fill(&mut self, dest: &mut [u8]) -> RandomResult<()>;
}

/// OS-backed cryptographically secure byte source (`getrandom`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsByteSource;

impl ByteSource for OsByteSource {
    fn fill(&mut self, dest: &mut [u8]) -> RandomResult<()> {
        getrandom::fill(dest).map_err(|e| RandomError::Source(e.to_string()))
    }
}

impl<F> ByteSource for F
where
    F: FnMut(&mut [u8]) -> RandomResult<()>,
{
    fn fill(&mut self, dest: &mut [u8]) -> RandomResult<()> {
        self(dest)
    }
}
