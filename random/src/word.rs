//! The random-word seam consumed by containers and helpers.

use crate::error::{RandomError, RandomResult};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_core::{impls, RngCore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A shared source of 32-bit random words.
///
/// Production code uses the entropy buffer; tests substitute
/// [`SeededSource`] or [`FixedSource`] for reproducible draws.
pub trait WordSource: Send + Sync {
    /// Returns the next word, blocking if none is available yet.
    fn next_word(&self) -> u32;

    /// Returns a value in `[0, max)` for positive `max`, or in `(max, 0]`
    /// for negative `max`.
    fn next_bounded(&self, max: i64) -> RandomResult<i64> {
        if max == 0 {
            return Err(RandomError::ZeroBound);
        }
        Ok(reduce(self.next_word(), max))
    }

    /// Returns an index in `[0, len)`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    fn next_index(&self, len: usize) -> usize {
        assert!(len > 0, "cannot draw an index from an empty range");
        self.next_word() as usize % len
    }
}

/// Reduce `word` modulo a non-zero `max`, giving the result the sign of `max`.
pub fn reduce(word: u32, max: i64) -> i64 {
    debug_assert!(max != 0);
    let n = i64::from(word) % max;
    if max < 0 && n > 0 {
        -n
    } else {
        n
    }
}

impl<S: WordSource + ?Sized> WordSource for Arc<S> {
    fn next_word(&self) -> u32 {
        (**self).next_word()
    }
}

impl<S: WordSource + ?Sized> WordSource for &S {
    fn next_word(&self) -> u32 {
        (**self).next_word()
    }
}

/// Deterministic source backed by a seeded `StdRng`.
pub struct SeededSource {
    rng: Mutex<StdRng>,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl WordSource for SeededSource {
    fn next_word(&self) -> u32 {
        self.rng.lock().next_u32()
    }
}

/// Replays a fixed list of words, cycling when exhausted.
#[derive(Debug)]
pub struct FixedSource {
    words: Vec<u32>,
    cursor: AtomicUsize,
}

impl FixedSource {
    /// # Panics
    ///
    /// Panics if `words` is empty.
    pub fn new(words: impl Into<Vec<u32>>) -> Self {
        let words = words.into();
        assert!(!words.is_empty(), "FixedSource needs at least one word");
        Self {
            words,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl WordSource for FixedSource {
    fn next_word(&self) -> u32 {
        let at = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.words[at % self.words.len()]
    }
}

/// Adapts a [`WordSource`] to `rand_core::RngCore`, so `rand` algorithms
/// can run on buffered words.
pub struct SourceRng<'a, S: ?Sized>(pub &'a S);

impl<S: WordSource + ?Sized> RngCore for SourceRng<'_, S> {
    fn next_u32(&mut self) -> u32 {
        self.0.next_word()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
