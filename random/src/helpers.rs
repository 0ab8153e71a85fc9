//! Random strings, ranges and permutations drawn from a [`WordSource`].
//!
//! Every helper has a `*_with` form taking an explicit source; the plain form
//! draws from [`EntropyBuffer::global`].

use crate::buffer::EntropyBuffer;
use crate::word::WordSource;

/// Letters first, then digits; letter-only draws use the first 52.
const LETTERS: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const DIGITS: &[u8; 10] = b"0123456789";
const ALPHA: usize = 52;

/// Resolution of [`meet_prob`].
const PROB_SCALE: f64 = 1e7;

/// Random string of `n` characters, each a digit or a letter with equal odds.
pub fn str(n: usize) -> String {
    str_with(EntropyBuffer::global(), n)
}

pub fn str_with<S: WordSource + ?Sized>(source: &S, n: usize) -> String {
    (0..n)
        .map(|_| {
            if source.next_index(2) == 1 {
                char::from(DIGITS[source.next_index(DIGITS.len())])
            } else {
                char::from(LETTERS[source.next_index(ALPHA)])
            }
        })
        .collect()
}

/// Random string of `n` decimal digits.
pub fn digits(n: usize) -> String {
    digits_with(EntropyBuffer::global(), n)
}

pub fn digits_with<S: WordSource + ?Sized>(source: &S, n: usize) -> String {
    (0..n)
        .map(|_| char::from(DIGITS[source.next_index(DIGITS.len())]))
        .collect()
}

/// Random string of `n` ASCII letters.
pub fn letters(n: usize) -> String {
    letters_with(EntropyBuffer::global(), n)
}

pub fn letters_with<S: WordSource + ?Sized>(source: &S, n: usize) -> String {
    (0..n)
        .map(|_| char::from(LETTERS[source.next_index(ALPHA)]))
        .collect()
}

/// Pseudo-random permutation of `0..n`.
pub fn perm(n: usize) -> Vec<usize> {
    perm_with(EntropyBuffer::global(), n)
}

pub fn perm_with<S: WordSource + ?Sized>(source: &S, n: usize) -> Vec<usize> {
    // Inside-out Fisher-Yates.
    let mut out = vec![0; n];
    for i in 0..n {
        let j = source.next_index(i + 1);
        out[i] = out[j];
        out[j] = i;
    }
    out
}

/// Random integer in the inclusive range `[min, max]`; `min` if `min >= max`.
pub fn n(min: i64, max: i64) -> i64 {
    n_with(EntropyBuffer::global(), min, max)
}

pub fn n_with<S: WordSource + ?Sized>(source: &S, min: i64, max: i64) -> i64 {
    if min >= max {
        return min;
    }
    let span = (i128::from(max) - i128::from(min) + 1).min(i128::from(i64::MAX));
    // span >= 2 here, so the draw cannot fail.
    let offset = crate::word::reduce(source.next_word(), span as i64);
    (i128::from(min) + i128::from(offset)) as i64
}

/// Whether an event with probability `num / total` happened.
/// A non-positive `total` never meets.
pub fn meet(num: i64, total: i64) -> bool {
    meet_with(EntropyBuffer::global(), num, total)
}

pub fn meet_with<S: WordSource + ?Sized>(source: &S, num: i64, total: i64) -> bool {
    if total <= 0 {
        return false;
    }
    crate::word::reduce(source.next_word(), total) < num
}

/// Whether an event with probability `prob` (in `[0, 1]`) happened.
pub fn meet_prob(prob: f32) -> bool {
    meet_prob_with(EntropyBuffer::global(), prob)
}

pub fn meet_prob_with<S: WordSource + ?Sized>(source: &S, prob: f32) -> bool {
    let threshold = (f64::from(prob) * PROB_SCALE) as i64;
    meet_with(source, threshold, PROB_SCALE as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::{FixedSource, SeededSource};

    #[test]
    fn strings_use_expected_alphabets() {
        let source = SeededSource::new(3);
        let d = digits_with(&source, 64);
        assert_eq!(d.len(), 64);
        assert!(d.bytes().all(|b| b.is_ascii_digit()));

        let l = letters_with(&source, 64);
        assert!(l.bytes().all(|b| b.is_ascii_alphabetic()));

        let s = str_with(&source, 256);
        assert_eq!(s.len(), 256);
        assert!(s.bytes().all(|b| b.is_ascii_alphanumeric()));
        assert!(s.bytes().any(|b| b.is_ascii_digit()));
        assert!(s.bytes().any(|b| b.is_ascii_alphabetic()));
    }

    #[test]
    fn scripted_words_pick_exact_characters() {
        // coin 1 -> digit 7; coin 0 -> letter 'c'.
        let source = FixedSource::new([1, 7, 0, 2]);
        assert_eq!(str_with(&source, 2), "7c");
    }

    #[test]
    fn perm_is_a_permutation() {
        let source = SeededSource::new(11);
        let mut p = perm_with(&source, 100);
        p.sort_unstable();
        assert_eq!(p, (0..100).collect::<Vec<_>>());
        assert!(perm_with(&source, 0).is_empty());
    }

    #[test]
    fn n_is_inclusive() {
        let source = SeededSource::new(5);
        let mut seen = [false; 5];
        for _ in 0..1_000 {
            let v = n_with(&source, -2, 2);
            assert!((-2..=2).contains(&v));
            seen[(v + 2) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(n_with(&source, 9, 3), 9);
        assert_eq!(n_with(&source, 4, 4), 4);
    }

    #[test]
    fn meet_edges() {
        let source = SeededSource::new(8);
        assert!(!meet_with(&source, 5, 0));
        assert!(meet_with(&source, 10, 10));
        assert!(!meet_with(&source, 0, 10));
        assert!(meet_prob_with(&source, 1.0));
        assert!(!meet_prob_with(&source, 0.0));
    }

    #[test]
    fn global_helpers_work() {
        assert_eq!(str(8).len(), 8);
        assert_eq!(digits(3).len(), 3);
        assert_eq!(letters(5).len(), 5);
        assert_eq!(perm(4).len(), 4);
        assert!((1..=6).contains(&n(1, 6)));
    }
}
