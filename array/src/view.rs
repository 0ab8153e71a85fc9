use q_sync::ReadGuard;
use std::fmt;
use std::ops::Deref;

/// Borrowed, uncopied window onto a container's elements.
///
/// Holds shared access for as long as it lives: writers block (safe mode)
/// or must not be attempted (unsafe mode) until the view is dropped.
pub struct View<'a, T> {
    guard: ReadGuard<'a, Vec<T>>,
    start: usize,
    end: usize,
}

impl<'a, T> View<'a, T> {
    pub(crate) fn new(guard: ReadGuard<'a, Vec<T>>, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= guard.len());
        Self { guard, start, end }
    }
}

impl<T> Deref for View<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.guard[self.start..self.end]
    }
}

impl<T: fmt::Debug> fmt::Debug for View<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq<[T]> for View<'_, T> {
    fn eq(&self, other: &[T]) -> bool {
        **self == *other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for View<'_, T> {
    fn eq(&self, other: &[T; N]) -> bool {
        **self == other[..]
    }
}
