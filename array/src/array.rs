use crate::error::{ArrayError, ArrayResult};
use crate::view::View;
use q_random::{EntropyBuffer, SourceRng, WordSource};
use q_sync::{Safety, ToggleLock};
use rand::seq::SliceRandom;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

/// A growable sequence guarded by a [`ToggleLock`].
///
/// The locking mode is fixed at construction: safe containers serialize
/// access with a reader/writer lock, unsafe ones skip locking entirely and
/// leave serialization to the caller. Read-only operations take shared
/// access; everything that mutates takes exclusive access for the whole
/// operation.
///
/// Randomized operations ([`pop_random`](Self::pop_random),
/// [`shuffle`](Self::shuffle), ...) draw from the global [`EntropyBuffer`]
/// unless another source was injected with [`with_source`](Self::with_source).
pub struct Array<T> {
    lock: ToggleLock<Vec<T>>,
    source: Option<Arc<dyn WordSource>>,
}

/// The integer instantiation.
pub type IntArray = Array<i64>;

impl<T> Array<T> {
    /// Empty container. `unsafe_ == false` selects safe mode.
    pub fn new(unsafe_: bool) -> Self {
        Self::new_from(Vec::new(), unsafe_)
    }

    /// Takes ownership of `items` without copying.
    pub fn new_from(items: Vec<T>, unsafe_: bool) -> Self {
        Self::with_safety(items, Safety::from_unsafe_flag(unsafe_))
    }

    pub fn with_safety(items: Vec<T>, safety: Safety) -> Self {
        Self {
            lock: ToggleLock::with_safety(items, safety),
            source: None,
        }
    }

    /// Draw randomized operations from `source` instead of the global buffer.
    pub fn with_source(mut self, source: Arc<dyn WordSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn safety(&self) -> Safety {
        self.lock.safety()
    }

    pub fn is_safe(&self) -> bool {
        self.lock.is_safe()
    }

    /// A new container sharing this one's mode and source.
    pub(crate) fn sibling(&self, items: Vec<T>) -> Self {
        Self {
            lock: ToggleLock::with_safety(items, self.safety()),
            source: self.source.clone(),
        }
    }

    fn source(&self) -> &dyn WordSource {
        match &self.source {
            Some(source) => source.as_ref(),
            None => EntropyBuffer::global(),
        }
    }

    /// Replaces the whole backing sequence.
    pub fn set_array(&self, items: Vec<T>) -> &Self {
        *self.lock.write() = items;
        self
    }

    pub fn set(&self, index: usize, value: T) -> ArrayResult<()> {
        let mut items = self.lock.write();
        let len = items.len();
        match items.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ArrayError::IndexOutOfRange { index, len }),
        }
    }

    /// Sorts ascending, or descending when `descending` is set. Not stable.
    pub fn sort(&self, descending: bool) -> &Self
    where
        T: Ord,
    {
        let mut items = self.lock.write();
        if descending {
            items.sort_unstable_by(|a, b| b.cmp(a));
        } else {
            items.sort_unstable();
        }
        self
    }

    /// Sorts with a caller-supplied comparator. Not stable.
    pub fn sort_by<F>(&self, compare: F) -> &Self
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.lock.write().sort_unstable_by(compare);
        self
    }

    /// Inserts `value` so that it lands at `index`; `index == len` appends.
    pub fn insert_before(&self, index: usize, value: T) -> ArrayResult<()> {
        let mut items = self.lock.write();
        if index > items.len() {
            return Err(ArrayError::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }
        items.insert(index, value);
        Ok(())
    }

    /// Inserts `value` right after the existing element at `index`.
    pub fn insert_after(&self, index: usize, value: T) -> ArrayResult<()> {
        let mut items = self.lock.write();
        if index >= items.len() {
            return Err(ArrayError::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }
        items.insert(index + 1, value);
        Ok(())
    }

    /// Removes the element at `index`. The last element comes off in O(1);
    /// any other index shifts the elements after it.
    pub fn remove(&self, index: usize) -> ArrayResult<T> {
        let mut items = self.lock.write();
        remove_at(&mut items, index)
    }

    /// Prepends `values`, keeping their order.
    pub fn push_left<I>(&self, values: I) -> &Self
    where
        I: IntoIterator<Item = T>,
    {
        self.lock.write().splice(0..0, values);
        self
    }

    /// Appends `values`, keeping their order.
    pub fn push_right<I>(&self, values: I) -> &Self
    where
        I: IntoIterator<Item = T>,
    {
        self.lock.write().extend(values);
        self
    }

    pub fn append<I>(&self, values: I) -> &Self
    where
        I: IntoIterator<Item = T>,
    {
        self.push_right(values)
    }

    /// Removes the first element. Costs one shift of the remaining elements,
    /// since storage stays contiguous for [`view`](Self::view).
    pub fn pop_left(&self) -> ArrayResult<T> {
        let mut items = self.lock.write();
        if items.is_empty() {
            return Err(ArrayError::EmptyContainer);
        }
        Ok(items.remove(0))
    }

    pub fn pop_right(&self) -> ArrayResult<T> {
        self.lock.write().pop().ok_or(ArrayError::EmptyContainer)
    }

    /// Removes and returns a randomly chosen element.
    pub fn pop_random(&self) -> ArrayResult<T> {
        let mut items = self.lock.write();
        if items.is_empty() {
            return Err(ArrayError::EmptyContainer);
        }
        let index = self.source().next_index(items.len());
        tracing::trace!(index, len = items.len(), "pop_random");
        remove_at(&mut items, index)
    }

    /// Removes up to `n` randomly chosen elements, returned in draw order.
    pub fn pop_randoms(&self, n: usize) -> Vec<T> {
        let mut items = self.lock.write();
        let source = self.source();
        let take = n.min(items.len());
        let mut out = Vec::with_capacity(take);
        for _ in 0..take {
            let index = source.next_index(items.len());
            out.push(items.remove(index));
        }
        out
    }

    /// Removes up to `n` elements from the front.
    pub fn pop_lefts(&self, n: usize) -> Vec<T> {
        let mut items = self.lock.write();
        let take = n.min(items.len());
        items.drain(..take).collect()
    }

    /// Removes up to `n` elements from the back, keeping their order.
    pub fn pop_rights(&self, n: usize) -> Vec<T> {
        let mut items = self.lock.write();
        let at = items.len() - n.min(items.len());
        items.split_off(at)
    }

    pub fn len(&self) -> usize {
        self.lock.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Uncopied view of all elements; see [`View`].
    pub fn view(&self) -> View<'_, T> {
        let items = self.lock.read();
        let len = items.len();
        View::new(items, 0, len)
    }

    /// Uncopied view of `[start, end)`, clamped like [`range`](Self::range).
    pub fn range_view(&self, start: isize, end: isize) -> View<'_, T> {
        let items = self.lock.read();
        let (start, end) = clamp_range(items.len(), start, end);
        View::new(items, start, end)
    }

    pub fn clear(&self) -> &Self {
        let mut items = self.lock.write();
        if !items.is_empty() {
            items.clear();
        }
        self
    }

    /// Index of the first element equal to `value`.
    pub fn search(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.lock.read().iter().position(|item| item == value)
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.search(value).is_some()
    }

    /// Drops repeated values, keeping each first occurrence in place.
    ///
    /// Quadratic in the number of distinct values; only `PartialEq` is required.
    pub fn unique(&self) -> &Self
    where
        T: PartialEq,
    {
        let mut items = self.lock.write();
        let mut kept: Vec<T> = Vec::with_capacity(items.len());
        for item in items.drain(..) {
            if !kept.contains(&item) {
                kept.push(item);
            }
        }
        *items = kept;
        self
    }

    /// Runs `f` with exclusive access to the raw sequence.
    ///
    /// `f` must not call back into this container.
    pub fn with_exclusive_access<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut Vec<T>) -> R,
    {
        f(&mut self.lock.write())
    }

    /// Runs `f` with shared access to the raw sequence.
    ///
    /// `f` must not call back into this container for writing.
    pub fn with_shared_access<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&[T]) -> R,
    {
        f(&self.lock.read())
    }

    /// Like [`with_exclusive_access`](Self::with_exclusive_access), giving up
    /// with [`ArrayError::WouldBlock`] after `timeout`.
    pub fn try_with_exclusive_access<R, F>(&self, timeout: Duration, f: F) -> ArrayResult<R>
    where
        F: FnOnce(&mut Vec<T>) -> R,
    {
        let mut items = self
            .lock
            .try_write_for(timeout)
            .ok_or(ArrayError::WouldBlock(timeout))?;
        Ok(f(&mut items))
    }

    pub fn try_with_shared_access<R, F>(&self, timeout: Duration, f: F) -> ArrayResult<R>
    where
        F: FnOnce(&[T]) -> R,
    {
        let items = self
            .lock
            .try_read_for(timeout)
            .ok_or(ArrayError::WouldBlock(timeout))?;
        Ok(f(&items))
    }

    /// Reverses the element order in place.
    pub fn reverse(&self) -> &Self {
        self.lock.write().reverse();
        self
    }

    /// Randomly permutes the elements.
    pub fn shuffle(&self) -> &Self {
        let mut items = self.lock.write();
        items.shuffle(&mut SourceRng(self.source()));
        self
    }

    /// Calls `f` with each index and element in order until it returns `false`.
    pub fn iterate<F>(&self, mut f: F)
    where
        F: FnMut(usize, &T) -> bool,
    {
        for (index, item) in self.lock.read().iter().enumerate() {
            if !f(index, item) {
                break;
            }
        }
    }

    /// Like [`iterate`](Self::iterate), from the last element to the first.
    pub fn iterate_desc<F>(&self, mut f: F)
    where
        F: FnMut(usize, &T) -> bool,
    {
        for (index, item) in self.lock.read().iter().enumerate().rev() {
            if !f(index, item) {
                break;
            }
        }
    }

    /// Consumes the container and returns its elements.
    pub fn into_vec(self) -> Vec<T> {
        self.lock.into_inner()
    }
}

impl<T: Clone> Array<T> {
    /// Copies `items` into a new container.
    pub fn new_from_copy(items: &[T], unsafe_: bool) -> Self {
        Self::new_from(items.to_vec(), unsafe_)
    }

    pub fn get(&self, index: usize) -> ArrayResult<T> {
        let items = self.lock.read();
        items
            .get(index)
            .cloned()
            .ok_or(ArrayError::IndexOutOfRange {
                index,
                len: items.len(),
            })
    }

    /// Overwrites the leading elements with `values`; never changes the length.
    pub fn replace(&self, values: &[T]) -> &Self {
        let mut items = self.lock.write();
        let n = values.len().min(items.len());
        items[..n].clone_from_slice(&values[..n]);
        self
    }

    /// Copy of the elements in `[start, end)`.
    ///
    /// Both bounds are clamped to `[0, len]`; an inverted range is empty.
    pub fn range(&self, start: isize, end: isize) -> Vec<T> {
        self.range_view(start, end).to_vec()
    }

    /// Copy of all elements.
    pub fn slice(&self) -> Vec<T> {
        self.lock.read().clone()
    }

    /// A random element, left in place.
    pub fn rand(&self) -> ArrayResult<T> {
        let items = self.lock.read();
        if items.is_empty() {
            return Err(ArrayError::EmptyContainer);
        }
        Ok(items[self.source().next_index(items.len())].clone())
    }

    /// `n` random elements drawn with replacement; empty for an empty container.
    pub fn rands(&self, n: usize) -> Vec<T> {
        let items = self.lock.read();
        if items.is_empty() {
            return Vec::new();
        }
        let source = self.source();
        (0..n)
            .map(|_| items[source.next_index(items.len())].clone())
            .collect()
    }

    /// Consecutive groups of `size` elements, the last possibly shorter.
    /// `None` when `size` is zero.
    pub fn chunk(&self, size: usize) -> Option<Vec<Vec<T>>> {
        if size < 1 {
            return None;
        }
        Some(self.lock.read().chunks(size).map(<[T]>::to_vec).collect())
    }

    /// Pads with `value` up to `|size|` elements: at the back for positive
    /// `size`, at the front for negative. No-op if already long enough.
    pub fn pad(&self, size: isize, value: T) -> &Self {
        let mut items = self.lock.write();
        let target = size.unsigned_abs();
        if size == 0 || target <= items.len() {
            return self;
        }
        if size > 0 {
            items.resize(target, value);
        } else {
            let extra = target - items.len();
            items.splice(0..0, std::iter::repeat(value).take(extra));
        }
        self
    }
}

impl<T: Clone + Default> Array<T> {
    /// `size` default-valued elements with room for at least `capacity`.
    pub fn new_with_size(size: usize, capacity: usize, unsafe_: bool) -> Self {
        let mut items = Vec::with_capacity(capacity.max(size));
        items.resize(size, T::default());
        Self::new_from(items, unsafe_)
    }

    /// Writes `value` to `[start, start + count)`, growing as needed.
    ///
    /// A negative `start` counts as zero. If `start` lies past the end, the
    /// gap is filled with `T::default()`.
    pub fn fill(&self, start: isize, count: usize, value: T) -> &Self {
        let start = usize::try_from(start).unwrap_or(0);
        let end = start.saturating_add(count);
        let mut items = self.lock.write();
        if items.len() < start {
            items.resize(start, T::default());
        }
        let overlap = end.min(items.len());
        items[start..overlap].fill(value.clone());
        if end > items.len() {
            items.resize(end, value);
        }
        self
    }
}

impl<T> Array<T>
where
    T: for<'a> std::iter::Sum<&'a T>,
{
    /// Sum of all elements; zero when empty.
    pub fn sum(&self) -> T {
        self.lock.read().iter().sum()
    }
}

impl<T: Display> Array<T> {
    /// Elements rendered with `Display`, separated by `sep`.
    pub fn join(&self, sep: &str) -> String {
        let items = self.lock.read();
        let mut out = String::new();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push_str(&item.to_string());
        }
        out
    }
}

impl<T: Clone + Eq + Hash> Array<T> {
    /// Number of occurrences of each distinct value.
    pub fn count_values(&self) -> HashMap<T, usize> {
        let mut counts = HashMap::new();
        for item in self.lock.read().iter() {
            *counts.entry(item.clone()).or_insert(0) += 1;
        }
        counts
    }
}

fn remove_at<T>(items: &mut Vec<T>, index: usize) -> ArrayResult<T> {
    let len = items.len();
    if index >= len {
        return Err(ArrayError::IndexOutOfRange { index, len });
    }
    if index + 1 == len {
        // Tail removal needs no shifting.
        return items.pop().ok_or(ArrayError::EmptyContainer);
    }
    Ok(items.remove(index))
}

/// Clamp `[start, end)` into `[0, len]`, collapsing inverted ranges.
fn clamp_range(len: usize, start: isize, end: isize) -> (usize, usize) {
    let clamp = |bound: isize| usize::try_from(bound).unwrap_or(0).min(len);
    let start = clamp(start);
    let end = clamp(end).max(start);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use q_random::{FixedSource, SeededSource};
    use std::thread;

    fn seeded(items: Vec<i64>, seed: u64) -> IntArray {
        IntArray::new_from(items, false).with_source(Arc::new(SeededSource::new(seed)))
    }

    #[test]
    fn constructors_and_modes() {
        let a = IntArray::new(false);
        assert!(a.is_safe());
        assert!(a.is_empty());

        let b = IntArray::new(true);
        assert_eq!(b.safety(), Safety::Unsafe);

        let sized = IntArray::new_with_size(3, 10, false);
        assert_eq!(sized.slice(), vec![0, 0, 0]);

        let source = vec![1, 2, 3];
        let copied = IntArray::new_from_copy(&source, false);
        copied.set(0, 100).unwrap();
        assert_eq!(source, vec![1, 2, 3]);
        assert_eq!(copied.get(0), Ok(100));
    }

    #[test]
    fn set_then_get() {
        let a = IntArray::new_with_size(5, 5, false);
        for i in 0..5 {
            a.set(i, i as i64 * 10).unwrap();
            assert_eq!(a.get(i).unwrap(), i as i64 * 10);
        }
        assert_eq!(
            a.get(5),
            Err(ArrayError::IndexOutOfRange { index: 5, len: 5 })
        );
        assert!(a.set(7, 1).is_err());
    }

    #[test]
    fn replace_overwrites_prefix_only() {
        let a = IntArray::new_from(vec![1, 2, 3], false);
        a.replace(&[9, 8]);
        assert_eq!(a.slice(), vec![9, 8, 3]);
        a.replace(&[7, 7, 7, 7, 7]);
        assert_eq!(a.slice(), vec![7, 7, 7]);
    }

    #[test]
    fn sum_of_empty_is_zero() {
        assert_eq!(IntArray::new(false).sum(), 0);
        assert_eq!(IntArray::new_from(vec![1, -4, 10], false).sum(), 7);
    }

    #[test]
    fn sort_directions_and_comparator() {
        let a = IntArray::new_from(vec![3, 1, 2], false);
        assert_eq!(a.sort(false).slice(), vec![1, 2, 3]);
        assert_eq!(a.sort(true).slice(), vec![3, 2, 1]);
        a.sort_by(|x, y| (x % 2).cmp(&(y % 2)).then(x.cmp(y)));
        assert_eq!(a.slice(), vec![2, 1, 3]);
    }

    #[test]
    fn insert_variants() {
        let a = IntArray::new(false);
        a.insert_before(0, 2).unwrap();
        a.insert_before(0, 1).unwrap();
        a.insert_after(1, 4).unwrap();
        a.insert_after(1, 3).unwrap();
        assert_eq!(a.slice(), vec![1, 2, 3, 4]);
        assert!(a.insert_before(5, 0).is_err());
        assert_eq!(
            a.insert_after(4, 0),
            Err(ArrayError::IndexOutOfRange { index: 4, len: 4 })
        );
    }

    #[test]
    fn remove_boundaries_and_interior() {
        let a = IntArray::new_from(vec![1, 2, 3, 4, 5], false);
        assert_eq!(a.remove(0), Ok(1));
        assert_eq!(a.remove(3), Ok(5));
        assert_eq!(a.remove(1), Ok(3));
        assert_eq!(a.slice(), vec![2, 4]);
        assert!(a.remove(2).is_err());
    }

    #[test]
    fn push_and_pop_ends() {
        let a = IntArray::new_from(vec![3], false);
        a.push_left([1, 2]).push_right([4, 5]);
        assert_eq!(a.slice(), vec![1, 2, 3, 4, 5]);
        assert_eq!(a.pop_left(), Ok(1));
        assert_eq!(a.pop_right(), Ok(5));
        assert_eq!(a.pop_lefts(10), vec![2, 3, 4]);
        assert_eq!(a.pop_left(), Err(ArrayError::EmptyContainer));
        assert_eq!(a.pop_right(), Err(ArrayError::EmptyContainer));
    }

    #[test]
    fn pop_left_push_left_round_trip() {
        let a = IntArray::new_from(vec![4, 5, 6], false);
        let first = a.pop_left().unwrap();
        a.push_left([first]);
        assert_eq!(a.slice(), vec![4, 5, 6]);
    }

    #[test]
    fn pop_many_clamps_to_length() {
        let a = IntArray::new_from((1..=6).collect(), false);
        assert_eq!(a.pop_rights(2), vec![5, 6]);
        assert_eq!(a.pop_lefts(0), Vec::<i64>::new());
        assert_eq!(a.pop_rights(100), vec![1, 2, 3, 4]);
        assert!(a.is_empty());
    }

    #[test]
    fn pop_random_uses_injected_source() {
        let a = IntArray::new_from(vec![10, 20, 30], false)
            .with_source(Arc::new(FixedSource::new([4, 0])));
        // 4 % 3 == 1, then 0 % 2 == 0.
        assert_eq!(a.pop_random(), Ok(20));
        assert_eq!(a.pop_random(), Ok(10));
        assert_eq!(a.slice(), vec![30]);
    }

    #[test]
    fn pop_random_on_empty() {
        let a = seeded(vec![], 1);
        assert_eq!(a.pop_random(), Err(ArrayError::EmptyContainer));
        assert!(a.pop_randoms(3).is_empty());
    }

    #[test]
    fn pop_randoms_draws_without_replacement() {
        let a = seeded((0..20).collect(), 9);
        let mut drawn = a.pop_randoms(15);
        assert_eq!(drawn.len(), 15);
        assert_eq!(a.len(), 5);
        drawn.extend(a.pop_randoms(50));
        drawn.sort_unstable();
        assert_eq!(drawn, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn pop_random_with_global_buffer() {
        let a = IntArray::new_from((0..100).collect(), false);
        let v = a.pop_random().unwrap();
        assert!((0..100).contains(&v));
        assert!(!a.contains(&v));
        assert_eq!(a.len(), 99);
    }

    #[test]
    fn range_clamps_bounds() {
        let a = IntArray::new_from(vec![0, 1, 2, 3, 4], false);
        assert_eq!(a.range(1, 3), vec![1, 2]);
        assert_eq!(a.range(-5, 2), vec![0, 1]);
        assert_eq!(a.range(3, 99), vec![3, 4]);
        assert!(a.range(4, 2).is_empty());
        assert!(a.range(9, 12).is_empty());
        assert_eq!(a.range_view(1, 4), [1, 2, 3]);
    }

    #[test]
    fn append_grows_by_count() {
        let a = IntArray::new_from(vec![1], false);
        let before = a.len();
        a.append([2, 3, 4]);
        assert_eq!(a.len(), before + 3);
    }

    #[test]
    fn slice_is_isolated_copy() {
        for unsafe_ in [false, true] {
            let a = IntArray::new_from(vec![1, 2, 3], unsafe_);
            let mut copy = a.slice();
            copy[0] = 99;
            assert_eq!(a.get(0), Ok(1));
        }
    }

    #[test]
    fn view_aliases_storage() {
        let a = IntArray::new_from(vec![1, 2, 3], true);
        {
            let view = a.view();
            assert_eq!(view, [1, 2, 3]);
            assert_eq!(view.as_ptr(), a.with_shared_access(<[i64]>::as_ptr));
        }
        a.set(0, 7).unwrap();
        assert_eq!(a.view()[0], 7);
    }

    #[test]
    fn view_holder_can_read_with_writer_queued() {
        let a = IntArray::new_from(vec![1, 2, 3], false);
        let (started, wait_started) = std::sync::mpsc::channel();

        thread::scope(|s| {
            let view = a.view();
            s.spawn(|| {
                started.send(()).unwrap();
                a.append([4]);
            });
            wait_started.recv().unwrap();
            thread::sleep(Duration::from_millis(100));

            assert_eq!(a.len(), 3);
            assert_eq!(a.get(2), Ok(3));
            assert_eq!(
                a.try_with_shared_access(Duration::from_secs(1), <[i64]>::len),
                Ok(3)
            );
            assert_eq!(view, [1, 2, 3]);
            drop(view);
        });

        assert_eq!(a.slice(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn clone_is_deep_and_keeps_mode() {
        let a = IntArray::new_from(vec![1, 2], true);
        let b = a.clone();
        b.push_right([3]);
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 3);
        assert!(!b.is_safe());
    }

    #[test]
    fn clear_is_idempotent() {
        let a = IntArray::new_from(vec![1, 2], false);
        assert!(a.clear().is_empty());
        assert!(a.clear().is_empty());
    }

    #[test]
    fn search_and_contains() {
        let a = IntArray::new_from(vec![5, 6, 5], false);
        assert_eq!(a.search(&5), Some(0));
        assert_eq!(a.search(&6), Some(1));
        assert_eq!(a.search(&7), None);
        assert!(a.contains(&6));
        assert!(!a.contains(&0));
    }

    #[test]
    fn unique_keeps_first_occurrence() {
        let a = IntArray::new_from(vec![5, 3, 5, 1], false);
        assert_eq!(a.unique().slice(), vec![5, 3, 1]);
    }

    #[test]
    fn closure_access() {
        let a = IntArray::new_from(vec![1, 2, 3], false);
        a.with_exclusive_access(|items| items.retain(|v| v % 2 == 1));
        assert_eq!(a.with_shared_access(|items| items.to_vec()), vec![1, 3]);
    }

    #[test]
    fn timed_access_reports_would_block() {
        let a = IntArray::new_from(vec![1], false);
        let view = a.view();
        thread::scope(|s| {
            s.spawn(|| {
                let res = a.try_with_exclusive_access(Duration::from_millis(20), |items| {
                    items.push(2)
                });
                assert_eq!(res, Err(ArrayError::WouldBlock(Duration::from_millis(20))));
                assert_eq!(
                    a.try_with_shared_access(Duration::from_millis(20), |items| items.len()),
                    Ok(1)
                );
            });
        });
        drop(view);
        assert!(a
            .try_with_exclusive_access(Duration::from_millis(20), |items| items.push(2))
            .is_ok());
    }

    #[test]
    fn fill_grows_with_default_gap() {
        let a = IntArray::new_with_size(0, 0, false);
        a.fill(2, 3, 9);
        assert_eq!(a.slice(), vec![0, 0, 9, 9, 9]);

        let b = IntArray::new_from(vec![1, 2, 3], false);
        b.fill(-4, 2, 0);
        assert_eq!(b.slice(), vec![0, 0, 3]);
        b.fill(2, 3, 7);
        assert_eq!(b.slice(), vec![0, 0, 7, 7, 7]);
    }

    #[test]
    fn chunk_groups() {
        let a = IntArray::new_from((1..=7).collect(), false);
        assert_eq!(a.chunk(0), None);
        let chunks = a.chunk(3).unwrap();
        assert_eq!(chunks, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
        assert_eq!(IntArray::new(false).chunk(2), Some(vec![]));
    }

    #[test]
    fn pad_both_sides() {
        let a = IntArray::new_from(vec![1, 2], false);
        a.pad(4, 0);
        assert_eq!(a.slice(), vec![1, 2, 0, 0]);
        a.pad(-6, 9);
        assert_eq!(a.slice(), vec![9, 9, 1, 2, 0, 0]);
        a.pad(3, 5).pad(-6, 5).pad(0, 5);
        assert_eq!(a.len(), 6);
    }

    #[test]
    fn reverse_shuffle_and_draws() {
        let a = seeded((0..32).collect(), 4);
        a.reverse();
        assert_eq!(a.get(0), Ok(31));

        a.shuffle();
        let mut items = a.slice();
        items.sort_unstable();
        assert_eq!(items, (0..32).collect::<Vec<_>>());

        let picked = a.rand().unwrap();
        assert!(a.contains(&picked));
        assert_eq!(a.len(), 32);
        assert!(a.rands(100).iter().all(|v| (0..32).contains(v)));
        assert!(seeded(vec![], 1).rands(3).is_empty());
        assert_eq!(seeded(vec![], 1).rand(), Err(ArrayError::EmptyContainer));
    }

    #[test]
    fn join_count_and_iterate() {
        let a = IntArray::new_from(vec![1, 2, 2, 3], false);
        assert_eq!(a.join(","), "1,2,2,3");
        assert_eq!(IntArray::new(false).join(","), "");

        let counts = a.count_values();
        assert_eq!(counts[&2], 2);
        assert_eq!(counts.len(), 3);

        let mut seen = Vec::new();
        a.iterate(|i, v| {
            seen.push((i, *v));
            i < 1
        });
        assert_eq!(seen, vec![(0, 1), (1, 2)]);

        let mut last = None;
        a.iterate_desc(|i, _| {
            last = Some(i);
            true
        });
        assert_eq!(last, Some(0));
    }

    #[test]
    fn generic_elements() {
        let a = Array::new_from(vec!["b".to_string(), "a".to_string()], false);
        a.sort(false);
        assert_eq!(a.join("+"), "a+b");
        assert_eq!(a.into_vec(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn concurrent_appends_in_safe_mode() {
        let a = IntArray::new(false);
        thread::scope(|s| {
            for t in 0..8 {
                let a = &a;
                s.spawn(move || {
                    for i in 0..500 {
                        a.append([t * 1000 + i]);
                    }
                });
            }
        });
        assert_eq!(a.len(), 4000);
        assert_eq!(a.unique().len(), 4000);
    }

    #[test]
    fn concurrent_pop_random_takes_each_element_once() {
        let a = IntArray::new_from((0..2000).collect(), false);
        let drawn: Vec<i64> = thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| (0..500).map(|_| a.pop_random().unwrap()).collect::<Vec<_>>())
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });
        assert!(a.is_empty());
        let mut drawn = drawn;
        drawn.sort_unstable();
        assert_eq!(drawn, (0..2000).collect::<Vec<_>>());
    }

    #[test]
    #[should_panic(expected = "unsafe-mode ToggleLock")]
    fn unsafe_mode_rejects_write_during_view() {
        let a = IntArray::new_from(vec![1], true);
        let _view = a.view();
        a.append([2]);
    }
}
