//! Standard trait implementations for [`Array`].

use crate::array::Array;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Deep copy with the same safety mode and random source.
impl<T: Clone> Clone for Array<T> {
    fn clone(&self) -> Self {
        self.with_shared_access(|items| self.sibling(items.to_vec()))
    }
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new_from(items, false)
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new_from(iter.into_iter().collect(), false)
    }
}

/// Compares contents only; safety mode and source are ignored.
///
/// The two locks are taken in address order, so `a == b` and `b == a`
/// running concurrently cannot wait on each other.
impl<T: PartialEq> PartialEq for Array<T> {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        let (ours, theirs) = if (self as *const Self) < (other as *const Self) {
            let ours = self.view();
            (ours, other.view())
        } else {
            let theirs = other.view();
            (self.view(), theirs)
        };
        *ours == *theirs
    }
}

impl<T: fmt::Debug> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_shared_access(|items| {
            f.debug_struct("Array")
                .field("safety", &self.safety())
                .field("items", &items)
                .finish()
        })
    }
}

/// Renders as `[1,2,3]`.
impl<T: fmt::Display> fmt::Display for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.join(","))
    }
}

/// Serialized as a plain sequence.
impl<T: Serialize> Serialize for Array<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.with_shared_access(|items| items.serialize(serializer))
    }
}

/// Deserialized containers are always in safe mode.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Array<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use crate::IntArray;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn display_and_debug() {
        let a = IntArray::new_from(vec![1, 2, 3], false);
        assert_eq!(a.to_string(), "[1,2,3]");
        assert_eq!(IntArray::new(false).to_string(), "[]");
        assert_eq!(format!("{a:?}"), "Array { safety: Safe, items: [1, 2, 3] }");
    }

    #[test]
    fn equality_ignores_mode() {
        let a = IntArray::new_from(vec![1, 2], false);
        let b = IntArray::new_from(vec![1, 2], true);
        assert_eq!(a, b);
        assert_eq!(a, a);
        b.append([3]);
        assert_ne!(a, b);
    }

    #[test]
    fn symmetric_comparisons_under_write_load() {
        let a = IntArray::new_from(vec![1, 2, 3], false);
        let b = IntArray::new_from(vec![1, 2, 3], false);
        let (done, wait_done) = mpsc::channel();

        thread::scope(|s| {
            for flip in [false, true] {
                let (a, b, done) = (&a, &b, done.clone());
                s.spawn(move || {
                    for _ in 0..2_000 {
                        let _ = if flip { *b == *a } else { *a == *b };
                    }
                    done.send(()).unwrap();
                });
            }
            s.spawn(|| {
                for i in 0..2_000 {
                    a.set(0, i).unwrap();
                    b.set(0, i).unwrap();
                }
            });
            for _ in 0..2 {
                wait_done
                    .recv_timeout(Duration::from_secs(10))
                    .expect("comparisons finished");
            }
        });

        assert_eq!(a, b);
    }

    #[test]
    fn conversions() {
        let a: IntArray = (1..=3).collect();
        assert_eq!(a.slice(), vec![1, 2, 3]);
        assert!(a.is_safe());
        let b = IntArray::from(vec![4]);
        assert_eq!(b.len(), 1);
        assert!(IntArray::default().is_empty());
    }

    #[test]
    fn serde_as_sequence() {
        let a = IntArray::new_from(vec![3, 1, 2], true);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "[3,1,2]");
        let back: IntArray = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
        assert!(back.is_safe());
    }
}
