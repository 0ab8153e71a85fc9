use parking_lot::lock_api::{
    RawRwLock as _, RawRwLockRecursive as _, RawRwLockRecursiveTimed as _, RawRwLockTimed as _,
};
use parking_lot::RawRwLock;
use q_types::Safety;
use std::cell::UnsafeCell;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Borrow-flag value marking an outstanding exclusive borrow.
const EXCLUSIVE: usize = usize::MAX;

enum Discipline {
    /// Safe mode: a real reader/writer lock.
    Blocking(RawRwLock),
    /// Unsafe mode: a borrow flag that is never waited on.
    Unchecked(AtomicUsize),
}

/// A reader/writer lock whose safety is chosen once, at construction.
///
/// In [`Safety::Safe`] mode this behaves like `parking_lot::RwLock`: any
/// number of readers or a single writer, and contended callers block until
/// the lock becomes available. Shared acquisition is recursive: it is granted
/// while other readers hold the lock even if a writer is queued, so a thread
/// that already holds a [`ReadGuard`] can take another one without
/// deadlocking against that writer.
///
/// In [`Safety::Unsafe`] mode acquisition never blocks and never waits. The
/// caller is responsible for serializing access. Overlapping a writer with
/// any other borrow is a contract violation; it is detected by a plain atomic
/// borrow flag and reported as a panic, so the violation can never turn into
/// a data race. The `try_*` variants report the same conflict as `None`.
///
/// Unsafe mode is not free: every acquire and release is one uncontended
/// atomic operation on the borrow flag, roughly the cost of an uncontended
/// safe-mode lock. What it saves is blocking and waiting.
///
/// `ToggleLock<()>` is the bare primitive with no protected data.
pub struct ToggleLock<T: ?Sized> {
    discipline: Discipline,
    data: UnsafeCell<T>,
}

// SAFETY: access to `data` is mediated by the guards below. In both modes a
// `WriteGuard` is only handed out while no other guard exists, and readers
// only ever obtain `&T`. This mirrors the bounds of `std::sync::RwLock`.
unsafe impl<T: ?Sized + Send> Send for ToggleLock<T> {}
unsafe impl<T: ?Sized + Send + Sync> Sync for ToggleLock<T> {}

impl<T> ToggleLock<T> {
    /// Creates a lock around `value`. `unsafe_ == false` selects safe mode.
    pub fn new(value: T, unsafe_: bool) -> Self {
        Self::with_safety(value, Safety::from_unsafe_flag(unsafe_))
    }

    pub fn with_safety(value: T, safety: Safety) -> Self {
        tracing::trace!(%safety, "created toggle lock");
        let discipline = match safety {
            Safety::Safe => Discipline::Blocking(RawRwLock::INIT),
            Safety::Unsafe => Discipline::Unchecked(AtomicUsize::new(0)),
        };
        Self {
            discipline,
            data: UnsafeCell::new(value),
        }
    }

    /// Consumes the lock and returns the protected value.
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: ?Sized> ToggleLock<T> {
    pub fn safety(&self) -> Safety {
        match self.discipline {
            Discipline::Blocking(_) => Safety::Safe,
            Discipline::Unchecked(_) => Safety::Unsafe,
        }
    }

    pub fn is_safe(&self) -> bool {
        self.safety().is_safe()
    }

    /// Acquires shared access, blocking in safe mode while a writer holds the lock.
    ///
    /// # Panics
    ///
    /// In unsafe mode, panics if an exclusive borrow is outstanding.
    pub fn read(&self) -> ReadGuard<'_, T> {
        match &self.discipline {
            Discipline::Blocking(raw) => raw.lock_shared_recursive(),
            Discipline::Unchecked(flag) => {
                if !borrow_shared(flag) {
                    violation("shared", "an exclusive borrow")
                }
            }
        }
        ReadGuard::new(self)
    }

    /// Acquires exclusive access, blocking in safe mode while any guard exists.
    ///
    /// # Panics
    ///
    /// In unsafe mode, panics if any other borrow is outstanding.
    pub fn write(&self) -> WriteGuard<'_, T> {
        match &self.discipline {
            Discipline::Blocking(raw) => raw.lock_exclusive(),
            Discipline::Unchecked(flag) => {
                if !borrow_exclusive(flag) {
                    violation("exclusive", "another borrow")
                }
            }
        }
        WriteGuard::new(self)
    }

    pub fn try_read(&self) -> Option<ReadGuard<'_, T>> {
        let acquired = match &self.discipline {
            Discipline::Blocking(raw) => raw.try_lock_shared_recursive(),
            Discipline::Unchecked(flag) => borrow_shared(flag),
        };
        acquired.then(|| ReadGuard::new(self))
    }

    pub fn try_write(&self) -> Option<WriteGuard<'_, T>> {
        let acquired = match &self.discipline {
            Discipline::Blocking(raw) => raw.try_lock_exclusive(),
            Discipline::Unchecked(flag) => borrow_exclusive(flag),
        };
        acquired.then(|| WriteGuard::new(self))
    }

    /// Like [`read`](Self::read) but gives up after `timeout`.
    ///
    /// Returns `None` if the lock could not be acquired in time. Unsafe mode
    /// never waits, so the timeout is irrelevant there.
    pub fn try_read_for(&self, timeout: Duration) -> Option<ReadGuard<'_, T>> {
        let acquired = match &self.discipline {
            Discipline::Blocking(raw) => raw.try_lock_shared_recursive_for(timeout),
            Discipline::Unchecked(flag) => borrow_shared(flag),
        };
        acquired.then(|| ReadGuard::new(self))
    }

    /// Like [`write`](Self::write) but gives up after `timeout`.
    pub fn try_write_for(&self, timeout: Duration) -> Option<WriteGuard<'_, T>> {
        let acquired = match &self.discipline {
            Discipline::Blocking(raw) => raw.try_lock_exclusive_for(timeout),
            Discipline::Unchecked(flag) => borrow_exclusive(flag),
        };
        acquired.then(|| WriteGuard::new(self))
    }

    /// Mutable access through unique ownership; no locking needed.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    fn release_shared(&self) {
        match &self.discipline {
            // SAFETY: only called from `ReadGuard::drop`, which owns a shared lock.
            Discipline::Blocking(raw) => unsafe { raw.unlock_shared() },
            Discipline::Unchecked(flag) => {
                flag.fetch_sub(1, Ordering::Release);
            }
        }
    }

    fn release_exclusive(&self) {
        match &self.discipline {
            // SAFETY: only called from `WriteGuard::drop`, which owns the exclusive lock.
            Discipline::Blocking(raw) => unsafe { raw.unlock_exclusive() },
            Discipline::Unchecked(flag) => flag.store(0, Ordering::Release),
        }
    }
}

fn borrow_shared(flag: &AtomicUsize) -> bool {
    flag.fetch_update(Ordering::Acquire, Ordering::Relaxed, |n| {
        if n >= EXCLUSIVE - 1 {
            None
        } else {
            Some(n + 1)
        }
    })
    .is_ok()
}

fn borrow_exclusive(flag: &AtomicUsize) -> bool {
    flag.compare_exchange(0, EXCLUSIVE, Ordering::Acquire, Ordering::Relaxed)
        .is_ok()
}

#[cold]
#[track_caller]
fn violation(wanted: &str, held: &str) -> ! {
    tracing::error!(wanted, held, "conflicting access to an unsafe-mode lock");
    panic!("unsafe-mode ToggleLock: {wanted} access requested while {held} is outstanding")
}

impl<T: Default> Default for ToggleLock<T> {
    fn default() -> Self {
        Self::with_safety(T::default(), Safety::Safe)
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for ToggleLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("ToggleLock");
        d.field("safety", &self.safety());
        match self.try_read() {
            Some(guard) => d.field("data", &&*guard),
            None => d.field("data", &format_args!("<locked>")),
        };
        d.finish()
    }
}

/// Shared access to the data of a [`ToggleLock`]; released on drop.
#[must_use = "if unused the lock is released immediately"]
pub struct ReadGuard<'a, T: ?Sized> {
    lock: &'a ToggleLock<T>,
    _not_send: PhantomData<*const ()>,
}

// SAFETY: a shared guard only yields `&T`.
unsafe impl<T: ?Sized + Sync> Sync for ReadGuard<'_, T> {}

impl<'a, T: ?Sized> ReadGuard<'a, T> {
    fn new(lock: &'a ToggleLock<T>) -> Self {
        Self {
            lock,
            _not_send: PhantomData,
        }
    }
}

impl<T: ?Sized> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: a shared borrow is held for the lifetime of the guard.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T: ?Sized> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.release_shared();
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for ReadGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

/// Exclusive access to the data of a [`ToggleLock`]; released on drop.
#[must_use = "if unused the lock is released immediately"]
pub struct WriteGuard<'a, T: ?Sized> {
    lock: &'a ToggleLock<T>,
    _not_send: PhantomData<*const ()>,
}

// SAFETY: `&WriteGuard` only yields `&T`.
unsafe impl<T: ?Sized + Sync> Sync for WriteGuard<'_, T> {}

impl<'a, T: ?Sized> WriteGuard<'a, T> {
    fn new(lock: &'a ToggleLock<T>) -> Self {
        Self {
            lock,
            _not_send: PhantomData,
        }
    }
}

impl<T: ?Sized> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the exclusive borrow is held for the lifetime of the guard.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T: ?Sized> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the exclusive borrow is held for the lifetime of the guard.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T: ?Sized> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.release_exclusive();
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for WriteGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
