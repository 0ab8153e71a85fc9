//! Blocking bounded FIFO shared by one producer and many consumers.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// A fixed-capacity FIFO. Producers wait while it is full, consumers wait
/// while it is empty. Every pushed item is popped exactly once.
pub struct BoundedQueue<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Creates a queue holding at most `capacity` items (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(State {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pushes every item in order, waiting for room whenever the queue is full.
    ///
    /// Returns `false` if the queue was closed before all items were pushed;
    /// the remaining items are dropped.
    pub fn push_all<I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut items = items.into_iter().peekable();
        let mut state = self.state.lock();
        while items.peek().is_some() {
            while state.items.len() >= self.capacity && !state.closed {
                self.not_full.wait(&mut state);
            }
            if state.closed {
                return false;
            }
            let room = self.capacity - state.items.len();
            state.items.extend(items.by_ref().take(room));
            self.not_empty.notify_all();
        }
        true
    }

    /// Pushes one item, waiting for room. Returns `false` if the queue is closed.
    pub fn push(&self, item: T) -> bool {
        self.push_all(std::iter::once(item))
    }

    /// Removes the oldest item, waiting until one is available.
    pub fn pop(&self) -> T {
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return item;
            }
            self.not_empty.wait(&mut state);
        }
    }

    /// Removes the oldest item if one is buffered right now.
    pub fn try_pop(&self) -> Option<T> {
        let item = self.state.lock().items.pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Like [`pop`](Self::pop) but gives up after `timeout`.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Some(item);
            }
            if self.not_empty.wait_until(&mut state, deadline).timed_out() {
                let item = state.items.pop_front();
                drop(state);
                if item.is_some() {
                    self.not_full.notify_one();
                }
                return item;
            }
        }
    }

    /// Wakes and turns away any waiting producer; later pushes are refused.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.not_full.notify_all();
    }
}
