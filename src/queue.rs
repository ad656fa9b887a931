//! Worker Queue
//!
//! Unbounded FIFO shared between the producers submitting tasks, the
//! workers stealing from it, and the one worker that blocks on it.
//!
//! The non-blocking operations give up when the lock is contended, so a
//! caller can move on to another queue instead of waiting.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, TryLockError};

#[derive(Debug)]
struct State<T> {
    items: VecDeque<T>,
    done: bool,
}

#[derive(Debug)]
pub struct WorkerQueue<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

impl<T> Default for WorkerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkerQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State { items: VecDeque::new(), done: false }),
            ready: Condvar::new(),
        }
    }
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        // A panic while holding the lock cannot leave the deque half
        // updated, keep using it
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
    fn try_lock(&self) -> Option<MutexGuard<'_, State<T>>> {
        match self.state.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(e)) => Some(e.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }
    /// Pop an item without blocking
    ///
    /// Fails when the queue is locked by another thread, empty, or done
    pub fn try_pop(&self) -> Option<T> {
        let mut state = self.try_lock()?;
        if state.done {
            return None;
        }
        state.items.pop_front()
    }
    /// Push an item without blocking
    ///
    /// The item is handed back when the queue is locked by another thread
    /// or done
    pub fn try_push(&self, item: T) -> Result<(), T> {
        {
            let mut state = match self.try_lock() {
                Some(state) => state,
                None => return Err(item),
            };
            if state.done {
                return Err(item);
            }
            state.items.push_back(item);
        }
        self.ready.notify_one();
        Ok(())
    }
    /// Pop an item, blocking until one arrives or the queue is done
    ///
    /// Returns `None` once the queue is done
    pub fn pop(&self) -> Option<T> {
        let mut state = self.lock();
        while state.items.is_empty() && !state.done {
            state = self.ready.wait(state).unwrap_or_else(|e| e.into_inner());
        }
        if state.done {
            return None;
        }
        state.items.pop_front()
    }
    /// Push an item, waiting for the lock
    ///
    /// The item is handed back when the queue is done
    pub fn push(&self, item: T) -> Result<(), T> {
        {
            let mut state = self.lock();
            if state.done {
                return Err(item);
            }
            state.items.push_back(item);
        }
        self.ready.notify_one();
        Ok(())
    }
    /// Stop the queue and wake every blocked `pop`
    ///
    /// Calling it more than once has no further effect
    pub fn done(&self) {
        {
            let mut state = self.lock();
            state.done = true;
        }
        self.ready.notify_all();
    }
    pub fn is_done(&self) -> bool {
        self.lock().done
    }
    /// Number of queued items
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Remove every queued item, used to collect abandoned items after
    /// the queue is done
    pub fn drain(&self) -> Vec<T> {
        self.lock().items.drain(..).collect()
    }
}
