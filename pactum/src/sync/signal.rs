use super::lock;

use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::task::Waker;
use std::time::Duration;

/// A single-use completion latch.
///
/// A `Signal` starts unset and transitions exactly once to set. Any number
/// of observers may block on it with [`wait`](Self::wait), poll it with
/// [`is_set`](Self::is_set), or register a [`Waker`] to be notified.
/// Once set, no observer ever blocks again.
///
/// Everything the setter wrote before calling [`set`](Self::set)
/// happens-before any observation of the signal as set.
pub struct Signal {
    /// Fast-path flag. Only flipped while `waiters` is locked.
    set: AtomicBool,

    /// Wakers of async observers, drained when the signal is set.
    waiters: Mutex<Vec<Waker>>,

    /// Parks blocking observers.
    cond: Condvar,
}

impl Signal {
    /// Creates a new, unset signal.
    pub const fn new() -> Self {
        Self {
            set: AtomicBool::new(false),
            waiters: Mutex::new(Vec::new()),
            cond: Condvar::new(),
        }
    }

    /// Sets the signal, releasing every current and future waiter.
    ///
    /// Returns `true` if this call performed the transition and `false` if
    /// the signal was already set.
    pub fn set(&self) -> bool {
        let wakers = {
            let mut waiters = lock(&self.waiters);

            if self.set.swap(true, Ordering::AcqRel) {
                return false;
            }

            self.cond.notify_all();
            mem::take(&mut *waiters)
        };

        // Wake outside the lock so a woken task may re-register freely.
        for waker in wakers {
            waker.wake();
        }

        true
    }

    /// Returns `true` if the signal has been set. Never blocks.
    pub fn is_set(&self) -> bool {
        self.set.load(Ordering::Acquire)
    }

    /// Blocks the calling thread until the signal is set.
    ///
    /// Returns immediately if it already is.
    pub fn wait(&self) {
        if self.is_set() {
            return;
        }

        let mut guard = lock(&self.waiters);
        while !self.set.load(Ordering::Acquire) {
            guard = self
                .cond
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Blocks the calling thread until the signal is set or `timeout`
    /// elapses.
    ///
    /// Returns `true` if the signal is set.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_set() {
            return true;
        }

        let guard = lock(&self.waiters);
        let _guard = self
            .cond
            .wait_timeout_while(guard, timeout, |_| !self.set.load(Ordering::Acquire))
            .unwrap_or_else(PoisonError::into_inner);

        self.is_set()
    }

    /// Registers `waker` to be woken when the signal is set.
    ///
    /// Returns `true` without registering if the signal is already set, in
    /// which case the caller must not expect a wake-up. Registering a waker
    /// that would wake the same task twice is a no-op.
    pub fn register(&self, waker: &Waker) -> bool {
        let mut waiters = lock(&self.waiters);

        if self.set.load(Ordering::Acquire) {
            return true;
        }

        if !waiters.iter().any(|w| w.will_wake(waker)) {
            waiters.push(waker.clone());
        }

        false
    }

    /// Removes every registered waker that would wake the same task as
    /// `waker`.
    ///
    /// Observers that stop waiting before the signal is set call this so
    /// their wakers do not pile up on a long-pending signal.
    pub fn deregister(&self, waker: &Waker) {
        lock(&self.waiters).retain(|w| !w.will_wake(waker));
    }

    /// Number of wakers currently registered.
    #[cfg(test)]
    pub(crate) fn waiter_count(&self) -> usize {
        lock(&self.waiters).len()
    }
}

impl Default for Signal {
    /// Returns an unset [`Signal`].
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("set", &self.is_set())
            .finish()
    }
}
