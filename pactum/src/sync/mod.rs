//! Synchronization primitives for Pactum.
//!
//! This module provides the blocking building blocks that promises are made of.
//! Both primitives are single-use latches: they move from "unset" to "set"
//! exactly once and every waiter, present or future, observes the transition.
//!
//! The current primitives include:
//! - [`Signal`] — a one-shot completion latch usable from threads and tasks.
//! - [`CancellationToken`] — a cooperative request-to-stop flag that can be
//!   forwarded into launched work.
//!
//! ## Design notes
//!
//! - Neither primitive spawns threads.
//! - Blocking waits park on a condition variable; async waiters register a
//!   [`Waker`](std::task::Waker) and are woken when the latch is set.

mod cancel;
mod signal;

pub use cancel::CancellationToken;
pub use signal::Signal;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the guard if a previous holder panicked.
///
/// The data guarded inside this module is always left consistent between
/// statements, so poisoning carries no information here.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
