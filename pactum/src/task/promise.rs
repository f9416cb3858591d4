use super::{Ready, State};
use crate::TaskError;
use crate::sync::Signal;

use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// A handle to the result of work launched with [`execute`](crate::execute).
///
/// A `Promise` holds either the value produced by the work or the error it
/// failed with, plus the [`Signal`] announcing which one is available.
/// It is returned immediately by the launcher; the background task fills it
/// in exactly once and never touches it again.
///
/// Every accessor borrows from the promise: once completed, the stored
/// result is immutable, so any number of threads may read it concurrently
/// and every read observes the same `(value, error)` pair.
///
/// Cloning a `Promise` yields another handle to the same result. Dropping
/// the last handle does **not** stop the task; it only discards the ability
/// to observe its result.
pub struct Promise<V, E> {
    pub(crate) inner: Arc<Inner<V, E>>,
}

/// State shared between a promise and the task fulfilling it.
pub(crate) struct Inner<V, E> {
    /// Written once by the task, before `signal` is set.
    outcome: OnceLock<Result<V, TaskError<E>>>,

    /// Set once `outcome` holds the final result.
    signal: Signal,
}

impl<V, E> Inner<V, E> {
    /// Stores the final result and releases every waiter.
    ///
    /// Only the first call has any effect.
    pub(crate) fn complete(&self, outcome: Result<V, TaskError<E>>) {
        if self.outcome.set(outcome).is_ok() {
            self.signal.set();
        }
    }
}

impl<V, E> Promise<V, E> {
    /// Creates an unfulfilled promise. Only launchers call this.
    pub(crate) fn pending() -> Self {
        Self {
            inner: Arc::new(Inner {
                outcome: OnceLock::new(),
                signal: Signal::new(),
            }),
        }
    }

    /// Blocks until the task completes, then returns its result.
    ///
    /// Once the task has completed, `get` returns immediately and yields the
    /// same result on every call, from any thread.
    pub fn get(&self) -> Result<&V, &TaskError<E>> {
        loop {
            if let Some(result) = self.try_get() {
                return result;
            }
            self.inner.signal.wait();
        }
    }

    /// Returns the result if the task has completed, without blocking.
    pub fn try_get(&self) -> Option<Result<&V, &TaskError<E>>> {
        self.inner.outcome.get().map(Result::as_ref)
    }

    /// Blocks until the task completes or `timeout` elapses.
    ///
    /// Returns `None` on timeout. The task itself is unaffected and keeps
    /// running; a later call may still observe its result.
    pub fn get_timeout(&self, timeout: Duration) -> Option<Result<&V, &TaskError<E>>> {
        self.inner.signal.wait_timeout(timeout);
        self.try_get()
    }

    /// Returns `true` once the task has completed, successfully or not.
    pub fn is_done(&self) -> bool {
        self.inner.signal.is_set()
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> State {
        match self.try_get() {
            None => State::Pending,
            Some(Ok(_)) => State::Fulfilled,
            Some(Err(_)) => State::Failed,
        }
    }

    /// Returns a future that resolves to the same result as [`get`](Self::get).
    ///
    /// The future never blocks the thread polling it, so it can be awaited
    /// from inside an async runtime.
    pub fn ready(&self) -> Ready<'_, V, E> {
        Ready::new(self)
    }

    pub(crate) fn signal(&self) -> &Signal {
        &self.inner.signal
    }
}

impl<V, E> Clone for Promise<V, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V, E> std::fmt::Debug for Promise<V, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Promise")
            .field("state", &self.state())
            .finish()
    }
}

/// A completion observed by [`wait`](crate::wait) and [`settle`](crate::settle).
///
/// This is the value-agnostic view of a promise: it exposes when the work
/// finished and whether it failed, but not the value. It is object safe, so
/// promises with different value types but a shared error type can be
/// joined through `&dyn Completion<Error = E>`.
pub trait Completion {
    /// The work error type.
    type Error;

    /// The signal set when the work completes.
    fn signal(&self) -> &Signal;

    /// The failure, if the work has completed with one.
    ///
    /// Returns `None` while pending and for successful completions.
    fn failure(&self) -> Option<&TaskError<Self::Error>>;
}

impl<V, E> Completion for Promise<V, E> {
    type Error = E;

    fn signal(&self) -> &Signal {
        Promise::signal(self)
    }

    fn failure(&self) -> Option<&TaskError<E>> {
        self.try_get().and_then(Result::err)
    }
}

impl<C: Completion + ?Sized> Completion for &C {
    type Error = C::Error;

    fn signal(&self) -> &Signal {
        (**self).signal()
    }

    fn failure(&self) -> Option<&TaskError<C::Error>> {
        (**self).failure()
    }
}
