use super::Promise;
use crate::TaskError;

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};

/// Future returned by [`Promise::ready`].
///
/// Resolves to the promise's result once the task has completed. Polling
/// never blocks the thread, which makes a promise usable from async code
/// running on any executor.
#[must_use = "futures do nothing unless polled"]
pub struct Ready<'a, V, E> {
    promise: &'a Promise<V, E>,

    /// The waker last registered on the promise's signal, if any.
    registered: Option<Waker>,
}

impl<'a, V, E> Ready<'a, V, E> {
    pub(crate) fn new(promise: &'a Promise<V, E>) -> Self {
        Self {
            promise,
            registered: None,
        }
    }
}

impl<'a, V, E> Future for Ready<'a, V, E> {
    type Output = Result<&'a V, &'a TaskError<E>>;

    /// Polls the promise.
    ///
    /// The waker is registered **before** re-checking the result so a
    /// completion racing with registration is never missed.
    ///
    /// A waker replaced between polls is removed from the signal first, so
    /// at most one waker per `Ready` is ever registered.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let promise = this.promise;

        if let Some(result) = promise.try_get() {
            return Poll::Ready(result);
        }

        let stale = match &this.registered {
            Some(previous) => !previous.will_wake(cx.waker()),
            None => true,
        };

        if stale {
            if let Some(previous) = this.registered.take() {
                promise.signal().deregister(&previous);
            }
            promise.signal().register(cx.waker());
            this.registered = Some(cx.waker().clone());
        }

        match promise.try_get() {
            Some(result) => Poll::Ready(result),
            None => Poll::Pending,
        }
    }
}

impl<V, E> Drop for Ready<'_, V, E> {
    /// Removes the registered waker if the future is dropped while pending.
    fn drop(&mut self) {
        if let Some(waker) = self.registered.take() {
            self.promise.signal().deregister(&waker);
        }
    }
}
