use super::Completion;
use super::waker::current_thread_waker;
use crate::TaskError;

use std::thread;

/// Blocks until one promise fails or all of them succeed.
///
/// Returns the first failure observed, without waiting for the remaining
/// promises (fail-fast), or `Ok(())` once every promise has completed
/// successfully. An empty input returns `Ok(())` immediately.
///
/// When several promises fail concurrently, which failure is returned is
/// unspecified: it depends on the order completions are observed in.
///
/// Returning early does **not** cancel the promises still running. Their
/// tasks run to completion and each result stays available through its own
/// [`Promise::get`](crate::Promise::get). Use a
/// [`CancellationToken`](crate::CancellationToken) shared with the work to
/// stop it.
///
/// # Examples
///
/// ```rust,ignore
/// let promises = pactum::fan_out(CancellationToken::new(), 1..=3, |_, n: u64| {
///     Ok::<_, MyError>(n * n)
/// });
///
/// pactum::wait(&promises)?;
/// ```
pub fn wait<'a, I, P>(promises: I) -> Result<(), &'a TaskError<P::Error>>
where
    I: IntoIterator<Item = &'a P>,
    P: Completion + ?Sized + 'a,
{
    let mut pending: Vec<&'a P> = promises.into_iter().collect();

    if pending.is_empty() {
        return Ok(());
    }

    let waker = current_thread_waker();

    loop {
        let mut i = 0;

        while i < pending.len() {
            let promise = pending[i];

            if !promise.signal().is_set() {
                i += 1;
                continue;
            }

            if let Some(err) = promise.failure() {
                tracing::debug!(
                    remaining = pending.len() - 1,
                    "wait returning early on failed promise"
                );
                // Leave no waker behind on the promises still running.
                for promise in &pending {
                    promise.signal().deregister(&waker);
                }
                return Err(err);
            }

            // Order is irrelevant here, only the remaining count matters.
            pending.swap_remove(i);
        }

        if pending.is_empty() {
            return Ok(());
        }

        // A signal set between the scan and registration reports ready
        // instead of storing the waker.
        let mut ready = false;
        for promise in &pending {
            ready |= promise.signal().register(&waker);
        }

        if !ready {
            thread::park();
        }
    }
}

/// Blocks until every promise has completed and collects all failures.
///
/// Unlike [`wait`], this never returns early. Failures are returned in the
/// order the promises were given, regardless of completion order. An empty
/// vector means every promise succeeded.
pub fn settle<'a, I, P>(promises: I) -> Vec<&'a TaskError<P::Error>>
where
    I: IntoIterator<Item = &'a P>,
    P: Completion + ?Sized + 'a,
{
    promises
        .into_iter()
        .filter_map(|promise| {
            promise.signal().wait();
            promise.failure()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::wait;
    use crate::{Promise, TaskError};

    #[test]
    fn early_return_leaves_no_waker_on_pending_promises() {
        let slow: Promise<u8, &str> = Promise::pending();

        for _ in 0..200 {
            let failing: Promise<u8, &str> = Promise::pending();
            let racer = failing.clone();
            let setter = std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_millis(1));
                racer.inner.complete(Err(TaskError::Failed("boom")));
            });

            assert!(wait([&slow, &failing]).is_err());
            setter.join().unwrap();
        }

        assert_eq!(slow.signal().waiter_count(), 0);

        slow.inner.complete(Ok(1));
        assert!(wait([&slow]).is_ok());
    }
}
