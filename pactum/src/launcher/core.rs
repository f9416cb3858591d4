use super::PanicPolicy;
use super::builder::{DEFAULT_NAME, LauncherBuilder};
use crate::{Promise, TaskError};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Process-wide counter used to number task threads.
static NEXT_TASK_ID: AtomicUsize = AtomicUsize::new(0);

/// Launches work onto dedicated threads and returns promises for it.
///
/// A `Launcher` is only configuration: it owns no threads and keeps no
/// record of the tasks it started. Cloning it is cheap.
#[derive(Debug, Clone)]
pub struct Launcher {
    /// Prefix of task thread names.
    name: Arc<str>,

    /// Stack size of task threads, platform default when `None`.
    stack_size: Option<usize>,

    /// Handling of panics inside work.
    panic_policy: PanicPolicy,
}

impl Launcher {
    pub(crate) fn new(
        name: Arc<str>,
        stack_size: Option<usize>,
        panic_policy: PanicPolicy,
    ) -> Self {
        Self {
            name,
            stack_size,
            panic_policy,
        }
    }

    /// Returns a [`LauncherBuilder`] with default configuration.
    pub fn builder() -> LauncherBuilder {
        LauncherBuilder::new()
    }

    /// Returns the configured panic policy.
    pub fn panic_policy(&self) -> PanicPolicy {
        self.panic_policy
    }

    /// Launches `work(ctx, input)` on a new thread and returns its promise.
    ///
    /// This never blocks: the promise is returned without waiting for the
    /// task to start. The task calls `work` exactly once, stores whatever it
    /// produces into the promise, and only then marks the promise complete.
    ///
    /// `ctx` is handed to `work` untouched. The launcher never inspects it,
    /// so a [`CancellationToken`](crate::CancellationToken) that is already
    /// cancelled does not prevent `work` from running; honoring it is up to
    /// `work`.
    ///
    /// If the thread cannot be spawned the promise is returned already
    /// failed with [`TaskError::Spawn`] and `work` is dropped uncalled.
    pub fn execute<C, T, V, E, F>(&self, ctx: C, input: T, work: F) -> Promise<V, E>
    where
        C: Send + 'static,
        T: Send + 'static,
        V: Send + Sync + 'static,
        E: Send + Sync + 'static,
        F: FnOnce(C, T) -> Result<V, E> + Send + 'static,
    {
        let promise = Promise::pending();
        let inner = Arc::clone(&promise.inner);

        let id = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
        let task_name = format!("{}-{id}", self.name);
        let policy = self.panic_policy;

        let mut builder = thread::Builder::new().name(task_name.clone());
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }

        let spawned = builder.spawn(move || {
            tracing::trace!(task = %task_name, "task started");

            let outcome = run_work(policy, &task_name, move || work(ctx, input));
            let failed = outcome.is_err();

            inner.complete(outcome);

            tracing::trace!(task = %task_name, failed, "task completed");
        });

        if let Err(err) = spawned {
            tracing::error!(error = %err, "failed to spawn task thread");
            promise.inner.complete(Err(TaskError::Spawn(err)));
        }

        promise
    }

    /// Launches one task per input and returns the promises in input order.
    ///
    /// Each task receives its own clone of `ctx` and of `work`. Nothing
    /// bounds how many tasks run at once.
    pub fn fan_out<C, I, V, E, F>(&self, ctx: C, inputs: I, work: F) -> Vec<Promise<V, E>>
    where
        C: Clone + Send + 'static,
        I: IntoIterator,
        I::Item: Send + 'static,
        V: Send + Sync + 'static,
        E: Send + Sync + 'static,
        F: Fn(C, I::Item) -> Result<V, E> + Clone + Send + 'static,
    {
        inputs
            .into_iter()
            .map(|input| self.execute(ctx.clone(), input, work.clone()))
            .collect()
    }
}

impl Default for Launcher {
    /// Returns a launcher with the default configuration.
    fn default() -> Self {
        Self::new(Arc::from(DEFAULT_NAME), None, PanicPolicy::default())
    }
}

/// Runs `work`, applying `policy` if it panics.
fn run_work<V, E>(
    policy: PanicPolicy,
    task_name: &str,
    work: impl FnOnce() -> Result<V, E>,
) -> Result<V, TaskError<E>> {
    match panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(result) => result.map_err(TaskError::Failed),
        Err(payload) => {
            let message = panic_message(&*payload);

            match policy {
                PanicPolicy::Isolate => {
                    tracing::warn!(
                        task = task_name,
                        %message,
                        "task panicked; failing its promise"
                    );
                    Err(TaskError::Panicked { message })
                }
                PanicPolicy::Abort => {
                    tracing::error!(task = task_name, %message, "task panicked; aborting");
                    process::abort()
                }
            }
        }
    }
}

/// Extracts the message of a panic payload.
///
/// `panic!` with a literal produces a `&str`, with format arguments a
/// `String`; anything else comes from `panic_any`.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
