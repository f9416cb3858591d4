//! # Pactum
//!
//! **Pactum** is a minimal promise primitive for the **Nebula** ecosystem:
//! launch a unit of work concurrently, get a handle back immediately, and
//! block on that handle later to collect either a value or an error.
//!
//! Unlike an async runtime, Pactum does not schedule anything. Each launched
//! task runs on its own thread, and the only state shared between the task
//! and its callers is the promise itself. Pactum offers:
//!
//! - [`execute`] — launch `work(ctx, input)` and return a [`Promise`]
//! - [`Promise::get`] — block until the result is available, then read it
//!   as often as needed from any thread
//! - [`wait`] — fail-fast fan-in over many promises
//! - [`settle`] — wait for everything and collect every failure
//! - [`join!`] — fail-fast fan-in over promises of different value types
//! - [`CancellationToken`] — a cooperative stop flag to forward into work
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pactum::CancellationToken;
//!
//! let ctx = CancellationToken::new();
//! let promises: Vec<_> = (1..=3)
//!     .map(|n| pactum::execute(ctx.clone(), n, |_ctx, n: u64| Ok::<_, MyError>(n * n)))
//!     .collect();
//!
//! pactum::wait(&promises)?;
//!
//! for promise in &promises {
//!     println!("{}", promise.get()?);
//! }
//! ```
//!
//! ## Failure model
//!
//! A promise fails with [`TaskError`]: the work's own error, a panic caught
//! at the task boundary (see [`PanicPolicy`]), or a thread that could not be
//! spawned. Pactum never retries, never times out work and never cancels it;
//! stopping work is the job of the token the caller forwards into it.
//!
//! ## Modules
//!
//! - [`sync`] — the completion signal and cancellation token
//! - [`task`] — promises and the fan-in operations over them

mod error;
mod launcher;

pub mod sync;
pub mod task;

pub use error::TaskError;
pub use launcher::{Launcher, LauncherBuilder, PanicPolicy};
pub use sync::CancellationToken;
pub use task::{Completion, Promise, State, settle, wait};

pub use pactum_macros::join;

use std::sync::LazyLock;

/// Launcher used by the crate-level [`execute`] and [`fan_out`].
static DEFAULT_LAUNCHER: LazyLock<Launcher> = LazyLock::new(Launcher::default);

/// Launches `work(ctx, input)` with the default [`Launcher`] and returns its
/// promise immediately.
///
/// See [`Launcher::execute`].
pub fn execute<C, T, V, E, F>(ctx: C, input: T, work: F) -> Promise<V, E>
where
    C: Send + 'static,
    T: Send + 'static,
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
    F: FnOnce(C, T) -> Result<V, E> + Send + 'static,
{
    DEFAULT_LAUNCHER.execute(ctx, input, work)
}

/// Launches one task per input with the default [`Launcher`].
///
/// See [`Launcher::fan_out`].
pub fn fan_out<C, I, V, E, F>(ctx: C, inputs: I, work: F) -> Vec<Promise<V, E>>
where
    C: Clone + Send + 'static,
    I: IntoIterator,
    I::Item: Send + 'static,
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
    F: Fn(C, I::Item) -> Result<V, E> + Clone + Send + 'static,
{
    DEFAULT_LAUNCHER.fan_out(ctx, inputs, work)
}

#[doc(hidden)]
pub mod __private {
    use crate::Completion;

    /// Erases the value type of a promise for `join!`.
    pub fn as_completion<'a, P>(promise: &'a P) -> &'a (dyn Completion<Error = P::Error> + 'a)
    where
        P: Completion + 'a,
    {
        promise
    }
}
