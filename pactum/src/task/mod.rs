//! Promise primitives.
//!
//! This module defines the handle returned by [`execute`](crate::execute)
//! and the fan-in operations built on top of it.
//!
//! It includes:
//! - [`Promise`], the write-once result container and its blocking accessors,
//! - [`Ready`], a future view of a promise for async callers,
//! - [`wait`] and [`settle`], which join many promises at one decision point,
//! - the [`Completion`] trait those joins operate on.
//!
//! Promises are only ever created by a launcher; the task that fills them is
//! the sole writer.

pub(crate) mod promise;
pub(crate) mod ready;
pub(crate) mod state;
pub(crate) mod wait;
pub(crate) mod waker;

pub use promise::{Completion, Promise};
pub use ready::Ready;
pub use state::State;
pub use wait::{settle, wait};
