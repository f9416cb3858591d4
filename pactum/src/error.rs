use std::io;

use thiserror::Error;

/// The error side of a completed [`Promise`](crate::Promise).
///
/// A promise fails for one of three reasons: the work returned an error,
/// the work panicked and the launcher isolated the panic, or the task
/// thread could not be started at all.
#[derive(Debug, Error)]
pub enum TaskError<E> {
    /// The error returned by the work function, stored verbatim.
    #[error(transparent)]
    Failed(E),

    /// The work function panicked.
    ///
    /// Only produced under [`PanicPolicy::Isolate`](crate::PanicPolicy::Isolate).
    #[error("task panicked: {message}")]
    Panicked { message: String },

    /// The operating system refused to start the task thread.
    #[error("failed to spawn task thread")]
    Spawn(#[source] io::Error),
}

impl<E> TaskError<E> {
    /// Returns the work error, if this failure came from the work itself.
    pub fn work_error(&self) -> Option<&E> {
        match self {
            TaskError::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` if the work panicked.
    pub fn is_panic(&self) -> bool {
        matches!(self, TaskError::Panicked { .. })
    }
}
