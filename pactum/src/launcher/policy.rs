/// What happens when launched work panics instead of returning.
///
/// The default is [`PanicPolicy::Isolate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanicPolicy {
    /// Catch the panic at the task boundary and fail the promise with
    /// [`TaskError::Panicked`](crate::TaskError::Panicked).
    ///
    /// One misbehaving task cannot take down unrelated work.
    #[default]
    Isolate,

    /// Log the panic and abort the whole process.
    Abort,
}
