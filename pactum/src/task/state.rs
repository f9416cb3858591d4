/// Lifecycle of a [`Promise`](crate::Promise).
///
/// `Pending` moves to exactly one of the two terminal states and never
/// changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// The task has not completed yet.
    Pending,

    /// The task completed with a value.
    Fulfilled,

    /// The task completed with an error.
    Failed,
}

impl State {
    /// Returns `true` for [`State::Fulfilled`] and [`State::Failed`].
    pub fn is_terminal(self) -> bool {
        !matches!(self, State::Pending)
    }
}
