use super::{Signal, lock};

use std::mem;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

/// A cooperative request-to-stop flag.
///
/// Tokens are cheap to clone; every clone observes the same cancellation.
/// Pactum never acts on a token itself: launched work receives it verbatim
/// and is responsible for checking it and returning early.
///
/// Child tokens created with [`child_token`](Self::child_token) are
/// cancelled together with their parent, but cancelling a child leaves the
/// parent untouched.
#[derive(Clone, Default)]
pub struct CancellationToken {
    inner: Arc<TokenInner>,
}

#[derive(Default)]
struct TokenInner {
    signal: Signal,

    /// Children to cancel alongside this token. Dead entries are pruned
    /// whenever a new child is attached.
    children: Mutex<Vec<Weak<TokenInner>>>,
}

impl CancellationToken {
    /// Creates a new token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of this token and all of its children.
    ///
    /// Calling `cancel` more than once has no further effect.
    pub fn cancel(&self) {
        if !self.inner.signal.set() {
            return;
        }

        // Walked with a worklist so deep child chains cannot exhaust the stack.
        let mut pending = vec![Arc::clone(&self.inner)];
        while let Some(token) = pending.pop() {
            let children = mem::take(&mut *lock(&token.children));
            for child in children.iter().filter_map(Weak::upgrade) {
                if child.signal.set() {
                    pending.push(child);
                }
            }
        }
    }

    /// Returns `true` if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.signal.is_set()
    }

    /// Blocks the calling thread until cancellation is requested.
    pub fn wait(&self) {
        self.inner.signal.wait();
    }

    /// Blocks until cancellation is requested or `timeout` elapses.
    ///
    /// Returns `true` if the token is cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.inner.signal.wait_timeout(timeout)
    }

    /// Creates a token that is cancelled whenever this one is.
    ///
    /// A child created from an already-cancelled token starts cancelled.
    pub fn child_token(&self) -> CancellationToken {
        let child = CancellationToken::new();

        let mut children = lock(&self.inner.children);
        if self.is_cancelled() {
            drop(children);
            child.cancel();
            return child;
        }

        children.retain(|weak| weak.strong_count() > 0);
        children.push(Arc::downgrade(&child.inner));

        child
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("is_cancelled", &self.is_cancelled())
            .finish()
    }
}
