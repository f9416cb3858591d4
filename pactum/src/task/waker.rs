use std::sync::Arc;
use std::task::{Wake, Waker};
use std::thread::{self, Thread};

/// Wakes a blocked thread by unparking it.
///
/// Lets a thread that is not running an executor register itself on many
/// [`Signal`](crate::sync::Signal)s at once and park until any of them fires.
struct ThreadWaker {
    thread: Thread,
}

impl Wake for ThreadWaker {
    fn wake(self: Arc<Self>) {
        self.thread.unpark();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.thread.unpark();
    }
}

/// Returns a [`Waker`] that unparks the calling thread.
///
/// Unparking before the thread parks is not lost: the next
/// [`thread::park`] returns immediately.
pub(crate) fn current_thread_waker() -> Waker {
    Waker::from(Arc::new(ThreadWaker {
        thread: thread::current(),
    }))
}
