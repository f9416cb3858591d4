use pactum::{State, TaskError, execute};
use std::future::Future;
use std::pin::pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::task::{Context, Poll, Wake, Waker};
use std::thread;
use std::time::Duration;

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
struct WorkError(&'static str);

/// Drives a future to completion on the current thread.
fn block_on<F: Future>(future: F) -> F::Output {
    struct Unpark(thread::Thread);

    impl Wake for Unpark {
        fn wake(self: Arc<Self>) {
            self.0.unpark();
        }
    }

    let waker = Waker::from(Arc::new(Unpark(thread::current())));
    let mut cx = Context::from_waker(&waker);
    let mut future = pin!(future);

    loop {
        if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
            return output;
        }
        thread::park();
    }
}

#[test]
fn test_get_is_idempotent() {
    let promise = execute((), 21, |_, n: u32| Ok::<_, WorkError>(vec![n; 3]));

    let first = promise.get().unwrap() as *const Vec<u32>;
    for _ in 0..10 {
        let again = promise.get().unwrap();
        assert_eq!(again, &vec![21, 21, 21]);
        assert!(std::ptr::eq(first, again));
    }
}

#[test]
fn test_get_is_idempotent_for_errors() {
    let promise = execute((), (), |_, _| Err::<(), _>(WorkError("boom")));

    for _ in 0..10 {
        assert!(matches!(promise.get(), Err(TaskError::Failed(WorkError("boom")))));
    }
}

#[test]
fn test_concurrent_get_before_and_after_completion() {
    const READERS: usize = 8;

    let (release, gate) = mpsc::channel::<()>();
    let promise = execute((), gate, |_, gate: mpsc::Receiver<()>| {
        let _ = gate.recv();
        Ok::<_, WorkError>(String::from("payload"))
    });

    let ready = Barrier::new(READERS + 1);

    thread::scope(|scope| {
        let early: Vec<_> = (0..READERS)
            .map(|_| {
                scope.spawn(|| {
                    ready.wait();
                    promise.get().map(String::clone).map_err(|_| ())
                })
            })
            .collect();

        ready.wait();
        release.send(()).unwrap();

        for reader in early {
            assert_eq!(reader.join().unwrap(), Ok(String::from("payload")));
        }

        let late: Vec<_> = (0..READERS)
            .map(|_| scope.spawn(|| promise.get().map(String::len).map_err(|_| ())))
            .collect();

        for reader in late {
            assert_eq!(reader.join().unwrap(), Ok(7));
        }
    });
}

#[test]
fn test_get_timeout_leaves_task_running() {
    let (release, gate) = mpsc::channel::<()>();
    let promise = execute((), gate, |_, gate: mpsc::Receiver<()>| {
        let _ = gate.recv();
        Ok::<_, WorkError>(9)
    });

    assert!(promise.get_timeout(Duration::from_millis(20)).is_none());
    assert!(!promise.is_done());

    release.send(()).unwrap();

    assert_eq!(
        promise.get_timeout(Duration::from_secs(5)).and_then(Result::ok),
        Some(&9)
    );
    assert!(promise.is_done());
}

#[test]
fn test_clones_share_one_result() {
    let calls = Arc::new(AtomicUsize::new(0));

    let promise = execute((), calls.clone(), |_, calls: Arc<AtomicUsize>| {
        Ok::<_, WorkError>(calls.fetch_add(1, Ordering::SeqCst) + 100)
    });
    let clone = promise.clone();

    assert_eq!(promise.get().ok(), Some(&100));
    assert_eq!(clone.get().ok(), Some(&100));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_dropping_promise_does_not_stop_task() {
    let (done, observed) = mpsc::channel();

    let promise = execute((), done, |_, done: mpsc::Sender<&'static str>| {
        thread::sleep(Duration::from_millis(20));
        done.send("ran").map_err(|_| WorkError("receiver gone"))
    });
    drop(promise);

    assert_eq!(observed.recv_timeout(Duration::from_secs(5)), Ok("ran"));
}

#[test]
fn test_ready_future_resolves_to_get_result() {
    let (release, gate) = mpsc::channel::<()>();
    let promise = execute((), gate, |_, gate: mpsc::Receiver<()>| {
        let _ = gate.recv();
        Ok::<_, WorkError>(5_u8)
    });

    let releaser = thread::spawn(move || {
        thread::sleep(Duration::from_millis(10));
        release.send(()).unwrap();
    });

    assert_eq!(block_on(promise.ready()).ok(), Some(&5));
    assert_eq!(block_on(promise.ready()).ok(), Some(&5));
    releaser.join().unwrap();
}

#[test]
fn test_ready_future_surfaces_errors() {
    let promise = execute((), (), |_, _| Err::<u8, _>(WorkError("nope")));

    let err = block_on(promise.ready()).unwrap_err();
    assert_eq!(err.work_error(), Some(&WorkError("nope")));
    assert_eq!(err.to_string(), "nope");
}

#[test]
fn test_state_transitions_to_terminal() {
    let ok = execute((), (), |_, _| Ok::<_, WorkError>(()));
    let failed = execute((), (), |_, _| Err::<(), _>(WorkError("x")));

    ok.get().unwrap();
    let _ = failed.get();

    assert_eq!(ok.state(), State::Fulfilled);
    assert_eq!(failed.state(), State::Failed);
    assert!(ok.state().is_terminal());
    assert!(failed.state().is_terminal());
    assert!(!State::Pending.is_terminal());
}
