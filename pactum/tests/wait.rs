use pactum::{CancellationToken, Completion, Promise, TaskError, execute, fan_out, settle, wait};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
struct WorkError(&'static str);

#[test]
fn test_wait_empty_set_returns_immediately() {
    let none: Vec<Promise<u8, WorkError>> = Vec::new();

    let started = Instant::now();
    assert!(wait(&none).is_ok());
    assert!(settle(&none).is_empty());
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_wait_squares_in_creation_order() {
    let ctx = CancellationToken::new();
    let promises: Vec<_> = [1, 2, 3]
        .into_iter()
        .map(|n| execute(ctx.clone(), n, |_, n: i32| Ok::<_, WorkError>(n * n)))
        .collect();

    assert!(wait(&promises).is_ok());

    let values: Vec<i32> = promises.iter().map(|p| *p.get().unwrap()).collect();
    assert_eq!(values, vec![1, 4, 9]);
}

#[test]
fn test_wait_returns_only_after_every_task_completed() {
    let finished = Arc::new(AtomicUsize::new(0));

    let promises: Vec<_> = (0..10_u64)
        .map(|n| {
            execute((), finished.clone(), move |_, finished: Arc<AtomicUsize>| {
                thread::sleep(Duration::from_millis(5 * (10 - n)));
                finished.fetch_add(1, Ordering::SeqCst);
                Ok::<_, WorkError>(n)
            })
        })
        .collect();

    assert!(wait(&promises).is_ok());
    assert_eq!(finished.load(Ordering::SeqCst), 10);
    assert!(promises.iter().all(Promise::is_done));
}

#[test]
fn test_wait_fails_fast_on_boom() {
    let (release, gate) = mpsc::channel::<()>();

    let slow = execute((), gate, |_, gate: mpsc::Receiver<()>| {
        let _ = gate.recv();
        Ok::<_, WorkError>(5)
    });
    let failing = execute((), (), |_, _| Err::<i32, _>(WorkError("boom")));

    let promises = [slow, failing];

    // The slow task is still blocked, so only fail-fast can return here.
    let err = wait(&promises).unwrap_err();
    assert_eq!(err.work_error(), Some(&WorkError("boom")));
    assert!(!promises[0].is_done());

    // The remaining task keeps running and stays collectable.
    release.send(()).unwrap();
    assert_eq!(promises[0].get().ok(), Some(&5));
}

#[test]
fn test_wait_boom_after_sleep() {
    let sleeper = execute((), (), |_, _| {
        thread::sleep(Duration::from_millis(30));
        Ok::<_, WorkError>(5)
    });
    let failing = execute((), (), |_, _| Err::<i32, _>(WorkError("boom")));

    let promises = [sleeper, failing];
    let err = wait(&promises).unwrap_err();
    assert_eq!(err.to_string(), "boom");
}

#[test]
fn test_wait_single_failure_is_reported_among_many() {
    let promises = fan_out((), 0..16, |_, n: u32| {
        thread::sleep(Duration::from_millis(u64::from(n % 4)));
        if n == 11 {
            Err(WorkError("eleven"))
        } else {
            Ok(n)
        }
    });

    let err = wait(&promises).unwrap_err();
    assert_eq!(err.work_error(), Some(&WorkError("eleven")));
}

#[test]
fn test_wait_concurrent_failures_report_one_of_them() {
    let promises = fan_out((), ["a", "b", "c"], |_, name: &'static str| {
        Err::<(), _>(WorkError(name))
    });

    let err = wait(&promises).unwrap_err();
    let reported = err.work_error().map(|e| e.0);
    assert!(matches!(reported, Some("a" | "b" | "c")));
}

#[test]
fn test_wait_reports_isolated_panic() {
    let promises = [
        execute((), (), |_, _| Ok::<u8, WorkError>(1)),
        execute((), (), |_, _| -> Result<u8, WorkError> { panic!("bad input") }),
    ];

    assert!(wait(&promises).unwrap_err().is_panic());
}

#[test]
fn test_wait_over_mixed_value_types() {
    let number = execute((), 2, |_, n: u8| Ok::<_, WorkError>(n + 1));
    let text = execute((), (), |_, _| Ok::<_, WorkError>(String::from("ok")));

    let mixed: [&dyn Completion<Error = WorkError>; 2] = [&number, &text];
    assert!(wait(mixed).is_ok());

    assert_eq!(number.get().ok(), Some(&3));
    assert_eq!(text.get().ok().map(String::as_str), Some("ok"));
}

#[test]
fn test_wait_on_already_completed_promises() {
    let promises = fan_out((), 0..4, |_, n: u8| Ok::<_, WorkError>(n));
    for promise in &promises {
        promise.get().unwrap();
    }

    assert!(wait(&promises).is_ok());
    assert!(wait(&promises).is_ok());
}

#[test]
fn test_settle_collects_every_failure_in_order() {
    let promises = fan_out((), 0..6, |_, n: u32| {
        thread::sleep(Duration::from_millis(u64::from(6 - n) * 3));
        match n {
            1 => Err(WorkError("one")),
            4 => Err(WorkError("four")),
            _ => Ok(n),
        }
    });

    let failures: Vec<_> = settle(&promises)
        .into_iter()
        .filter_map(TaskError::work_error)
        .collect();

    assert_eq!(failures, vec![&WorkError("one"), &WorkError("four")]);
    assert!(promises.iter().all(Promise::is_done));
}

#[test]
fn test_settle_all_successful() {
    let promises = fan_out((), 0..5, |_, n: u8| Ok::<_, WorkError>(n));
    assert!(settle(&promises).is_empty());
}
