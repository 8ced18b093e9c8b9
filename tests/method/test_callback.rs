//! Tests for the fire-and-forget callback surface.

use super::fixtures::{Constant, Fails, Failure, Panics, Recording, TIMEOUT, gated};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use storo_method::{Discard, Method, MethodError, with_failure};

#[test]
fn test_callback_receives_value_once() {
    let (tx, rx) = mpsc::channel();
    let handle = Constant(42)
        .as_callback(Some(move |value: u32| {
            let _ = tx.send((value, thread::current().name().map(str::to_string)));
        }))
        .expect("callback worker failed to start");

    let (value, thread_name) = rx.recv_timeout(TIMEOUT).expect("callback never ran");
    assert_eq!(value, 42);
    assert_eq!(thread_name.as_deref(), Some(handle.thread_name()));
    assert!(handle.thread_name().starts_with("storo-callback-"));

    assert!(handle.join().is_ok());
    // The closure (and its sender) is gone after the single call.
    assert_eq!(rx.try_recv(), Err(mpsc::TryRecvError::Disconnected));
}

#[test]
fn test_callback_runs_off_caller_thread() {
    let method = Recording::default();
    let handle = method
        .clone()
        .detach()
        .expect("callback worker failed to start");
    assert!(handle.join().is_ok());

    let (id, _) = method.last_thread().expect("execute did not record its thread");
    assert_ne!(id, thread::current().id());
}

#[test]
fn test_absent_callback_still_executes() {
    let method = Recording::default();
    let handle = method
        .clone()
        .as_callback(None::<fn(u32)>)
        .expect("callback worker failed to start");

    assert!(handle.join().is_ok());
    assert_eq!(method.calls(), 1);
}

#[test]
fn test_discard_listener() {
    let handle = Constant(1)
        .as_callback(Some(Discard))
        .expect("callback worker failed to start");
    assert!(handle.join().is_ok());
}

#[test]
fn test_failure_never_reaches_result_callback() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let handle = Fails
        .as_callback(Some(move |_value: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .expect("callback worker failed to start");

    match handle.join() {
        Err(MethodError::Failed(failure)) => assert_eq!(failure, Failure("boom".to_string())),
        other => panic!("expected the failure from execute, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failure_reaches_failure_half() {
    let (ok_tx, ok_rx) = mpsc::channel::<u32>();
    let (err_tx, err_rx) = mpsc::channel::<String>();
    let handle = Fails
        .as_callback(Some(with_failure(
            move |value: u32| {
                let _ = ok_tx.send(value);
            },
            move |err: &MethodError<Failure>| {
                let _ = err_tx.send(err.to_string());
            },
        )))
        .expect("callback worker failed to start");

    assert_eq!(
        err_rx.recv_timeout(TIMEOUT).expect("failure hook never ran"),
        "method failed: boom"
    );
    assert!(handle.join().is_err());
    assert_eq!(
        ok_rx.recv_timeout(TIMEOUT),
        Err(RecvTimeoutError::Disconnected)
    );
}

#[test]
fn test_panic_is_reported_through_handle() {
    let (tx, rx) = mpsc::channel::<u32>();
    let handle = Panics
        .as_callback(Some(move |value: u32| {
            let _ = tx.send(value);
        }))
        .expect("callback worker failed to start");

    match handle.join() {
        Err(MethodError::Panicked(message)) => assert!(message.contains("boom")),
        other => panic!("expected a captured panic, got {other:?}"),
    }
    assert_eq!(rx.try_recv(), Err(mpsc::TryRecvError::Disconnected));
}

#[test]
fn test_panicking_listener_is_reported_through_handle() {
    let handle = Constant(3)
        .as_callback(Some(|value: u32| assert_eq!(value, 0, "listener blew up")))
        .expect("callback worker failed to start");

    match handle.join() {
        Err(MethodError::Panicked(message)) => assert!(message.contains("listener blew up")),
        other => panic!("expected a listener panic, got {other:?}"),
    }
}

#[test]
fn test_as_callback_returns_before_execute_finishes() {
    let (method, gate) = gated(5);
    let (tx, rx) = mpsc::channel();
    let handle = method
        .as_callback(Some(move |value: u32| {
            let _ = tx.send(value);
        }))
        .expect("callback worker failed to start");

    gate.wait_started();
    assert!(!handle.is_finished());
    assert_eq!(
        rx.recv_timeout(std::time::Duration::from_millis(50)),
        Err(RecvTimeoutError::Timeout)
    );

    gate.open();
    assert_eq!(rx.recv_timeout(TIMEOUT), Ok(5));
    assert!(handle.join().is_ok());
}

#[test]
fn test_callbacks_do_not_block_each_other() {
    let (slow, gate) = gated(0);
    let slow_handle = slow
        .as_callback(None::<fn(u32)>)
        .expect("callback worker failed to start");
    gate.wait_started();

    let (tx, rx) = mpsc::channel();
    let handles = (1..=8u32)
        .map(|i| {
            let tx = tx.clone();
            Constant(i)
                .as_callback(Some(move |value: u32| {
                    let _ = tx.send(value);
                }))
                .expect("callback worker failed to start")
        })
        .collect::<Vec<_>>();
    drop(tx);

    // All quick calls deliver while the slow one is still blocked.
    let mut delivered = (0..8)
        .map(|_| rx.recv_timeout(TIMEOUT).expect("callback never ran"))
        .collect::<Vec<_>>();
    delivered.sort_unstable();
    assert_eq!(delivered, (1..=8).collect::<Vec<_>>());
    assert!(!slow_handle.is_finished());

    let mut names = handles
        .iter()
        .map(|h| h.thread_name().to_string())
        .collect::<Vec<_>>();
    names.push(slow_handle.thread_name().to_string());
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 9, "every call gets its own worker");

    gate.open();
    assert!(slow_handle.join().is_ok());
    for handle in handles {
        assert!(handle.join().is_ok());
    }
}

#[test]
fn test_dropped_handle_still_delivers() {
    let (method, gate) = gated(11);
    let (tx, rx) = mpsc::channel();
    let handle = method
        .as_callback(Some(move |value: u32| {
            let _ = tx.send(value);
        }))
        .expect("callback worker failed to start");
    drop(handle);

    gate.wait_started();
    gate.open();

    assert_eq!(rx.recv_timeout(TIMEOUT), Ok(11));
    // The listener ran once and was consumed with its sender.
    assert_eq!(
        rx.recv_timeout(TIMEOUT),
        Err(RecvTimeoutError::Disconnected)
    );
}
