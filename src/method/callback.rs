//! Fire-and-forget callback surface.
//!
//! Every call gets its own named OS thread that runs `execute`, hands the
//! outcome to the listener and exits. Threads are never reused, so a slow
//! call cannot hold up another one.
//!
//! # Failures
//!
//! A failing or panicking `execute` never reaches [`Callback::on_result`].
//! Instead the failure is:
//!
//! - logged at `error` level from the worker thread,
//! - passed to [`Callback::on_failure`] (a no-op unless overridden, for
//!   example with [`with_failure`]),
//! - returned from [`CallbackHandle::join`] for callers that keep the handle.

use crate::method::{Method, MethodError, MethodResult, run_guarded};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(1);

/// Listener for the outcome of [`Method::as_callback`].
///
/// Implemented for every `FnOnce(T) + Send + 'static` closure. Both methods
/// run on the worker thread and at most one of them is called.
pub trait Callback<T, E>: Send + Sized + 'static {
    fn on_result(self, result: T);

    /// Called instead of [`on_result`](Callback::on_result) when the work failed.
    fn on_failure(self, _error: &MethodError<E>) {}
}

impl<T, E, F> Callback<T, E> for F
where
    F: FnOnce(T) + Send + 'static,
{
    fn on_result(self, result: T) {
        self(result)
    }
}

/// Listener that drops the result. Used by [`Method::detach`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl<T, E> Callback<T, E> for Discard {
    fn on_result(self, _result: T) {}
}

/// Listener with separate success and failure halves. Built with [`with_failure`].
#[derive(Debug, Clone)]
pub struct WithFailure<S, F> {
    on_result: S,
    on_failure: F,
}

/// Pair a success closure with a failure closure.
pub fn with_failure<T, E, S, F>(on_result: S, on_failure: F) -> WithFailure<S, F>
where
    S: FnOnce(T) + Send + 'static,
    F: FnOnce(&MethodError<E>) + Send + 'static,
{
    WithFailure {
        on_result,
        on_failure,
    }
}

impl<T, E, S, F> Callback<T, E> for WithFailure<S, F>
where
    S: FnOnce(T) + Send + 'static,
    F: FnOnce(&MethodError<E>) + Send + 'static,
{
    fn on_result(self, result: T) {
        (self.on_result)(result)
    }

    fn on_failure(self, error: &MethodError<E>) {
        (self.on_failure)(error)
    }
}

/// Handle to the worker thread of one [`Method::as_callback`] call.
///
/// Dropping it detaches the thread; the work still runs to completion.
#[derive(Debug)]
pub struct CallbackHandle<E> {
    name: String,
    thread: JoinHandle<MethodResult<(), E>>,
}

impl<E> CallbackHandle<E> {
    #[must_use]
    pub fn thread_name(&self) -> &str {
        &self.name
    }

    /// True once the worker has delivered its outcome and exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the worker exits and return how the invocation ended.
    ///
    /// A panic inside the listener itself is reported as
    /// [`MethodError::Panicked`] as well.
    pub fn join(self) -> MethodResult<(), E> {
        match self.thread.join() {
            Ok(outcome) => outcome,
            Err(payload) => Err(MethodError::from_panic(payload)),
        }
    }
}

pub(crate) fn spawn<M, C>(
    method: M,
    callback: Option<C>,
) -> MethodResult<CallbackHandle<M::Error>, M::Error>
where
    M: Method + Send + 'static,
    C: Callback<M::Output, M::Error>,
{
    let name = format!(
        "storo-callback-{}",
        NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed)
    );
    let thread = thread::Builder::new()
        .name(name.clone())
        .spawn(move || deliver(&method, callback))
        .map_err(MethodError::Spawn)?;
    log::trace!("started callback worker {name}");
    Ok(CallbackHandle { name, thread })
}

fn deliver<M, C>(method: &M, callback: Option<C>) -> MethodResult<(), M::Error>
where
    M: Method,
    C: Callback<M::Output, M::Error>,
{
    match run_guarded(method) {
        Ok(value) => {
            if let Some(callback) = callback {
                callback.on_result(value);
            }
            Ok(())
        }
        Err(error) => {
            log::error!(
                "background method failed on {}: {error}",
                thread::current().name().unwrap_or("unnamed worker")
            );
            if let Some(callback) = callback {
                callback.on_failure(&error);
            }
            Err(error)
        }
    }
}
