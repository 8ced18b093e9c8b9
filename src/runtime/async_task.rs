//! Single-result task handle for work dispatched onto a [`WorkerPool`].
//!
//! Channel-based: the worker sends its one result through a oneshot channel
//! and the handle resolves when it arrives.

use crate::runtime::WorkerPool;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

// ============================================================================
// AsyncTask - Single-result blocking operation
// ============================================================================

/// A handle to an asynchronous task that produces a single result.
///
/// A task spawned with [`AsyncTask::spawn_on`] keeps its pool alive until it
/// is dropped, so a dedicated runtime cannot shut down under queued work.
/// Resolves to `Err(RecvError)` if the worker went away without sending.
#[derive(Debug)]
pub struct AsyncTask<T> {
    rx: oneshot::Receiver<T>,
    _pool: Option<WorkerPool>,
}

impl<T> AsyncTask<T>
where
    T: Send + 'static,
{
    /// Create from oneshot receiver (for advanced use).
    #[inline]
    #[must_use]
    pub fn new(rx: oneshot::Receiver<T>) -> Self {
        Self { rx, _pool: None }
    }

    /// Run a blocking closure on the pool's blocking workers.
    ///
    /// Returns as soon as the closure is queued.
    #[inline]
    pub fn spawn_on<F>(pool: &WorkerPool, f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        pool.spawn_blocking(move || {
            if tx.send(f()).is_err() {
                log::debug!("task handle dropped before the result was delivered");
            }
        });
        Self {
            rx,
            _pool: Some(pool.clone()),
        }
    }
}

impl<T> Future for AsyncTask<T> {
    type Output = Result<T, oneshot::error::RecvError>;

    #[inline]
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx)
    }
}
