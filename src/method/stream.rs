//! Cold single-value stream surface.

use crate::method::{Method, MethodError, MethodResult, run_guarded};
use crate::runtime::WorkerPool;
use futures::{Stream, StreamExt};
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// A unit of work waiting to be subscribed to.
///
/// Building one runs nothing. Each [`subscribe`](MethodStream::subscribe)
/// runs `execute` once more on the pool; results are never shared between
/// subscriptions.
///
/// `MethodStream` is also a [`Stream`] itself: the first poll subscribes
/// and later polls drain that one subscription.
pub struct MethodStream<M: Method> {
    method: Arc<M>,
    pool: WorkerPool,
    active: Option<Subscription<M::Output, M::Error>>,
}

impl<M> MethodStream<M>
where
    M: Method + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(method: M, pool: WorkerPool) -> Self {
        Self::from_arc(Arc::new(method), pool)
    }

    #[must_use]
    pub fn from_arc(method: Arc<M>, pool: WorkerPool) -> Self {
        Self {
            method,
            pool,
            active: None,
        }
    }

    /// Dispatch one run of `execute` to the pool and return its subscription.
    ///
    /// Does not wait for the work to start.
    pub fn subscribe(&self) -> Subscription<M::Output, M::Error> {
        let (tx, rx) = mpsc::unbounded_channel();
        let method = Arc::clone(&self.method);
        log::trace!("dispatching method subscription to worker pool");
        self.pool.spawn_blocking(move || {
            let outcome = run_guarded(method.as_ref());
            if tx.send(outcome).is_err() {
                log::debug!("subscription dropped before its result was delivered");
            }
        });
        Subscription::new(rx, self.pool.clone())
    }
}

impl<M: Method> Clone for MethodStream<M> {
    /// The clone shares the unit of work and pool but starts unsubscribed.
    fn clone(&self) -> Self {
        Self {
            method: Arc::clone(&self.method),
            pool: self.pool.clone(),
            active: None,
        }
    }
}

impl<M: Method> fmt::Debug for MethodStream<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodStream")
            .field("pool", &self.pool)
            .field("subscribed", &self.active.is_some())
            .finish_non_exhaustive()
    }
}

impl<M> Stream for MethodStream<M>
where
    M: Method + Send + Sync + 'static,
{
    type Item = MethodResult<M::Output, M::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.active.is_none() {
            let subscription = self.subscribe();
            self.active = Some(subscription);
        }
        match self.active.as_mut() {
            Some(subscription) => Pin::new(subscription).poll_next(cx),
            None => Poll::Ready(None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Waiting,
    Emitted,
    Terminated,
}

/// One run of a unit of work, observed as a stream.
///
/// Yields exactly one item and then ends:
/// `Ok(value)` followed by end-of-stream is a value plus completion,
/// `Err(error)` followed by end-of-stream is an error termination.
/// Dropping the subscription unsubscribes; work already running is not
/// interrupted and its result is discarded. Until then the subscription
/// holds its pool, so the pool's runtime outlives the queued work.
pub struct Subscription<T, E> {
    rx: UnboundedReceiverStream<MethodResult<T, E>>,
    state: State,
    _pool: WorkerPool,
}

impl<T, E> Subscription<T, E> {
    fn new(rx: mpsc::UnboundedReceiver<MethodResult<T, E>>, pool: WorkerPool) -> Self {
        Self {
            rx: UnboundedReceiverStream::new(rx),
            state: State::Waiting,
            _pool: pool,
        }
    }

    /// Wait for the terminal outcome.
    pub async fn value(mut self) -> MethodResult<T, E> {
        self.next().await.unwrap_or(Err(MethodError::Canceled))
    }
}

impl<T, E> fmt::Debug for Subscription<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T, E> Stream for Subscription<T, E> {
    type Item = MethodResult<T, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.state == State::Terminated {
            return Poll::Ready(None);
        }
        match Pin::new(&mut self.rx).poll_next(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Some(outcome)) => {
                self.state = State::Emitted;
                Poll::Ready(Some(outcome))
            }
            Poll::Ready(None) => {
                let waiting = self.state == State::Waiting;
                self.state = State::Terminated;
                if waiting {
                    // Worker dropped without sending: still end with one terminal event.
                    Poll::Ready(Some(Err(MethodError::Canceled)))
                } else {
                    Poll::Ready(None)
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            State::Waiting => (1, Some(1)),
            State::Emitted | State::Terminated => (0, Some(0)),
        }
    }
}
