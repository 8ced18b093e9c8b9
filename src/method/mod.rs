//! Units of work and the surfaces that run them in the background.
//!
//! A [`Method`] defines *what* to compute once. The caller then picks *how*
//! to receive the outcome:
//!
//! - [`Method::execute`] runs inline on the calling thread,
//! - [`Method::as_stream`] yields a cold single-value stream backed by a [`WorkerPool`],
//! - [`Method::as_task`] yields an awaitable handle backed by a [`WorkerPool`],
//! - [`Method::as_callback`] runs on a dedicated thread and hands the value to a [`Callback`].
//!
//! Each surface calls `execute` exactly once per invocation and adds no
//! behavior of its own beyond moving the outcome across threads.

pub mod callback;
pub mod error;
pub mod stream;

pub use callback::{Callback, CallbackHandle, Discard, WithFailure, with_failure};
pub use error::MethodError;
pub use stream::{MethodStream, Subscription};

use crate::runtime::{AsyncTask, WorkerPool};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Outcome of one background invocation.
pub type MethodResult<T, E> = Result<T, MethodError<E>>;

/// A synchronous unit of work.
///
/// Implementors only provide [`execute`](Method::execute). The value is meant
/// to be built right before it is invoked and dropped afterwards; it keeps no
/// state between invocations.
///
/// # Example
/// ```rust,no_run
/// use storo_method::{Method, WorkerPool};
///
/// struct Answer;
///
/// impl Method for Answer {
///     type Output = u32;
///     type Error = std::io::Error;
///
///     fn execute(&self) -> Result<u32, std::io::Error> {
///         Ok(42)
///     }
/// }
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = WorkerPool::current()?;
/// let value = Answer.as_stream(&pool).subscribe().value().await?;
/// assert_eq!(value, 42);
/// # Ok(())
/// # }
/// ```
pub trait Method {
    type Output: Send + 'static;
    type Error: fmt::Debug + fmt::Display + Send + 'static;

    /// Compute the result on the calling thread.
    ///
    /// May block for as long as it needs. Errors and panics reach the caller
    /// directly.
    fn execute(&self) -> Result<Self::Output, Self::Error>;

    /// Wrap this unit of work in a cold single-value stream.
    ///
    /// Nothing runs until the stream is subscribed to (or polled), and every
    /// subscription runs `execute` again on `pool`.
    fn as_stream(self, pool: &WorkerPool) -> MethodStream<Self>
    where
        Self: Sized + Send + Sync + 'static,
    {
        MethodStream::new(self, pool.clone())
    }

    /// Start `execute` on `pool` now and return a handle to await its outcome.
    fn as_task(self, pool: &WorkerPool) -> AsyncTask<MethodResult<Self::Output, Self::Error>>
    where
        Self: Sized + Send + 'static,
    {
        AsyncTask::spawn_on(pool, move || run_guarded(&self))
    }

    /// Run `execute` on a new dedicated thread and pass the value to `callback`.
    ///
    /// Returns once the thread is started. One thread is created per call and
    /// exits after its single task, so this suits occasional calls rather than
    /// a hot path; use [`as_task`](Method::as_task) on a shared pool there.
    /// See [`callback`] for how failures are delivered.
    fn as_callback<C>(
        self,
        callback: Option<C>,
    ) -> MethodResult<CallbackHandle<Self::Error>, Self::Error>
    where
        Self: Sized + Send + 'static,
        C: Callback<Self::Output, Self::Error>,
    {
        callback::spawn(self, callback)
    }

    /// [`as_callback`](Method::as_callback) with no listener; the value is discarded.
    fn detach(self) -> MethodResult<CallbackHandle<Self::Error>, Self::Error>
    where
        Self: Sized + Send + 'static,
    {
        self.as_callback(None::<Discard>)
    }
}

/// A [`Method`] backed by a closure. Built with [`from_fn`].
#[derive(Clone)]
pub struct FnMethod<F> {
    f: F,
}

/// Turn a closure into a unit of work.
///
/// The closure may run more than once when the resulting stream is
/// subscribed to repeatedly, hence `Fn` rather than `FnOnce`.
pub fn from_fn<F, T, E>(f: F) -> FnMethod<F>
where
    F: Fn() -> Result<T, E>,
{
    FnMethod { f }
}

impl<F, T, E> Method for FnMethod<F>
where
    F: Fn() -> Result<T, E>,
    T: Send + 'static,
    E: fmt::Debug + fmt::Display + Send + 'static,
{
    type Output = T;
    type Error = E;

    fn execute(&self) -> Result<T, E> {
        (self.f)()
    }
}

impl<F> fmt::Debug for FnMethod<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMethod").finish_non_exhaustive()
    }
}

/// Run `execute` once, turning a panic into [`MethodError::Panicked`].
pub(crate) fn run_guarded<M>(method: &M) -> MethodResult<M::Output, M::Error>
where
    M: Method + ?Sized,
{
    match panic::catch_unwind(AssertUnwindSafe(|| method.execute())) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(MethodError::Failed(error)),
        Err(payload) => Err(MethodError::from_panic(payload)),
    }
}
