//! `storo_method` - run a synchronous unit of work off the caller's thread
//!
//! Define the computation once by implementing [`Method`], then choose how the
//! result comes back: inline with [`Method::execute`], as a cold single-value
//! stream with [`Method::as_stream`], as an awaitable task with
//! [`Method::as_task`], or through a listener on a dedicated thread with
//! [`Method::as_callback`].
//!
//! Background work runs on an explicit [`WorkerPool`], either borrowed from
//! the ambient tokio runtime or built from a [`PoolConfig`].

// Module declarations
pub mod method;
pub mod runtime;

// Re-export method types
pub use method::{
    Callback, CallbackHandle, Discard, FnMethod, Method, MethodError, MethodResult, MethodStream,
    Subscription, WithFailure, from_fn, with_failure,
};

// Re-export runtime types
pub use runtime::{AsyncTask, PoolConfig, RuntimeError, RuntimeResult, WorkerPool};
