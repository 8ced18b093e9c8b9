//! Runtime module
//!
//! Worker pools and the single-result task handle built on them.

pub mod async_task;
pub mod config;
pub mod error;
pub mod pool;

pub use async_task::AsyncTask;
pub use config::PoolConfig;
pub use error::{RuntimeError, RuntimeResult};
pub use pool::WorkerPool;
