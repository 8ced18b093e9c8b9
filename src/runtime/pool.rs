//! Injectable handle to the background workers that run units of work.

use crate::runtime::config::PoolConfig;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use std::sync::Arc;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

/// Handle to a pool of background workers.
///
/// Blocking work goes to the runtime's blocking thread pool, which grows on
/// demand up to its configured limit and is meant for I/O-bound calls.
/// Cloning is cheap. A pool built by [`WorkerPool::with_config`] owns its
/// runtime; the runtime is shut down in the background once the last clone
/// is dropped.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    handle: Handle,
    owned: Option<Arc<OwnedRuntime>>,
}

impl WorkerPool {
    /// Use the tokio runtime the caller is currently running inside.
    pub fn current() -> RuntimeResult<Self> {
        let handle = Handle::try_current().map_err(|_| RuntimeError::NoRuntime)?;
        Ok(Self::from_handle(handle))
    }

    /// Wrap an existing runtime handle. The runtime stays owned by the caller.
    #[must_use]
    pub fn from_handle(handle: Handle) -> Self {
        Self {
            handle,
            owned: None,
        }
    }

    /// Build a dedicated multi-thread runtime sized by `config`.
    pub fn with_config(config: &PoolConfig) -> RuntimeResult<Self> {
        config.validate()?;
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads)
            .max_blocking_threads(config.max_blocking_threads)
            .thread_keep_alive(config.thread_keep_alive())
            .thread_name(config.thread_name.clone())
            .enable_all()
            .build()
            .map_err(RuntimeError::Build)?;
        log::debug!(
            "started worker pool {:?} (max {} blocking threads)",
            config.thread_name,
            config.max_blocking_threads
        );
        Ok(Self {
            handle: runtime.handle().clone(),
            owned: Some(Arc::new(OwnedRuntime {
                runtime: Some(runtime),
            })),
        })
    }

    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// True if this pool owns a dedicated runtime.
    #[must_use]
    pub fn is_dedicated(&self) -> bool {
        self.owned.is_some()
    }

    /// Queue a blocking closure on the pool. Does not wait for it to start.
    #[inline]
    pub fn spawn_blocking<F, R>(&self, f: F) -> JoinHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.handle.spawn_blocking(f)
    }
}

#[derive(Debug)]
struct OwnedRuntime {
    runtime: Option<Runtime>,
}

impl Drop for OwnedRuntime {
    fn drop(&mut self) {
        // A plain drop blocks, which panics when the last handle dies inside async code.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
