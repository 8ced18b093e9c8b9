//! Configuration for dedicated worker pools

use crate::runtime::error::{RuntimeError, RuntimeResult};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Sizing and naming for a worker pool built with
/// [`WorkerPool::with_config`](crate::runtime::WorkerPool::with_config).
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// max_blocking_threads = 64
/// thread_name = "storage-io"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Async worker threads driving the pool's scheduler.
    pub worker_threads: usize,
    /// Upper bound on threads running blocking work at once; further work queues.
    pub max_blocking_threads: usize,
    /// How long an idle blocking thread is kept before it exits.
    pub keep_alive_ms: u64,
    pub thread_name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_threads: 1,
            max_blocking_threads: 512, // tokio's own default for blocking work
            keep_alive_ms: 10_000,
            thread_name: "storo-io".to_string(),
        }
    }
}

impl PoolConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> RuntimeResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> RuntimeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    #[must_use]
    pub fn thread_keep_alive(&self) -> Duration {
        Duration::from_millis(self.keep_alive_ms)
    }

    /// Reject values the tokio runtime builder would panic on.
    pub fn validate(&self) -> RuntimeResult<()> {
        if self.worker_threads == 0 {
            return Err(RuntimeError::InvalidConfig(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.max_blocking_threads == 0 {
            return Err(RuntimeError::InvalidConfig(
                "max_blocking_threads must be at least 1".to_string(),
            ));
        }
        if self.thread_name.trim().is_empty() {
            return Err(RuntimeError::InvalidConfig(
                "thread_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
