//! Worker pool error types

use thiserror::Error;

/// Errors raised while locating, configuring or building a worker pool
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// No tokio runtime is active on the calling thread
    #[error("no tokio runtime is active on this thread")]
    NoRuntime,

    /// Configuration values that the runtime builder would reject
    #[error("Invalid pool configuration: {0}")]
    InvalidConfig(String),

    /// The dedicated runtime could not be started
    #[error("Failed to build worker pool: {0}")]
    Build(#[source] std::io::Error),

    /// Reading a configuration file failed
    #[error("Failed to read pool configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for [`PoolConfig`](crate::runtime::PoolConfig)
    #[error("Failed to parse pool configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience result alias for worker pool operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
