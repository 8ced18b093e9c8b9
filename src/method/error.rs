//! Failure outcomes of an asynchronous method invocation

use std::any::Any;
use thiserror::Error;
use tokio::sync::oneshot;

/// Why an invocation ended without a value.
///
/// `E` is the unit of work's own error type, carried untouched in
/// [`MethodError::Failed`].
#[derive(Debug, Error)]
pub enum MethodError<E> {
    /// `execute` returned an error
    #[error("method failed: {0}")]
    Failed(E),

    /// `execute` (or a callback run after it) panicked
    #[error("method panicked: {0}")]
    Panicked(String),

    /// The worker was torn down before it delivered an outcome
    #[error("method was canceled before delivering a result")]
    Canceled,

    /// No worker thread could be started for a callback invocation
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}

impl<E> MethodError<E> {
    /// The error returned by `execute`, if that is what happened.
    pub fn into_failure(self) -> Option<E> {
        match self {
            MethodError::Failed(e) => Some(e),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_panic(&self) -> bool {
        matches!(self, MethodError::Panicked(_))
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        MethodError::Panicked(panic_message(payload.as_ref()))
    }
}

impl<E> From<oneshot::error::RecvError> for MethodError<E> {
    fn from(_: oneshot::error::RecvError) -> Self {
        MethodError::Canceled
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
