use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    Validation(String),
    #[error("storage error: {context}: {reason}")]
    Storage {
        context: &'static str,
        reason: String,
    },
    #[error("cannot create directory {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }

    /// Wraps a backend failure, logging it with its cause before it is surfaced.
    pub fn storage(context: &'static str, cause: impl Display) -> Self {
        let reason = cause.to_string();
        tracing::error!(context, %reason, "storage operation failed");
        CoreError::Storage { context, reason }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}
