// Engine error taxonomy: source failures skip a round, bad config is rejected, fatal stops startup.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// An OS metric query failed; the round is skipped and history stays untouched.
    #[error("metric source unavailable ({operation}): {message}")]
    SourceUnavailable { operation: String, message: String },

    /// Rejected threshold / interval / capacity input; the prior value stays active.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Engine could not be initialised (or its state lock is poisoned).
    #[error("fatal engine error: {0}")]
    Fatal(String),
}

impl EngineError {
    pub fn source_unavailable(operation: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::SourceUnavailable {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        EngineError::InvalidConfiguration(msg.into())
    }

    /// Short machine-readable tag used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::SourceUnavailable { .. } => "sourceUnavailable",
            EngineError::InvalidConfiguration(_) => "invalidConfiguration",
            EngineError::Fatal(_) => "fatal",
        }
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
