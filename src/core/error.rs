//! Error types for the logging pipeline

use crate::core::level::Severity;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error while writing to a sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Record dropped by the rate-limit gate
    #[error("rate limit exceeded for {level}")]
    RateLimited { level: Severity },

    /// Record dropped by the sampling gate
    #[error("sampling rejected record at {level}")]
    SamplingRejected { level: Severity },

    /// Bounded queue full; the record was not enqueued
    #[error("log buffer overflow: {queued} records queued")]
    BufferOverflow { queued: usize },

    /// A single child sink in a fan-out failed
    #[error("handler {index} failed: {source}")]
    HandlerFailed {
        index: usize,
        #[source]
        source: Box<LoggerError>,
    },

    /// Several child sinks in a fan-out failed
    #[error("aggregate of {} handler errors", .0.len())]
    Aggregate(Vec<LoggerError>),

    /// Output rotation failure
    #[error("rotation failed: {message}")]
    Rotation { message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Wrap a child-sink error with its position in the fan-out order.
    pub fn handler(index: usize, source: LoggerError) -> Self {
        LoggerError::HandlerFailed {
            index,
            source: Box::new(source),
        }
    }

    /// Create a rotation error
    pub fn rotation(message: impl Into<String>) -> Self {
        LoggerError::Rotation {
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Fold a list of child-sink errors into a single error, or `Ok` when empty.
    pub fn join(errors: Vec<LoggerError>) -> Result<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.into_iter().next().expect("len checked above")),
            _ => Err(LoggerError::Aggregate(errors)),
        }
    }
}
