//! Error types for crew-core

use thiserror::Error;

/// Result type alias for crew-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pipeline operations
///
/// Delivery failures are deliberately absent: the notifier reports them as a
/// status value and never raises.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or missing configuration, detected before any provider call
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A completion or search capability failed
    #[error("Capability error: {0}")]
    Capability(String),

    /// A task failed while the pipeline was running
    #[error("Task {index} ({role}) failed: {source}")]
    TaskFailed {
        /// Zero-based position of the failing task
        index: usize,
        /// Role of the agent bound to the failing task
        role: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Shorthand for [`Error::Configuration`]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Shorthand for [`Error::Capability`]
    pub fn capability(message: impl Into<String>) -> Self {
        Self::Capability(message.into())
    }

    /// Whether this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Whether this error originates from a capability provider
    pub fn is_capability(&self) -> bool {
        match self {
            Self::Capability(_) => true,
            Self::TaskFailed { source, .. } => source.is_capability(),
            Self::Configuration(_) => false,
        }
    }

    /// Index of the failing task, if this error came out of a pipeline run
    pub fn failed_index(&self) -> Option<usize> {
        match self {
            Self::TaskFailed { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl From<crew_utils::EnvError> for Error {
    fn from(err: crew_utils::EnvError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::configuration("GOOGLE_API_KEY is not set");
        assert_eq!(
            err.to_string(),
            "Configuration error: GOOGLE_API_KEY is not set"
        );

        let err = Error::TaskFailed {
            index: 1,
            role: "Analista Fundamentalista".to_string(),
            source: Box::new(Error::capability("quota exceeded")),
        };
        assert_eq!(
            err.to_string(),
            "Task 1 (Analista Fundamentalista) failed: Capability error: quota exceeded"
        );
        assert_eq!(err.failed_index(), Some(1));
        assert!(err.is_capability());
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_env_error_conversion() {
        let err: Error = crew_utils::EnvError::Missing("GROQ_API_KEY".to_string()).into();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }
}
