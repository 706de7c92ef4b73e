//! Error types for the stock crew application

use crew_llm::LLMError;
use crew_notify::DeliveryError;
use crew_utils::EnvError;
use thiserror::Error;

/// Process exit code for configuration problems
pub const EXIT_CONFIGURATION: u8 = 2;

/// Process exit code for a failed pipeline run
pub const EXIT_PIPELINE: u8 = 1;

/// Stock crew errors
#[derive(Debug, Error)]
pub enum CrewError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The pipeline could not be assembled or a task failed
    #[error(transparent)]
    Pipeline(#[from] crew_core::Error),

    /// The notifier could not be created
    #[error("Notifier error: {0}")]
    Notifier(#[from] DeliveryError),
}

/// Result type alias for stock crew operations
pub type Result<T> = std::result::Result<T, CrewError>;

impl CrewError {
    /// Whether this error stems from configuration rather than a run
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Config(_) | Self::Notifier(_) => true,
            Self::Pipeline(err) => err.is_configuration(),
        }
    }

    /// Exit code the binary reports for this error
    pub fn exit_code(&self) -> u8 {
        if self.is_configuration() {
            EXIT_CONFIGURATION
        } else {
            EXIT_PIPELINE
        }
    }
}

impl From<EnvError> for CrewError {
    fn from(err: EnvError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Provider construction only fails on configuration
impl From<LLMError> for CrewError {
    fn from(err: LLMError) -> Self {
        Self::Config(err.to_string())
    }
}
