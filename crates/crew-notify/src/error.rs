//! Error types for crew-notify

use thiserror::Error;

/// Why a delivery did not succeed
///
/// Carried inside [`DeliveryResult`](crate::DeliveryResult); never returned
/// as an `Err` from [`Notify::deliver`](crate::Notify::deliver).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The endpoint answered with a status other than 200
    #[error("Endpoint answered HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request could not be completed
    #[error("Request failed: {0}")]
    Transport(String),

    /// The notifier could not be set up
    #[error("Notifier setup failed: {0}")]
    Setup(String),
}

impl DeliveryError {
    /// HTTP status code, when the endpoint answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Setup(_) => None,
        }
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessor() {
        let err = DeliveryError::Status {
            status: 401,
            body: "invalid token".to_string(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Endpoint answered HTTP 401: invalid token");
        assert_eq!(DeliveryError::Transport("reset".to_string()).status(), None);
    }
}
