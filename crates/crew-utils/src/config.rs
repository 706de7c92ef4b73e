//! Environment configuration helpers
//!
//! Configuration structs in the workspace are built from a lookup function
//! rather than reading `std::env` directly, so tests can supply values
//! without touching the process environment.

use std::str::FromStr;
use thiserror::Error;

/// Lookup function used to resolve configuration keys
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Errors raised while reading configuration values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    /// Required variable is not set
    #[error("{0} is not set")]
    Missing(String),

    /// Required variable is set but blank
    #[error("{0} is set but empty")]
    Empty(String),

    /// Variable could not be parsed into the expected type
    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Load a `.env` file from the current directory or its parents, if present
///
/// Returns `true` when a file was found and loaded. Variables already present
/// in the environment are not overridden.
pub fn load_dotenv() -> bool {
    match dotenv::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            true
        }
        Err(_) => false,
    }
}

/// Read a required, non-blank variable
pub fn required_var(lookup: EnvLookup<'_>, key: &str) -> Result<String, EnvError> {
    match lookup(key) {
        None => Err(EnvError::Missing(key.to_string())),
        Some(value) if value.trim().is_empty() => Err(EnvError::Empty(key.to_string())),
        Some(value) => Ok(value),
    }
}

/// Read an optional variable, treating blank values as unset
pub fn optional_var(lookup: EnvLookup<'_>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Read and parse an optional variable
pub fn parse_var<T>(lookup: EnvLookup<'_>, key: &str) -> Result<Option<T>, EnvError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional_var(lookup, key)
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| EnvError::Invalid {
                key: key.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}
