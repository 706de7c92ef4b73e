//! Notifier configuration

use crew_utils::{EnvError, EnvLookup, optional_var, required_var};
use url::Url;

/// `Content-Type` sent when none is configured
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

const ENDPOINT_VAR: &str = "WHATSAPP_API_URL";
const TOKEN_VAR: &str = "WHATSAPP_ACCESS_TOKEN";
const DESTINATION_VAR: &str = "WHATSAPP_DESTINATION";
const CONTENT_TYPE_VAR: &str = "WHATSAPP_CONTENT_TYPE";

/// Where and how the final report is delivered
#[derive(Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Messaging API endpoint
    pub endpoint: Url,
    /// Value of the `access-token` header
    pub access_token: String,
    /// Value of the `Content-Type` header
    pub content_type: String,
    /// Recipient number placed in the `number` field
    pub destination: String,
}

impl NotifierConfig {
    /// Build a config from explicit values
    pub fn new(
        endpoint: &str,
        access_token: impl Into<String>,
        destination: impl Into<String>,
    ) -> Result<Self, EnvError> {
        Ok(Self {
            endpoint: parse_endpoint(ENDPOINT_VAR, endpoint)?,
            access_token: access_token.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            destination: destination.into(),
        })
    }

    /// Override the `Content-Type` header
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Read the configuration through a lookup function
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, EnvError> {
        let endpoint = required_var(lookup, ENDPOINT_VAR)?;
        let access_token = required_var(lookup, TOKEN_VAR)?;
        let destination = required_var(lookup, DESTINATION_VAR)?;
        let content_type = optional_var(lookup, CONTENT_TYPE_VAR)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        Ok(Self {
            endpoint: parse_endpoint(ENDPOINT_VAR, endpoint.trim())?,
            access_token,
            content_type,
            destination,
        })
    }

    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, EnvError> {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("access_token", &"<redacted>")
            .field("content_type", &self.content_type)
            .field("destination", &self.destination)
            .finish()
    }
}

fn parse_endpoint(key: &str, value: &str) -> Result<Url, EnvError> {
    let invalid = |reason: String| EnvError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio_test::{assert_err, assert_ok};

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    const COMPLETE: [(&str, &str); 3] = [
        ("WHATSAPP_API_URL", "https://api.example.com/send"),
        ("WHATSAPP_ACCESS_TOKEN", "secret"),
        ("WHATSAPP_DESTINATION", "5511999999999"),
    ];

    #[test]
    fn test_from_lookup_defaults_content_type() {
        let env = vars(&COMPLETE);
        let lookup = |k: &str| env.get(k).cloned();
        let config = assert_ok!(NotifierConfig::from_lookup(&lookup));

        assert_eq!(config.endpoint.as_str(), "https://api.example.com/send");
        assert_eq!(config.content_type, DEFAULT_CONTENT_TYPE);
        assert_eq!(config.destination, "5511999999999");
    }

    #[test]
    fn test_custom_content_type() {
        let mut pairs = COMPLETE.to_vec();
        pairs.push(("WHATSAPP_CONTENT_TYPE", "application/json; charset=utf-8"));
        let env = vars(&pairs);
        let lookup = |k: &str| env.get(k).cloned();

        let config = assert_ok!(NotifierConfig::from_lookup(&lookup));
        assert_eq!(config.content_type, "application/json; charset=utf-8");
    }

    #[test]
    fn test_missing_token() {
        let env = vars(&[COMPLETE[0], COMPLETE[2]]);
        let lookup = |k: &str| env.get(k).cloned();
        let err = assert_err!(NotifierConfig::from_lookup(&lookup));
        assert_eq!(err, EnvError::Missing("WHATSAPP_ACCESS_TOKEN".to_string()));
    }

    #[test]
    fn test_invalid_endpoint() {
        let env = vars(&[
            ("WHATSAPP_API_URL", "ftp://example.com"),
            COMPLETE[1],
            COMPLETE[2],
        ]);
        let lookup = |k: &str| env.get(k).cloned();
        let err = assert_err!(NotifierConfig::from_lookup(&lookup));
        assert!(matches!(err, EnvError::Invalid { ref key, .. } if key == "WHATSAPP_API_URL"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = NotifierConfig::new("https://api.example.com", "secret", "1").unwrap();
        assert!(!format!("{config:?}").contains("secret"));
    }
}
