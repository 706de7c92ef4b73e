//! Configuration for the stock crew

use crate::error::{CrewError, Result};
use crate::prompts::CrewRole;
use crew_llm::providers::{DEFAULT_GEMINI_MODEL, DEFAULT_GROQ_MODEL};
use crew_notify::NotifierConfig;
use crew_utils::{EnvLookup, optional_var, parse_var, required_var};
use std::fmt;
use std::str::FromStr;

/// Sampling temperature the crew uses unless configured
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Completion backend an agent is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Google Gemini
    #[default]
    Gemini,
    /// Groq (Llama 3)
    Groq,
}

impl ProviderKind {
    /// Identifier used in the provider registry
    pub fn id(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Groq => "groq",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "groq" | "llama" | "llama3" => Ok(Self::Groq),
            other => Err(format!("unknown provider '{other}' (expected gemini or groq)")),
        }
    }
}

/// Language the agents are instructed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseLanguage {
    /// Brazilian Portuguese
    #[default]
    Portuguese,
    English,
}

impl ResponseLanguage {
    /// BCP 47 tag
    pub fn code(self) -> &'static str {
        match self {
            Self::Portuguese => "pt-BR",
            Self::English => "en",
        }
    }
}

impl fmt::Display for ResponseLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ResponseLanguage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pt-br" | "pt" | "pt_br" | "portuguese" | "português" => Ok(Self::Portuguese),
            "en" | "en-us" | "english" => Ok(Self::English),
            other => Err(format!("unsupported language '{other}' (expected pt-BR or en)")),
        }
    }
}

/// Provider bound to each crew role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleProviders {
    pub technical: ProviderKind,
    pub fundamental: ProviderKind,
    pub moderator: ProviderKind,
    pub investment: ProviderKind,
}

impl RoleProviders {
    /// Same provider for every role
    pub fn all(kind: ProviderKind) -> Self {
        Self {
            technical: kind,
            fundamental: kind,
            moderator: kind,
            investment: kind,
        }
    }

    pub fn for_role(&self, role: CrewRole) -> ProviderKind {
        match role {
            CrewRole::Technical => self.technical,
            CrewRole::Fundamental => self.fundamental,
            CrewRole::Moderator => self.moderator,
            CrewRole::Investment => self.investment,
        }
    }
}

/// Configuration for one crew run
///
/// Built once at startup and passed by reference.
#[derive(Clone)]
pub struct CrewConfig {
    pub google_api_key: String,
    pub groq_api_key: String,
    pub gemini_model: String,
    pub groq_model: String,
    pub temperature: f32,
    pub language: ResponseLanguage,
    pub providers: RoleProviders,
    /// Log prompts and answers of every agent
    pub verbose: bool,
    /// Delivery settings; `None` when the report is not delivered
    pub notifier: Option<NotifierConfig>,
}

impl CrewConfig {
    /// Create a new configuration builder
    pub fn builder() -> CrewConfigBuilder {
        CrewConfigBuilder::default()
    }

    /// Read the configuration through a lookup function
    ///
    /// Notifier settings are read only when `deliver` is set.
    pub fn from_lookup(lookup: EnvLookup<'_>, deliver: bool) -> Result<Self> {
        let google_api_key = required_var(lookup, "GOOGLE_API_KEY")?;
        let groq_api_key = required_var(lookup, "GROQ_API_KEY")?;

        let provider = |key: &str| -> Result<ProviderKind> {
            Ok(parse_var(lookup, key)?.unwrap_or_default())
        };

        let config = Self {
            google_api_key,
            groq_api_key,
            gemini_model: optional_var(lookup, "GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            groq_model: optional_var(lookup, "GROQ_MODEL")
                .unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            temperature: parse_var(lookup, "CREW_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE),
            language: parse_var(lookup, "CREW_LANGUAGE")?.unwrap_or_default(),
            providers: RoleProviders {
                technical: provider("CREW_TECHNICAL_PROVIDER")?,
                fundamental: provider("CREW_FUNDAMENTAL_PROVIDER")?,
                moderator: provider("CREW_MODERATOR_PROVIDER")?,
                investment: provider("CREW_INVESTMENT_PROVIDER")?,
            },
            verbose: true,
            notifier: if deliver {
                Some(NotifierConfig::from_lookup(lookup)?)
            } else {
                None
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Read the configuration from the process environment
    pub fn from_env(deliver: bool) -> Result<Self> {
        Self::from_lookup(&|key| std::env::var(key).ok(), deliver)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.google_api_key.trim().is_empty() {
            return Err(CrewError::Config("GOOGLE_API_KEY cannot be empty".to_string()));
        }
        if self.groq_api_key.trim().is_empty() {
            return Err(CrewError::Config("GROQ_API_KEY cannot be empty".to_string()));
        }
        if self.gemini_model.trim().is_empty() || self.groq_model.trim().is_empty() {
            return Err(CrewError::Config("Model names cannot be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(CrewError::Config(format!(
                "CREW_TEMPERATURE must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        Ok(())
    }

    /// Model name for a provider
    pub fn model_for(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::Gemini => &self.gemini_model,
            ProviderKind::Groq => &self.groq_model,
        }
    }
}

impl fmt::Debug for CrewConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrewConfig")
            .field("gemini_model", &self.gemini_model)
            .field("groq_model", &self.groq_model)
            .field("temperature", &self.temperature)
            .field("language", &self.language)
            .field("providers", &self.providers)
            .field("verbose", &self.verbose)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

/// Builder for CrewConfig
#[derive(Debug, Default)]
pub struct CrewConfigBuilder {
    google_api_key: Option<String>,
    groq_api_key: Option<String>,
    gemini_model: Option<String>,
    groq_model: Option<String>,
    temperature: Option<f32>,
    language: Option<ResponseLanguage>,
    providers: RoleProviders,
    verbose: Option<bool>,
    notifier: Option<NotifierConfig>,
}

impl CrewConfigBuilder {
    pub fn google_api_key(mut self, key: impl Into<String>) -> Self {
        self.google_api_key = Some(key.into());
        self
    }

    pub fn groq_api_key(mut self, key: impl Into<String>) -> Self {
        self.groq_api_key = Some(key.into());
        self
    }

    pub fn gemini_model(mut self, model: impl Into<String>) -> Self {
        self.gemini_model = Some(model.into());
        self
    }

    pub fn groq_model(mut self, model: impl Into<String>) -> Self {
        self.groq_model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn language(mut self, language: ResponseLanguage) -> Self {
        self.language = Some(language);
        self
    }

    /// Set the provider for every role
    pub fn providers(mut self, providers: RoleProviders) -> Self {
        self.providers = providers;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn notifier(mut self, notifier: NotifierConfig) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<CrewConfig> {
        let config = CrewConfig {
            google_api_key: self.google_api_key.unwrap_or_default(),
            groq_api_key: self.groq_api_key.unwrap_or_default(),
            gemini_model: self
                .gemini_model
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            groq_model: self
                .groq_model
                .unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            language: self.language.unwrap_or_default(),
            providers: self.providers,
            verbose: self.verbose.unwrap_or(true),
            notifier: self.notifier,
        };

        config.validate()?;
        Ok(config)
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

    const KEYS: [(&str, &str); 2] = [("GOOGLE_API_KEY", "g-key"), ("GROQ_API_KEY", "q-key")];

    #[test]
    fn test_defaults_without_delivery() {
        let env = vars(&KEYS);
        let lookup = |k: &str| env.get(k).cloned();
        let config = assert_ok!(CrewConfig::from_lookup(&lookup, false));

        assert_eq!(config.gemini_model, "gemini-pro");
        assert_eq!(config.groq_model, "llama3-70b-8192");
        assert!((config.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.language, ResponseLanguage::Portuguese);
        assert_eq!(config.providers, RoleProviders::default());
        assert!(config.notifier.is_none());
    }

    #[test]
    fn test_missing_google_key() {
        let env = vars(&[KEYS[1]]);
        let lookup = |k: &str| env.get(k).cloned();
        let err = assert_err!(CrewConfig::from_lookup(&lookup, false));
        assert!(err.is_configuration());
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_delivery_requires_notifier_settings() {
        let env = vars(&KEYS);
        let lookup = |k: &str| env.get(k).cloned();
        let err = assert_err!(CrewConfig::from_lookup(&lookup, true));
        assert!(err.to_string().contains("WHATSAPP_API_URL"));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = KEYS.to_vec();
        pairs.extend([
            ("CREW_LANGUAGE", "en"),
            ("CREW_TEMPERATURE", "0.2"),
            ("CREW_MODERATOR_PROVIDER", "groq"),
            ("GROQ_MODEL", "llama-3.1-70b"),
            ("WHATSAPP_API_URL", "https://api.example.com/send"),
            ("WHATSAPP_ACCESS_TOKEN", "t"),
            ("WHATSAPP_DESTINATION", "55"),
        ]);
        let env = vars(&pairs);
        let lookup = |k: &str| env.get(k).cloned();

        let config = assert_ok!(CrewConfig::from_lookup(&lookup, true));
        assert_eq!(config.language, ResponseLanguage::English);
        assert_eq!(config.providers.moderator, ProviderKind::Groq);
        assert_eq!(config.providers.technical, ProviderKind::Gemini);
        assert_eq!(config.model_for(ProviderKind::Groq), "llama-3.1-70b");
        assert!(config.notifier.is_some());
    }

    #[test]
    fn test_invalid_values() {
        let mut pairs = KEYS.to_vec();
        pairs.push(("CREW_TECHNICAL_PROVIDER", "openai"));
        let env = vars(&pairs);
        let lookup = |k: &str| env.get(k).cloned();
        let err = assert_err!(CrewConfig::from_lookup(&lookup, false));
        assert!(err.to_string().contains("CREW_TECHNICAL_PROVIDER"));

        let err = assert_err!(
            CrewConfig::builder()
                .google_api_key("g")
                .groq_api_key("q")
                .temperature(3.5)
                .build()
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("pt-BR".parse::<ResponseLanguage>(), Ok(ResponseLanguage::Portuguese));
        assert_eq!("English".parse::<ResponseLanguage>(), Ok(ResponseLanguage::English));
        assert!("fr".parse::<ResponseLanguage>().is_err());
        assert_eq!(ResponseLanguage::Portuguese.to_string(), "pt-BR");
    }

    #[test]
    fn test_debug_hides_keys() {
        let config = CrewConfig::builder()
            .google_api_key("very-secret")
            .groq_api_key("also-secret")
            .build()
            .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
    }
}
