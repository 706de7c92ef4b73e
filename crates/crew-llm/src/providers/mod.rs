//! Concrete completion provider implementations

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "groq")]
pub mod groq;

#[cfg(feature = "gemini")]
pub use gemini::{DEFAULT_GEMINI_MODEL, GeminiConfig, GeminiProvider};

#[cfg(feature = "groq")]
pub use groq::{DEFAULT_GROQ_MODEL, GroqConfig, GroqProvider};
