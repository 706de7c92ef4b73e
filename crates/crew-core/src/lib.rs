//! Core types for stock-crew
//!
//! This crate defines the error taxonomy shared by every layer of the
//! pipeline and the append-only [`Context`] that carries task outputs forward.

pub mod context;
pub mod error;

pub use context::{CONTEXT_SEPARATOR, Context, ContextEntry};
pub use error::{Error, Result};
