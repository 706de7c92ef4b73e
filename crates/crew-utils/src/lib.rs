//! Shared utilities for stock-crew
//!
//! This crate provides common functionality used across the stock-crew workspace:
//! tracing initialisation and helpers for reading configuration from the
//! process environment.

pub mod config;
pub mod logging;

pub use config::{EnvError, EnvLookup, load_dotenv, optional_var, parse_var, required_var};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
