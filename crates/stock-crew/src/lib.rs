//! Stock recommendation crew
//!
//! Four agents run one after another, each reading the answers of the ones
//! before it:
//!
//! 1. a technical analyst shortlists B3 tickers from chart signals,
//! 2. a fundamental analyst shortlists tickers from market news,
//! 3. a moderator merges both lists into five picks,
//! 4. an investment analyst writes the final report.
//!
//! The analysts can search the web through DuckDuckGo. The report is then
//! posted once to a messaging API.

pub mod config;
pub mod crew;
pub mod error;
pub mod prompts;
pub mod run;
pub mod summary;

pub use config::{CrewConfig, ProviderKind, ResponseLanguage, RoleProviders};
pub use crew::{assemble_pipeline, build_agent, provider_registry};
pub use error::{CrewError, EXIT_CONFIGURATION, EXIT_PIPELINE, Result};
pub use prompts::CrewRole;
pub use run::{Delivery, RunReport, run_and_deliver};
pub use summary::summary_table;
