//! Tool management and execution framework for stock-crew
//!
//! Tools are the capabilities an agent may invoke while working on a task.
//! The only concrete tool is [`DuckDuckGoSearch`], a web search backed by the
//! DuckDuckGo Instant Answer API.

pub mod registry;
pub mod search;
pub mod tool;

pub use registry::ToolRegistry;
pub use search::{DuckDuckGoSearch, NO_RESULT_TEXT, SEARCH_TOOL_NAME};
pub use tool::Tool;
