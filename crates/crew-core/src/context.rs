//! Accumulated context passed between pipeline tasks
//!
//! Every completed task appends its output; later tasks read the rendered
//! concatenation. Entries are never modified or removed once pushed.

use serde::{Deserialize, Serialize};

/// Separator placed between consecutive task outputs when rendering
pub const CONTEXT_SEPARATOR: &str = "\n\n----------\n\n";

/// Output of one completed task, as seen by later tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    /// Role of the agent that produced the text
    pub role: String,
    /// Raw task output
    pub text: String,
}

/// Append-only record of prior task outputs, in execution order
///
/// # Example
///
/// ```
/// use crew_core::Context;
///
/// let mut ctx = Context::new();
/// ctx.push("Technical Analyst", "A");
/// ctx.push("Fundamental Analyst", "B");
///
/// assert_eq!(ctx.len(), 2);
/// assert_eq!(ctx.render(), "A\n\n----------\n\nB");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    entries: Vec<ContextEntry>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the output of a completed task
    pub fn push(&mut self, role: impl Into<String>, text: impl Into<String>) {
        self.entries.push(ContextEntry {
            role: role.into(),
            text: text.into(),
        });
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    /// Text of the most recent entry
    pub fn last_text(&self) -> Option<&str> {
        self.entries.last().map(|e| e.text.as_str())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no task has completed yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Concatenate all outputs in order, separated by [`CONTEXT_SEPARATOR`]
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.render(), "");
        assert!(ctx.last_text().is_none());
    }

    #[test]
    fn test_render_preserves_order() {
        let mut ctx = Context::new();
        ctx.push("a", "first");
        ctx.push("b", "second");
        ctx.push("c", "third");

        let rendered = ctx.render();
        let first = rendered.find("first").unwrap();
        let second = rendered.find("second").unwrap();
        let third = rendered.find("third").unwrap();
        assert!(first < second && second < third);
        assert_eq!(ctx.last_text(), Some("third"));
        assert_eq!(ctx.entries()[1].role, "b");
    }

    #[test]
    fn test_serialization() {
        let mut ctx = Context::new();
        ctx.push("role", "text");
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["entries"][0]["role"], "role");
    }
}
