//! Section-based prompt assembly.
//!
//! [`PromptBuilder`] replaces manual string concatenation when rendering the
//! clinical instruction document. Sections are joined with double newlines
//! and get `## ` markdown headings; empty sections are silently skipped, so
//! callers can render conditionally without tracking separators.

/// Builder for the multi-section instruction document.
pub struct PromptBuilder {
    sections: Vec<String>,
}

impl PromptBuilder {
    /// Create a new builder with an initial preamble.
    ///
    /// The preamble is included as-is, without a heading.
    pub fn new(preamble: impl Into<String>) -> Self {
        Self {
            sections: vec![preamble.into()],
        }
    }

    /// Append a named section with a `## ` heading.
    ///
    /// Skipped if `content` is empty.
    pub fn section(mut self, heading: &str, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.is_empty() {
            self.sections.push(format!("## {heading}\n\n{content}"));
        }
        self
    }

    /// Append raw text without a heading.
    ///
    /// Skipped if `content` is empty.
    pub fn raw(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        if !content.is_empty() {
            self.sections.push(content);
        }
        self
    }

    /// Join all sections with double newlines.
    pub fn build(self) -> String {
        self.sections.join("\n\n")
    }
}
