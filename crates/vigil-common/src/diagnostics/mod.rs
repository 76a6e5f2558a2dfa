//! Diagnostic types and message lookup for the analyzer.
//!
//! Message templates live in `data.rs`, keyed by the numeric code of each
//! [`IssueKind`].

use serde::Serialize;

use crate::span::CodeLocation;

mod data;
mod issue_kind;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};
pub use issue_kind::IssueKind;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// A reported analyzer diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Issue name, e.g. `PossiblyNullReference`.
    pub issue_type: &'static str,
    /// `Class::method` the issue is about, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_id: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic for `kind` at `location`.
    #[must_use]
    pub fn new(
        kind: IssueKind,
        category: DiagnosticCategory,
        location: &CodeLocation,
        message: String,
    ) -> Self {
        Self {
            file: location.file.clone(),
            start: location.span.start,
            length: location.span.len(),
            message_text: message,
            category,
            code: kind.code(),
            issue_type: kind.name(),
            method_id: None,
        }
    }

    #[must_use]
    pub fn with_method_id(mut self, method_id: impl Into<String>) -> Self {
        self.method_id = Some(method_id.into());
        self
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
///
/// Returns the template string with `{0}`, `{1}`, etc. placeholders.
/// Use `format_message()` to fill in the placeholders.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

/// Get the default category for a diagnostic code.
#[must_use]
pub fn get_diagnostic_category(code: u32) -> Option<DiagnosticCategory> {
    get_diagnostic_message(code).map(|m| m.category)
}
