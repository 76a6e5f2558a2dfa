//! Common types and utilities for the vigil analyzer.
//!
//! This crate provides foundational types used across all vigil crates:
//! - Source spans and code locations (`Span`, `CodeLocation`)
//! - Diagnostic records, issue kinds and message templates
//! - Analyzer limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{CodeLocation, Span};

// Centralized limits and thresholds
pub mod limits;

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, IssueKind};

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
