//! Issue reporting.
//!
//! The checker hands every [`Issue`] to an [`IssueSink`]. The sink answers
//! whether it *accepted* the issue as an error; the caller then looks up what
//! to do in the issue's [`ReportPolicy`].

use std::ops::ControlFlow;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::{debug, trace};
use vigil_common::diagnostics::format_message;
use vigil_common::{CodeLocation, Diagnostic, DiagnosticCategory, IssueKind};

use crate::{Aborted, AnalysisResult};

/// An issue raised during analysis, before the sink has seen it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub kind: IssueKind,
    pub message: String,
    pub location: CodeLocation,
    pub method_id: Option<String>,
}

impl Issue {
    /// Build an issue with its message rendered from the kind's template.
    #[must_use]
    pub fn new(kind: IssueKind, location: CodeLocation, args: &[&str]) -> Self {
        Self {
            kind,
            message: format_message(kind.message_template(), args),
            location,
            method_id: None,
        }
    }

    #[must_use]
    pub fn with_method_id(mut self, method_id: impl Into<String>) -> Self {
        self.method_id = Some(method_id.into());
        self
    }
}

/// Destination for issues.
pub trait IssueSink {
    /// Record `issue` unless it is suppressed.
    ///
    /// Returns `true` when the issue was accepted as an error, which callers
    /// treat as a request to stop.
    fn accepts(&mut self, issue: Issue, suppressed: &[IssueKind]) -> bool;
}

/// What the checker does after reporting an issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportAction {
    /// Keep analyzing the call.
    Continue,
    /// Stop analyzing this call; the enclosing statement carries on.
    StopCall,
    /// Abort analysis of the enclosing statement.
    Abort,
}

impl ReportAction {
    /// Early-exit value for the current call, if any.
    #[must_use]
    pub fn flow(self) -> ControlFlow<AnalysisResult> {
        match self {
            ReportAction::Continue => ControlFlow::Continue(()),
            ReportAction::StopCall => ControlFlow::Break(Ok(())),
            ReportAction::Abort => ControlFlow::Break(Err(Aborted)),
        }
    }
}

/// Action per sink answer for one issue kind at one reporting site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportPolicy {
    pub on_accept: ReportAction,
    pub on_reject: ReportAction,
}

impl ReportPolicy {
    /// Purely informational: analysis carries on either way.
    pub const NON_FATAL: ReportPolicy = ReportPolicy {
        on_accept: ReportAction::Continue,
        on_reject: ReportAction::Continue,
    };

    /// Aborts the statement when accepted, otherwise carries on.
    pub const ABORT_IF_ACCEPTED: ReportPolicy = ReportPolicy {
        on_accept: ReportAction::Abort,
        on_reject: ReportAction::Continue,
    };

    /// The call cannot be analyzed further; an accepted error also aborts
    /// the statement.
    pub const TERMINAL: ReportPolicy = ReportPolicy {
        on_accept: ReportAction::Abort,
        on_reject: ReportAction::StopCall,
    };

    #[must_use]
    pub const fn action(self, accepted: bool) -> ReportAction {
        if accepted {
            self.on_accept
        } else {
            self.on_reject
        }
    }
}

/// How an issue kind is treated by [`IssueBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    /// Recorded as an error and accepted.
    Error,
    /// Recorded as a warning, not accepted.
    Info,
    /// Dropped.
    Suppress,
}

impl IssueLevel {
    #[must_use]
    pub fn default_for(kind: IssueKind) -> IssueLevel {
        match kind.default_category() {
            DiagnosticCategory::Error => IssueLevel::Error,
            _ => IssueLevel::Info,
        }
    }
}

/// Collects diagnostics according to per-kind levels.
#[derive(Clone, Debug, Default)]
pub struct IssueBuffer {
    levels: FxHashMap<IssueKind, IssueLevel>,
    diagnostics: Vec<Diagnostic>,
    suppressed_count: usize,
}

impl IssueBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_level(mut self, kind: IssueKind, level: IssueLevel) -> Self {
        self.set_level(kind, level);
        self
    }

    pub fn set_level(&mut self, kind: IssueKind, level: IssueLevel) {
        self.levels.insert(kind, level);
    }

    #[must_use]
    pub fn level_for(&self, kind: IssueKind) -> IssueLevel {
        self.levels
            .get(&kind)
            .copied()
            .unwrap_or_else(|| IssueLevel::default_for(kind))
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Diagnostics of one kind, in report order.
    pub fn diagnostics_of(&self, kind: IssueKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.code == kind.code())
    }

    #[must_use]
    pub fn has_issue(&self, kind: IssueKind) -> bool {
        self.diagnostics_of(kind).next().is_some()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.category == DiagnosticCategory::Error)
            .count()
    }

    #[must_use]
    pub fn suppressed_count(&self) -> usize {
        self.suppressed_count
    }

    fn record(&mut self, issue: Issue, category: DiagnosticCategory) {
        let mut diagnostic = Diagnostic::new(issue.kind, category, &issue.location, issue.message);
        if let Some(method_id) = issue.method_id {
            diagnostic = diagnostic.with_method_id(method_id);
        }
        self.diagnostics.push(diagnostic);
    }
}

impl IssueSink for IssueBuffer {
    fn accepts(&mut self, issue: Issue, suppressed: &[IssueKind]) -> bool {
        if suppressed.contains(&issue.kind) {
            trace!(issue = %issue.kind, location = %issue.location, "suppressed by scope");
            self.suppressed_count += 1;
            return false;
        }

        match self.level_for(issue.kind) {
            IssueLevel::Suppress => {
                trace!(issue = %issue.kind, location = %issue.location, "suppressed by config");
                self.suppressed_count += 1;
                false
            }
            IssueLevel::Info => {
                debug!(issue = %issue.kind, location = %issue.location, "{}", issue.message);
                self.record(issue, DiagnosticCategory::Warning);
                false
            }
            IssueLevel::Error => {
                debug!(issue = %issue.kind, location = %issue.location, "{}", issue.message);
                self.record(issue, DiagnosticCategory::Error);
                true
            }
        }
    }
}
