//! Per-file analysis state.
//!
//! `StatementsAnalyzer` is the mutable state threaded through expression
//! analysis. The expression and call modules extend it with `impl` blocks of
//! their own; collaborators (issue sink, method resolver, argument checker)
//! are held by reference so tests can substitute doubles.

use std::ops::ControlFlow;

use vigil_common::{CodeLocation, IssueKind, Span};

use crate::call::{ArgumentAnalyzer, ArgumentChecker, AtomicMethodResolver, CodebaseMethodResolver};
use crate::codebase::Codebase;
use crate::issue_buffer::{Issue, IssueSink, ReportAction, ReportPolicy};
use crate::node_data::NodeDataProvider;
use crate::AnalysisResult;

static DEFAULT_RESOLVER: CodebaseMethodResolver = CodebaseMethodResolver;
static DEFAULT_ARGUMENT_CHECKER: ArgumentAnalyzer = ArgumentAnalyzer;

pub struct StatementsAnalyzer<'a> {
    pub codebase: &'a Codebase,
    file_path: String,
    /// Class whose body is being analyzed, if any.
    fqcln: Option<String>,
    pub node_data: NodeDataProvider,
    suppressed_issues: Vec<IssueKind>,
    issues: &'a mut dyn IssueSink,
    resolver: &'a dyn AtomicMethodResolver,
    argument_checker: &'a dyn ArgumentChecker,
    pub(crate) expr_depth: u32,
}

impl<'a> StatementsAnalyzer<'a> {
    pub fn new(
        codebase: &'a Codebase,
        file_path: impl Into<String>,
        issues: &'a mut dyn IssueSink,
    ) -> Self {
        Self {
            codebase,
            file_path: file_path.into(),
            fqcln: None,
            node_data: NodeDataProvider::new(),
            suppressed_issues: Vec::new(),
            issues,
            resolver: &DEFAULT_RESOLVER,
            argument_checker: &DEFAULT_ARGUMENT_CHECKER,
            expr_depth: 0,
        }
    }

    /// Analyze as the body of `class`, which makes `$this` legal.
    #[must_use]
    pub fn in_class(mut self, class: impl Into<String>) -> Self {
        self.fqcln = Some(class.into());
        self
    }

    #[must_use]
    pub fn with_suppressed_issues(mut self, suppressed: Vec<IssueKind>) -> Self {
        self.suppressed_issues = suppressed;
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: &'a dyn AtomicMethodResolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn with_argument_checker(mut self, checker: &'a dyn ArgumentChecker) -> Self {
        self.argument_checker = checker;
        self
    }

    #[must_use]
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    #[must_use]
    pub fn fqcln(&self) -> Option<&str> {
        self.fqcln.as_deref()
    }

    #[must_use]
    pub fn suppressed_issues(&self) -> &[IssueKind] {
        &self.suppressed_issues
    }

    /// The method resolver. The reference outlives `self` so it can be
    /// called with `&mut self`.
    #[must_use]
    pub fn resolver(&self) -> &'a dyn AtomicMethodResolver {
        self.resolver
    }

    #[must_use]
    pub fn argument_checker(&self) -> &'a dyn ArgumentChecker {
        self.argument_checker
    }

    #[must_use]
    pub fn location(&self, span: Span) -> CodeLocation {
        CodeLocation::new(self.file_path.clone(), span)
    }

    /// Hand `issue` to the sink and translate its answer through `policy`.
    pub fn report(&mut self, issue: Issue, policy: ReportPolicy) -> ReportAction {
        let accepted = self.issues.accepts(issue, &self.suppressed_issues);
        policy.action(accepted)
    }

    /// [`Self::report`], returning the early exit for the current call.
    pub fn report_flow(&mut self, issue: Issue, policy: ReportPolicy) -> ControlFlow<AnalysisResult> {
        self.report(issue, policy).flow()
    }

    #[must_use]
    pub fn into_node_data(self) -> NodeDataProvider {
        self.node_data
    }
}
