//! Method-call analysis for the vigil analyzer.
//!
//! This crate resolves instance method calls (`$receiver->method(args)`)
//! against the union type of the receiver, reports the issues that follow
//! from that resolution, and narrows the receiver afterwards.
//!
//! Layout:
//! - `ast` - expression tree and builder
//! - `statements` - per-file analyzer state and issue reporting
//! - `expr` - expression walk and flow-tracking variable ids
//! - `call` - method call orchestration, per-variant resolution, arguments
//! - `flow` - receiver narrowing
//! - `context`, `clause` - variables in scope and the facts known about them
//! - `codebase` - class and method storage, recorded node types
//! - `issue_buffer` - issue sink and per-kind levels

pub mod ast;
pub mod call;
pub mod clause;
pub mod codebase;
pub mod context;
pub mod expr;
pub mod flow;
pub mod issue_buffer;
pub mod node_data;
pub mod statements;

pub use ast::{Expr, ExprBuilder, ExprKind, MethodCallExpr, NodeId};
pub use call::{
    ArgumentAnalyzer, ArgumentChecker, AtomicMethodCallAnalysisResult, AtomicMethodResolver,
    CodebaseMethodResolver, MethodId,
};
pub use codebase::{ClassLikeStorage, Codebase, MethodStorage, ParamStorage, Visibility};
pub use context::AnalysisContext;
pub use issue_buffer::{Issue, IssueBuffer, IssueLevel, IssueSink, ReportAction, ReportPolicy};
pub use statements::StatementsAnalyzer;

// Re-export diagnostics from vigil-common
pub mod diagnostics {
    pub use vigil_common::diagnostics::*;
}

/// Analysis of the enclosing statement was aborted by an accepted issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aborted;

impl std::fmt::Display for Aborted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("statement analysis aborted")
    }
}

impl std::error::Error for Aborted {}

/// `Ok` to keep analyzing the enclosing statement, `Err` to abandon it.
pub type AnalysisResult = Result<(), Aborted>;

#[cfg(test)]
#[path = "../tests/method_call_tests.rs"]
mod method_call_tests;
#[cfg(test)]
#[path = "../tests/narrowing_tests.rs"]
mod narrowing_tests;
#[cfg(test)]
#[path = "../tests/context_tests.rs"]
mod context_tests;
#[cfg(test)]
#[path = "../tests/issue_buffer_tests.rs"]
mod issue_buffer_tests;
#[cfg(test)]
#[path = "../tests/codebase_tests.rs"]
mod codebase_tests;
