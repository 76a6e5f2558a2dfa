//! vigil: method-call resolution and receiver narrowing for a union-typed
//! static analyzer.
//!
//! The work happens in the member crates; this crate wires them together
//! with configuration loading and tracing setup.
//!
//! - [`vigil_common`] - spans, diagnostics, issue kinds, limits
//! - [`vigil_solver`] - atomic and union types
//! - [`vigil_checker`] - method call analysis, narrowing, issue buffer

pub mod config;
pub mod tracing_config;

pub use config::{AnalyzerConfig, ResolvedAnalyzerOptions, load_config, parse_config};

pub use vigil_checker::{
    Aborted, AnalysisContext, AnalysisResult, ClassLikeStorage, Codebase, Expr, ExprBuilder,
    IssueBuffer, IssueLevel, MethodStorage, ParamStorage, StatementsAnalyzer, Visibility,
};
pub use vigil_common::{CodeLocation, Diagnostic, DiagnosticCategory, IssueKind, Span};
pub use vigil_solver::{Atomic, AtomicKind, Union, UnionFlags};

pub use vigil_checker as checker;
pub use vigil_common as common;
pub use vigil_solver as solver;
