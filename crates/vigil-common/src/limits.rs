//! Centralized limits and thresholds for the analyzer.
//!
//! Recursion through receiver types is bounded here rather than at each
//! call site so the values stay consistent between the resolver and the
//! expression analyzer.

/// Maximum depth for nested expression analysis.
///
/// Each nested receiver (`$a->b()->c()->d()`) adds several frames to the
/// call stack; past this depth the expression analyzer records `mixed` for
/// the node and stops descending.
pub const MAX_EXPR_CHECK_DEPTH: u32 = 500;

/// Remaining stack below which nested expression analysis switches to a
/// freshly allocated segment.
pub const EXPR_STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each stack segment allocated for nested expression analysis.
pub const EXPR_STACK_SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Maximum depth when resolving a template parameter through its bound.
///
/// Template bounds may themselves be template parameters
/// (`T of U`, `U of Foo`). A malformed codebase can make that chain cyclic,
/// so the resolver treats anything deeper than this as `mixed`.
pub const MAX_TEMPLATE_BOUND_DEPTH: u32 = 16;

/// Inline capacity for the small id lists kept per call site.
pub const CALL_SITE_INLINE_IDS: usize = 4;
