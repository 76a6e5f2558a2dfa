//! Instance method calls.
//!
//! - `method_call` - the orchestrator, run once per `$receiver->method()`
//! - `atomic_resolver` - resolution of the method against one receiver variant
//! - `atomic_result` - what the resolver accumulates across variants
//! - `arguments` - argument checking collaborator
//! - `method_id` - `Class::method` identifiers

pub mod arguments;
pub mod atomic_resolver;
pub mod atomic_result;
mod method_call;
pub mod method_id;

pub use arguments::{ArgumentAnalyzer, ArgumentChecker};
pub use atomic_resolver::{AtomicMethodResolver, CodebaseMethodResolver};
pub use atomic_result::AtomicMethodCallAnalysisResult;
pub use method_id::MethodId;
