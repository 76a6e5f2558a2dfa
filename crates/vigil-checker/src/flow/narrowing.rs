//! Receiver narrowing after a successful method call.
//!
//! Once `$foo->bar()` has run, `$foo` cannot have been null or anything else
//! that has no methods, so subsequent code sees only its object variants
//! (classes and template parameters).

use tracing::{debug, trace};
use vigil_solver::{Union, UnionFlags};

use crate::context::AnalysisContext;

/// Replace the type of `var_id` with the object variants of `class_type`,
/// with docblock provenance cleared.
///
/// Returns `false` and leaves the context untouched when `class_type` has no
/// object variant, since the receiver would otherwise be left with an empty
/// type.
pub fn narrow_receiver_after_call(ctx: &mut AnalysisContext, var_id: &str, class_type: &Union) -> bool {
    let objects = class_type
        .atomic_types()
        .filter(|atomic| atomic.is_object_context())
        .cloned()
        .map(|atomic| atomic.with_docblock(false));

    let Some(mut narrowed) = Union::from_atomics(objects) else {
        trace!(var_id, receiver = %class_type, "no object variants to narrow to");
        return false;
    };
    narrowed.flags = class_type.flags
        - (UnionFlags::FROM_DOCBLOCK
            | UnionFlags::IGNORE_NULLABLE_ISSUES
            | UnionFlags::IGNORE_FALSABLE_ISSUES);

    debug!(var_id, from = %class_type, to = %narrowed, "narrowed receiver after call");
    ctx.remove_var_from_conflicting_clauses(var_id, None);
    ctx.set_var_type(var_id, narrowed);
    true
}
