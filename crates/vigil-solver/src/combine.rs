//! Combining unions.
//!
//! Used to build the return type of a call across every receiver variant.

use crate::types::{Atomic, AtomicKind};
use crate::union::{Union, UnionFlags};

/// Merge two unions into one containing the variants of both.
///
/// `mixed` absorbs every other variant. `FROM_DOCBLOCK` and `BY_REF`
/// survive if either side carries them; the nullable/falsable suppression
/// bits survive only if both sides carry them.
#[must_use]
pub fn combine_union_types(a: &Union, b: &Union) -> Union {
    let flags = combine_flags(a.flags, b.flags);

    if a.is_mixed() || b.is_mixed() {
        let from_docblock = a
            .atomic_types()
            .chain(b.atomic_types())
            .filter(|atomic| matches!(atomic.kind, AtomicKind::Mixed))
            .all(|atomic| atomic.from_docblock);
        return Union::new(Atomic::mixed().with_docblock(from_docblock)).with_flags(flags);
    }

    let mut combined = a.clone();
    for atomic in b.atomic_types() {
        let key = atomic.key();
        if combined.has_type(&key) {
            // Runtime evidence on either side wins over an annotation.
            if !atomic.from_docblock
                && let Some(existing) = combined.atomic_types_mut().find(|other| other.key() == key)
            {
                existing.from_docblock = false;
            }
            continue;
        }
        combined.add_type(atomic.clone());
    }
    combined.flags = flags;
    combined
}

/// Fold an optional accumulated union with a new contribution.
#[must_use]
pub fn combine_optional_union_types(existing: Option<Union>, new: Union) -> Union {
    match existing {
        Some(existing) => combine_union_types(&existing, &new),
        None => new,
    }
}

fn combine_flags(a: UnionFlags, b: UnionFlags) -> UnionFlags {
    let sticky = UnionFlags::FROM_DOCBLOCK | UnionFlags::BY_REF;
    let shared = UnionFlags::IGNORE_NULLABLE_ISSUES | UnionFlags::IGNORE_FALSABLE_ISSUES;
    ((a | b) & sticky) | (a & b & shared)
}
