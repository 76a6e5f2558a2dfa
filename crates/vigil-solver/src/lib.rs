//! Static type model for the analyzer.
//!
//! A static type is a [`Union`] of one or more [`Atomic`] variants. Unions
//! keep their variants in insertion order (so diagnostics list them in the
//! order they were written) but compare as sets.
//!
//! - `types` - atomic variants and their keys
//! - `union` - the union container and its provenance flags
//! - `combine` - merging unions, e.g. return types across receiver variants

mod combine;
pub mod types;
pub mod union;

pub use combine::{combine_optional_union_types, combine_union_types};
pub use types::{Atomic, AtomicKind};
pub use union::{Union, UnionFlags};

#[cfg(test)]
#[path = "../tests/union_tests.rs"]
mod union_tests;
#[cfg(test)]
#[path = "../tests/combine_tests.rs"]
mod combine_tests;
