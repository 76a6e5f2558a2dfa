//! Union types.
//!
//! A [`Union`] is never empty: constructors take at least one variant, and
//! [`Union::remove_type`] refuses to remove the last one.

use bitflags::bitflags;
use indexmap::IndexMap;

use crate::types::{Atomic, AtomicKind};

bitflags! {
    /// Union-level provenance and suppression bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct UnionFlags: u8 {
        /// The type comes from a docblock annotation, not executable code.
        const FROM_DOCBLOCK = 1 << 0;
        /// Do not report `PossiblyNullReference` for this type.
        const IGNORE_NULLABLE_ISSUES = 1 << 1;
        /// Do not report `PossiblyFalseReference` for this type.
        const IGNORE_FALSABLE_ISSUES = 1 << 2;
        /// The value was returned by reference.
        const BY_REF = 1 << 3;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Union {
    types: IndexMap<String, Atomic>,
    pub flags: UnionFlags,
}

impl Union {
    #[must_use]
    pub fn new(atomic: Atomic) -> Self {
        let mut types = IndexMap::with_capacity(1);
        types.insert(atomic.key(), atomic);
        Self {
            types,
            flags: UnionFlags::empty(),
        }
    }

    /// Build a union from variants, or `None` when there are none.
    ///
    /// Variants sharing a key collapse into the first position they appeared at.
    pub fn from_atomics(atomics: impl IntoIterator<Item = Atomic>) -> Option<Self> {
        let mut types = IndexMap::new();
        for atomic in atomics {
            types.insert(atomic.key(), atomic);
        }
        if types.is_empty() {
            return None;
        }
        Some(Self {
            types,
            flags: UnionFlags::empty(),
        })
    }

    #[must_use]
    pub fn mixed() -> Self {
        Self::new(Atomic::mixed())
    }

    #[must_use]
    pub fn null() -> Self {
        Self::new(Atomic::null())
    }

    #[must_use]
    pub fn void() -> Self {
        Self::new(Atomic::new(AtomicKind::Void))
    }

    #[must_use]
    pub fn int() -> Self {
        Self::new(Atomic::new(AtomicKind::Int))
    }

    #[must_use]
    pub fn string() -> Self {
        Self::new(Atomic::new(AtomicKind::String))
    }

    #[must_use]
    pub fn float() -> Self {
        Self::new(Atomic::new(AtomicKind::Float))
    }

    #[must_use]
    pub fn bool() -> Self {
        Self::new(Atomic::new(AtomicKind::Bool))
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(Atomic::named(name))
    }

    /// `?Name`: the named object or null.
    #[must_use]
    pub fn nullable_named(name: impl Into<String>) -> Self {
        let mut union = Self::named(name);
        union.add_type(Atomic::null());
        union
    }

    #[must_use]
    pub fn with_flags(mut self, flags: UnionFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Mark the union and every variant as docblock-derived.
    #[must_use]
    pub fn mark_from_docblock(mut self) -> Self {
        self.flags |= UnionFlags::FROM_DOCBLOCK;
        for atomic in self.types.values_mut() {
            atomic.from_docblock = true;
        }
        self
    }

    /// Add a variant, replacing one with the same key in place.
    pub fn add_type(&mut self, atomic: Atomic) {
        self.types.insert(atomic.key(), atomic);
    }

    /// Remove the variant under `key`.
    ///
    /// Returns `false` if the key is absent or it is the only variant left.
    pub fn remove_type(&mut self, key: &str) -> bool {
        if self.types.len() == 1 || !self.types.contains_key(key) {
            return false;
        }
        self.types.shift_remove(key).is_some()
    }

    #[must_use]
    pub fn has_type(&self, key: &str) -> bool {
        self.types.contains_key(key)
    }

    /// Variants in insertion order.
    pub fn atomic_types(&self) -> impl Iterator<Item = &Atomic> {
        self.types.values()
    }

    pub fn atomic_types_mut(&mut self) -> impl Iterator<Item = &mut Atomic> {
        self.types.values_mut()
    }

    /// Variant keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[must_use]
    pub fn is_single(&self) -> bool {
        self.types.len() == 1
    }

    /// Exactly `null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.is_single() && self.has_type("null")
    }

    /// Exactly `void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.is_single() && self.has_type("void")
    }

    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.has_type("null")
    }

    #[must_use]
    pub fn is_falsable(&self) -> bool {
        self.has_type("false")
    }

    #[must_use]
    pub fn is_mixed(&self) -> bool {
        self.has_type("mixed")
    }

    #[must_use]
    pub fn is_from_docblock(&self) -> bool {
        self.flags.contains(UnionFlags::FROM_DOCBLOCK)
    }

    #[must_use]
    pub fn ignore_nullable_issues(&self) -> bool {
        self.flags.contains(UnionFlags::IGNORE_NULLABLE_ISSUES)
    }

    #[must_use]
    pub fn ignore_falsable_issues(&self) -> bool {
        self.flags.contains(UnionFlags::IGNORE_FALSABLE_ISSUES)
    }

    #[must_use]
    pub fn is_by_ref(&self) -> bool {
        self.flags.contains(UnionFlags::BY_REF)
    }

    /// `Foo|null` style id, variants joined in insertion order.
    #[must_use]
    pub fn id(&self) -> String {
        let mut id = String::new();
        for (i, atomic) in self.types.values().enumerate() {
            if i > 0 {
                id.push('|');
            }
            id.push_str(&atomic.id());
        }
        id
    }
}

impl From<Atomic> for Union {
    fn from(atomic: Atomic) -> Self {
        Self::new(atomic)
    }
}

impl std::fmt::Display for Union {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id())
    }
}
