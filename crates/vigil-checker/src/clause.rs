//! Flow-sensitive facts about variables.
//!
//! A [`Clause`] is a disjunction: at least one of its assertions holds.
//! The context keeps a conjunction of clauses; when a variable's type changes
//! the clauses it falsifies are dropped.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use vigil_solver::{AtomicKind, Union};

/// One possible fact about a variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Assertion {
    Null,
    NotNull,
    Falsy,
    Truthy,
    /// The value is an instance of the named class.
    IsType(String),
    NotType(String),
}

impl Assertion {
    /// Whether a value of type `ty` could satisfy this assertion.
    #[must_use]
    pub fn can_hold_for(&self, ty: &Union) -> bool {
        if ty.is_mixed() {
            return true;
        }
        match self {
            Assertion::Null => ty.is_nullable(),
            Assertion::NotNull => ty
                .atomic_types()
                .any(|atomic| !matches!(atomic.kind, AtomicKind::Null | AtomicKind::Void)),
            Assertion::Falsy => ty.atomic_types().any(|atomic| {
                !matches!(
                    atomic.kind,
                    AtomicKind::NamedObject { .. } | AtomicKind::Object | AtomicKind::True
                )
            }),
            Assertion::Truthy => ty.atomic_types().any(|atomic| {
                !matches!(
                    atomic.kind,
                    AtomicKind::Null | AtomicKind::Void | AtomicKind::False
                )
            }),
            Assertion::IsType(name) => {
                let key = name.to_ascii_lowercase();
                ty.has_type(&key)
                    || ty.atomic_types().any(|atomic| {
                        matches!(
                            atomic.kind,
                            AtomicKind::Object | AtomicKind::TemplateParam { .. }
                        )
                    })
            }
            Assertion::NotType(name) => {
                let key = name.to_ascii_lowercase();
                ty.keys().any(|other| other != key)
            }
        }
    }
}

impl std::fmt::Display for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Assertion::Null => f.write_str("null"),
            Assertion::NotNull => f.write_str("!null"),
            Assertion::Falsy => f.write_str("falsy"),
            Assertion::Truthy => f.write_str("!falsy"),
            Assertion::IsType(name) => f.write_str(name),
            Assertion::NotType(name) => write!(f, "!{name}"),
        }
    }
}

/// A disjunction of assertions over one or more variables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Clause {
    possibilities: FxHashMap<String, SmallVec<[Assertion; 2]>>,
}

impl Clause {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A clause with a single assertion about one variable.
    #[must_use]
    pub fn single(var_id: impl Into<String>, assertion: Assertion) -> Self {
        Self::new().or(var_id, assertion)
    }

    /// Add `assertion` about `var_id` as another disjunct.
    #[must_use]
    pub fn or(mut self, var_id: impl Into<String>, assertion: Assertion) -> Self {
        let entry = self.possibilities.entry(var_id.into()).or_default();
        if !entry.contains(&assertion) {
            entry.push(assertion);
        }
        self
    }

    #[must_use]
    pub fn mentions(&self, var_id: &str) -> bool {
        self.possibilities.contains_key(var_id)
    }

    #[must_use]
    pub fn assertions_for(&self, var_id: &str) -> &[Assertion] {
        self.possibilities
            .get(var_id)
            .map(|assertions| assertions.as_slice())
            .unwrap_or_default()
    }

    /// Whether the clause can still hold once `var_id` has type `new_type`.
    ///
    /// Without a type nothing is known, so a clause mentioning the variable
    /// cannot be trusted.
    #[must_use]
    pub fn survives(&self, var_id: &str, new_type: Option<&Union>) -> bool {
        let Some(assertions) = self.possibilities.get(var_id) else {
            return true;
        };
        let Some(new_type) = new_type else {
            return false;
        };
        assertions.iter().any(|assertion| assertion.can_hold_for(new_type))
    }
}

/// Keep the clauses that remain valid after `var_id` changes to `new_type`.
#[must_use]
pub fn filter_clauses(var_id: &str, clauses: &[Clause], new_type: Option<&Union>) -> Vec<Clause> {
    clauses
        .iter()
        .filter(|clause| clause.survives(var_id, new_type))
        .cloned()
        .collect()
}
