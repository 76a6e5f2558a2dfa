//! Flow-sensitive analysis context.
//!
//! Holds the variables in scope with their current types, the clauses known
//! to hold at this point, and the switches that tell the method-call core
//! what to check.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use vigil_solver::Union;

use crate::clause::{Clause, filter_clauses};

#[derive(Clone, Debug)]
pub struct AnalysisContext {
    /// Variable id (`$foo`, `$foo->bar`) to its current type.
    pub vars_in_scope: FxHashMap<String, Union>,
    pub clauses: Vec<Clause>,
    /// Variables whose narrowing must be undone when leaving this scope.
    pub parent_remove_vars: FxHashSet<String>,
    /// When false, no class or method existence checks run at all.
    pub check_classes: bool,
    /// When false, undefined-method diagnostics are not emitted.
    pub check_methods: bool,
    /// Set while analyzing a call receiver or argument.
    pub inside_call: bool,
    /// Speculative pass collecting property initializations.
    pub collect_initializations: bool,
    /// Speculative pass collecting mutations.
    pub collect_mutations: bool,
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self {
            vars_in_scope: FxHashMap::default(),
            clauses: Vec::new(),
            parent_remove_vars: FxHashSet::default(),
            check_classes: true,
            check_methods: true,
            inside_call: false,
            collect_initializations: false,
            collect_mutations: false,
        }
    }
}

impl AnalysisContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_variable(&self, var_id: &str) -> bool {
        self.vars_in_scope.contains_key(var_id)
    }

    #[must_use]
    pub fn var_type(&self, var_id: &str) -> Option<&Union> {
        self.vars_in_scope.get(var_id)
    }

    pub fn set_var_type(&mut self, var_id: impl Into<String>, ty: Union) {
        self.vars_in_scope.insert(var_id.into(), ty);
    }

    /// Whether this is a speculative pass whose results must not be recorded.
    #[must_use]
    pub fn is_speculative(&self) -> bool {
        self.collect_initializations || self.collect_mutations
    }

    /// Drop every clause about `var_id` that `new_type` contradicts.
    ///
    /// With `None` every clause mentioning the variable is dropped. The
    /// variable is also scheduled for removal from the parent scope.
    pub fn remove_var_from_conflicting_clauses(&mut self, var_id: &str, new_type: Option<&Union>) {
        let before = self.clauses.len();
        self.clauses = filter_clauses(var_id, &self.clauses, new_type);
        trace!(
            var_id,
            removed = before - self.clauses.len(),
            "filtered clauses"
        );
        self.parent_remove_vars.insert(var_id.to_string());
    }
}
