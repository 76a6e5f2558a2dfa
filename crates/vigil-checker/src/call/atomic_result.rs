use smallvec::SmallVec;
use vigil_common::limits::CALL_SITE_INLINE_IDS;
use vigil_solver::{Union, combine_optional_union_types};

use crate::call::MethodId;

/// Ids collected for one call site, in receiver-variant order.
pub type CallSiteIds = SmallVec<[String; CALL_SITE_INLINE_IDS]>;

/// Outcome of resolving one call against every receiver variant.
///
/// Created fresh per call, filled by the resolver variant by variant, then
/// read by the orchestrator to decide which diagnostics to emit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtomicMethodCallAnalysisResult {
    /// Union of the return types of every resolved method.
    pub return_type: Option<Union>,
    pub returns_by_ref: bool,
    pub has_mock: bool,
    /// Some variant is a class on which the call is legal.
    pub has_valid_method_call_type: bool,
    /// Some variant is `mixed` or an unknown object.
    pub has_mixed_method_call: bool,
    /// Ids of variants on which no method can be called (`int`, `array`, ...).
    pub invalid_method_call_types: CallSiteIds,
    /// Methods that resolved.
    pub existent_method_ids: SmallVec<[MethodId; CALL_SITE_INLINE_IDS]>,
    pub non_existent_class_method_ids: CallSiteIds,
    pub non_existent_interface_method_ids: CallSiteIds,
    /// Ids only reachable through `__call` on a class that forbids it.
    pub non_existent_magic_method_ids: CallSiteIds,
    pub check_visibility: bool,
}

impl Default for AtomicMethodCallAnalysisResult {
    fn default() -> Self {
        Self {
            return_type: None,
            returns_by_ref: false,
            has_mock: false,
            has_valid_method_call_type: false,
            has_mixed_method_call: false,
            invalid_method_call_types: SmallVec::new(),
            existent_method_ids: SmallVec::new(),
            non_existent_class_method_ids: SmallVec::new(),
            non_existent_interface_method_ids: SmallVec::new(),
            non_existent_magic_method_ids: SmallVec::new(),
            check_visibility: true,
        }
    }
}

impl AtomicMethodCallAnalysisResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold another variant's return type into the call's result type.
    pub fn add_return_type(&mut self, ty: Union) {
        self.return_type = Some(combine_optional_union_types(self.return_type.take(), ty));
    }

    pub fn add_existent_method_id(&mut self, method_id: MethodId) {
        if !self.existent_method_ids.contains(&method_id) {
            self.existent_method_ids.push(method_id);
        }
    }
}
