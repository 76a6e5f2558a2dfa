//! Per-node inferred types for the statements being analyzed.

use rustc_hash::FxHashMap;
use vigil_solver::Union;

use crate::ast::NodeId;

/// Maps expression nodes to the type inferred for them.
///
/// Filled bottom-up: a receiver is analyzed (and gets its type here) before
/// the call that consumes it.
#[derive(Clone, Debug, Default)]
pub struct NodeDataProvider {
    types: FxHashMap<NodeId, Union>,
}

impl NodeDataProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get_type(&self, node: NodeId) -> Option<&Union> {
        self.types.get(&node)
    }

    pub fn set_type(&mut self, node: NodeId, ty: Union) {
        self.types.insert(node, ty);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
