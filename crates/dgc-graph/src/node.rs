use dgc_binder::BindingId;
use serde::Serialize;
use smallvec::SmallVec;

/// Handle into the node arena of one [`crate::DependencyGraph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One resolved binding and its resolved dependencies, in the binding's
/// dependency order.
///
/// Nodes are shared: every path that needs the same binding holds the same
/// `NodeId`. A node for a `Recursive` placeholder has no dependencies; its
/// `delegate` is set once the node it stands in for has been built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
    pub binding: BindingId,
    pub dependencies: SmallVec<[NodeId; 4]>,
    pub delegate: Option<NodeId>,
}

impl GraphNode {
    pub fn new(binding: BindingId, dependencies: SmallVec<[NodeId; 4]>) -> Self {
        Self {
            binding,
            dependencies,
            delegate: None,
        }
    }
}
