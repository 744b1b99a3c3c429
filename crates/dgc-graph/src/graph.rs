//! The node and binding arenas produced by one builder run.

use dgc_binder::{Binding, BindingId, BindingPool, BindingVariant};

use crate::node::{GraphNode, NodeId};

#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    pub(crate) pool: BindingPool,
    pub(crate) nodes: Vec<GraphNode>,
}

impl DependencyGraph {
    /// # Panics
    ///
    /// Panics on a handle from another graph.
    #[inline]
    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.index()]
    }

    /// The binding a node was built from.
    #[inline]
    pub fn value(&self, id: NodeId) -> &Binding {
        self.pool.get(self.node(id).binding)
    }

    #[inline]
    pub fn binding(&self, id: BindingId) -> &Binding {
        self.pool.get(id)
    }

    pub fn pool(&self) -> &BindingPool {
        &self.pool
    }

    /// Follow `Recursive` delegates to the node that actually produces the
    /// value. Unpatched placeholders resolve to themselves.
    pub fn resolve(&self, mut id: NodeId) -> NodeId {
        while let Some(next) = self.node(id).delegate {
            id = next;
        }
        id
    }

    /// Placeholders whose real node was never built. Only possible when the
    /// enclosing resolution failed.
    pub fn unpatched_placeholders(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().filter_map(|(id, node)| {
            let recursive = matches!(
                self.pool.get(node.binding).variant,
                BindingVariant::Recursive { .. }
            );
            (recursive && node.delegate.is_none()).then_some(id)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
