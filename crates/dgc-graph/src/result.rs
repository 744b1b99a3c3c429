//! What a builder run hands to the code generator.

use dgc_binder::{BindingId, Endpoint, Request, ResolutionError};
use dgc_common::Diagnostic;
use dgc_model::{DeclarationModel, TypeId};
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::graph::DependencyGraph;
use crate::node::NodeId;

/// A request of an endpoint that resolved, and the node answering it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Root {
    pub request: Request,
    pub node: NodeId,
}

/// Resolution of one endpoint: one root per request that resolved. Failed
/// requests are listed in `unresolved`; their errors are in
/// [`BuildOutput::errors`].
#[derive(Clone, Debug)]
pub struct ResolveResult {
    pub endpoint: Endpoint,
    pub roots: Vec<Root>,
    pub unresolved: Vec<Request>,
}

impl ResolveResult {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Counters from one run, for logs and `--json` output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub bindings: usize,
    pub nodes: usize,
    pub iterations: u32,
    pub max_depth: u32,
}

#[derive(Debug)]
pub struct BuildOutput {
    pub component: TypeId,
    pub results: Vec<ResolveResult>,
    pub graph: DependencyGraph,
    /// Structural findings of the eager resolvers followed by node failures,
    /// in the order they were found.
    pub errors: Vec<ResolutionError>,
    pub stats: BuildStats,
}

impl BuildOutput {
    /// Whether code generation may run on this output: no error-category
    /// diagnostics and every cycle placeholder patched. Warnings are fine.
    pub fn is_renderable(&self) -> bool {
        !self.errors.iter().any(ResolutionError::is_error)
            && self.graph.unpatched_placeholders().next().is_none()
    }

    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(ResolutionError::is_error)
    }

    /// Every binding reachable from any root, exactly once, dependencies
    /// before dependents. `Recursive` placeholders are replaced by the
    /// binding they delegate to. This is the set of providers to generate.
    pub fn distinct_bindings(&self) -> Vec<BindingId> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        for result in &self.results {
            for root in &result.roots {
                self.collect(root.node, &mut seen, &mut order);
            }
        }
        order
    }

    fn collect(&self, node: NodeId, seen: &mut FxHashSet<BindingId>, order: &mut Vec<BindingId>) {
        let node = self.graph.node(self.graph.resolve(node));
        if !seen.insert(node.binding) {
            return;
        }
        for &child in &node.dependencies {
            self.collect(child, seen, order);
        }
        order.push(node.binding);
    }

    pub fn diagnostics(&self, model: &DeclarationModel) -> Vec<Diagnostic> {
        self.errors.iter().map(|e| e.to_diagnostic(model)).collect()
    }
}
