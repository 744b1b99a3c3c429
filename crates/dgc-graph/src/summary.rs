//! Serializable view of a [`BuildOutput`], for tooling and `--json` output.

use dgc_binder::{BindingId, BindingKind};
use dgc_model::DeclarationModel;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::node::NodeId;
use crate::result::{BuildOutput, BuildStats};

#[derive(Clone, Debug, Serialize)]
pub struct GraphSummary {
    pub component: String,
    pub renderable: bool,
    pub stats: BuildStats,
    pub endpoints: Vec<EndpointSummary>,
    /// Providers to generate, dependencies first.
    pub bindings: Vec<BindingSummary>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EndpointSummary {
    pub endpoint: String,
    pub exposed: bool,
    pub roots: Vec<NodeSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<String>,
}

/// One node of a resolved tree. A node already expanded earlier in the
/// summary is emitted again with `repeated` set and no children, which keeps
/// the output linear in the graph size.
#[derive(Clone, Debug, Serialize)]
pub struct NodeSummary {
    pub node: NodeId,
    pub key: String,
    pub kind: BindingKind,
    pub binding: String,
    pub scoped: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub repeated: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<NodeSummary>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BindingSummary {
    pub id: BindingId,
    pub key: String,
    pub kind: BindingKind,
    pub binding: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scopes: String,
}

impl GraphSummary {
    pub fn new(output: &BuildOutput, model: &DeclarationModel) -> Self {
        let mut expanded = FxHashSet::default();
        let endpoints = output
            .results
            .iter()
            .map(|result| EndpointSummary {
                endpoint: result.endpoint.describe(model),
                exposed: result.endpoint.is_exposed(),
                roots: result
                    .roots
                    .iter()
                    .map(|root| summarize_node(output, model, root.node, &mut expanded))
                    .collect(),
                unresolved: result
                    .unresolved
                    .iter()
                    .map(|request| request.key.display(model))
                    .collect(),
            })
            .collect();

        let bindings = output
            .distinct_bindings()
            .into_iter()
            .map(|id| {
                let binding = output.graph.binding(id);
                BindingSummary {
                    id,
                    key: binding.key.display(model),
                    kind: binding.kind(),
                    binding: binding.describe(model),
                    scopes: if binding.is_scoped() {
                        binding.scopes.display(model.interner())
                    } else {
                        String::new()
                    },
                }
            })
            .collect();

        Self {
            component: model.type_name(output.component),
            renderable: output.is_renderable(),
            stats: output.stats,
            endpoints,
            bindings,
        }
    }
}

fn summarize_node(
    output: &BuildOutput,
    model: &DeclarationModel,
    id: NodeId,
    expanded: &mut FxHashSet<NodeId>,
) -> NodeSummary {
    let node = output.graph.node(id);
    let binding = output.graph.binding(node.binding);
    let repeated = !expanded.insert(id);
    let dependencies = if repeated {
        Vec::new()
    } else {
        node.dependencies
            .iter()
            .map(|&child| summarize_node(output, model, child, expanded))
            .collect()
    };
    NodeSummary {
        node: id,
        key: binding.key.display(model),
        kind: binding.kind(),
        binding: binding.describe(model),
        scoped: binding.is_scoped(),
        repeated,
        dependencies,
    }
}
