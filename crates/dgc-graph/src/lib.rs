//! Graph builder: turns a component's bindings and endpoints into a shared
//! dependency graph, or into diagnostics explaining why it cannot.
//!
//! Use [`build_component`] for the full pipeline, or drive a
//! [`GraphBuilder`] directly with a hand-made binding list.

pub mod builder;
pub mod graph;
pub mod node;
pub mod recursion;
pub mod result;
pub mod summary;

pub use builder::{GraphBuilder, build_component};
pub use graph::DependencyGraph;
pub use node::{GraphNode, NodeId};
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use result::{BuildOutput, BuildStats, ResolveResult, Root};
pub use summary::{BindingSummary, EndpointSummary, GraphSummary, NodeSummary};
