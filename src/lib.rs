//! dgc: an ahead-of-time dependency graph compiler.
//!
//! Given a declaration model of classes, modules and components, dgc finds
//! every binding a component can use, lists what the component consumes,
//! and resolves each consumed key into a shared graph of provider nodes that
//! a code generator can render. All failures come back as diagnostics.
//!
//! The work is split across the workspace crates, re-exported here:
//!
//! - [`common`]: interning, spans, diagnostics, limits
//! - [`model`]: the declaration model and [`model::ModelBuilder`]
//! - [`binder`]: keys, bindings, endpoints and their resolvers
//! - [`graph`]: the graph builder and its output
//!
//! ```ignore
//! let model = dgc::cli::driver::load_model(&[path])?;
//! for component in model.components() {
//!     let output = dgc::graph::build_component(&model, component);
//!     if output.is_renderable() {
//!         // hand output.distinct_bindings() to the generator
//!     }
//! }
//! ```

pub use dgc_binder as binder;
pub use dgc_common as common;
pub use dgc_graph as graph;
pub use dgc_model as model;

pub use dgc_binder::{Binding, BindingVariant, Endpoint, Key, ResolutionError};
pub use dgc_graph::{BuildOutput, DependencyGraph, GraphBuilder, build_component};
pub use dgc_model::{DeclarationModel, ModelBuilder};

// Manifest loading, driver, reporter and argument parsing for the dgc binary
#[cfg(feature = "cli")]
pub mod cli;

// Tracing subscriber setup (DGC_LOG / DGC_LOG_FORMAT)
pub mod tracing_config;
