//! Binding resolvers.
//!
//! Each resolver reads one slice of the declaration model and returns the
//! bindings it implies. They do not depend on each other's output, so their
//! order only affects the order of candidates in ambiguity reports.
//!
//! | Resolver | When | Produces |
//! |----------|------|----------|
//! | [`modules`] | eager | `StaticFunction`, `InstanceFunction`, `InstanceProperty`, `Equality` |
//! | [`dependencies`] | eager | `InstanceFunction`, `InstanceProperty` |
//! | [`creator`] | eager | `BoundInstance`, `Component` |
//! | [`constructor`] | on demand | `Constructor` |
//! | [`wrapper`] | on demand | `Provider`, `Lazy` |

pub mod constructor;
pub mod creator;
pub mod dependencies;
pub mod modules;
pub mod wrapper;

use tracing::debug;

use crate::binding::Binding;
use crate::context::ResolverContext;
use crate::errors::ResolutionError;

pub use constructor::resolve_constructor_binding;
pub use creator::{component_binding, resolve_creator_bindings};
pub use dependencies::resolve_dependency_bindings;
pub use modules::{reachable_modules, resolve_module_bindings};
pub use wrapper::resolve_wrapper_binding;

/// Run every eager resolver for the component in `cx`.
///
/// Structural problems found along the way (missing module markers, unit
/// provisions, malformed binds functions) are pushed to `sink`; resolution
/// continues past them.
pub fn resolve_eager_bindings(
    cx: &ResolverContext<'_>,
    sink: &mut Vec<ResolutionError>,
) -> Vec<Binding> {
    let mut bindings = resolve_module_bindings(cx, sink);
    let module_count = bindings.len();
    bindings.extend(resolve_dependency_bindings(cx));
    let dependency_count = bindings.len() - module_count;
    bindings.extend(resolve_creator_bindings(cx));
    bindings.push(component_binding(cx));

    debug!(
        component = %cx.component_name(),
        modules = module_count,
        dependencies = dependency_count,
        total = bindings.len(),
        "resolved eager bindings"
    );
    bindings
}
