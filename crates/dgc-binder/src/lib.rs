//! Keys, bindings and endpoints, and the resolvers that mine them from the
//! declaration model.
//!
//! Eager binding resolvers ([`resolvers::resolve_eager_bindings`]) run once
//! per component and seed a [`BindingPool`]. The constructor-injection and
//! `Provider`/`Lazy` resolvers are invoked on demand by the graph builder
//! when a requested key has no binding yet. Endpoint resolvers
//! ([`endpoints::resolve_endpoints`]) list what the component consumes.

pub mod binding;
pub mod context;
pub mod endpoint;
pub mod endpoints;
pub mod errors;
pub mod key;
pub mod pool;
pub mod resolvers;

pub use binding::{Binding, BindingId, BindingKind, BindingVariant, Dependency};
pub use context::ResolverContext;
pub use endpoint::{Endpoint, Injectable, Request};
pub use errors::{ResolutionError, ResolutionErrorKind};
pub use key::Key;
pub use pool::BindingPool;
