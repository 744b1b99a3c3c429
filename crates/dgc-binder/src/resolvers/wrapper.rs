//! `Provider<T>` / `Lazy<T>` resolver, invoked on demand.

use dgc_model::{DeclId, ScopeSet, WrapperKind};
use tracing::debug;

use crate::binding::{Binding, BindingVariant};
use crate::context::ResolverContext;
use crate::key::Key;

/// Synthesize a wrapper binding when `key` names `Provider<T>` or `Lazy<T>`.
///
/// The inner key keeps the outer qualifiers, so `@Named Provider<String>`
/// depends on `@Named String`. The binding is anchored at `requester`, which
/// also becomes the requester of the inner dependency.
pub fn resolve_wrapper_binding(
    cx: &ResolverContext<'_>,
    key: &Key,
    requester: DeclId,
) -> Option<Binding> {
    let model = cx.model;
    let (kind, inner_ty) = model.types().wrapper(key.ty)?;
    let inner = key.with_type(inner_ty);
    let variant = match kind {
        WrapperKind::Provider => BindingVariant::Provider { inner },
        WrapperKind::Lazy => BindingVariant::Lazy { inner },
    };
    debug!(key = %key.display(model), "synthesized wrapper binding");
    Some(Binding::new(
        model,
        key.clone(),
        ScopeSet::new(),
        variant,
        requester,
    ))
}
