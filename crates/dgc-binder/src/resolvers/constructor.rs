//! Constructor-injection resolver, invoked on demand.

use dgc_model::{DeclId, Markers};
use smallvec::SmallVec;
use tracing::debug;

use crate::binding::{Binding, BindingVariant};
use crate::context::ResolverContext;
use crate::errors::ResolutionErrorKind;
use crate::key::Key;

/// Synthesize a `Constructor` binding for `key` when its type has exactly one
/// constructor marked `INJECT`.
///
/// Returns `Ok(None)` for qualified keys, undeclared types and types without
/// an injectable constructor. More than one injectable constructor is an
/// error rather than an arbitrary pick.
pub fn resolve_constructor_binding(
    cx: &ResolverContext<'_>,
    key: &Key,
) -> Result<Option<Binding>, ResolutionErrorKind> {
    if key.is_qualified() {
        return Ok(None);
    }
    let model = cx.model;
    let Some(class) = model.class(key.ty) else {
        return Ok(None);
    };

    let injectable: SmallVec<[DeclId; 2]> = class
        .constructors
        .iter()
        .copied()
        .filter(|&ctor| model.decl(ctor).has(Markers::INJECT))
        .collect();

    match injectable.as_slice() {
        [] => Ok(None),
        &[constructor] => {
            debug!(ty = %model.type_name(key.ty), "synthesized constructor binding");
            let scopes = model.decl(class.decl).scopes.clone();
            Ok(Some(Binding::new(
                model,
                key.clone(),
                scopes,
                BindingVariant::Constructor { constructor },
                constructor,
            )))
        }
        _ => Err(ResolutionErrorKind::MultipleInjectableConstructors {
            ty: key.ty,
            constructors: injectable.to_vec(),
        }),
    }
}
