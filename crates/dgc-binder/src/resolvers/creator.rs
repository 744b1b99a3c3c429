//! Creator-instance resolver and the component's own binding.

use dgc_model::{DeclId, ScopeSet};

use crate::binding::{Binding, BindingVariant};
use crate::context::ResolverContext;
use crate::key::Key;
use crate::resolvers::modules::reachable_modules;

/// `BoundInstance` bindings for values the caller supplies when creating the
/// component.
///
/// With a declared creator these are exactly its parameters. Without one the
/// component is created from its dependency components and live modules, so
/// each of those becomes a bound instance anchored at its class declaration.
pub fn resolve_creator_bindings(cx: &ResolverContext<'_>) -> Vec<Binding> {
    let model = cx.model;
    match &cx.component.creator {
        Some(creator) => creator
            .params
            .iter()
            .filter_map(|&param| {
                let key = Key::of_decl(model, param)?;
                Some(bound_instance(cx, key, param))
            })
            .collect(),
        None => {
            let mut bindings = Vec::new();
            for &dependency in &cx.component.dependencies {
                let origin = model
                    .class(dependency)
                    .map_or(cx.component.decl, |class| class.decl);
                bindings.push(bound_instance(cx, Key::unqualified(dependency), origin));
            }
            for module in reachable_modules(cx) {
                if let Some(class) = model.class(module)
                    && class.is_live_instance()
                {
                    bindings.push(bound_instance(cx, Key::unqualified(module), class.decl));
                }
            }
            bindings
        }
    }
}

fn bound_instance(cx: &ResolverContext<'_>, key: Key, param: DeclId) -> Binding {
    Binding::new(
        cx.model,
        key,
        ScopeSet::new(),
        BindingVariant::BoundInstance { param },
        param,
    )
}

/// `Component(self)`: the component can always inject itself.
pub fn component_binding(cx: &ResolverContext<'_>) -> Binding {
    let component = cx.component.ty;
    Binding::new(
        cx.model,
        Key::unqualified(component),
        ScopeSet::new(),
        BindingVariant::Component { component },
        cx.component.decl,
    )
}
