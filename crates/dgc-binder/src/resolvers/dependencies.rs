//! Dependency-component resolver.
//!
//! A dependency component is handed to this component as a live instance;
//! each of its no-argument accessors and properties becomes a binding read
//! off that instance.

use dgc_model::ScopeSet;
use tracing::trace;

use crate::binding::{Binding, BindingVariant};
use crate::context::ResolverContext;
use crate::key::Key;

pub fn resolve_dependency_bindings(cx: &ResolverContext<'_>) -> Vec<Binding> {
    let model = cx.model;
    let mut bindings = Vec::new();

    for &dependency in &cx.component.dependencies {
        let Some(class) = model.class(dependency) else {
            trace!(dependency = %model.type_name(dependency), "dependency has no declaration");
            continue;
        };

        for &function in &class.functions {
            let decl = model.decl(function);
            if !decl.params().is_empty() || model.is_universal_method(function) {
                continue;
            }
            let Some(key) = Key::of_decl(model, function) else {
                continue;
            };
            if model.types().is_unit(key.ty) {
                continue;
            }
            bindings.push(Binding::new(
                model,
                key,
                ScopeSet::new(),
                BindingVariant::InstanceFunction {
                    owner: dependency,
                    function,
                },
                function,
            ));
        }

        for &property in &class.properties {
            let Some(key) = Key::of_decl(model, property) else {
                continue;
            };
            bindings.push(Binding::new(
                model,
                key,
                ScopeSet::new(),
                BindingVariant::InstanceProperty {
                    owner: dependency,
                    accessor: property,
                },
                property,
            ));
        }
    }
    bindings
}
