//! Endpoint resolvers: what a component consumes.
//!
//! The provision resolver turns no-argument accessors into [`Endpoint::Exposed`];
//! the injection resolver turns single-argument functions into
//! [`Endpoint::Injected`] with the injectable members of the argument's type.
//! Universal methods (`equals`, `hashCode`, `toString`) are never endpoints.

use dgc_model::{DeclId, DeclarationModel, Markers, TypeId};
use tracing::trace;

use crate::context::ResolverContext;
use crate::endpoint::{Endpoint, Injectable};
use crate::key::Key;

/// All endpoints of the component in `cx`, in declaration order: accessor
/// functions and injection functions first, then accessor properties.
pub fn resolve_endpoints(cx: &ResolverContext<'_>) -> Vec<Endpoint> {
    let model = cx.model;
    let Some(class) = model.class(cx.component.ty) else {
        return Vec::new();
    };

    let mut endpoints = Vec::new();
    for &function in &class.functions {
        if model.is_universal_method(function) {
            continue;
        }
        let endpoint =
            provision_endpoint(model, function).or_else(|| injection_endpoint(model, function));
        match endpoint {
            Some(endpoint) => endpoints.push(endpoint),
            None => trace!(function = %model.qualified_decl_name(function), "not an endpoint"),
        }
    }
    for &property in &class.properties {
        if let Some(key) = Key::of_decl(model, property) {
            endpoints.push(Endpoint::Exposed {
                accessor: property,
                key,
            });
        }
    }
    endpoints
}

/// Provision resolver: a no-argument function with a non-unit return type.
pub fn provision_endpoint(model: &DeclarationModel, function: DeclId) -> Option<Endpoint> {
    let decl = model.decl(function);
    if !decl.is_function() || !decl.params().is_empty() {
        return None;
    }
    let key = Key::of_decl(model, function)?;
    if model.types().is_unit(key.ty) {
        return None;
    }
    Some(Endpoint::Exposed {
        accessor: function,
        key,
    })
}

/// Injection resolver: a function taking exactly one parameter and returning
/// either unit or the parameter's own type.
pub fn injection_endpoint(model: &DeclarationModel, function: DeclId) -> Option<Endpoint> {
    let decl = model.decl(function);
    let &[param] = decl.params() else {
        return None;
    };
    let target = model.decl(param).value_type()?;
    let returns = decl.value_type()?;
    if !model.types().is_unit(returns) && returns != target {
        return None;
    }
    Some(Endpoint::Injected {
        entry: function,
        target,
        injectables: injectables_of(model, target),
    })
}

/// `INJECT` properties and single-parameter `INJECT` setters of `target`.
pub fn injectables_of(model: &DeclarationModel, target: TypeId) -> Vec<Injectable> {
    let Some(class) = model.class(target) else {
        return Vec::new();
    };
    let mut injectables = Vec::new();
    for &property in &class.properties {
        if !model.decl(property).has(Markers::INJECT) {
            continue;
        }
        if let Some(key) = Key::of_decl(model, property) {
            injectables.push(Injectable::Property {
                owner: target,
                accessor: property,
                key,
            });
        }
    }
    for &function in &class.functions {
        let decl = model.decl(function);
        if !decl.has(Markers::INJECT) || model.is_universal_method(function) {
            continue;
        }
        let &[parameter] = decl.params() else {
            continue;
        };
        if let Some(key) = Key::of_decl(model, parameter) {
            injectables.push(Injectable::Setter {
                owner: target,
                function,
                parameter,
                key,
            });
        }
    }
    injectables
}
