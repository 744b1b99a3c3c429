//! Module resolver: provider functions of declared modules.

use dgc_common::limits::MAX_MODULE_INCLUDE_DEPTH;
use dgc_model::{DeclId, Markers, ScopeSet, TypeId};
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::binding::{Binding, BindingVariant};
use crate::context::ResolverContext;
use crate::errors::{ResolutionError, ResolutionErrorKind};
use crate::key::Key;

/// Every module reachable from the component, declared modules first, then
/// their includes depth-first. Each module appears once even when includes
/// form a cycle.
pub fn reachable_modules(cx: &ResolverContext<'_>) -> Vec<TypeId> {
    let mut seen = FxHashSet::default();
    let mut order = Vec::new();
    for &module in &cx.component.modules {
        visit_module(cx, module, 0, &mut seen, &mut order);
    }
    order
}

fn visit_module(
    cx: &ResolverContext<'_>,
    module: TypeId,
    depth: u32,
    seen: &mut FxHashSet<TypeId>,
    order: &mut Vec<TypeId>,
) {
    if depth > MAX_MODULE_INCLUDE_DEPTH {
        trace!(module = %cx.model.type_name(module), "module include chain too deep");
        return;
    }
    if !seen.insert(module) {
        return;
    }
    order.push(module);
    if let Some(class) = cx.model.class(module) {
        for &child in &class.includes {
            visit_module(cx, child, depth + 1, seen, order);
        }
    }
}

/// Bindings contributed by every reachable module and its companion.
pub fn resolve_module_bindings(
    cx: &ResolverContext<'_>,
    sink: &mut Vec<ResolutionError>,
) -> Vec<Binding> {
    let model = cx.model;
    let mut bindings = Vec::new();

    for module in reachable_modules(cx) {
        let Some(class) = model.class(module) else {
            sink.push(ResolutionError::new(
                ResolutionErrorKind::MissingModuleMarker { module },
                cx.component.decl,
            ));
            continue;
        };
        if !model.decl(class.decl).has(Markers::MODULE) {
            sink.push(ResolutionError::new(
                ResolutionErrorKind::MissingModuleMarker { module },
                class.decl,
            ));
        }

        let live = class.is_live_instance();
        for &function in &class.functions {
            if let Some(binding) = function_binding(cx, module, function, live, sink) {
                bindings.push(binding);
            }
        }
        for &property in &class.properties {
            if let Some(binding) = property_binding(cx, module, property, live) {
                bindings.push(binding);
            }
        }
        // Companion members never need a module instance.
        if let Some(companion) = class.companion.and_then(|c| model.class(c)) {
            for &function in &companion.functions {
                if let Some(binding) = function_binding(cx, companion.ty, function, false, sink) {
                    bindings.push(binding);
                }
            }
        }
    }
    bindings
}

fn function_binding(
    cx: &ResolverContext<'_>,
    module: TypeId,
    function: DeclId,
    live: bool,
    sink: &mut Vec<ResolutionError>,
) -> Option<Binding> {
    let model = cx.model;
    let decl = model.decl(function);

    if decl.has(Markers::BINDS) {
        let params = decl.params();
        if params.len() != 1 {
            sink.push(ResolutionError::new(
                ResolutionErrorKind::InvalidBindsFunction {
                    function,
                    params: params.len(),
                },
                function,
            ));
            return None;
        }
        let alias_of = Key::of_decl(model, params[0])?;
        let key = Key::of_decl(model, function)?;
        trace!(binding = %model.qualified_decl_name(function), "binds alias");
        return Some(Binding::new(
            model,
            key,
            decl.scopes.clone(),
            BindingVariant::Equality { alias_of },
            function,
        ));
    }

    if !decl.has(Markers::PROVIDES) {
        return None;
    }
    let key = Key::of_decl(model, function)?;
    if model.types().is_unit(key.ty) {
        sink.push(ResolutionError::new(
            ResolutionErrorKind::UnitProvision { function },
            function,
        ));
        return None;
    }

    let variant = if live && !decl.has(Markers::STATIC) {
        BindingVariant::InstanceFunction {
            owner: module,
            function,
        }
    } else {
        BindingVariant::StaticFunction { function }
    };
    Some(Binding::new(
        model,
        key,
        decl.scopes.clone(),
        variant,
        function,
    ))
}

fn property_binding(
    cx: &ResolverContext<'_>,
    module: TypeId,
    property: DeclId,
    live: bool,
) -> Option<Binding> {
    let model = cx.model;
    let decl = model.decl(property);
    if !decl.has(Markers::PROVIDES) {
        return None;
    }
    let key = Key::of_decl(model, property)?;
    // A property on an object is read like a static getter.
    let variant = if live && !decl.has(Markers::STATIC) {
        BindingVariant::InstanceProperty {
            owner: module,
            accessor: property,
        }
    } else {
        BindingVariant::StaticFunction { function: property }
    };
    let scopes: ScopeSet = decl.scopes.clone();
    Some(Binding::new(model, key, scopes, variant, property))
}
