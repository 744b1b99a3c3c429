//! Bindings: the ways a value for a [`Key`] can be produced.

use dgc_model::{DeclId, DeclKind, DeclarationModel, ScopeSet, TypeId};
use serde::Serialize;
use smallvec::SmallVec;

use crate::key::Key;

/// Handle into a [`crate::BindingPool`]. Binding identity is handle identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BindingId(pub u32);

/// The closed set of binding kinds.
///
/// Every consumer matches on this exhaustively; adding a kind must break
/// compilation at each consumer rather than silently fall through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingVariant {
    /// Invoke a type's single injectable constructor.
    Constructor { constructor: DeclId },
    /// Call a module-owned factory function without a receiver.
    ///
    /// `function` may also be a `PROVIDES` property of an object module or a
    /// static property of a class module; those are read without a receiver
    /// instead of called. See [`BindingVariant::reads_property`].
    StaticFunction { function: DeclId },
    /// Call a factory function on a caller-supplied instance of `owner`.
    InstanceFunction { owner: TypeId, function: DeclId },
    /// Read a property off a caller-supplied instance of `owner`.
    InstanceProperty { owner: TypeId, accessor: DeclId },
    /// A value handed to the component's creator.
    BoundInstance { param: DeclId },
    /// The component instance itself.
    Component { component: TypeId },
    /// The same value as the binding for `alias_of`.
    Equality { alias_of: Key },
    /// `Provider<T>` over the binding for `inner`; never evaluated eagerly.
    Provider { inner: Key },
    /// `Lazy<T>` over the binding for `inner`; evaluated once on first use.
    Lazy { inner: Key },
    /// Placeholder breaking a dependency cycle. The graph node created for it
    /// is patched to point at the node of `delegate` once that node exists.
    Recursive { delegate: BindingId },
}

/// Field-less discriminant of [`BindingVariant`], for reporting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    Constructor,
    StaticFunction,
    InstanceFunction,
    InstanceProperty,
    BoundInstance,
    Component,
    Equality,
    Provider,
    Lazy,
    Recursive,
}

impl BindingKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            BindingKind::Constructor => "constructor",
            BindingKind::StaticFunction => "static_function",
            BindingKind::InstanceFunction => "instance_function",
            BindingKind::InstanceProperty => "instance_property",
            BindingKind::BoundInstance => "bound_instance",
            BindingKind::Component => "component",
            BindingKind::Equality => "equality",
            BindingKind::Provider => "provider",
            BindingKind::Lazy => "lazy",
            BindingKind::Recursive => "recursive",
        }
    }
}

/// One dependency edge: the key needed and the declaration that needs it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub key: Key,
    pub requester: DeclId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub key: Key,
    pub scopes: ScopeSet,
    pub variant: BindingVariant,
    /// Declaration the binding was derived from (diagnostics anchor).
    pub origin: DeclId,
    /// Keys this binding needs, in call order.
    pub dependencies: SmallVec<[Dependency; 4]>,
}

impl BindingVariant {
    /// Whether producing the value reads a property rather than calling a
    /// function or constructor.
    pub fn reads_property(&self, model: &DeclarationModel) -> bool {
        match self {
            BindingVariant::InstanceProperty { .. } => true,
            BindingVariant::StaticFunction { function } => {
                matches!(model.decl(*function).kind, DeclKind::Property { .. })
            }
            _ => false,
        }
    }
}

impl Binding {
    /// Build a binding, deriving its dependency list from the variant.
    pub fn new(
        model: &DeclarationModel,
        key: Key,
        scopes: ScopeSet,
        variant: BindingVariant,
        origin: DeclId,
    ) -> Self {
        let dependencies = dependencies_of(model, &variant, origin);
        Self {
            key,
            scopes,
            variant,
            origin,
            dependencies,
        }
    }

    pub fn kind(&self) -> BindingKind {
        match self.variant {
            BindingVariant::Constructor { .. } => BindingKind::Constructor,
            BindingVariant::StaticFunction { .. } => BindingKind::StaticFunction,
            BindingVariant::InstanceFunction { .. } => BindingKind::InstanceFunction,
            BindingVariant::InstanceProperty { .. } => BindingKind::InstanceProperty,
            BindingVariant::BoundInstance { .. } => BindingKind::BoundInstance,
            BindingVariant::Component { .. } => BindingKind::Component,
            BindingVariant::Equality { .. } => BindingKind::Equality,
            BindingVariant::Provider { .. } => BindingKind::Provider,
            BindingVariant::Lazy { .. } => BindingKind::Lazy,
            BindingVariant::Recursive { .. } => BindingKind::Recursive,
        }
    }

    /// Scoped bindings get a memoizing provider in generated code.
    #[inline]
    pub fn is_scoped(&self) -> bool {
        !self.scopes.is_empty()
    }

    /// `Provider` and `Lazy` bindings must not invoke their inner binding
    /// when they themselves are produced.
    #[inline]
    pub fn defers_evaluation(&self) -> bool {
        matches!(
            self.variant,
            BindingVariant::Provider { .. } | BindingVariant::Lazy { .. }
        )
    }

    /// Short human-readable description used in diagnostics and graph dumps.
    pub fn describe(&self, model: &DeclarationModel) -> String {
        match &self.variant {
            BindingVariant::Constructor { constructor } => {
                let owner = model.decl(*constructor).owner.unwrap_or(self.key.ty);
                format!("{} constructor", model.type_name(owner))
            }
            BindingVariant::StaticFunction { function }
            | BindingVariant::InstanceFunction { function, .. } => {
                model.qualified_decl_name(*function)
            }
            BindingVariant::InstanceProperty { accessor, .. } => {
                model.qualified_decl_name(*accessor)
            }
            BindingVariant::BoundInstance { param } => {
                format!("bound instance '{}'", model.decl_name(*param))
            }
            BindingVariant::Component { component } => {
                format!("component {}", model.type_name(*component))
            }
            BindingVariant::Equality { alias_of } => format!(
                "{} (alias of {})",
                model.qualified_decl_name(self.origin),
                alias_of.display(model)
            ),
            BindingVariant::Provider { .. } | BindingVariant::Lazy { .. } => {
                self.key.display(model)
            }
            BindingVariant::Recursive { .. } => {
                format!("recursive reference to {}", self.key.display(model))
            }
        }
    }
}

fn parameter_dependencies(
    model: &DeclarationModel,
    decl: DeclId,
    out: &mut SmallVec<[Dependency; 4]>,
) {
    for &param in model.decl(decl).params() {
        if let Some(key) = Key::of_decl(model, param) {
            out.push(Dependency {
                key,
                requester: param,
            });
        }
    }
}

fn dependencies_of(
    model: &DeclarationModel,
    variant: &BindingVariant,
    origin: DeclId,
) -> SmallVec<[Dependency; 4]> {
    let mut deps = SmallVec::new();
    match variant {
        BindingVariant::Constructor { constructor } => {
            parameter_dependencies(model, *constructor, &mut deps);
        }
        BindingVariant::StaticFunction { function } => {
            parameter_dependencies(model, *function, &mut deps);
        }
        BindingVariant::InstanceFunction { owner, function } => {
            // The receiver comes first: it must exist before the call.
            deps.push(Dependency {
                key: Key::unqualified(*owner),
                requester: *function,
            });
            parameter_dependencies(model, *function, &mut deps);
        }
        BindingVariant::InstanceProperty { owner, accessor } => {
            deps.push(Dependency {
                key: Key::unqualified(*owner),
                requester: *accessor,
            });
        }
        BindingVariant::Equality { alias_of } => {
            let requester = model
                .decl(origin)
                .params()
                .first()
                .copied()
                .unwrap_or(origin);
            deps.push(Dependency {
                key: alias_of.clone(),
                requester,
            });
        }
        BindingVariant::Provider { inner } | BindingVariant::Lazy { inner } => {
            deps.push(Dependency {
                key: inner.clone(),
                requester: origin,
            });
        }
        BindingVariant::BoundInstance { .. }
        | BindingVariant::Component { .. }
        | BindingVariant::Recursive { .. } => {}
    }
    deps
}
