//! Consumption points of a component.

use dgc_model::{DeclId, DeclarationModel, TypeId};

use crate::key::Key;

/// A field or setter of an injected type that must be populated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Injectable {
    Property {
        owner: TypeId,
        accessor: DeclId,
        key: Key,
    },
    Setter {
        owner: TypeId,
        function: DeclId,
        /// The setter's single parameter; it is what requests `key`.
        parameter: DeclId,
        key: Key,
    },
}

impl Injectable {
    #[inline]
    pub fn key(&self) -> &Key {
        match self {
            Injectable::Property { key, .. } | Injectable::Setter { key, .. } => key,
        }
    }

    #[inline]
    pub fn owner(&self) -> TypeId {
        match self {
            Injectable::Property { owner, .. } | Injectable::Setter { owner, .. } => *owner,
        }
    }

    /// The declaration that requests the injected value.
    #[inline]
    pub fn requester(&self) -> DeclId {
        match self {
            Injectable::Property { accessor, .. } => *accessor,
            Injectable::Setter { parameter, .. } => *parameter,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// No-argument accessor returning a fully constructed value.
    Exposed { accessor: DeclId, key: Key },
    /// Single-argument function populating the injectables of its argument.
    Injected {
        entry: DeclId,
        target: TypeId,
        injectables: Vec<Injectable>,
    },
}

/// A key an endpoint needs, together with the declaration needing it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Request {
    pub key: Key,
    pub requester: DeclId,
}

impl Endpoint {
    /// The component function this endpoint was derived from.
    #[inline]
    pub fn decl(&self) -> DeclId {
        match self {
            Endpoint::Exposed { accessor, .. } => *accessor,
            Endpoint::Injected { entry, .. } => *entry,
        }
    }

    /// Every key this endpoint needs, one per graph root.
    pub fn requests(&self) -> Vec<Request> {
        match self {
            Endpoint::Exposed { accessor, key } => vec![Request {
                key: key.clone(),
                requester: *accessor,
            }],
            Endpoint::Injected { injectables, .. } => injectables
                .iter()
                .map(|inj| Request {
                    key: inj.key().clone(),
                    requester: inj.requester(),
                })
                .collect(),
        }
    }

    #[inline]
    pub fn is_exposed(&self) -> bool {
        matches!(self, Endpoint::Exposed { .. })
    }

    pub fn describe(&self, model: &DeclarationModel) -> String {
        match self {
            Endpoint::Exposed { accessor, key } => {
                format!("{}(): {}", model.decl_name(*accessor), key.display(model))
            }
            Endpoint::Injected { entry, target, .. } => {
                format!("{}({})", model.decl_name(*entry), model.type_name(*target))
            }
        }
    }
}
