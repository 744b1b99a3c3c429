//! Declarations, classes and components.

use bitflags::bitflags;
use dgc_common::{Atom, Span};
use serde::Serialize;

use crate::tags::{QualifierSet, ScopeSet};
use crate::types::TypeId;

/// Stable handle into the declaration arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclId(pub u32);

bitflags! {
    /// Annotation markers the host lowered onto a declaration.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Markers: u16 {
        /// Class is a module contributing provider functions.
        const MODULE = 1 << 0;
        /// Class is a component.
        const COMPONENT = 1 << 1;
        /// Function or property produces a binding.
        const PROVIDES = 1 << 2;
        /// Abstract function aliasing its single parameter to its return type.
        const BINDS = 1 << 3;
        /// Constructor, property or setter is an injection point.
        const INJECT = 1 << 4;
        /// Creator parameter supplies a value directly.
        const BINDS_INSTANCE = 1 << 5;
        /// Function is callable without a module instance.
        const STATIC = 1 << 6;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Class,
    Constructor { params: Vec<DeclId> },
    Function { params: Vec<DeclId>, return_type: TypeId },
    Property { ty: TypeId },
    Parameter { ty: TypeId },
}

#[derive(Clone, Debug)]
pub struct Declaration {
    pub name: Atom,
    pub kind: DeclKind,
    /// Type the declaration is a member of (`None` for top-level classes).
    pub owner: Option<TypeId>,
    pub markers: Markers,
    pub qualifiers: QualifierSet,
    pub scopes: ScopeSet,
    pub span: Span,
}

impl Declaration {
    pub fn new(name: Atom, kind: DeclKind, owner: Option<TypeId>) -> Self {
        Self {
            name,
            kind,
            owner,
            markers: Markers::empty(),
            qualifiers: QualifierSet::new(),
            scopes: ScopeSet::new(),
            span: Span::SYNTHETIC,
        }
    }

    /// Parameters of a constructor or function; empty for everything else.
    pub fn params(&self) -> &[DeclId] {
        match &self.kind {
            DeclKind::Constructor { params } | DeclKind::Function { params, .. } => params,
            _ => &[],
        }
    }

    /// The type this declaration yields: a function's return type, a
    /// property's or parameter's declared type.
    pub fn value_type(&self) -> Option<TypeId> {
        match self.kind {
            DeclKind::Function { return_type, .. } => Some(return_type),
            DeclKind::Property { ty } | DeclKind::Parameter { ty } => Some(ty),
            DeclKind::Class | DeclKind::Constructor { .. } => None,
        }
    }

    #[inline]
    pub fn has(&self, markers: Markers) -> bool {
        self.markers.contains(markers)
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        matches!(self.kind, DeclKind::Function { .. })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ClassKind {
    /// Regular class: instances are created and passed around.
    Class,
    /// Singleton object (including companion objects).
    Object,
    Abstract,
    Interface,
}

#[derive(Clone, Debug)]
pub struct ClassDecl {
    pub ty: TypeId,
    /// The class's own declaration (markers, scopes, span).
    pub decl: DeclId,
    pub kind: ClassKind,
    pub constructors: Vec<DeclId>,
    pub functions: Vec<DeclId>,
    pub properties: Vec<DeclId>,
    pub companion: Option<TypeId>,
    /// Modules included by this module.
    pub includes: Vec<TypeId>,
}

impl ClassDecl {
    /// A module of this kind must be supplied as a live instance for its
    /// non-static provider functions to be callable.
    #[inline]
    pub fn is_live_instance(&self) -> bool {
        self.kind == ClassKind::Class
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CreatorKind {
    Factory,
    Builder,
}

/// Factory or builder through which callers instantiate a component.
#[derive(Clone, Debug)]
pub struct CreatorDecl {
    pub kind: CreatorKind,
    pub decl: DeclId,
    /// Every parameter is a value supplied by the caller: module instances,
    /// dependency components and `BINDS_INSTANCE` values.
    pub params: Vec<DeclId>,
}

#[derive(Clone, Debug)]
pub struct ComponentDecl {
    pub ty: TypeId,
    pub decl: DeclId,
    pub modules: Vec<TypeId>,
    pub dependencies: Vec<TypeId>,
    pub scopes: ScopeSet,
    pub creator: Option<CreatorDecl>,
}
