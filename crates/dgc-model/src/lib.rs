//! Declaration model for the dgc dependency graph compiler.
//!
//! This is the input side of the resolver: a closed, immutable description of
//! every class, module, component and injection point taking part in one
//! compilation. Parsing source code into this model belongs to the host; the
//! model only fixes the shapes the binding and endpoint resolvers read.
//!
//! - [`TypeTable`] interns type references (`TypeId`), including the
//!   `Provider<T>` / `Lazy<T>` wrapper types
//! - [`QualifierTag`] / [`ScopeTag`] are opaque tag identities with canonical
//!   set forms ([`QualifierSet`], [`ScopeSet`])
//! - [`Declaration`] / [`DeclId`] cover constructors, functions, properties
//!   and parameters
//! - [`ClassDecl`] and [`ComponentDecl`] group declarations per type
//! - [`ModelBuilder`] assembles a [`DeclarationModel`]

pub mod builder;
pub mod decl;
pub mod model;
pub mod tags;
pub mod types;

pub use builder::ModelBuilder;
pub use decl::{
    ClassDecl, ClassKind, ComponentDecl, CreatorDecl, CreatorKind, DeclId, DeclKind, Declaration,
    Markers,
};
pub use model::DeclarationModel;
pub use tags::{QualifierSet, QualifierTag, ScopeSet, ScopeTag, TagSet};
pub use types::{TypeData, TypeId, TypeTable, WrapperKind};
