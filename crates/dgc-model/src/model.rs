//! The assembled, read-only declaration model.

use dgc_common::{Atom, Interner, Span};
use indexmap::IndexMap;

use crate::decl::{ClassDecl, ComponentDecl, DeclId, Declaration};
use crate::types::{TypeId, TypeTable};

/// Everything the resolvers may look at for one compilation.
///
/// Built once by [`crate::ModelBuilder`] and never mutated afterwards, so a
/// shared reference can be handed to several component builds at once.
#[derive(Clone, Debug)]
pub struct DeclarationModel {
    pub(crate) interner: Interner,
    pub(crate) types: TypeTable,
    pub(crate) decls: Vec<Declaration>,
    pub(crate) classes: IndexMap<TypeId, ClassDecl>,
    pub(crate) components: Vec<ComponentDecl>,
    pub(crate) universal_methods: [Atom; 3],
}

impl DeclarationModel {
    #[inline]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    #[inline]
    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// # Panics
    ///
    /// Panics on a `DeclId` that does not belong to this model.
    #[inline]
    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.0 as usize]
    }

    #[inline]
    pub fn class(&self, ty: TypeId) -> Option<&ClassDecl> {
        self.classes.get(&ty)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.classes.values()
    }

    pub fn components(&self) -> &[ComponentDecl] {
        &self.components
    }

    pub fn component(&self, ty: TypeId) -> Option<&ComponentDecl> {
        self.components.iter().find(|c| c.ty == ty)
    }

    #[inline]
    pub fn name(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }

    pub fn decl_name(&self, id: DeclId) -> &str {
        self.name(self.decl(id).name)
    }

    /// `Owner.member` for members, the bare name otherwise.
    pub fn qualified_decl_name(&self, id: DeclId) -> String {
        let decl = self.decl(id);
        match decl.owner {
            Some(owner) => format!("{}.{}", self.type_name(owner), self.name(decl.name)),
            None => self.name(decl.name).to_string(),
        }
    }

    pub fn type_name(&self, ty: TypeId) -> String {
        self.types.display(ty, &self.interner)
    }

    /// The file a span points into; empty for synthetic spans.
    pub fn file_name(&self, span: Span) -> &str {
        self.interner.resolve(span.file)
    }

    /// `equals` / `hashCode` / `toString`: inherited from the top type and
    /// never treated as endpoints or dependency provisions.
    pub fn is_universal_method(&self, id: DeclId) -> bool {
        let decl = self.decl(id);
        decl.is_function() && self.universal_methods.contains(&decl.name)
    }
}
