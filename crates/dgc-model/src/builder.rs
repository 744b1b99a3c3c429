//! Incremental construction of a [`DeclarationModel`].
//!
//! The host (or the manifest loader) lowers its declarations through this
//! builder. Every `add_*` call returns the new handle so later calls can
//! attach markers, tags and spans to it.

use dgc_common::{Atom, Interner, Span};
use indexmap::IndexMap;

use crate::decl::{
    ClassDecl, ClassKind, ComponentDecl, CreatorDecl, CreatorKind, DeclId, DeclKind, Declaration,
    Markers,
};
use crate::model::DeclarationModel;
use crate::tags::{QualifierTag, ScopeTag};
use crate::types::{TypeId, TypeTable};

pub struct ModelBuilder {
    interner: Interner,
    types: TypeTable,
    decls: Vec<Declaration>,
    classes: IndexMap<TypeId, ClassDecl>,
    components: Vec<ComponentDecl>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        let mut interner = Interner::with_common();
        let types = TypeTable::new(&mut interner);
        Self {
            interner,
            types,
            decls: Vec::new(),
            classes: IndexMap::new(),
            components: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Names, types and tags
    // -----------------------------------------------------------------------

    pub fn atom(&mut self, s: &str) -> Atom {
        self.interner.intern(s)
    }

    pub fn ty(&mut self, name: &str) -> TypeId {
        let atom = self.interner.intern(name);
        self.types.named(atom)
    }

    pub fn generic(&mut self, name: &str, args: &[TypeId]) -> TypeId {
        let atom = self.interner.intern(name);
        self.types.intern(atom, args)
    }

    pub fn provider_of(&mut self, inner: TypeId) -> TypeId {
        self.types.provider_of(inner)
    }

    pub fn lazy_of(&mut self, inner: TypeId) -> TypeId {
        self.types.lazy_of(inner)
    }

    pub fn qualifier(&mut self, name: &str) -> QualifierTag {
        QualifierTag(self.interner.intern(name))
    }

    pub fn scope(&mut self, name: &str) -> ScopeTag {
        ScopeTag(self.interner.intern(name))
    }

    // -----------------------------------------------------------------------
    // Declarations
    // -----------------------------------------------------------------------

    fn push_decl(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    /// Declare a class for `ty`. Declaring the same type twice returns the
    /// existing class declaration and updates its kind.
    pub fn add_class(&mut self, ty: TypeId, kind: ClassKind) -> DeclId {
        if let Some(class) = self.classes.get_mut(&ty) {
            class.kind = kind;
            return class.decl;
        }
        let name = self.types.get(ty).name;
        let decl = self.push_decl(Declaration::new(name, DeclKind::Class, None));
        self.classes.insert(
            ty,
            ClassDecl {
                ty,
                decl,
                kind,
                constructors: Vec::new(),
                functions: Vec::new(),
                properties: Vec::new(),
                companion: None,
                includes: Vec::new(),
            },
        );
        decl
    }

    fn ensure_class(&mut self, ty: TypeId) -> &mut ClassDecl {
        if !self.classes.contains_key(&ty) {
            self.add_class(ty, ClassKind::Class);
        }
        &mut self.classes[&ty]
    }

    fn add_params(&mut self, owner: TypeId, params: &[(&str, TypeId)]) -> Vec<DeclId> {
        params
            .iter()
            .map(|&(name, ty)| {
                let name = self.interner.intern(name);
                self.push_decl(Declaration::new(
                    name,
                    DeclKind::Parameter { ty },
                    Some(owner),
                ))
            })
            .collect()
    }

    pub fn add_constructor(&mut self, owner: TypeId, params: &[(&str, TypeId)]) -> DeclId {
        let params = self.add_params(owner, params);
        let name = self.types.get(owner).name;
        let id = self.push_decl(Declaration::new(
            name,
            DeclKind::Constructor { params },
            Some(owner),
        ));
        self.ensure_class(owner).constructors.push(id);
        id
    }

    pub fn add_function(
        &mut self,
        owner: TypeId,
        name: &str,
        params: &[(&str, TypeId)],
        return_type: TypeId,
    ) -> DeclId {
        let params = self.add_params(owner, params);
        let name = self.interner.intern(name);
        let id = self.push_decl(Declaration::new(
            name,
            DeclKind::Function {
                params,
                return_type,
            },
            Some(owner),
        ));
        self.ensure_class(owner).functions.push(id);
        id
    }

    pub fn add_property(&mut self, owner: TypeId, name: &str, ty: TypeId) -> DeclId {
        let name = self.interner.intern(name);
        let id = self.push_decl(Declaration::new(
            name,
            DeclKind::Property { ty },
            Some(owner),
        ));
        self.ensure_class(owner).properties.push(id);
        id
    }

    // -----------------------------------------------------------------------
    // Declaration attributes
    // -----------------------------------------------------------------------

    pub fn mark(&mut self, decl: DeclId, markers: Markers) -> &mut Self {
        self.decls[decl.0 as usize].markers |= markers;
        self
    }

    pub fn qualify(&mut self, decl: DeclId, qualifier: QualifierTag) -> &mut Self {
        self.decls[decl.0 as usize].qualifiers.insert(qualifier);
        self
    }

    pub fn scope_decl(&mut self, decl: DeclId, scope: ScopeTag) -> &mut Self {
        self.decls[decl.0 as usize].scopes.insert(scope);
        self
    }

    pub fn set_span(&mut self, decl: DeclId, span: Span) -> &mut Self {
        self.decls[decl.0 as usize].span = span;
        self
    }

    /// The `index`-th parameter of a constructor or function.
    ///
    /// # Panics
    ///
    /// Panics if the declaration has no such parameter.
    pub fn param(&self, decl: DeclId, index: usize) -> DeclId {
        self.decls[decl.0 as usize].params()[index]
    }

    pub fn decl_span(&self, decl: DeclId) -> Span {
        self.decls[decl.0 as usize].span
    }

    pub fn class_decl(&self, ty: TypeId) -> Option<DeclId> {
        self.classes.get(&ty).map(|c| c.decl)
    }

    // -----------------------------------------------------------------------
    // Modules and components
    // -----------------------------------------------------------------------

    pub fn set_companion(&mut self, owner: TypeId, companion: TypeId) {
        if !self.classes.contains_key(&companion) {
            self.add_class(companion, ClassKind::Object);
        }
        self.ensure_class(owner).companion = Some(companion);
    }

    pub fn include(&mut self, module: TypeId, child: TypeId) {
        self.ensure_class(module).includes.push(child);
    }

    /// Declare `ty` as a component. The component's class is created as an
    /// interface when it was not declared before; its scopes become the
    /// component's declared scopes.
    pub fn add_component(
        &mut self,
        ty: TypeId,
        modules: &[TypeId],
        dependencies: &[TypeId],
    ) -> DeclId {
        let decl = match self.classes.get(&ty) {
            Some(class) => class.decl,
            None => self.add_class(ty, ClassKind::Interface),
        };
        self.mark(decl, Markers::COMPONENT);
        if let Some(existing) = self.components.iter_mut().find(|c| c.ty == ty) {
            existing.modules = modules.to_vec();
            existing.dependencies = dependencies.to_vec();
            return decl;
        }
        self.components.push(ComponentDecl {
            ty,
            decl,
            modules: modules.to_vec(),
            dependencies: dependencies.to_vec(),
            scopes: Default::default(),
            creator: None,
        });
        decl
    }

    /// Attach a creator to a component. A component not declared yet is
    /// declared with no modules and no dependencies.
    pub fn set_creator(
        &mut self,
        component: TypeId,
        kind: CreatorKind,
        params: &[(&str, TypeId)],
    ) -> DeclId {
        let params = self.add_params(component, params);
        let name = self.interner.intern(match kind {
            CreatorKind::Factory => "Factory",
            CreatorKind::Builder => "Builder",
        });
        let decl = self.push_decl(Declaration::new(
            name,
            DeclKind::Function {
                params: params.clone(),
                return_type: component,
            },
            Some(component),
        ));
        if !self.components.iter().any(|c| c.ty == component) {
            self.add_component(component, &[], &[]);
        }
        if let Some(slot) = self.components.iter_mut().find(|c| c.ty == component) {
            slot.creator = Some(CreatorDecl { kind, decl, params });
        }
        decl
    }

    pub fn finish(mut self) -> DeclarationModel {
        // Component scopes are the scopes declared on the component class.
        for component in &mut self.components {
            component.scopes = self.decls[component.decl.0 as usize].scopes.clone();
        }
        let universal_methods = [
            self.interner.intern("equals"),
            self.interner.intern("hashCode"),
            self.interner.intern("toString"),
        ];
        DeclarationModel {
            interner: self.interner,
            types: self.types,
            decls: self.decls,
            classes: self.classes,
            components: self.components,
            universal_methods,
        }
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}
