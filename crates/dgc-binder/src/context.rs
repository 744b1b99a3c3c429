use dgc_model::{ComponentDecl, DeclarationModel, ScopeSet};

/// The declarations visible while resolving one component.
#[derive(Clone, Copy, Debug)]
pub struct ResolverContext<'a> {
    pub model: &'a DeclarationModel,
    pub component: &'a ComponentDecl,
}

impl<'a> ResolverContext<'a> {
    pub fn new(model: &'a DeclarationModel, component: &'a ComponentDecl) -> Self {
        Self { model, component }
    }

    #[inline]
    pub fn component_scopes(&self) -> &'a ScopeSet {
        &self.component.scopes
    }

    pub fn component_name(&self) -> String {
        self.model.type_name(self.component.ty)
    }
}
