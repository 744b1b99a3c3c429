//! Identity of a requested value.

use dgc_model::{DeclId, DeclarationModel, QualifierSet, TypeId};
use serde::Serialize;

/// A type plus its qualifier set.
///
/// Two keys are equal iff they name the same interned type and carry the same
/// qualifier set. Qualifier sets are canonical, so declaration order of the
/// qualifiers never matters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Key {
    pub ty: TypeId,
    pub qualifiers: QualifierSet,
}

impl Key {
    #[inline]
    pub fn new(ty: TypeId, qualifiers: QualifierSet) -> Self {
        Self { ty, qualifiers }
    }

    #[inline]
    pub fn unqualified(ty: TypeId) -> Self {
        Self {
            ty,
            qualifiers: QualifierSet::new(),
        }
    }

    /// Key of the value a function returns or a property/parameter holds,
    /// qualified by the declaration's own qualifiers.
    pub fn of_decl(model: &DeclarationModel, decl: DeclId) -> Option<Key> {
        let d = model.decl(decl);
        d.value_type().map(|ty| Key::new(ty, d.qualifiers.clone()))
    }

    /// Same qualifiers, different type. Used to unwrap `Provider<T>` to `T`.
    #[inline]
    pub fn with_type(&self, ty: TypeId) -> Key {
        Key::new(ty, self.qualifiers.clone())
    }

    #[inline]
    pub fn is_qualified(&self) -> bool {
        !self.qualifiers.is_empty()
    }

    /// `@Named String` style rendering for diagnostics.
    pub fn display(&self, model: &DeclarationModel) -> String {
        let mut out = self.qualifiers.display_prefix(model.interner());
        out.push_str(&model.type_name(self.ty));
        out
    }
}
