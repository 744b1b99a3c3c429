//! Interned type references.
//!
//! A type reference is a name plus ordered type arguments. Structurally equal
//! references intern to the same [`TypeId`], so type identity throughout the
//! resolver is an integer comparison.

use dgc_common::interner::{Atom, Interner};
use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;

/// Handle to an interned type reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// The unit / void type. Always interned first.
    pub const UNIT: TypeId = TypeId(0);
    /// The top type whose universal methods are never endpoints or bindings.
    pub const ANY: TypeId = TypeId(1);
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeData {
    pub name: Atom,
    pub args: SmallVec<[TypeId; 2]>,
}

/// Which deferred-evaluation wrapper a type is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum WrapperKind {
    /// `Provider<T>`: every `get()` re-invokes the inner binding.
    Provider,
    /// `Lazy<T>`: the first `get()` result is cached.
    Lazy,
}

#[derive(Clone, Debug)]
pub struct TypeTable {
    data: Vec<TypeData>,
    map: FxHashMap<TypeData, TypeId>,
    provider: Atom,
    lazy: Atom,
}

impl TypeTable {
    pub fn new(interner: &mut Interner) -> Self {
        let unit = interner.intern("Unit");
        let any = interner.intern("Any");
        let mut table = TypeTable {
            data: Vec::with_capacity(64),
            map: FxHashMap::default(),
            provider: interner.intern("Provider"),
            lazy: interner.intern("Lazy"),
        };
        let unit_id = table.intern(unit, &[]);
        let any_id = table.intern(any, &[]);
        debug_assert_eq!(unit_id, TypeId::UNIT);
        debug_assert_eq!(any_id, TypeId::ANY);
        table
    }

    pub fn intern(&mut self, name: Atom, args: &[TypeId]) -> TypeId {
        let data = TypeData {
            name,
            args: SmallVec::from_slice(args),
        };
        if let Some(&id) = self.map.get(&data) {
            return id;
        }
        let id = TypeId(self.data.len() as u32);
        self.data.push(data.clone());
        self.map.insert(data, id);
        id
    }

    #[inline]
    pub fn named(&mut self, name: Atom) -> TypeId {
        self.intern(name, &[])
    }

    pub fn provider_of(&mut self, inner: TypeId) -> TypeId {
        let name = self.provider;
        self.intern(name, &[inner])
    }

    pub fn lazy_of(&mut self, inner: TypeId) -> TypeId {
        let name = self.lazy;
        self.intern(name, &[inner])
    }

    /// Look up an already-interned type without growing the table.
    pub fn find(&self, name: Atom, args: &[TypeId]) -> Option<TypeId> {
        let data = TypeData {
            name,
            args: SmallVec::from_slice(args),
        };
        self.map.get(&data).copied()
    }

    /// # Panics
    ///
    /// Panics on a `TypeId` that was not produced by this table.
    #[inline]
    pub fn get(&self, id: TypeId) -> &TypeData {
        &self.data[id.0 as usize]
    }

    /// Split `Provider<T>` / `Lazy<T>` into its wrapper kind and `T`.
    pub fn wrapper(&self, id: TypeId) -> Option<(WrapperKind, TypeId)> {
        let data = self.data.get(id.0 as usize)?;
        if data.args.len() != 1 {
            return None;
        }
        if data.name == self.provider {
            Some((WrapperKind::Provider, data.args[0]))
        } else if data.name == self.lazy {
            Some((WrapperKind::Lazy, data.args[0]))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_unit(&self, id: TypeId) -> bool {
        id == TypeId::UNIT
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Render a type reference as `Name<Arg, ...>`.
    pub fn display(&self, id: TypeId, interner: &Interner) -> String {
        let mut out = String::new();
        self.write_display(id, interner, &mut out);
        out
    }

    fn write_display(&self, id: TypeId, interner: &Interner, out: &mut String) {
        let Some(data) = self.data.get(id.0 as usize) else {
            out.push_str("<invalid>");
            return;
        };
        out.push_str(interner.resolve(data.name));
        if data.args.is_empty() {
            return;
        }
        out.push('<');
        for (i, &arg) in data.args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_display(arg, interner, out);
        }
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_and_any_are_reserved() {
        let mut interner = Interner::new();
        let table = TypeTable::new(&mut interner);
        assert_eq!(table.display(TypeId::UNIT, &interner), "Unit");
        assert_eq!(table.display(TypeId::ANY, &interner), "Any");
    }

    #[test]
    fn structurally_equal_types_share_an_id() {
        let mut interner = Interner::new();
        let mut table = TypeTable::new(&mut interner);
        let list = interner.intern("List");
        let string = interner.intern("String");
        let string_ty = table.named(string);
        let a = table.intern(list, &[string_ty]);
        let b = table.intern(list, &[string_ty]);
        assert_eq!(a, b);
        assert_eq!(table.display(a, &interner), "List<String>");
    }

    #[test]
    fn wrapper_detection_requires_single_argument() {
        let mut interner = Interner::new();
        let mut table = TypeTable::new(&mut interner);
        let foo = interner.intern("Foo");
        let foo_ty = table.named(foo);
        let provider = table.provider_of(foo_ty);
        let lazy = table.lazy_of(foo_ty);
        assert_eq!(table.wrapper(provider), Some((WrapperKind::Provider, foo_ty)));
        assert_eq!(table.wrapper(lazy), Some((WrapperKind::Lazy, foo_ty)));
        assert_eq!(table.wrapper(foo_ty), None);

        let provider_name = interner.intern("Provider");
        let bare_provider = table.named(provider_name);
        assert_eq!(table.wrapper(bare_provider), None);
    }
}
