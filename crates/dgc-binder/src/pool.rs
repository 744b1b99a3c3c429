//! The bindings arena owned by one graph build.
//!
//! Seeded with every eagerly resolved binding and grown as the on-demand
//! resolvers synthesize constructor and wrapper bindings. A pool is never
//! shared between components, which is what lets separate components be
//! built in parallel.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::binding::{Binding, BindingId, BindingVariant};
use crate::key::Key;

#[derive(Clone, Debug, Default)]
pub struct BindingPool {
    bindings: Vec<Binding>,
    by_key: FxHashMap<Key, SmallVec<[BindingId; 2]>>,
}

impl BindingPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: impl IntoIterator<Item = Binding>) -> Self {
        let mut pool = Self::new();
        for binding in bindings {
            pool.add(binding);
        }
        pool
    }

    /// Add a binding and make it a lookup candidate for its key.
    pub fn add(&mut self, binding: Binding) -> BindingId {
        let id = BindingId(self.bindings.len() as u32);
        self.by_key.entry(binding.key.clone()).or_default().push(id);
        self.bindings.push(binding);
        id
    }

    /// Add a cycle placeholder. Placeholders are never lookup candidates:
    /// indexing them would make every cyclic key ambiguous.
    pub fn add_placeholder(&mut self, binding: Binding) -> BindingId {
        debug_assert!(
            matches!(binding.variant, BindingVariant::Recursive { .. }),
            "only Recursive bindings may bypass the key index"
        );
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(binding);
        id
    }

    /// Bindings whose key equals `key` exactly (type identity and qualifier set).
    #[inline]
    pub fn candidates(&self, key: &Key) -> &[BindingId] {
        self.by_key.get(key).map(|ids| ids.as_slice()).unwrap_or(&[])
    }

    /// # Panics
    ///
    /// Panics on a handle from another pool.
    #[inline]
    pub fn get(&self, id: BindingId) -> &Binding {
        &self.bindings[id.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BindingId, &Binding)> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(i, b)| (BindingId(i as u32), b))
    }
}
