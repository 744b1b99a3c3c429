//! Qualifier and scope tags.
//!
//! Tags are opaque identities decided once while the host's annotations are
//! lowered into the model. Sets of tags are kept sorted and deduplicated so
//! that two sets compare and hash equal regardless of declaration order.

use dgc_common::interner::{Atom, Interner};
use serde::Serialize;
use smallvec::SmallVec;

/// Marker disambiguating multiple bindings of the same type (e.g. `@Named("io")`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QualifierTag(pub Atom);

/// Marker constraining a binding to one instance per component (e.g. `@Singleton`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ScopeTag(pub Atom);

impl QualifierTag {
    #[inline]
    pub fn name(self) -> Atom {
        self.0
    }
}

impl ScopeTag {
    #[inline]
    pub fn name(self) -> Atom {
        self.0
    }
}

/// Canonical (sorted, deduplicated) set of tags.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TagSet<T: Ord + Copy> {
    tags: SmallVec<[T; 2]>,
}

pub type QualifierSet = TagSet<QualifierTag>;
pub type ScopeSet = TagSet<ScopeTag>;

impl<T: Ord + Copy> Default for TagSet<T> {
    fn default() -> Self {
        Self {
            tags: SmallVec::new(),
        }
    }
}

impl<T: Ord + Copy> TagSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(tag: T) -> Self {
        let mut tags = SmallVec::new();
        tags.push(tag);
        Self { tags }
    }

    /// Insert a tag, keeping the set canonical. Returns `false` if already present.
    pub fn insert(&mut self, tag: T) -> bool {
        match self.tags.binary_search(&tag) {
            Ok(_) => false,
            Err(pos) => {
                self.tags.insert(pos, tag);
                true
            }
        }
    }

    #[inline]
    pub fn contains(&self, tag: &T) -> bool {
        self.tags.binary_search(tag).is_ok()
    }

    /// `true` when every tag of `self` also appears in `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.tags.iter().all(|tag| other.contains(tag))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.tags.iter().copied()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.tags
    }
}

impl<T: Ord + Copy> FromIterator<T> for TagSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tags: SmallVec<[T; 2]> = iter.into_iter().collect();
        tags.sort_unstable();
        tags.dedup();
        Self { tags }
    }
}

impl QualifierSet {
    /// Render as `@A @B ` (with a trailing space) for key descriptions.
    pub fn display_prefix(&self, interner: &Interner) -> String {
        let mut out = String::new();
        for tag in self.iter() {
            out.push('@');
            out.push_str(interner.resolve(tag.0));
            out.push(' ');
        }
        out
    }
}

impl ScopeSet {
    /// Render as `[@A, @B]`; `[]` when unscoped.
    pub fn display(&self, interner: &Interner) -> String {
        let names: Vec<String> = self
            .iter()
            .map(|tag| format!("@{}", interner.resolve(tag.0)))
            .collect();
        format!("[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: u32) -> QualifierTag {
        QualifierTag(Atom(n))
    }

    #[test]
    fn equality_ignores_declaration_order() {
        let a: QualifierSet = [q(3), q(1)].into_iter().collect();
        let b: QualifierSet = [q(1), q(3), q(1)].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn subset_is_not_equality() {
        let small = QualifierSet::single(q(1));
        let large: QualifierSet = [q(1), q(2)].into_iter().collect();
        assert!(small.is_subset_of(&large));
        assert!(!large.is_subset_of(&small));
        assert_ne!(small, large);
        assert!(QualifierSet::new().is_subset_of(&small));
    }

    #[test]
    fn insert_keeps_set_sorted() {
        let mut set = ScopeSet::new();
        assert!(set.insert(ScopeTag(Atom(5))));
        assert!(set.insert(ScopeTag(Atom(2))));
        assert!(!set.insert(ScopeTag(Atom(5))));
        assert_eq!(set.as_slice(), &[ScopeTag(Atom(2)), ScopeTag(Atom(5))]);
    }
}
