//! String interner for type names, qualifier/scope tags and declaration names.
//!
//! Every name that takes part in binding lookup is interned once while the
//! declaration model is built, so the resolver only ever compares `Atom`s.
//! Tag equality is therefore a `u32` comparison and never needs to know how
//! the host represented the annotation.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;

/// An interned string identifier.
///
/// Atoms are cheap to copy (just a u32) and can be compared with == in O(1).
/// To get the actual string, use `Interner::resolve(atom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// A sentinel value representing no atom / empty string.
    pub const NONE: Atom = Atom(0);

    /// Check if this is the empty/none atom.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Names the resolvers look up by identity. Pre-interning them keeps the
/// well-known atoms at small, stable indices.
const COMMON_STRINGS: &[&str] = &[
    // Wrapper and intrinsic types
    "Provider",
    "Lazy",
    "Unit",
    "Any",
    // Universal methods excluded from endpoint discovery
    "equals",
    "hashCode",
    "toString",
    // Frequently seen value types
    "Int",
    "Long",
    "Boolean",
    "String",
    "Double",
    // Creator / companion naming
    "Companion",
    "Factory",
    "Builder",
    "create",
    "build",
];

/// String interner that deduplicates strings and returns Atom handles.
///
/// # Example
/// ```
/// use dgc_common::interner::Interner;
/// let mut interner = Interner::new();
/// let a1 = interner.intern("Provider");
/// let a2 = interner.intern("Provider");
/// assert_eq!(a1, a2);
/// assert_eq!(interner.resolve(a1), "Provider");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interner {
    /// Map from string to atom index
    map: FxHashMap<Arc<str>, Atom>,
    /// Vector of all interned strings (index 0 is empty string)
    strings: Vec<Arc<str>>,
}

impl Interner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut interner = Interner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        };
        let empty: Arc<str> = Arc::from("");
        interner.strings.push(empty.clone());
        interner.map.insert(empty, Atom::NONE);
        interner
    }

    /// Create an interner with the common resolver names already present.
    pub fn with_common() -> Self {
        let mut interner = Self::new();
        for s in COMMON_STRINGS {
            interner.intern(s);
        }
        interner
    }

    /// Intern a string, returning its Atom handle.
    /// If the string was already interned, returns the existing Atom.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.map.get(s) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        let owned: Arc<str> = Arc::from(s);
        self.strings.push(owned.clone());
        self.map.insert(owned, atom);
        atom
    }

    /// Look up a string without interning it.
    #[inline]
    pub fn lookup(&self, s: &str) -> Option<Atom> {
        self.map.get(s).copied()
    }

    /// Resolve an Atom back to its string value.
    /// Returns empty string if atom is out of bounds.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.strings
            .get(atom.0 as usize)
            .map(|s| s.as_ref())
            .unwrap_or("")
    }

    /// Try to resolve an Atom, returning None if invalid.
    #[inline]
    pub fn try_resolve(&self, atom: Atom) -> Option<&str> {
        self.strings.get(atom.0 as usize).map(|s| s.as_ref())
    }

    /// Get the number of interned strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the interner is empty (only has the empty string).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_none_atom() {
        let mut interner = Interner::new();
        assert_eq!(interner.intern(""), Atom::NONE);
        assert!(interner.is_empty());
    }

    #[test]
    fn interning_is_idempotent() {
        let mut interner = Interner::new();
        let a = interner.intern("Named");
        let b = interner.intern("Named");
        let c = interner.intern("Singleton");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(c), "Singleton");
    }

    #[test]
    fn common_strings_are_preinterned() {
        let interner = Interner::with_common();
        let provider = interner.lookup("Provider").unwrap();
        assert_eq!(provider, Atom(1));
        assert!(interner.lookup("hashCode").is_some());
        assert!(interner.lookup("FooModule").is_none());
    }

    #[test]
    fn out_of_range_atom_resolves_to_empty() {
        let interner = Interner::new();
        assert_eq!(interner.resolve(Atom(99)), "");
        assert_eq!(interner.try_resolve(Atom(99)), None);
    }
}
