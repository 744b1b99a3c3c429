//! Source locations attached to declarations.

use crate::interner::Atom;
use serde::Serialize;

/// Byte span of a declaration inside its source file.
///
/// The file is an interned path so spans stay `Copy`. A span with
/// `Atom::NONE` as file is synthetic (no source position).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub file: Atom,
    pub start: u32,
    pub length: u32,
}

impl Span {
    pub const SYNTHETIC: Span = Span {
        file: Atom::NONE,
        start: 0,
        length: 0,
    };

    #[inline]
    pub const fn new(file: Atom, start: u32, length: u32) -> Self {
        Self {
            file,
            start,
            length,
        }
    }

    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.file.is_none()
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.length)
    }
}
