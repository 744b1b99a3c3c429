//! Common types and utilities for the dgc dependency graph compiler.
//!
//! This crate provides foundational types used across all dgc crates:
//! - String interning (`Atom`, `Interner`)
//! - Source spans attached to declarations (`Span`)
//! - Diagnostic records and the message table
//! - Resolution limits and thresholds

// String interning for type names, tags and declaration names
pub mod interner;
pub use interner::{Atom, Interner};

// Span - Source location of a declaration
pub mod span;
pub use span::Span;

// Diagnostic records handed to the diagnostics sink
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Centralized limits and thresholds
pub mod limits;
