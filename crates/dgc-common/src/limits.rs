//! Centralized limits and thresholds for binding resolution.
//!
//! Recursion limits for the graph builder are consumed through
//! `dgc_graph::recursion::RecursionProfile`; the raw values live here so the
//! model and binder crates can share them without depending on the graph
//! crate.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum length of a chain of distinct bindings resolved on one stack.
///
/// Every dependency edge adds a few frames to the builder's call stack. Real
/// object graphs are wide rather than deep; a chain of 512 distinct bindings
/// is far beyond anything hand-written and still well within the default
/// 8 MB stack. Exceeding it reports `ResolutionTooDeep` on the node.
///
/// # Example
///
/// ```text
/// class A @Inject constructor(b: B)
/// class B @Inject constructor(c: C)
/// class C @Inject constructor(d: D)
/// // ... 512 levels ...
/// ```
pub const MAX_RESOLUTION_DEPTH: u32 = 512;

/// Maximum number of node resolutions attempted in one builder run.
///
/// Memoization bounds the work to the number of distinct
/// `(key, requester)` pairs, so this is only hit by pathological inputs.
pub const MAX_RESOLUTION_ITERATIONS: u32 = 1_000_000;

/// Maximum nesting of module `includes` followed by the module resolver.
///
/// Include cycles are detected independently; this only caps very long
/// acyclic include chains.
pub const MAX_MODULE_INCLUDE_DEPTH: u32 = 64;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Initial capacity of the per-run memo table.
pub const MEMO_INITIAL_CAPACITY: usize = 64;
