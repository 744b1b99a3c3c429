//! Recursion guard for the graph builder.
//!
//! `RecursionGuard` combines three safety mechanisms:
//! 1. **Cycle detection** via a visiting set (`FxHashSet<K>`)
//! 2. **Depth limiting** to prevent stack overflow
//! 3. **Iteration bounding** to prevent runaway work on pathological input
//!
//! The graph builder keys the guard on the [`Key`](dgc_binder::Key) being
//! resolved. A `Cycle` result is not an error there: it is the signal to
//! insert a `Recursive` placeholder.
//!
//! # Safety
//!
//! - **Debug leak detection**: In debug builds, dropping a guard with active entries
//!   triggers a panic, catching forgotten `leave()` calls.
//! - **Debug double-leave detection**: In debug builds, leaving a key that isn't in
//!   the visiting set triggers a panic.
//! - **Overflow protection**: Iteration counting uses saturating arithmetic.

use dgc_common::limits;
use rustc_hash::FxHashSet;
use std::hash::Hash;

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Dependency resolution in the graph builder.
    ///
    /// depth = `MAX_RESOLUTION_DEPTH`, iterations = `MAX_RESOLUTION_ITERATIONS`
    #[default]
    GraphResolution,

    /// Custom limits for one-off or test scenarios.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    /// Maximum recursion depth for this profile.
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::GraphResolution => limits::MAX_RESOLUTION_DEPTH,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    /// Maximum iteration count for this profile.
    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::GraphResolution => limits::MAX_RESOLUTION_ITERATIONS,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already being visited.
    Cycle,
    /// Maximum recursion depth exceeded.
    DepthExceeded,
    /// Maximum iteration count exceeded.
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_cycle(self) -> bool {
        matches!(self, Self::Cycle)
    }

    /// Returns `true` if any limit was exceeded (depth or iterations).
    #[inline]
    pub fn is_exceeded(self) -> bool {
        matches!(self, Self::DepthExceeded | Self::IterationExceeded)
    }
}

// ---------------------------------------------------------------------------
// RecursionGuard
// ---------------------------------------------------------------------------

/// Tracks recursion state for cycle detection, depth limiting,
/// and iteration bounding.
///
/// # Usage
///
/// ```ignore
/// let mut guard = RecursionGuard::with_profile(RecursionProfile::GraphResolution);
///
/// match guard.enter(key.clone()) {
///     RecursionResult::Entered => {
///         let result = resolve_dependencies();
///         guard.leave(&key);
///         result
///     }
///     RecursionResult::Cycle => placeholder(),
///     RecursionResult::DepthExceeded
///     | RecursionResult::IterationExceeded => too_deep(),
/// }
/// ```
pub struct RecursionGuard<K: Hash + Eq + Clone> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    max_depth_reached: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Clone> RecursionGuard<K> {
    /// Create a guard with explicit limits.
    ///
    /// Prefer [`with_profile`](Self::with_profile) for standard use cases.
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
            max_depth_reached: 0,
            exceeded: false,
        }
    }

    /// Create a guard from a named [`RecursionProfile`].
    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    // -----------------------------------------------------------------------
    // Core enter / leave API
    // -----------------------------------------------------------------------

    /// Try to enter a recursive computation for `key`.
    ///
    /// On [`RecursionResult::Entered`] the caller **must** call
    /// [`leave`](Self::leave) with the same key when done. Cycle detection
    /// takes precedence over the depth limit so that a cycle closing at the
    /// limit is still reported as a cycle.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            self.exceeded = true;
            return RecursionResult::IterationExceeded;
        }
        if self.visiting.contains(&key) {
            return RecursionResult::Cycle;
        }
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }

        self.visiting.insert(key);
        self.depth += 1;
        self.max_depth_reached = self.max_depth_reached.max(self.depth);
        RecursionResult::Entered
    }

    /// Leave a recursive computation for `key`.
    ///
    /// # Debug panics
    ///
    /// In debug builds, panics if `key` is not in the visiting set.
    pub fn leave(&mut self, key: &K) {
        let was_present = self.visiting.remove(key);

        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not in the visiting set. \
             This indicates a double-leave or a leave without a matching enter()."
        );

        self.depth = self.depth.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Query API
    // -----------------------------------------------------------------------

    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    /// Current recursion depth (number of active entries on the stack).
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Deepest nesting seen since construction.
    #[inline]
    pub fn max_depth_reached(&self) -> u32 {
        self.max_depth_reached
    }

    /// Total enter attempts so far (successful or not).
    #[inline]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Returns `true` if any limit was previously exceeded. Sticky.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

// ---------------------------------------------------------------------------
// Debug-mode leak detection
// ---------------------------------------------------------------------------

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Clone> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} active entries still in the visiting set. \
                 This indicates leaked enter() calls without matching leave() calls.",
                self.visiting.len(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_leave_tracks_depth() {
        let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 100);
        assert_eq!(guard.enter(1), RecursionResult::Entered);
        assert_eq!(guard.enter(2), RecursionResult::Entered);
        assert_eq!(guard.depth(), 2);
        assert!(guard.is_visiting(&1));
        guard.leave(&2);
        guard.leave(&1);
        assert_eq!(guard.depth(), 0);
        assert_eq!(guard.max_depth_reached(), 2);
        assert_eq!(guard.iterations(), 2);
    }

    #[test]
    fn test_reentry_is_a_cycle() {
        let mut guard: RecursionGuard<&str> = RecursionGuard::new(10, 100);
        assert!(guard.enter("A").is_entered());
        assert!(guard.enter("B").is_entered());
        assert!(guard.enter("A").is_cycle());
        assert_eq!(guard.depth(), 2);
        guard.leave(&"B");
        guard.leave(&"A");
        assert!(!guard.is_exceeded());
    }

    #[test]
    fn test_depth_limit() {
        let mut guard: RecursionGuard<u32> = RecursionGuard::new(2, 100);
        assert!(guard.enter(1).is_entered());
        assert!(guard.enter(2).is_entered());
        assert_eq!(guard.enter(3), RecursionResult::DepthExceeded);
        // A cycle at the limit is still a cycle.
        assert_eq!(guard.enter(1), RecursionResult::Cycle);
        assert!(guard.is_exceeded());
        guard.leave(&2);
        guard.leave(&1);
    }

    #[test]
    fn test_iteration_limit() {
        let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 2);
        for key in 0..2 {
            assert!(guard.enter(key).is_entered());
            guard.leave(&key);
        }
        assert_eq!(guard.enter(7), RecursionResult::IterationExceeded);
        assert!(guard.enter(8).is_exceeded());
    }

    #[test]
    fn test_profiles() {
        let profile = RecursionProfile::GraphResolution;
        assert_eq!(profile.max_depth(), limits::MAX_RESOLUTION_DEPTH);
        assert_eq!(profile.max_iterations(), limits::MAX_RESOLUTION_ITERATIONS);
        let custom = RecursionProfile::Custom {
            max_depth: 3,
            max_iterations: 9,
        };
        let guard: RecursionGuard<u32> = RecursionGuard::with_profile(custom);
        assert_eq!(guard.max_depth(), 3);
        assert_eq!(guard.max_iterations(), 9);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "active entries")]
    fn test_leaked_entry_panics_on_drop() {
        let mut guard: RecursionGuard<u32> = RecursionGuard::new(10, 100);
        let _ = guard.enter(1);
        drop(guard);
    }
}
