//! The graph builder.
//!
//! One builder run resolves every request of every endpoint of one component
//! into a shared DAG of [`GraphNode`]s:
//!
//! 1. Memo hit on `(key, requester)` returns the cached outcome.
//! 2. Select the single binding for the key. With no candidate, the wrapper
//!    resolver and then the constructor resolver may synthesize one into the
//!    pool; zero or several candidates fail the node.
//! 3. A binding that already has a node is shared, whoever asks for it.
//! 4. The binding's scopes must be a subset of the component's scopes.
//! 5. Dependencies are resolved recursively under a [`RecursionGuard`] keyed
//!    on the key. Re-entering a key that is still being resolved yields a
//!    `Recursive` placeholder node, patched to the real node on completion.
//! 6. The node is pushed to the arena and memoized.
//!
//! A node fails when it or any of its dependencies fails. Only the root cause
//! is reported; ancestors simply produce no node. Failures are memoized too,
//! so every error is reported once per requesting declaration. When a key
//! fails after handing out its placeholder, every node built on top of that
//! placeholder is discarded and its memo entries turn into failures.

use dgc_binder::endpoints::resolve_endpoints;
use dgc_binder::resolvers::{
    resolve_constructor_binding, resolve_eager_bindings, resolve_wrapper_binding,
};
use dgc_binder::{
    Binding, BindingId, BindingPool, BindingVariant, Endpoint, Key, ResolutionError,
    ResolutionErrorKind, ResolverContext,
};
use dgc_common::limits::MEMO_INITIAL_CAPACITY;
use dgc_model::{ComponentDecl, DeclId, DeclarationModel, ScopeSet};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, debug_span, trace};

use crate::graph::DependencyGraph;
use crate::node::{GraphNode, NodeId};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::result::{BuildOutput, BuildStats, ResolveResult, Root};

type Selection = Result<BindingId, ResolutionErrorKind>;

pub struct GraphBuilder<'a> {
    cx: ResolverContext<'a>,
    pool: BindingPool,
    nodes: Vec<GraphNode>,
    /// Outcome per `(key, requester)`; `None` records a failed node.
    memo: FxHashMap<(Key, DeclId), Option<NodeId>>,
    /// Binding selected per key. Selection does not depend on the requester.
    selections: FxHashMap<Key, Selection>,
    /// Node built for each binding, so different requesters share it.
    binding_nodes: FxHashMap<BindingId, NodeId>,
    /// Placeholder node per key currently being resolved, awaiting its patch.
    placeholders: FxHashMap<Key, NodeId>,
    guard: RecursionGuard<Key>,
    errors: Vec<ResolutionError>,
}

impl<'a> GraphBuilder<'a> {
    /// A builder whose pool is seeded with `bindings`.
    pub fn new(cx: ResolverContext<'a>, bindings: Vec<Binding>) -> Self {
        Self {
            cx,
            pool: BindingPool::with_bindings(bindings),
            nodes: Vec::new(),
            memo: FxHashMap::with_capacity_and_hasher(MEMO_INITIAL_CAPACITY, Default::default()),
            selections: FxHashMap::default(),
            binding_nodes: FxHashMap::default(),
            placeholders: FxHashMap::default(),
            guard: RecursionGuard::with_profile(RecursionProfile::GraphResolution),
            errors: Vec::new(),
        }
    }

    pub fn with_profile(mut self, profile: RecursionProfile) -> Self {
        self.guard = RecursionGuard::with_profile(profile);
        self
    }

    /// Errors found before the run (eager resolver findings). They are kept
    /// ahead of node failures in the output.
    pub fn with_errors(mut self, errors: Vec<ResolutionError>) -> Self {
        self.errors = errors;
        self
    }

    /// Resolve every endpoint, in order, and hand back the graph.
    pub fn build(mut self, endpoints: &[Endpoint]) -> BuildOutput {
        let component = self.cx.component.ty;
        let span = debug_span!("build", component = %self.cx.component_name());
        let _enter = span.enter();

        let mut results = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            trace!(endpoint = %endpoint.describe(self.cx.model), "resolving endpoint");
            let mut roots = Vec::new();
            let mut unresolved = Vec::new();
            for request in endpoint.requests() {
                match self.resolve_node(&request.key, request.requester) {
                    Some(node) => roots.push(Root { request, node }),
                    None => unresolved.push(request),
                }
            }
            results.push(ResolveResult {
                endpoint: endpoint.clone(),
                roots,
                unresolved,
            });
        }

        let stats = BuildStats {
            bindings: self.pool.len(),
            nodes: self.nodes.len(),
            iterations: self.guard.iterations(),
            max_depth: self.guard.max_depth_reached(),
        };
        debug!(
            endpoints = results.len(),
            bindings = stats.bindings,
            nodes = stats.nodes,
            errors = self.errors.len(),
            "graph built"
        );
        debug_assert!(
            self.placeholders.is_empty(),
            "placeholders left pending after the run"
        );

        BuildOutput {
            component,
            results,
            graph: DependencyGraph {
                pool: self.pool,
                nodes: self.nodes,
            },
            errors: self.errors,
            stats,
        }
    }

    /// Resolve `key` as requested by `requester`.
    ///
    /// Returns `None` when the node failed; the error is recorded unless the
    /// failure came from a dependency, which reports its own.
    pub fn resolve_node(&mut self, key: &Key, requester: DeclId) -> Option<NodeId> {
        let memo_key = (key.clone(), requester);
        if let Some(&entry) = self.memo.get(&memo_key) {
            return entry;
        }

        let binding = match self.select(key, requester) {
            Ok(binding) => binding,
            Err(kind) => return self.fail(memo_key, kind),
        };
        if let Some(&node) = self.binding_nodes.get(&binding) {
            self.memo.insert(memo_key, Some(node));
            return Some(node);
        }

        let scopes = &self.pool.get(binding).scopes;
        let component_scopes = self.cx.component_scopes();
        if !scopes.is_subset_of(component_scopes) {
            let kind = ResolutionErrorKind::ScopeMismatch {
                key: key.clone(),
                component_scopes: component_scopes.clone(),
                binding_scopes: scopes.clone(),
            };
            return self.fail(memo_key, kind);
        }

        match self.guard.enter(key.clone()) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => return Some(self.placeholder(key, requester, binding)),
            RecursionResult::DepthExceeded => {
                let limit = self.guard.max_depth();
                return self.fail(memo_key, ResolutionErrorKind::ResolutionTooDeep {
                    key: key.clone(),
                    limit,
                });
            }
            RecursionResult::IterationExceeded => {
                let limit = self.guard.max_iterations();
                return self.fail(memo_key, ResolutionErrorKind::ResolutionTooDeep {
                    key: key.clone(),
                    limit,
                });
            }
        }

        trace!(
            key = %key.display(self.cx.model),
            depth = self.guard.depth(),
            "resolving node"
        );
        let mark = self.nodes.len();
        let dependencies = self.pool.get(binding).dependencies.clone();
        let mut children: SmallVec<[NodeId; 4]> = SmallVec::with_capacity(dependencies.len());
        let mut failed = false;
        // Keep going after a failure so every missing dependency is reported.
        for dependency in &dependencies {
            match self.resolve_node(&dependency.key, dependency.requester) {
                Some(child) => children.push(child),
                None => failed = true,
            }
        }
        self.guard.leave(key);
        let placeholder = self.placeholders.remove(key);

        if failed {
            if let Some(placeholder) = placeholder {
                self.discard_placeholder_users(mark, placeholder);
            }
            self.memo.insert(memo_key, None);
            return None;
        }

        let node = NodeId(self.nodes.len() as u32);
        self.nodes.push(GraphNode::new(binding, children));
        if let Some(placeholder) = placeholder {
            debug!(key = %key.display(self.cx.model), "patched recursive placeholder");
            self.nodes[placeholder.index()].delegate = Some(node);
        }
        self.binding_nodes.insert(binding, node);
        self.memo.insert(memo_key, Some(node));
        Some(node)
    }

    /// The binding for `key`, synthesizing one on demand when none is known.
    fn select(&mut self, key: &Key, requester: DeclId) -> Selection {
        if let Some(selection) = self.selections.get(key) {
            return selection.clone();
        }
        let selection = self.select_uncached(key, requester);
        self.selections.insert(key.clone(), selection.clone());
        selection
    }

    fn select_uncached(&mut self, key: &Key, requester: DeclId) -> Selection {
        match self.pool.candidates(key) {
            [] => {}
            &[only] => return Ok(only),
            many => {
                let candidates = many.iter().map(|&id| self.pool.get(id).clone()).collect();
                return Err(ResolutionErrorKind::AmbiguousBindings {
                    key: key.clone(),
                    candidates,
                });
            }
        }

        if let Some(binding) = resolve_wrapper_binding(&self.cx, key, requester) {
            return Ok(self.pool.add(binding));
        }
        match resolve_constructor_binding(&self.cx, key)? {
            Some(binding) => Ok(self.pool.add(binding)),
            None => Err(ResolutionErrorKind::NoBindingFound { key: key.clone() }),
        }
    }

    /// The placeholder node standing in for `key` while it is in progress.
    /// Every re-entry of the same key shares one placeholder.
    fn placeholder(&mut self, key: &Key, requester: DeclId, delegate: BindingId) -> NodeId {
        if let Some(&node) = self.placeholders.get(key) {
            return node;
        }
        let binding = self.pool.add_placeholder(Binding::new(
            self.cx.model,
            key.clone(),
            ScopeSet::new(),
            BindingVariant::Recursive { delegate },
            requester,
        ));
        let node = NodeId(self.nodes.len() as u32);
        self.nodes.push(GraphNode::new(binding, SmallVec::new()));
        self.placeholders.insert(key.clone(), node);
        debug!(key = %key.display(self.cx.model), "cycle broken with recursive placeholder");
        node
    }

    /// Drop every node built since `mark` that reaches `placeholder`, whose
    /// key has just failed. Bindings lose those shared nodes and memo entries
    /// pointing at them become failures, so later requests fail as well.
    fn discard_placeholder_users(&mut self, mark: usize, placeholder: NodeId) {
        let mut dead = FxHashSet::default();
        dead.insert(placeholder);
        // Patched placeholders sit below the node they delegate to, so one
        // forward pass is not always enough.
        loop {
            let before = dead.len();
            for (index, node) in self.nodes.iter().enumerate().skip(mark) {
                let id = NodeId(index as u32);
                if dead.contains(&id) {
                    continue;
                }
                let reaches = node.dependencies.iter().any(|dep| dead.contains(dep))
                    || node.delegate.is_some_and(|next| dead.contains(&next));
                if reaches {
                    dead.insert(id);
                }
            }
            if dead.len() == before {
                break;
            }
        }

        self.binding_nodes.retain(|_, node| !dead.contains(node));
        for entry in self.memo.values_mut() {
            if entry.is_some_and(|node| dead.contains(&node)) {
                *entry = None;
            }
        }
        debug!(discarded = dead.len() - 1, "discarded nodes built on a failed placeholder");
    }

    fn fail(&mut self, memo_key: (Key, DeclId), kind: ResolutionErrorKind) -> Option<NodeId> {
        trace!(code = kind.code(), "node failed");
        self.errors.push(ResolutionError::new(kind, memo_key.1));
        self.memo.insert(memo_key, None);
        None
    }

    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.index()]
    }

    pub fn pool(&self) -> &BindingPool {
        &self.pool
    }

    pub fn errors(&self) -> &[ResolutionError] {
        &self.errors
    }
}

/// Run the whole pipeline for one component: eager binding resolvers,
/// endpoint resolvers, then the graph builder.
pub fn build_component(model: &DeclarationModel, component: &ComponentDecl) -> BuildOutput {
    let cx = ResolverContext::new(model, component);
    let mut errors = Vec::new();
    let bindings = resolve_eager_bindings(&cx, &mut errors);
    let endpoints = resolve_endpoints(&cx);
    GraphBuilder::new(cx, bindings)
        .with_errors(errors)
        .build(&endpoints)
}
