//! Memoized lowering of descriptors into metadata nodes.
//!
//! A [`Lowering`] lives for one compile-unit pass. It lowers each descriptor
//! at most once: the first request builds the node, every later request for
//! the same [`DescId`] gets the same node back. Shared subgraphs (one `int`
//! type referenced from a hundred variables) therefore produce one node, and
//! the result is independent of the order in which descriptors are requested.
//!
//! Absent references (`None`) lower to [`NodeBuilder::null`] and never touch
//! the cache.
//!
//! Lowering recurses once per reference level. Each level runs under
//! `ensure_sufficient_stack`, so long pointer or typedef chains grow the
//! stack instead of overflowing it.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::descriptor::{DescId, DescriptorSet, LineDescriptor};
use crate::node::NodeBuilder;

/// Grow the stack when less than this remains.
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if it is close to exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Cache counters for one pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LoweringStats {
    /// Requests answered from the cache.
    pub hits: usize,
    /// Requests that built a node.
    pub misses: usize,
}

/// Lowering cache over a [`DescriptorSet`].
pub struct Lowering<'a, B: NodeBuilder> {
    builder: &'a B,
    descriptors: &'a DescriptorSet<B::Node>,
    cache: FxHashMap<DescId, B::Node>,
    stats: LoweringStats,
}

impl<'a, B: NodeBuilder> Lowering<'a, B> {
    pub fn new(builder: &'a B, descriptors: &'a DescriptorSet<B::Node>) -> Self {
        Self {
            builder,
            descriptors,
            cache: FxHashMap::default(),
            stats: LoweringStats::default(),
        }
    }

    #[inline]
    pub fn builder(&self) -> &'a B {
        self.builder
    }

    #[inline]
    pub fn descriptors(&self) -> &'a DescriptorSet<B::Node> {
        self.descriptors
    }

    /// The node for `id`, building it on first request.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in this pass's descriptor set.
    pub fn lower(&mut self, id: DescId) -> B::Node {
        if let Some(node) = self.cache.get(&id) {
            self.stats.hits += 1;
            trace!(id = id.raw(), "descriptor cache hit");
            return node.clone();
        }

        let descriptors = self.descriptors;
        let descriptor = descriptors.get(id);
        trace!(id = id.raw(), kind = descriptor.kind(), "lowering descriptor");
        let node = ensure_sufficient_stack(|| descriptor.lower(self));
        self.stats.misses += 1;
        self.cache.insert(id, node.clone());
        node
    }

    /// Lower-or-null.
    pub fn lower_opt(&mut self, id: Option<DescId>) -> B::Node {
        match id {
            Some(id) => self.lower(id),
            None => self.builder.null(),
        }
    }

    /// Lower each entry in order. Empty input gives an empty vector.
    pub fn lower_all(&mut self, ids: &[Option<DescId>]) -> Vec<B::Node> {
        ids.iter().map(|&id| self.lower_opt(id)).collect()
    }

    /// Lower each entry and wrap the results in one tuple.
    pub(crate) fn lower_list(&mut self, ids: &[Option<DescId>]) -> B::Node {
        let nodes = self.lower_all(ids);
        self.builder.md_node(&nodes)
    }

    /// Lower a location that is not stored in the set.
    ///
    /// Locations are attached to individual instructions, so each call builds
    /// a fresh node; only the location's scope goes through the cache.
    pub fn lower_line(&mut self, line: &LineDescriptor) -> B::Node {
        line.lower(self)
    }

    /// The node already built for `id`, if any.
    pub fn cached(&self, id: DescId) -> Option<&B::Node> {
        self.cache.get(&id)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn stats(&self) -> LoweringStats {
        self.stats
    }
}
