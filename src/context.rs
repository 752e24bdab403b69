//! Context-ordering strategies.
//!
//! A resolution request starts from a single requesting type; the ordering
//! strategy expands it into the full priority-ordered, deduplicated sequence
//! of resolution contexts whose stores make up the fallback chain. The
//! sequence is computed fresh per request and never cached.

use std::collections::VecDeque;

use indexmap::IndexSet;

use crate::typegraph::{TypeGraph, TypeId};

/// Determines the priority order of resolution contexts for a requesting
/// type.
pub trait ContextOrdering: Send + Sync {
    /// The contexts to resolve stores for, highest priority first.
    ///
    /// Deterministic and pure: equal inputs yield equal sequences. The
    /// sequence is never empty, since the requesting type itself is always
    /// a member.
    fn resolving_contexts(&self, graph: &dyn TypeGraph, requesting: TypeId) -> Vec<TypeId>;
}

/// The default ordering: the requesting type, its supertype chain, then
/// interfaces.
///
/// The rules, in priority order:
///
/// - the requesting type itself is first;
/// - supertypes follow, nearest ancestor first (supertype chains end
///   naturally; there is no universal root in the graph model);
/// - classes, concrete or abstract, always outrank interfaces;
/// - interfaces reachable from a more-derived class outrank interfaces
///   reachable only from a less-derived class, even when re-declared at
///   several levels;
/// - at each class, directly declared interfaces are expanded breadth-first
///   in declaration order, parents only after the current frontier.
///
/// Every type appears at most once: the first encounter establishes its
/// position and later encounters are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultOrdering;

impl ContextOrdering for DefaultOrdering {
    fn resolving_contexts(&self, graph: &dyn TypeGraph, requesting: TypeId) -> Vec<TypeId> {
        // collect the type and its whole supertype chain, nearest first
        let mut class_chain = Vec::new();
        let mut cursor = Some(requesting);
        while let Some(ty) = cursor {
            class_chain.push(ty);
            cursor = graph.supertype(ty);
        }

        // the class chain takes priority; the set keeps first positions
        let mut resolving: IndexSet<TypeId> = class_chain.iter().copied().collect();

        // one queue reused per class level, drained completely each time so
        // interfaces of a derived class all precede those of its supertype
        let mut queue: VecDeque<TypeId> = VecDeque::new();
        for &class in &class_chain {
            queue.extend(graph.interfaces(class).iter().copied());
            while let Some(interface) = queue.pop_front() {
                if resolving.insert(interface) {
                    // first visit: parents join the queue behind the
                    // current frontier
                    queue.extend(graph.interfaces(interface).iter().copied());
                }
            }
            debug_assert!(queue.is_empty());
        }

        resolving.into_iter().collect()
    }
}

/// Ordering that resolves only the requesting type, with no ancestor or
/// interface expansion.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAncestors;

impl ContextOrdering for NoAncestors {
    fn resolving_contexts(&self, _graph: &dyn TypeGraph, requesting: TypeId) -> Vec<TypeId> {
        vec![requesting]
    }
}

/// Ordering that pins the computation to a fixed anchor type.
///
/// Whatever type is requested, the wrapped strategy is asked about the
/// anchor instead; the engine still reports results under the originally
/// requested type's identity. Used to pin all lookups of a whole hierarchy
/// to one designated type's ancestry.
pub struct FixedAnchor {
    anchor: TypeId,
    inner: Box<dyn ContextOrdering>,
}

impl FixedAnchor {
    /// Pins `inner` to always compute contexts for `anchor`.
    #[must_use]
    pub fn new(anchor: TypeId, inner: impl ContextOrdering + 'static) -> Self {
        Self {
            anchor,
            inner: Box::new(inner),
        }
    }

    /// The anchor type all computations are pinned to.
    #[must_use]
    pub fn anchor(&self) -> TypeId {
        self.anchor
    }
}

impl std::fmt::Debug for FixedAnchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedAnchor")
            .field("anchor", &self.anchor)
            .finish_non_exhaustive()
    }
}

impl ContextOrdering for FixedAnchor {
    fn resolving_contexts(&self, graph: &dyn TypeGraph, _requesting: TypeId) -> Vec<TypeId> {
        self.inner.resolving_contexts(graph, self.anchor)
    }
}
