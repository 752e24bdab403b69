//! Resource stores and the fallback chain.
//!
//! A [`ResourceStore`] is an immutable node in the resolution chain: either
//! the canonical empty store, a node wrapping a decoded [`ResourceMap`], or
//! a node delegating lookups to a host-supplied closure. Every non-empty
//! node carries a single fallback pointer; lookups check the local store
//! first and walk the chain on a miss. Nodes are built bottom-up during
//! chain construction and never mutated afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::typegraph::TypeId;

/// A flat key→value store decoded from one resource.
///
/// Iteration order is deterministic (sorted by key).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMap {
    entries: BTreeMap<String, String>,
}

impl ResourceMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key→value pair, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// The value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl FromIterator<(String, String)> for ResourceMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for ResourceMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }
}

/// A host-supplied lookup delegate for [`ResourceStore::Delegated`] nodes.
pub type DelegatedLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// One immutable node of a resolution chain.
pub enum ResourceStore {
    /// The canonical empty store: every lookup is absent and fallback
    /// delegation is a no-op.
    Empty,

    /// A store produced for one resolution context.
    Node {
        /// The resolution context the store was built for.
        context: TypeId,
        /// The decoded local entries.
        entries: ResourceMap,
        /// Next store in the fallback chain.
        fallback: Box<ResourceStore>,
    },

    /// A store delegating local lookups, unchanged, to a host-supplied
    /// closure: the adapter through which an embedding framework's own
    /// localization lookup joins the chain.
    Delegated {
        /// Diagnostic name for the host lookup.
        name: String,
        /// The host lookup, consulted as the local store.
        lookup: DelegatedLookup,
        /// Next store in the fallback chain.
        fallback: Box<ResourceStore>,
    },
}

impl ResourceStore {
    /// Creates a chain node for `context` with the given fallback.
    #[must_use]
    pub fn node(context: TypeId, entries: ResourceMap, fallback: ResourceStore) -> Self {
        Self::Node {
            context,
            entries,
            fallback: Box::new(fallback),
        }
    }

    /// Creates a host-delegated chain node with the given fallback.
    #[must_use]
    pub fn delegated(
        name: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
        fallback: ResourceStore,
    ) -> Self {
        Self::Delegated {
            name: name.into(),
            lookup: Arc::new(lookup),
            fallback: Box::new(fallback),
        }
    }

    /// Returns true for the canonical empty store.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The resolution context this node was built for, if it has one.
    #[must_use]
    pub fn context(&self) -> Option<TypeId> {
        match self {
            Self::Node { context, .. } => Some(*context),
            Self::Empty | Self::Delegated { .. } => None,
        }
    }

    /// The fallback store, if this node has one.
    #[must_use]
    pub fn fallback(&self) -> Option<&ResourceStore> {
        match self {
            Self::Empty => None,
            Self::Node { fallback, .. } | Self::Delegated { fallback, .. } => Some(fallback),
        }
    }

    /// Looks up `key` in this node only, ignoring the fallback chain.
    #[must_use]
    pub fn find_local(&self, key: &str) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Node { entries, .. } => entries.get(key).map(str::to_string),
            Self::Delegated { lookup, .. } => lookup(key),
        }
    }

    /// Whether `key` is present in this node, ignoring the fallback chain.
    #[must_use]
    pub fn has_local(&self, key: &str) -> bool {
        match self {
            Self::Empty => false,
            Self::Node { entries, .. } => entries.contains_key(key),
            Self::Delegated { lookup, .. } => lookup(key).is_some(),
        }
    }

    /// Looks up `key` in this node, walking the fallback chain on a miss.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<String> {
        let mut store = self;
        loop {
            if let Some(value) = store.find_local(key) {
                return Some(value);
            }
            match store.fallback() {
                Some(fallback) => store = fallback,
                None => return None,
            }
        }
    }

    /// Number of nodes in the chain, the empty terminal excluded.
    #[must_use]
    pub fn chain_len(&self) -> usize {
        let mut len = 0;
        let mut store = self;
        while let Some(fallback) = store.fallback() {
            len += 1;
            store = fallback;
        }
        len
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::Empty
    }
}

impl fmt::Debug for ResourceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Node {
                context,
                entries,
                fallback,
            } => f
                .debug_struct("Node")
                .field("context", context)
                .field("entries", &entries.len())
                .field("fallback", fallback)
                .finish(),
            Self::Delegated { name, fallback, .. } => f
                .debug_struct("Delegated")
                .field("name", name)
                .field("fallback", fallback)
                .finish_non_exhaustive(),
        }
    }
}
