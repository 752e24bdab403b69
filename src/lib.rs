//! # polyres - Locale-Aware Resource Resolution
//!
//! polyres resolves, for a requesting type and a locale, a priority-ordered
//! fallback chain of key→string stores. Lookups walk the chain from the
//! requesting type down through its ancestors and interfaces to an
//! externally supplied parent, answering with the most specific value
//! available and degrading gracefully when a tier has nothing to say.
//!
//! ## Core Concepts
//!
//! - **TypeGraph**: an explicit nominal type hierarchy (supertypes and
//!   declared interfaces) supplied by the caller instead of reflection
//! - **ContextOrdering**: turns a requesting type into the deterministic,
//!   deduplicated priority sequence of resolution contexts
//! - **StoreAcquirer**: materializes a store per context by searching
//!   candidate names, registered formats, and locale-specificity tiers
//! - **ResourceStore**: an immutable chain node with a single fallback
//!   pointer; the empty store is the canonical terminal
//! - **Resources**: the consumer surface, with string lookups, positional
//!   template formatting, and typed value coercion
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use polyres::{ResolutionEngine, FsProvider, TypeRegistry, TypeSpec};
//!
//! let mut registry = TypeRegistry::new();
//! let widget = registry.define(TypeSpec::new("com.example.Widget"))?;
//!
//! let engine = ResolutionEngine::builder()
//!     .graph(Arc::new(registry))
//!     .provider(Arc::new(FsProvider::new("resources")))
//!     .build()?;
//!
//! let resources = engine.resolve(widget, &"fr-CA".parse()?)?;
//! let title = resources.get_string("widget.title")?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Strategies and the graph they run over
pub mod context;
pub mod error;
pub mod locale;
pub mod naming;
pub mod typegraph;

// Acquisition, formats, and the store chain
pub mod acquire;
pub mod format;
pub mod provider;
pub mod store;

// Consumer surface and orchestration
pub mod engine;
pub mod message;
pub mod resources;

// Re-export primary types at crate root for convenience
pub use acquire::StoreAcquirer;
pub use context::{ContextOrdering, DefaultOrdering, FixedAnchor, NoAncestors};
pub use engine::{EngineBuilder, ParentChainFactory, ResolutionEngine};
pub use error::{DecodeError, ResourceError, ResourceResult};
pub use format::{FormatLoader, FormatRegistry, JsonResourceLoader, PropertiesLoader, PROPERTIES_FORMAT};
pub use locale::{Locale, LocaleCategory, LocaleParseError, LocaleSelection};
pub use message::format_message;
pub use naming::CandidateNames;
pub use provider::{FsProvider, MemoryProvider, ResourceProvider};
pub use resources::Resources;
pub use store::{DelegatedLookup, ResourceMap, ResourceStore};
pub use typegraph::{TypeGraph, TypeId, TypeRegistry, TypeSpec};
