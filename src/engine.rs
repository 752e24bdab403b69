//! The resolution engine.
//!
//! The engine ties the strategies together: it asks the context ordering
//! for the priority sequence, obtains the parent chain once from the
//! externally supplied factory, then builds the fallback chain bottom-up,
//! lowest-priority context first, so that the node built last, and
//! returned to the caller, is the highest-priority store.

use std::sync::Arc;

use crate::acquire::StoreAcquirer;
use crate::context::{ContextOrdering, DefaultOrdering, FixedAnchor, NoAncestors};
use crate::error::{ResourceError, ResourceResult};
use crate::format::FormatRegistry;
use crate::locale::{Locale, LocaleCategory, LocaleSelection};
use crate::naming::CandidateNames;
use crate::provider::ResourceProvider;
use crate::resources::Resources;
use crate::store::ResourceStore;
use crate::typegraph::{TypeGraph, TypeId};

/// Externally supplied factory seeding the lowest-priority fallback.
///
/// Called exactly once per resolution; `Ok(None)` means the parent
/// contributes nothing.
pub type ParentChainFactory =
    dyn Fn(TypeId, &Locale) -> ResourceResult<Option<ResourceStore>> + Send + Sync;

/// Resolves fallback chains for requesting types.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use polyres::{
///     MemoryProvider, ResolutionEngine, TypeRegistry, TypeSpec,
/// };
///
/// let mut registry = TypeRegistry::new();
/// let widget = registry.define(TypeSpec::new("com.example.Widget"))?;
///
/// let provider = MemoryProvider::new()
///     .with("com/example/Widget.properties", &b"title=Widget"[..]);
///
/// let engine = ResolutionEngine::builder()
///     .graph(Arc::new(registry))
///     .provider(Arc::new(provider))
///     .build()?;
///
/// let resources = engine.resolve(widget, &"en".parse()?)?;
/// assert_eq!(resources.get_string("title")?, "Widget");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ResolutionEngine {
    graph: Arc<dyn TypeGraph>,
    ordering: Arc<dyn ContextOrdering>,
    acquirer: StoreAcquirer,
    locales: Arc<LocaleSelection>,
    parent_factory: Option<Box<ParentChainFactory>>,
}

impl ResolutionEngine {
    /// Starts building an engine.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The type graph resolution runs against.
    #[must_use]
    pub fn graph(&self) -> &Arc<dyn TypeGraph> {
        &self.graph
    }

    /// The per-category locale selection consulted when no locale is
    /// passed explicitly.
    #[must_use]
    pub fn locale_selection(&self) -> &Arc<LocaleSelection> {
        &self.locales
    }

    /// Resolves using the display-category locale from the engine's
    /// [`LocaleSelection`].
    ///
    /// # Errors
    ///
    /// As for [`ResolutionEngine::resolve`].
    pub fn resolve_current(&self, requesting: TypeId) -> ResourceResult<Resources> {
        let locale = self.locales.get(LocaleCategory::Display);
        self.resolve(requesting, &locale)
    }

    /// Resolves the store chain for `requesting` in `locale`.
    ///
    /// # Errors
    ///
    /// Surfaces hard acquisition failures (unreadable or undecodable
    /// resources) and configuration errors. Absence of stores is not an
    /// error; the returned handle then wraps the canonical empty store.
    pub fn resolve(&self, requesting: TypeId, locale: &Locale) -> ResourceResult<Resources> {
        self.resolve_with(requesting, locale, false)
    }

    /// Like [`ResolutionEngine::resolve`], forwarding a cache-bypass hint
    /// to the provider.
    ///
    /// # Errors
    ///
    /// As for [`ResolutionEngine::resolve`].
    pub fn resolve_with(
        &self,
        requesting: TypeId,
        locale: &Locale,
        reload: bool,
    ) -> ResourceResult<Resources> {
        let graph = self.graph.as_ref();
        let contexts = self.ordering.resolving_contexts(graph, requesting);

        let parent = match &self.parent_factory {
            Some(factory) => factory(requesting, locale)?,
            None => None,
        };
        let mut chain = parent.unwrap_or(ResourceStore::Empty);

        // lowest priority first: each new node shadows everything built so
        // far, leaving the highest-priority node on top
        for &context in contexts.iter().rev() {
            if let Some(entries) = self.acquirer.acquire(graph, context, locale, reload)? {
                chain = ResourceStore::node(context, entries, chain);
            }
        }

        Ok(Resources::new(
            requesting,
            graph.qualified_name(requesting).to_string(),
            chain,
        ))
    }
}

impl std::fmt::Debug for ResolutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionEngine")
            .field("acquirer", &self.acquirer)
            .field("parent_factory", &self.parent_factory.is_some())
            .finish_non_exhaustive()
    }
}

/// Fluent builder for [`ResolutionEngine`].
///
/// A graph and a provider are required; the ordering defaults to
/// [`DefaultOrdering`], the candidate names to the type-name strategy, and
/// the formats to the built-in registry.
#[derive(Default)]
pub struct EngineBuilder {
    graph: Option<Arc<dyn TypeGraph>>,
    ordering: Option<Arc<dyn ContextOrdering>>,
    anchor: Option<TypeId>,
    names: Option<CandidateNames>,
    provider: Option<Arc<dyn ResourceProvider>>,
    formats: Option<Arc<FormatRegistry>>,
    locales: Option<Arc<LocaleSelection>>,
    parent_factory: Option<Box<ParentChainFactory>>,
}

impl EngineBuilder {
    /// Sets the type graph resolution runs against. Required.
    #[must_use]
    pub fn graph(mut self, graph: Arc<dyn TypeGraph>) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Sets the context-ordering strategy.
    #[must_use]
    pub fn ordering(mut self, ordering: impl ContextOrdering + 'static) -> Self {
        self.ordering = Some(Arc::new(ordering));
        self
    }

    /// Disables ancestor and interface expansion.
    #[must_use]
    pub fn no_ancestors(self) -> Self {
        self.ordering(NoAncestors)
    }

    /// Pins every resolution's context computation to `anchor`, wrapping
    /// whichever ordering strategy is in effect. Results are still reported
    /// under the requested type's identity.
    #[must_use]
    pub fn anchored_to(mut self, anchor: TypeId) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Sets the candidate-name strategy.
    #[must_use]
    pub fn candidate_names(mut self, names: CandidateNames) -> Self {
        self.names = Some(names);
        self
    }

    /// Sets the resource provider. Required.
    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the format registry.
    #[must_use]
    pub fn formats(mut self, formats: Arc<FormatRegistry>) -> Self {
        self.formats = Some(formats);
        self
    }

    /// Sets the per-category locale selection consulted by
    /// [`ResolutionEngine::resolve_current`]. Defaults to a selection whose
    /// fallback is the root locale.
    #[must_use]
    pub fn locales(mut self, locales: Arc<LocaleSelection>) -> Self {
        self.locales = Some(locales);
        self
    }

    /// Sets the parent-chain factory seeding the ultimate fallback.
    #[must_use]
    pub fn parent_chain(
        mut self,
        factory: impl Fn(TypeId, &Locale) -> ResourceResult<Option<ResourceStore>>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.parent_factory = Some(Box::new(factory));
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the graph or provider is missing.
    pub fn build(self) -> ResourceResult<ResolutionEngine> {
        let graph = self
            .graph
            .ok_or_else(|| ResourceError::configuration("engine requires a type graph"))?;
        let provider = self
            .provider
            .ok_or_else(|| ResourceError::configuration("engine requires a resource provider"))?;

        let mut ordering = self
            .ordering
            .unwrap_or_else(|| Arc::new(DefaultOrdering));
        if let Some(anchor) = self.anchor {
            ordering = Arc::new(FixedAnchor::new(anchor, ArcOrdering(ordering)));
        }

        let acquirer = StoreAcquirer::new(
            provider,
            self.names.unwrap_or_default(),
            self.formats
                .unwrap_or_else(|| Arc::new(FormatRegistry::builtin_only())),
        );

        Ok(ResolutionEngine {
            graph,
            ordering,
            acquirer,
            locales: self
                .locales
                .unwrap_or_else(|| Arc::new(LocaleSelection::new(Locale::root()))),
            parent_factory: self.parent_factory,
        })
    }
}

impl std::fmt::Debug for EngineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("graph", &self.graph.is_some())
            .field("provider", &self.provider.is_some())
            .field("anchor", &self.anchor)
            .finish_non_exhaustive()
    }
}

/// Adapter letting a shared ordering strategy back a [`FixedAnchor`].
struct ArcOrdering(Arc<dyn ContextOrdering>);

impl ContextOrdering for ArcOrdering {
    fn resolving_contexts(&self, graph: &dyn TypeGraph, requesting: TypeId) -> Vec<TypeId> {
        self.0.resolving_contexts(graph, requesting)
    }
}
