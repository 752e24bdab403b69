//! Store acquisition: candidate name × format × locale tier search.
//!
//! Given one resolution context and a locale, the acquirer materializes at
//! most one [`ResourceMap`] by walking the candidate names in order and,
//! for each, every registered format over every locale-specificity tier,
//! most specific first. The first located resource is decoded and wins the
//! entire search; a located resource that fails to decode is a hard error,
//! with the single built-in-properties retry described on
//! [`format::PropertiesLoader`](crate::PropertiesLoader).

use std::sync::Arc;

use crate::error::{ResourceError, ResourceResult};
use crate::format::{self, FormatRegistry};
use crate::locale::Locale;
use crate::naming::CandidateNames;
use crate::provider::ResourceProvider;
use crate::store::ResourceMap;
use crate::typegraph::{TypeGraph, TypeId};

/// Materializes concrete stores for resolution contexts.
pub struct StoreAcquirer {
    provider: Arc<dyn ResourceProvider>,
    names: CandidateNames,
    formats: Arc<FormatRegistry>,
}

impl StoreAcquirer {
    /// Creates an acquirer over the given provider, name strategy, and
    /// format registry.
    #[must_use]
    pub fn new(
        provider: Arc<dyn ResourceProvider>,
        names: CandidateNames,
        formats: Arc<FormatRegistry>,
    ) -> Self {
        Self {
            provider,
            names,
            formats,
        }
    }

    /// The candidate-name strategy in use.
    #[must_use]
    pub fn candidate_names(&self) -> &CandidateNames {
        &self.names
    }

    /// Attempts to load a store for `context` in `locale`.
    ///
    /// Returns `Ok(None)` when the context is platform-rooted or when every
    /// candidate name, format, and locale tier comes up empty; absence is
    /// not an error. `reload` is forwarded to the provider as a
    /// cache-bypass hint.
    ///
    /// # Errors
    ///
    /// A located resource that cannot be read or decoded surfaces as a hard
    /// error, except that a strict UTF-8 failure under the pre-seeded
    /// built-in properties loader is retried once with single-byte
    /// decoding.
    pub fn acquire(
        &self,
        graph: &dyn TypeGraph,
        context: TypeId,
        locale: &Locale,
        reload: bool,
    ) -> ResourceResult<Option<ResourceMap>> {
        if !graph.has_loading_boundary(context) {
            return Ok(None);
        }
        let suffixes = locale.suffixes();
        for name in self.names.names(graph, context)? {
            let base = name.replace('.', "/");
            for (extension, loader, builtin) in self.formats.entries() {
                for suffix in &suffixes {
                    let path = format!("{base}{suffix}.{extension}");
                    let Some(bytes) = self.provider.read(&path, reload)? else {
                        continue;
                    };
                    return match loader.load(&bytes) {
                        Ok(map) => Ok(Some(map)),
                        Err(err) if builtin && err.is_utf8() => {
                            // legacy single-byte sources predate the
                            // UTF-8 default; retry exactly once
                            format::properties::load_latin1(&bytes)
                                .map(Some)
                                .map_err(|retry| ResourceError::Decode {
                                    path,
                                    source: retry,
                                })
                        }
                        Err(err) => Err(ResourceError::Decode { path, source: err }),
                    };
                }
            }
        }
        Ok(None)
    }
}

impl std::fmt::Debug for StoreAcquirer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreAcquirer")
            .field("names", &self.names)
            .field("formats", &self.formats)
            .finish_non_exhaustive()
    }
}
