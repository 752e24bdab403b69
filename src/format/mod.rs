//! Resource formats and the format-loader registry.
//!
//! A [`FormatLoader`] turns the raw bytes of one located resource into a
//! flat [`ResourceMap`], and declares the filename-suffix identifiers it
//! serves. The [`FormatRegistry`] is built once at startup from a sequence
//! of caller-supplied loaders folded over an identifier-keyed map (the
//! last registration per identifier wins) plus one pre-seeded built-in
//! loader for the legacy properties format. It is read-only afterwards.

pub mod properties;
mod structured;

pub use properties::PropertiesLoader;
pub use structured::JsonResourceLoader;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::DecodeError;
use crate::store::ResourceMap;

/// The identifier of the built-in legacy properties format.
pub const PROPERTIES_FORMAT: &str = "properties";

/// Decodes the bytes of one resource into a flat string store.
pub trait FormatLoader: Send + Sync {
    /// The filename-suffix identifiers this loader serves, e.g.
    /// `["properties"]`.
    fn extensions(&self) -> Vec<String>;

    /// Decodes a complete resource.
    ///
    /// # Errors
    ///
    /// Any failure here means "found but undecodable": a hard error for
    /// the caller, never a silent skip.
    fn load(&self, bytes: &[u8]) -> Result<ResourceMap, DecodeError>;
}

/// Identifier-keyed registry of format loaders.
///
/// Acquisition iterates custom registrations first, in first-registration
/// order, then the built-in `properties` identifier if no registration
/// displaced it. Registering several loaders for one identifier keeps the
/// identifier's original position and the last loader.
pub struct FormatRegistry {
    custom: IndexMap<String, Arc<dyn FormatLoader>>,
    builtin: Arc<dyn FormatLoader>,
    builtin_displaced: bool,
}

impl FormatRegistry {
    /// Builds a registry from the given loaders plus the pre-seeded
    /// built-in properties loader.
    #[must_use]
    pub fn new<I>(loaders: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn FormatLoader>>,
    {
        let mut custom: IndexMap<String, Arc<dyn FormatLoader>> = IndexMap::new();
        let mut builtin_displaced = false;
        for loader in loaders {
            for extension in loader.extensions() {
                if extension == PROPERTIES_FORMAT {
                    builtin_displaced = true;
                }
                custom.insert(extension, Arc::clone(&loader));
            }
        }
        Self {
            custom,
            builtin: Arc::new(PropertiesLoader),
            builtin_displaced,
        }
    }

    /// Registry holding only the built-in properties loader.
    #[must_use]
    pub fn builtin_only() -> Self {
        Self::new(std::iter::empty())
    }

    /// The registered format identifiers in acquisition order, each with its
    /// loader and whether it is the pre-seeded built-in entry.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Arc<dyn FormatLoader>, bool)> {
        let custom = self
            .custom
            .iter()
            .map(|(format, loader)| (format.as_str(), loader, false));
        let builtin = (!self.builtin_displaced)
            .then_some((PROPERTIES_FORMAT, &self.builtin, true));
        custom.chain(builtin)
    }

    /// The registered format identifiers in acquisition order.
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.entries().map(|(format, _, _)| format)
    }

    /// The loader serving `format`, if one is registered.
    #[must_use]
    pub fn loader(&self, format: &str) -> Option<&Arc<dyn FormatLoader>> {
        self.custom.get(format).or_else(|| {
            (format == PROPERTIES_FORMAT && !self.builtin_displaced).then_some(&self.builtin)
        })
    }

    /// Number of registered identifiers, the built-in included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.custom.len() + usize::from(!self.builtin_displaced)
    }

    /// A registry always holds at least the built-in entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin_only()
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.formats().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeLoader {
        extensions: Vec<String>,
    }

    impl FakeLoader {
        fn new(extensions: &[&str]) -> Arc<dyn FormatLoader> {
            Arc::new(Self {
                extensions: extensions.iter().map(|e| (*e).to_string()).collect(),
            })
        }
    }

    impl FormatLoader for FakeLoader {
        fn extensions(&self) -> Vec<String> {
            self.extensions.clone()
        }

        fn load(&self, _bytes: &[u8]) -> Result<ResourceMap, DecodeError> {
            Ok(ResourceMap::new())
        }
    }

    #[test]
    fn test_builtin_only_registry() {
        let registry = FormatRegistry::builtin_only();
        assert_eq!(registry.formats().collect::<Vec<_>>(), vec!["properties"]);
        assert!(registry.loader("properties").is_some());
        assert!(registry.loader("json").is_none());
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_custom_formats_precede_builtin() {
        let registry = FormatRegistry::new([
            FakeLoader::new(&["json"]),
            FakeLoader::new(&["toml"]),
        ]);
        assert_eq!(
            registry.formats().collect::<Vec<_>>(),
            vec!["json", "toml", "properties"]
        );
    }

    #[test]
    fn test_last_registration_wins_keeping_position() {
        let first = FakeLoader::new(&["json"]);
        let second = FakeLoader::new(&["json"]);
        let registry = FormatRegistry::new([
            Arc::clone(&first),
            FakeLoader::new(&["toml"]),
            Arc::clone(&second),
        ]);
        assert_eq!(
            registry.formats().collect::<Vec<_>>(),
            vec!["json", "toml", "properties"]
        );
        let resolved = registry.loader("json").unwrap();
        assert!(Arc::ptr_eq(resolved, &second));
    }

    #[test]
    fn test_explicit_properties_registration_displaces_builtin() {
        let replacement = FakeLoader::new(&["properties"]);
        let registry = FormatRegistry::new([Arc::clone(&replacement)]);
        assert_eq!(registry.formats().collect::<Vec<_>>(), vec!["properties"]);
        let resolved = registry.loader("properties").unwrap();
        assert!(Arc::ptr_eq(resolved, &replacement));
        // the displaced entry no longer counts as built-in
        let (_, _, builtin) = registry.entries().next().unwrap();
        assert!(!builtin);
    }
}
