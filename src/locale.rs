//! Locale identification and per-category locale selection.
//!
//! A [`Locale`] names a language, optionally narrowed by a region and a
//! variant. Locales order resource lookups by specificity: the acquirer asks
//! for the most specific bundle first and walks down to the
//! locale-independent root. [`LocaleSelection`] holds the locales active for
//! each [`LocaleCategory`], falling back to a configured default when a
//! category has not been set.

use std::fmt;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static LANGUAGE_PATTERN: OnceLock<Regex> = OnceLock::new();
static REGION_PATTERN: OnceLock<Regex> = OnceLock::new();
static VARIANT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn language_pattern() -> &'static Regex {
    LANGUAGE_PATTERN.get_or_init(|| Regex::new("^[a-zA-Z]{2,8}$").unwrap())
}

fn region_pattern() -> &'static Regex {
    REGION_PATTERN.get_or_init(|| Regex::new("^([a-zA-Z]{2}|[0-9]{3})$").unwrap())
}

fn variant_pattern() -> &'static Regex {
    VARIANT_PATTERN.get_or_init(|| Regex::new("^[a-zA-Z0-9]{1,8}$").unwrap())
}

/// Errors producing a [`Locale`] from caller-supplied subtags.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleParseError {
    /// The language subtag is not 2-8 letters.
    #[error("invalid language subtag '{0}'")]
    InvalidLanguage(String),

    /// The region subtag is not 2 letters or 3 digits.
    #[error("invalid region subtag '{0}'")]
    InvalidRegion(String),

    /// The variant subtag is not 1-8 alphanumeric characters.
    #[error("invalid variant subtag '{0}'")]
    InvalidVariant(String),

    /// The tag has more subtags than language, region, and variant.
    #[error("locale tag '{0}' has too many subtags")]
    TooManySubtags(String),
}

/// A language, optionally narrowed by region and variant.
///
/// The empty [`Locale::root`] locale is the locale-independent terminal tier
/// of every lookup.
///
/// # Examples
///
/// ```
/// use polyres::Locale;
///
/// let locale: Locale = "fr-CA".parse()?;
/// assert_eq!(locale.language(), "fr");
/// assert_eq!(locale.region(), Some("CA"));
/// assert_eq!(locale.to_string(), "fr_CA");
/// # Ok::<(), polyres::LocaleParseError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    language: String,
    region: Option<String>,
    variant: Option<String>,
}

impl Locale {
    /// The locale-independent root locale.
    #[must_use]
    pub fn root() -> Self {
        Self {
            language: String::new(),
            region: None,
            variant: None,
        }
    }

    /// Creates a locale for the given language subtag.
    ///
    /// The subtag is normalized to lowercase.
    pub fn new(language: &str) -> Result<Self, LocaleParseError> {
        if !language_pattern().is_match(language) {
            return Err(LocaleParseError::InvalidLanguage(language.to_string()));
        }
        Ok(Self {
            language: language.to_ascii_lowercase(),
            region: None,
            variant: None,
        })
    }

    /// Narrows this locale with a region subtag, normalized to uppercase.
    pub fn with_region(mut self, region: &str) -> Result<Self, LocaleParseError> {
        if !region_pattern().is_match(region) {
            return Err(LocaleParseError::InvalidRegion(region.to_string()));
        }
        self.region = Some(region.to_ascii_uppercase());
        Ok(self)
    }

    /// Narrows this locale with a variant subtag, kept as given.
    pub fn with_variant(mut self, variant: &str) -> Result<Self, LocaleParseError> {
        if !variant_pattern().is_match(variant) {
            return Err(LocaleParseError::InvalidVariant(variant.to_string()));
        }
        self.variant = Some(variant.to_string());
        Ok(self)
    }

    /// The language subtag, empty for the root locale.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The region subtag, if any.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The variant subtag, if any.
    #[must_use]
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Returns true for the locale-independent root locale.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.language.is_empty()
    }

    /// Bundle-name suffixes for every specificity tier of this locale, most
    /// specific first, ending with the empty root suffix.
    ///
    /// For `en_US_legacy` the tiers are `_en_US_legacy`, `_en_US`, `_en`,
    /// and the empty string. The root locale yields only the empty suffix.
    /// A variant without a region keeps the empty region slot, as in
    /// `_en__legacy`.
    #[must_use]
    pub fn suffixes(&self) -> Vec<String> {
        if self.is_root() {
            return vec![String::new()];
        }
        let mut tiers = Vec::with_capacity(4);
        let language = format!("_{}", self.language);
        if let Some(variant) = &self.variant {
            let region = self.region.as_deref().unwrap_or("");
            tiers.push(format!("{language}_{region}_{variant}"));
        }
        if let Some(region) = &self.region {
            tiers.push(format!("{language}_{region}"));
        }
        tiers.push(language);
        tiers.push(String::new());
        tiers
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        match (&self.region, &self.variant) {
            (Some(region), Some(variant)) => write!(f, "_{region}_{variant}"),
            (Some(region), None) => write!(f, "_{region}"),
            (None, Some(variant)) => write!(f, "__{variant}"),
            (None, None) => Ok(()),
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleParseError;

    /// Parses a locale tag with `-` or `_` subtag separators.
    ///
    /// The empty string parses to the root locale.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        if tag.is_empty() {
            return Ok(Self::root());
        }
        let mut subtags = tag.split(['-', '_']);
        let mut locale = match subtags.next() {
            Some(language) => Self::new(language)?,
            None => return Ok(Self::root()),
        };
        if let Some(region) = subtags.next() {
            // an empty region slot carries a bare variant, e.g. "en__legacy"
            if !region.is_empty() {
                locale = locale.with_region(region)?;
            }
        }
        if let Some(variant) = subtags.next() {
            locale = locale.with_variant(variant)?;
        }
        if subtags.next().is_some() {
            return Err(LocaleParseError::TooManySubtags(tag.to_string()));
        }
        Ok(locale)
    }
}

/// The purposes a locale can be selected for, mirroring the split between
/// user-visible text and data formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleCategory {
    /// Locale for user-visible resource text.
    Display,
    /// Locale for formatting values inside message templates.
    Format,
}

impl LocaleCategory {
    /// All categories, in storage order.
    pub const ALL: [Self; 2] = [Self::Display, Self::Format];

    fn index(self) -> usize {
        match self {
            Self::Display => 0,
            Self::Format => 1,
        }
    }
}

/// Per-category locale selection with a configured default.
///
/// Reads vastly outnumber writes: the selection is populated at startup and
/// consulted on every resolution that does not pass a locale explicitly.
/// Interior locking keeps the type shareable behind an `Arc`.
#[derive(Debug)]
pub struct LocaleSelection {
    default: Locale,
    selected: RwLock<[Option<Locale>; 2]>,
}

impl LocaleSelection {
    /// Creates a selection whose unset categories fall back to `default`.
    #[must_use]
    pub fn new(default: Locale) -> Self {
        Self {
            default,
            selected: RwLock::new([None, None]),
        }
    }

    /// The configured fallback locale.
    #[must_use]
    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    /// The locale active for the given category, or the default if the
    /// category has not been set.
    #[must_use]
    pub fn get(&self, category: LocaleCategory) -> Locale {
        // a poisoned lock cannot corrupt a plain locale table; keep reading
        let selected = self
            .selected
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        selected[category.index()]
            .clone()
            .unwrap_or_else(|| self.default.clone())
    }

    /// Sets the locale for one category.
    pub fn set(&self, category: LocaleCategory, locale: Locale) {
        let mut selected = self
            .selected
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        selected[category.index()] = Some(locale);
    }

    /// Sets the same locale for every category.
    pub fn set_all(&self, locale: Locale) {
        let mut selected = self
            .selected
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for slot in selected.iter_mut() {
            *slot = Some(locale.clone());
        }
    }
}
