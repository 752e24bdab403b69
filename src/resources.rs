//! Consumer-facing resource access.
//!
//! [`Resources`] wraps a resolved store chain together with the identity of
//! the type that requested it. Lookups traverse the whole chain, parent
//! included. `find_*` accessors return `None` for absent keys; `get_*`
//! accessors raise the missing-key error carrying the key and the
//! requesting type. Typed accessors fail hard when a present value cannot
//! be coerced.

use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::error::{ResourceError, ResourceResult};
use crate::message::format_message;
use crate::store::ResourceStore;
use crate::typegraph::TypeId;

/// Access to the resources resolved for one requesting type.
#[derive(Debug)]
pub struct Resources {
    context: TypeId,
    context_name: String,
    store: ResourceStore,
}

impl Resources {
    /// Wraps a store chain for the given requesting type.
    #[must_use]
    pub fn new(context: TypeId, context_name: impl Into<String>, store: ResourceStore) -> Self {
        Self {
            context,
            context_name: context_name.into(),
            store,
        }
    }

    /// The originally requesting type.
    #[must_use]
    pub fn context(&self) -> TypeId {
        self.context
    }

    /// Qualified name of the originally requesting type.
    #[must_use]
    pub fn context_name(&self) -> &str {
        &self.context_name
    }

    /// The underlying store chain.
    #[must_use]
    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    /// Whether a value exists for `key` anywhere along the chain.
    #[must_use]
    pub fn has_resource(&self, key: &str) -> bool {
        self.store.find(key).is_some()
    }

    /// The string value for `key`, if present anywhere along the chain.
    #[must_use]
    pub fn find_string(&self, key: &str) -> Option<String> {
        self.store.find(key)
    }

    /// Like [`Resources::find_string`], applying positional template
    /// formatting when arguments are given.
    #[must_use]
    pub fn find_string_with(&self, key: &str, args: &[&dyn fmt::Display]) -> Option<String> {
        let value = self.store.find(key)?;
        if args.is_empty() {
            Some(value)
        } else {
            Some(format_message(&value, args))
        }
    }

    /// The string value for `key`.
    ///
    /// # Errors
    ///
    /// Raises [`ResourceError::MissingKey`] when the key is absent from the
    /// entire chain.
    pub fn get_string(&self, key: &str) -> ResourceResult<String> {
        self.find_string(key).ok_or_else(|| self.missing(key))
    }

    /// Like [`Resources::get_string`], applying positional template
    /// formatting when arguments are given.
    ///
    /// # Errors
    ///
    /// Raises [`ResourceError::MissingKey`] when the key is absent from the
    /// entire chain.
    pub fn get_string_with(
        &self,
        key: &str,
        args: &[&dyn fmt::Display],
    ) -> ResourceResult<String> {
        self.find_string_with(key, args)
            .ok_or_else(|| self.missing(key))
    }

    /// The boolean value for `key`, if present. Accepts `true`/`false` in
    /// any case.
    ///
    /// # Errors
    ///
    /// A present value that is not a boolean is a hard
    /// [`ResourceError::InvalidValue`].
    pub fn find_bool(&self, key: &str) -> ResourceResult<Option<bool>> {
        self.coerce(key, "bool", |value| {
            value.to_ascii_lowercase().parse::<bool>().ok()
        })
    }

    /// The required boolean value for `key`.
    ///
    /// # Errors
    ///
    /// Raises the missing-key error when absent, or an invalid-value error
    /// when present but malformed.
    pub fn get_bool(&self, key: &str) -> ResourceResult<bool> {
        self.require(key, self.find_bool(key)?)
    }

    /// The 32-bit integer value for `key`, if present.
    ///
    /// # Errors
    ///
    /// A present value that does not parse is a hard
    /// [`ResourceError::InvalidValue`].
    pub fn find_i32(&self, key: &str) -> ResourceResult<Option<i32>> {
        self.coerce(key, "i32", |value| value.trim().parse().ok())
    }

    /// The required 32-bit integer value for `key`.
    ///
    /// # Errors
    ///
    /// Raises the missing-key error when absent, or an invalid-value error
    /// when present but malformed.
    pub fn get_i32(&self, key: &str) -> ResourceResult<i32> {
        self.require(key, self.find_i32(key)?)
    }

    /// The 64-bit integer value for `key`, if present.
    ///
    /// # Errors
    ///
    /// A present value that does not parse is a hard
    /// [`ResourceError::InvalidValue`].
    pub fn find_i64(&self, key: &str) -> ResourceResult<Option<i64>> {
        self.coerce(key, "i64", |value| value.trim().parse().ok())
    }

    /// The required 64-bit integer value for `key`.
    ///
    /// # Errors
    ///
    /// Raises the missing-key error when absent, or an invalid-value error
    /// when present but malformed.
    pub fn get_i64(&self, key: &str) -> ResourceResult<i64> {
        self.require(key, self.find_i64(key)?)
    }

    /// The floating-point value for `key`, if present.
    ///
    /// # Errors
    ///
    /// A present value that does not parse is a hard
    /// [`ResourceError::InvalidValue`].
    pub fn find_f64(&self, key: &str) -> ResourceResult<Option<f64>> {
        self.coerce(key, "f64", |value| value.trim().parse().ok())
    }

    /// The required floating-point value for `key`.
    ///
    /// # Errors
    ///
    /// Raises the missing-key error when absent, or an invalid-value error
    /// when present but malformed.
    pub fn get_f64(&self, key: &str) -> ResourceResult<f64> {
        self.require(key, self.find_f64(key)?)
    }

    /// The URI value for `key`, if present.
    ///
    /// # Errors
    ///
    /// A present value that is not an absolute URI is a hard
    /// [`ResourceError::InvalidValue`].
    pub fn find_uri(&self, key: &str) -> ResourceResult<Option<Url>> {
        self.coerce(key, "URI", |value| Url::parse(value.trim()).ok())
    }

    /// The required URI value for `key`.
    ///
    /// # Errors
    ///
    /// Raises the missing-key error when absent, or an invalid-value error
    /// when present but malformed.
    pub fn get_uri(&self, key: &str) -> ResourceResult<Url> {
        self.require(key, self.find_uri(key)?)
    }

    /// The filesystem path value for `key`, if present. Any string is a
    /// valid path.
    #[must_use]
    pub fn find_path(&self, key: &str) -> Option<PathBuf> {
        self.store.find(key).map(PathBuf::from)
    }

    /// The required filesystem path value for `key`.
    ///
    /// # Errors
    ///
    /// Raises the missing-key error when absent.
    pub fn get_path(&self, key: &str) -> ResourceResult<PathBuf> {
        self.find_path(key).ok_or_else(|| self.missing(key))
    }

    fn coerce<T>(
        &self,
        key: &str,
        expected: &'static str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> ResourceResult<Option<T>> {
        match self.store.find(key) {
            None => Ok(None),
            Some(value) => match parse(&value) {
                Some(parsed) => Ok(Some(parsed)),
                None => Err(ResourceError::InvalidValue {
                    key: key.to_string(),
                    expected,
                    value,
                }),
            },
        }
    }

    fn require<T>(&self, key: &str, found: Option<T>) -> ResourceResult<T> {
        found.ok_or_else(|| self.missing(key))
    }

    fn missing(&self, key: &str) -> ResourceError {
        ResourceError::missing_key(key, self.context_name.clone())
    }
}
