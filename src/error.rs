//! Error types for polyres.
//!
//! All errors are strongly typed using thiserror. The taxonomy mirrors the
//! resolution model: decode failures are hard and surface to the caller,
//! "resource not found" is soft and never appears here (it is expressed as
//! `Ok(None)` at the provider and acquirer boundaries), and missing keys are
//! raised only by the required lookup variants.

use thiserror::Error;

/// Failures decoding the bytes of a located resource.
///
/// A resource that was found but cannot be decoded is always a hard error,
/// with one exception: the acquirer retries a strict UTF-8 failure of the
/// built-in legacy properties format using single-byte decoding before
/// re-surfacing.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The byte stream is not valid for the detected or default encoding.
    #[error("invalid {encoding} byte sequence in resource data")]
    InvalidBytes {
        /// Name of the encoding that rejected the bytes.
        encoding: &'static str,
    },

    /// A `\uXXXX` escape did not contain four hexadecimal digits.
    #[error("malformed \\uXXXX escape on line {line}")]
    MalformedEscape {
        /// One-based logical line number where the escape starts.
        line: usize,
    },

    /// A structured resource document was malformed or held non-scalar values.
    #[error("malformed structured resource: {reason}")]
    Structured {
        /// What the decoder rejected.
        reason: String,
    },
}

impl DecodeError {
    /// Returns true if this is a strict UTF-8 validity failure.
    ///
    /// Only this failure class is eligible for the built-in properties
    /// format's single-byte retry.
    #[must_use]
    pub fn is_utf8(&self) -> bool {
        matches!(self, Self::InvalidBytes { encoding: "UTF-8" })
    }
}

/// Top-level error type for resource resolution and lookup.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A resource was located but its bytes could not be decoded.
    #[error("failed to decode resource '{path}': {source}")]
    Decode {
        /// Provider path of the offending resource.
        path: String,
        /// The underlying decode failure.
        #[source]
        source: DecodeError,
    },

    /// A resource could not be read from its provider.
    #[error("i/o error reading resource '{path}'")]
    Io {
        /// Provider path of the offending resource.
        path: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A required key was absent from the entire chain, parent included.
    #[error("no resource found for key '{key}' requested by {context}")]
    MissingKey {
        /// The key that was looked up.
        key: String,
        /// Qualified name of the originally requesting type.
        context: String,
    },

    /// A stored value exists but is not of the shape the caller demanded.
    #[error("resource '{key}' cannot be read as {expected}: invalid value '{value}'")]
    InvalidValue {
        /// The key whose value was rejected.
        key: String,
        /// The demanded shape, e.g. `"bool"` or `"URI"`.
        expected: &'static str,
        /// The stored value as found.
        value: String,
    },

    /// A component was configured in a way that cannot be used.
    #[error("invalid resolver configuration: {reason}")]
    Configuration {
        /// What is wrong with the configuration.
        reason: String,
    },
}

impl ResourceError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Creates a missing-key error for the given key and requesting type.
    #[must_use]
    pub fn missing_key(key: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingKey {
            key: key.into(),
            context: context.into(),
        }
    }

    /// Returns true if this is a decode failure.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Returns true if this is a missing-key error.
    #[must_use]
    pub const fn is_missing_key(&self) -> bool {
        matches!(self, Self::MissingKey { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Result type alias for resolution and lookup operations.
pub type ResourceResult<T> = Result<T, ResourceError>;
