//! Candidate-name strategies.
//!
//! Each resolution context maps to one or more candidate names: the base
//! names tried against the storage layer, in order, first success winning.
//! The built-in variants compose the context's own qualified type name with
//! explicitly configured names, or use either exclusively.

use crate::error::{ResourceError, ResourceResult};
use crate::typegraph::{TypeGraph, TypeId};

/// Strategy producing the ordered candidate names for one resolution
/// context.
///
/// Names are opaque to the strategy; only the acquirer interprets them as
/// resource locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateNames {
    /// The context's qualified type name alone.
    TypeName,
    /// The fixed names first, then the context's qualified type name.
    NamesThenTypeName(Vec<String>),
    /// The context's qualified type name first, then the fixed names.
    TypeNameThenNames(Vec<String>),
    /// Only the fixed names; the context contributes nothing.
    NamesOnly(Vec<String>),
}

impl CandidateNames {
    /// Strategy using only the context's qualified type name.
    #[must_use]
    pub const fn type_name() -> Self {
        Self::TypeName
    }

    /// Strategy trying the given names before the type name.
    #[must_use]
    pub fn names_then_type_name<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::NamesThenTypeName(names.into_iter().map(Into::into).collect())
    }

    /// Strategy trying the type name before the given names.
    #[must_use]
    pub fn type_name_then_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::TypeNameThenNames(names.into_iter().map(Into::into).collect())
    }

    /// Strategy trying only the given names.
    #[must_use]
    pub fn names_only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::NamesOnly(names.into_iter().map(Into::into).collect())
    }

    /// The candidate names for one context, in lookup order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a [`CandidateNames::NamesOnly`]
    /// strategy configured with no names at all; such a strategy can never
    /// name a resource and must not silently default.
    pub fn names(&self, graph: &dyn TypeGraph, context: TypeId) -> ResourceResult<Vec<String>> {
        let type_name = || graph.qualified_name(context).to_string();
        match self {
            Self::TypeName => Ok(vec![type_name()]),
            Self::NamesThenTypeName(fixed) => {
                let mut names = fixed.clone();
                names.push(type_name());
                Ok(names)
            }
            Self::TypeNameThenNames(fixed) => {
                let mut names = vec![type_name()];
                names.extend(fixed.iter().cloned());
                Ok(names)
            }
            Self::NamesOnly(fixed) => {
                if fixed.is_empty() {
                    return Err(ResourceError::configuration(
                        "candidate-name strategy has no fixed names and ignores the context",
                    ));
                }
                Ok(fixed.clone())
            }
        }
    }
}

impl Default for CandidateNames {
    fn default() -> Self {
        Self::TypeName
    }
}
