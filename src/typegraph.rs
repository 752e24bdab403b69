//! The type graph that resolution contexts are drawn from.
//!
//! Resource resolution walks a nominal type hierarchy: a type, its supertype
//! chain, and the interfaces each of those declares. Rather than relying on
//! runtime reflection, the hierarchy is supplied explicitly as a
//! [`TypeGraph`], a capability with direct-supertype and direct-interface
//! accessors, usually through the [`TypeRegistry`] implementation, which
//! interns types by qualified name.
//!
//! Registration hands out [`TypeId`] handles, and supertypes/interfaces are
//! referenced by handles obtained from earlier registrations, so the graph
//! is acyclic by construction.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, ResourceResult};

/// Opaque handle to a type interned in a [`TypeRegistry`].
///
/// Identity is nominal: two ids are the same type exactly when they are
/// equal. Ids are only meaningful against the registry that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeId(u32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// Read access to a nominal type hierarchy.
///
/// The graph supplies exactly what the ordering algorithm consumes: a
/// direct supertype, the directly declared interfaces in declaration order,
/// and the qualified name candidate-name derivation starts from.
pub trait TypeGraph: Send + Sync {
    /// The direct supertype, or `None` at the top of a chain.
    ///
    /// There is no implicit universal root: a chain simply ends.
    fn supertype(&self, ty: TypeId) -> Option<TypeId>;

    /// The directly declared interfaces, in declaration order. For an
    /// interface type these are its parent interfaces.
    fn interfaces(&self, ty: TypeId) -> &[TypeId];

    /// The qualified dotted name, e.g. `com.example.app.Widget`.
    fn qualified_name(&self, ty: TypeId) -> &str;

    /// Whether the type sits inside a loading boundary that can be searched
    /// for resources. Platform-rooted types answer `false` and contribute no
    /// store during acquisition.
    fn has_loading_boundary(&self, ty: TypeId) -> bool;
}

/// Declaration of a single type for [`TypeRegistry::define`].
///
/// # Example
///
/// ```
/// use polyres::{TypeRegistry, TypeSpec};
///
/// let mut registry = TypeRegistry::new();
/// let shape = registry.define(TypeSpec::new("com.example.Shape"))?;
/// let drawable = registry.define(TypeSpec::new("com.example.Drawable"))?;
/// let circle = registry.define(
///     TypeSpec::new("com.example.Circle")
///         .extends(shape)
///         .implements([drawable]),
/// )?;
/// # let _ = circle;
/// # Ok::<(), polyres::ResourceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TypeSpec {
    name: String,
    supertype: Option<TypeId>,
    interfaces: Vec<TypeId>,
    platform: bool,
}

impl TypeSpec {
    /// Starts a declaration for the given qualified name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertype: None,
            interfaces: Vec::new(),
            platform: false,
        }
    }

    /// Declares the direct supertype.
    #[must_use]
    pub fn extends(mut self, supertype: TypeId) -> Self {
        self.supertype = Some(supertype);
        self
    }

    /// Declares directly implemented interfaces, in declaration order. For
    /// an interface declaration, these are its parent interfaces.
    #[must_use]
    pub fn implements(mut self, interfaces: impl IntoIterator<Item = TypeId>) -> Self {
        self.interfaces.extend(interfaces);
        self
    }

    /// Marks the type as platform-rooted: it has no loading boundary and is
    /// skipped during store acquisition.
    #[must_use]
    pub fn platform(mut self) -> Self {
        self.platform = true;
        self
    }
}

struct TypeEntry {
    name: String,
    supertype: Option<TypeId>,
    interfaces: Vec<TypeId>,
    platform: bool,
}

/// Interning [`TypeGraph`] implementation.
///
/// Populated once at startup and read-only thereafter; share it behind an
/// `Arc` once resolution begins.
#[derive(Default)]
pub struct TypeRegistry {
    entries: Vec<TypeEntry>,
    by_name: HashMap<String, TypeId>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a type declaration and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the qualified name is empty or
    /// already defined, or if a referenced handle was not issued by this
    /// registry.
    pub fn define(&mut self, spec: TypeSpec) -> ResourceResult<TypeId> {
        if spec.name.is_empty() {
            return Err(ResourceError::configuration("type name must not be empty"));
        }
        if self.by_name.contains_key(&spec.name) {
            return Err(ResourceError::configuration(format!(
                "type '{}' is already defined",
                spec.name
            )));
        }
        for referenced in spec.supertype.iter().chain(spec.interfaces.iter()) {
            if referenced.0 as usize >= self.entries.len() {
                return Err(ResourceError::configuration(format!(
                    "type '{}' references unknown {referenced}",
                    spec.name
                )));
            }
        }
        let id = TypeId(u32::try_from(self.entries.len()).map_err(|_| {
            ResourceError::configuration("type registry is full")
        })?);
        self.by_name.insert(spec.name.clone(), id);
        self.entries.push(TypeEntry {
            name: spec.name,
            supertype: spec.supertype,
            interfaces: spec.interfaces,
            platform: spec.platform,
        });
        Ok(id)
    }

    /// Looks up a previously defined type by qualified name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Number of defined types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no types have been defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, ty: TypeId) -> &TypeEntry {
        &self.entries[ty.0 as usize]
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.entries.len())
            .finish()
    }
}

impl TypeGraph for TypeRegistry {
    fn supertype(&self, ty: TypeId) -> Option<TypeId> {
        self.entry(ty).supertype
    }

    fn interfaces(&self, ty: TypeId) -> &[TypeId] {
        &self.entry(ty).interfaces
    }

    fn qualified_name(&self, ty: TypeId) -> &str {
        &self.entry(ty).name
    }

    fn has_loading_boundary(&self, ty: TypeId) -> bool {
        !self.entry(ty).platform
    }
}
