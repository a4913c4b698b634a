//! Configuration for structured-object adapters.
//!
//! This module provides the types that specialize an
//! [`ObjectAdapter`](crate::ObjectAdapter) for one class:
//!
//! - [`ObjectConfig`]: the class name, field inclusion/exclusion lists, and
//!   per-field specs, built builder-style
//! - [`FieldSpec`]: access mode, optional resolver override, and optional
//!   accessor hooks for a single field
//! - [`FieldAccess`]: read-only, write-only, or read-write
//!
//! Field access goes through an accessor table: a custom getter or setter
//! hook is consulted first, and the object's generic field storage is the
//! fallback.
//!
//! ## Examples
//!
//! ```rust
//! use recast::{FieldAccess, ObjectConfig, SchemaResolver, TypeDesc};
//!
//! let config = ObjectConfig::for_class("Book")
//!     .exclude(["internal_id"])
//!     .with_access("isbn", FieldAccess::ReadOnly)
//!     .with_resolver("pages", SchemaResolver::hint(TypeDesc::Int));
//!
//! assert_eq!(config.class(), Some("Book"));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::schema::SchemaResolver;
use crate::value::ObjectValue;
use crate::{Result, Value};

/// How a field may be used during conversion.
///
/// A read-only field is decomposed but never written back; a write-only
/// field is recomposed but never read out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FieldAccess {
    ReadOnly,
    WriteOnly,
    #[default]
    ReadWrite,
}

/// A custom field reader, consulted before generic field access.
pub type Getter = Arc<dyn Fn(&ObjectValue) -> Result<Value> + Send + Sync>;

/// A custom field writer, consulted before generic field access.
pub type Setter = Arc<dyn Fn(&mut ObjectValue, Value) -> Result<()> + Send + Sync>;

/// Per-field configuration: access mode, resolver override, accessor hooks.
#[derive(Clone, Default)]
pub struct FieldSpec {
    pub access: FieldAccess,
    pub resolver: Option<SchemaResolver>,
    pub get: Option<Getter>,
    pub set: Option<Setter>,
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("access", &self.access)
            .field("resolver", &self.resolver)
            .field("get", &self.get.as_ref().map(|_| "<hook>"))
            .field("set", &self.set.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

/// Specializes an object adapter for one class.
///
/// All lists are optional: an empty config describes the generic object
/// adapter that decomposes every stored field and recomposes anonymously.
#[derive(Clone, Debug, Default)]
pub struct ObjectConfig {
    class: Option<String>,
    include: Vec<String>,
    exclude: Vec<String>,
    fields: IndexMap<String, FieldSpec>,
}

impl ObjectConfig {
    /// Creates an anonymous, all-fields config.
    #[must_use]
    pub fn new() -> Self {
        ObjectConfig::default()
    }

    /// Creates a config bound to a class name; recomposed objects carry it.
    #[must_use]
    pub fn for_class(class: impl Into<String>) -> Self {
        ObjectConfig {
            class: Some(class.into()),
            ..ObjectConfig::default()
        }
    }

    /// Limits conversion to the listed fields, in list order.
    #[must_use]
    pub fn include<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Excludes the listed fields from conversion.
    #[must_use]
    pub fn exclude<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the whole spec for one field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Sets the resolver override for one field.
    #[must_use]
    pub fn with_resolver(mut self, name: impl Into<String>, resolver: SchemaResolver) -> Self {
        self.fields.entry(name.into()).or_default().resolver = Some(resolver);
        self
    }

    /// Sets the access mode for one field.
    #[must_use]
    pub fn with_access(mut self, name: impl Into<String>, access: FieldAccess) -> Self {
        self.fields.entry(name.into()).or_default().access = access;
        self
    }

    /// Installs a custom getter hook for one field.
    #[must_use]
    pub fn with_getter<F>(mut self, name: impl Into<String>, get: F) -> Self
    where
        F: Fn(&ObjectValue) -> Result<Value> + Send + Sync + 'static,
    {
        self.fields.entry(name.into()).or_default().get = Some(Arc::new(get));
        self
    }

    /// Installs a custom setter hook for one field.
    #[must_use]
    pub fn with_setter<F>(mut self, name: impl Into<String>, set: F) -> Self
    where
        F: Fn(&mut ObjectValue, Value) -> Result<()> + Send + Sync + 'static,
    {
        self.fields.entry(name.into()).or_default().set = Some(Arc::new(set));
        self
    }

    /// The configured class name, if any.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// The inclusion list; empty means "all fields".
    #[must_use]
    pub fn included(&self) -> &[String] {
        &self.include
    }

    /// The spec for a field, if one was declared.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Iterates the declared field specs in declaration order.
    pub fn declared_fields(&self) -> impl Iterator<Item = (&String, &FieldSpec)> {
        self.fields.iter()
    }

    fn admitted(&self, name: &str) -> bool {
        if self.exclude.iter().any(|f| f == name) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|f| f == name)
    }

    /// Whether a field takes part in decomposition.
    #[must_use]
    pub fn dumpable(&self, name: &str) -> bool {
        self.admitted(name)
            && self
                .field(name)
                .map_or(true, |spec| spec.access != FieldAccess::WriteOnly)
    }

    /// Whether a field takes part in recomposition.
    #[must_use]
    pub fn loadable(&self, name: &str) -> bool {
        self.admitted(name)
            && self
                .field(name)
                .map_or(true, |spec| spec.access != FieldAccess::ReadOnly)
    }
}
