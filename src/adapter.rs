//! Adapters: the value-kind-specific units of conversion.
//!
//! An [`Adapter`] knows how to decompose a value of its kind into
//! ([`Key`], [`Value`]) pairs, how to recompose such pairs back into a
//! value, and which [`Schema`] its pairs follow. Adapters are stateless and
//! shared; per-type specialization comes from the [`TypeDesc`] they are
//! resolved for (a sequence adapter handed `sequence<int>` declares an
//! int-typed element schema) and, for objects, from an
//! [`ObjectConfig`].
//!
//! Four kinds ship with the engine:
//!
//! - [`IdentityAdapter`]: scalar passthrough
//! - [`SequenceAdapter`]: positional pairs, order restored on recompose
//! - [`MappingAdapter`]: named pairs, emission order preserved
//! - [`ObjectAdapter`]: named pairs through a field-accessor table
//!
//! Values that know their own decomposition implement [`SelfDescribing`]
//! and bypass adapter resolution entirely.

use std::fmt;

use crate::config::ObjectConfig;
use crate::schema::{Key, Schema, SchemaResolver};
use crate::value::ObjectValue;
use crate::{Error, Result, TypeDesc, Value, ValueMap};

/// The value kind an adapter handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdapterKind {
    Scalar,
    Sequence,
    Mapping,
    Object,
}

/// A fallible stream of decomposed pairs, pulled on demand.
pub type Pairs<'a> = &'a mut dyn Iterator<Item = Result<(Key, Value)>>;

/// A value-kind-specific conversion strategy.
///
/// `decompose` must be deterministic for scalar and mapping kinds; for the
/// sequence kind, keys are 0-based positions matching element order. The
/// descriptor argument is the one the adapter was resolved for and drives
/// schema refinement.
pub trait Adapter: Send + Sync {
    /// The kind of value this adapter handles.
    fn kind(&self) -> AdapterKind;

    /// Breaks the subject into (key, value) pairs.
    fn decompose(&self, desc: &TypeDesc, subject: Value) -> Result<Vec<(Key, Value)>>;

    /// The per-key schema of this adapter's pairs, refined by the descriptor
    /// it was resolved for.
    fn schema(&self, desc: &TypeDesc) -> Schema;

    /// Rebuilds a subject from pairs, pulling them on demand.
    fn recompose(&self, desc: &TypeDesc, pairs: Pairs<'_>) -> Result<Value>;
}

/// A value that supplies its own decomposition, bypassing adapter
/// resolution.
///
/// Self-description always takes precedence: the engine uses it even when a
/// registration exists for the value's runtime type. Types that can also
/// rebuild themselves opt into [`SelfDescribing::recompose`] by returning
/// `true` from [`SelfDescribing::can_recompose`]; the engine then reuses
/// them as the recomposer when a cast has no resolvable target.
pub trait SelfDescribing: fmt::Debug + Send + Sync {
    /// Breaks this value into (key, value) pairs.
    fn decompose(&self) -> Result<Vec<(Key, Value)>>;

    /// The per-key schema of the decomposed pairs.
    fn schema(&self) -> Schema;

    /// The runtime descriptor reported for this value.
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::any_object()
    }

    /// Whether this value can serve as a recomposer.
    fn can_recompose(&self) -> bool {
        false
    }

    /// Rebuilds a value of this type from pairs.
    fn recompose(&self, _pairs: Pairs<'_>) -> Result<Value> {
        Err(Error::custom(
            "this self-describing value does not support recompose",
        ))
    }
}

/// Scalar passthrough.
///
/// Decomposes to a single pair under [`Key::Final`]; recompose takes the
/// first incoming pair's value and fails with
/// [`Error::EmptyScalarInput`] when there is none.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityAdapter;

impl Adapter for IdentityAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Scalar
    }

    fn decompose(&self, _desc: &TypeDesc, subject: Value) -> Result<Vec<(Key, Value)>> {
        Ok(vec![(Key::Final, subject)])
    }

    fn schema(&self, _desc: &TypeDesc) -> Schema {
        Schema::terminal()
    }

    fn recompose(&self, _desc: &TypeDesc, pairs: Pairs<'_>) -> Result<Value> {
        match pairs.next() {
            Some(pair) => Ok(pair?.1),
            None => Err(Error::EmptyScalarInput),
        }
    }
}

/// Positional conversion for sequences.
///
/// Recompose sorts incoming pairs by key before rebuilding, decoupling
/// pair-emission order from positional order: the pipeline is free to
/// deliver elements out of order.
#[derive(Clone, Debug, Default)]
pub struct SequenceAdapter {
    element: Option<SchemaResolver>,
}

impl SequenceAdapter {
    /// An adapter whose element schema comes from the resolved descriptor.
    #[must_use]
    pub fn new() -> Self {
        SequenceAdapter { element: None }
    }

    /// An adapter with an explicit element resolver, overriding the
    /// descriptor parameter.
    #[must_use]
    pub fn of(element: SchemaResolver) -> Self {
        SequenceAdapter {
            element: Some(element),
        }
    }
}

impl Adapter for SequenceAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Sequence
    }

    fn decompose(&self, _desc: &TypeDesc, subject: Value) -> Result<Vec<(Key, Value)>> {
        match subject {
            Value::Sequence(items) => Ok(items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Key::Index(i), v))
                .collect()),
            other => Err(Error::type_mismatch("sequence", &other.kind_desc().to_string())),
        }
    }

    fn schema(&self, desc: &TypeDesc) -> Schema {
        if let Some(element) = &self.element {
            return Schema::uniform(element.clone());
        }
        match desc {
            TypeDesc::Sequence(Some(param)) => {
                Schema::uniform(SchemaResolver::hint((**param).clone()))
            }
            _ => Schema::new(),
        }
    }

    fn recompose(&self, _desc: &TypeDesc, pairs: Pairs<'_>) -> Result<Value> {
        let mut entries = pairs.collect::<Result<Vec<(Key, Value)>>>()?;
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Value::Sequence(entries.into_iter().map(|(_, v)| v).collect()))
    }
}

/// Named-pair conversion for mappings.
///
/// Recompose builds in emission order. Explicit per-key overrides can be
/// attached to specialize the schema beyond the descriptor parameter.
#[derive(Clone, Debug, Default)]
pub struct MappingAdapter {
    overrides: Vec<(String, SchemaResolver)>,
}

impl MappingAdapter {
    /// An adapter whose value schema comes from the resolved descriptor.
    #[must_use]
    pub fn new() -> Self {
        MappingAdapter::default()
    }

    /// Attaches an explicit resolver for one key.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, resolver: SchemaResolver) -> Self {
        self.overrides.push((key.into(), resolver));
        self
    }
}

impl Adapter for MappingAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Mapping
    }

    fn decompose(&self, _desc: &TypeDesc, subject: Value) -> Result<Vec<(Key, Value)>> {
        match subject {
            Value::Mapping(map) => Ok(map
                .into_iter()
                .map(|(k, v)| (Key::Name(k), v))
                .collect()),
            other => Err(Error::type_mismatch("mapping", &other.kind_desc().to_string())),
        }
    }

    fn schema(&self, desc: &TypeDesc) -> Schema {
        let mut schema = match desc {
            TypeDesc::Mapping(Some(param)) => {
                Schema::uniform(SchemaResolver::hint((**param).clone()))
            }
            _ => Schema::new(),
        };
        for (key, resolver) in &self.overrides {
            schema = schema.with(Key::name(key.clone()), resolver.clone());
        }
        schema
    }

    fn recompose(&self, _desc: &TypeDesc, pairs: Pairs<'_>) -> Result<Value> {
        let mut map = ValueMap::new();
        for pair in pairs {
            let (key, value) = pair?;
            let name = match key {
                Key::Name(name) => name,
                Key::Index(i) => i.to_string(),
                Key::Final => {
                    return Err(Error::type_mismatch("keyed pair", "final scalar pair"))
                }
            };
            map.insert(name, value);
        }
        Ok(Value::Mapping(map))
    }
}

/// Field-table conversion for structured objects.
///
/// Field access goes through the configured accessor table: getter/setter
/// hooks first, the object's generic field storage as fallback. Inclusion,
/// exclusion, and access-mode settings gate both directions.
#[derive(Clone, Debug, Default)]
pub struct ObjectAdapter {
    config: ObjectConfig,
}

impl ObjectAdapter {
    /// An adapter specialized by the given config.
    #[must_use]
    pub fn new(config: ObjectConfig) -> Self {
        ObjectAdapter { config }
    }

    /// The generic object adapter: every stored field, anonymous class.
    #[must_use]
    pub fn generic() -> Self {
        ObjectAdapter::default()
    }

    fn read_field(&self, obj: &ObjectValue, name: &str) -> Result<Value> {
        if let Some(get) = self.config.field(name).and_then(|spec| spec.get.as_ref()) {
            return get(obj);
        }
        obj.get(name)
            .cloned()
            .ok_or_else(|| Error::missing_field(obj.class(), name))
    }

    fn class_for(&self, desc: &TypeDesc) -> String {
        if let Some(class) = self.config.class() {
            return class.to_string();
        }
        match desc {
            TypeDesc::Object(Some(class)) => class.clone(),
            _ => String::new(),
        }
    }
}

impl Adapter for ObjectAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Object
    }

    fn decompose(&self, _desc: &TypeDesc, subject: Value) -> Result<Vec<(Key, Value)>> {
        let obj = match subject {
            Value::Object(obj) => obj,
            other => {
                return Err(Error::type_mismatch("object", &other.kind_desc().to_string()))
            }
        };
        // Inclusion list order when one is set; otherwise stored fields
        // followed by declared-only fields (those living behind a getter).
        let mut names: Vec<String> = if self.config.included().is_empty() {
            let mut names: Vec<String> = obj.fields().keys().cloned().collect();
            for (name, _) in self.config.declared_fields() {
                if !obj.fields().contains_key(name) {
                    names.push(name.clone());
                }
            }
            names
        } else {
            self.config.included().to_vec()
        };
        names.retain(|name| self.config.dumpable(name));

        let mut pairs = Vec::with_capacity(names.len());
        for name in names {
            let value = self.read_field(&obj, &name)?;
            pairs.push((Key::Name(name), value));
        }
        Ok(pairs)
    }

    fn schema(&self, _desc: &TypeDesc) -> Schema {
        let mut schema = Schema::new();
        for (name, spec) in self.config.declared_fields() {
            if let Some(resolver) = &spec.resolver {
                schema = schema.with(Key::name(name.clone()), resolver.clone());
            }
        }
        schema
    }

    fn recompose(&self, desc: &TypeDesc, pairs: Pairs<'_>) -> Result<Value> {
        let mut obj = ObjectValue::new(self.class_for(desc));
        for pair in pairs {
            let (key, value) = pair?;
            let name = match key {
                Key::Name(name) => name,
                Key::Index(i) => i.to_string(),
                Key::Final => {
                    return Err(Error::type_mismatch("keyed pair", "final scalar pair"))
                }
            };
            if !self.config.loadable(&name) {
                continue;
            }
            match self.config.field(&name).and_then(|spec| spec.set.clone()) {
                Some(set) => set(&mut obj, value)?,
                None => obj.set(name, value),
            }
        }
        Ok(Value::Object(obj))
    }
}
