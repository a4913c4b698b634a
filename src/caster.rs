//! The conversion engine.
//!
//! A [`Caster`] owns two read-only [`SpecializationMap`]s — the preferred
//! map consulted for explicit hints on either side, and the fallback map
//! consulted only when the target hint carries no type information — and
//! drives the recursive decompose/pipe/recompose cycle for one value at a
//! time.
//!
//! ## Usage
//!
//! Most conversions go through a caster with the built-in registrations:
//!
//! ```rust
//! use recast::{value, Caster, Hint, TypeDesc};
//!
//! let caster = Caster::new();
//! let input = value!({"name": "Ada", "scores": [1, 2, 3]});
//! let out = caster
//!     .cast(input.clone(), Hint::Auto, Hint::Type(TypeDesc::mapping()))
//!     .unwrap();
//! assert_eq!(out, input);
//! ```
//!
//! Custom engines start from [`CasterBuilder`], either empty or on top of
//! the defaults:
//!
//! ```rust
//! use std::sync::Arc;
//! use recast::{ClassSet, CasterBuilder, ObjectAdapter, ObjectConfig, TypeDesc};
//!
//! let caster = CasterBuilder::with_defaults()
//!     .register(
//!         ClassSet::subtypes(TypeDesc::object("Book")),
//!         Arc::new(ObjectAdapter::new(ObjectConfig::for_class("Book"))),
//!     )
//!     .build();
//! # let _ = caster;
//! ```

use std::sync::Arc;

use crate::adapter::{
    Adapter, IdentityAdapter, MappingAdapter, ObjectAdapter, SelfDescribing, SequenceAdapter,
};
use crate::desc::{ClassSet, TypeDesc};
use crate::error::Direction;
use crate::pipe::LazyPipe;
use crate::registry::SpecializationMap;
use crate::schema::{Resolved, SchemaResolver};
use crate::{Error, Result, Value};

/// What the caller knows about one side of a conversion.
///
/// `Auto` means "nothing": the source side then resolves by the input's
/// runtime type, and the target side goes through fallback resolution.
#[derive(Clone)]
pub enum Hint {
    /// No information; resolve from the runtime value.
    Auto,
    /// A concrete adapter, used as-is.
    Adapter(Arc<dyn Adapter>),
    /// A type to look up in the preferred map.
    Type(TypeDesc),
    /// An ordered candidate list; the last entry acts as the catch-all.
    OneOf(Vec<TypeDesc>),
}

impl std::fmt::Debug for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hint::Auto => f.write_str("Auto"),
            Hint::Adapter(a) => f.debug_tuple("Adapter").field(&a.kind()).finish(),
            Hint::Type(d) => f.debug_tuple("Type").field(d).finish(),
            Hint::OneOf(c) => f.debug_tuple("OneOf").field(c).finish(),
        }
    }
}

impl From<TypeDesc> for Hint {
    fn from(desc: TypeDesc) -> Self {
        Hint::Type(desc)
    }
}

impl From<SchemaResolver> for Hint {
    fn from(resolver: SchemaResolver) -> Self {
        match resolver {
            SchemaResolver::Adapter(adapter) => Hint::Adapter(adapter),
            SchemaResolver::Hint(desc) => Hint::Type(desc),
            SchemaResolver::OneOf(candidates) => Hint::OneOf(candidates),
        }
    }
}

impl Hint {
    fn into_resolver(self) -> Option<SchemaResolver> {
        match self {
            Hint::Auto => None,
            Hint::Adapter(adapter) => Some(SchemaResolver::Adapter(adapter)),
            Hint::Type(desc) => Some(SchemaResolver::Hint(desc)),
            Hint::OneOf(candidates) => Some(SchemaResolver::OneOf(candidates)),
        }
    }
}

/// Builds a [`Caster`] from ordered adapter registrations.
#[derive(Clone, Default)]
pub struct CasterBuilder {
    preferred: SpecializationMap<Arc<dyn Adapter>>,
    fallback: SpecializationMap<Arc<dyn Adapter>>,
}

impl CasterBuilder {
    /// Starts with empty maps: nothing resolves until registered.
    #[must_use]
    pub fn new() -> Self {
        CasterBuilder::default()
    }

    /// Starts with the built-in kind adapters registered in both maps:
    /// identity for every scalar kind, plus the sequence, mapping, and
    /// generic object adapters.
    #[must_use]
    pub fn with_defaults() -> Self {
        let identity: Arc<dyn Adapter> = Arc::new(IdentityAdapter);
        let sequence: Arc<dyn Adapter> = Arc::new(SequenceAdapter::new());
        let mapping: Arc<dyn Adapter> = Arc::new(MappingAdapter::new());
        let object: Arc<dyn Adapter> = Arc::new(ObjectAdapter::generic());

        let scalars = [
            TypeDesc::Null,
            TypeDesc::Bool,
            TypeDesc::Int,
            TypeDesc::Float,
            TypeDesc::Str,
            TypeDesc::Date,
            TypeDesc::BigInt,
        ];

        let mut builder = CasterBuilder::new();
        for desc in scalars {
            builder = builder.register_both(ClassSet::subtypes(desc), identity.clone());
        }
        builder
            .register_both(ClassSet::subtypes(TypeDesc::sequence()), sequence)
            .register_both(ClassSet::subtypes(TypeDesc::mapping()), mapping)
            .register_both(ClassSet::subtypes(TypeDesc::any_object()), object)
    }

    /// Registers an adapter in the preferred map, consulted for explicit
    /// hints on either side of a cast.
    #[must_use]
    pub fn register(mut self, set: ClassSet, adapter: Arc<dyn Adapter>) -> Self {
        self.preferred.insert(set, adapter);
        self
    }

    /// Registers an adapter in the fallback map, consulted by the input's
    /// runtime type when the target hint carries no type information.
    #[must_use]
    pub fn register_fallback(mut self, set: ClassSet, adapter: Arc<dyn Adapter>) -> Self {
        self.fallback.insert(set, adapter);
        self
    }

    /// Registers an adapter in both maps.
    #[must_use]
    pub fn register_both(self, set: ClassSet, adapter: Arc<dyn Adapter>) -> Self {
        self.register(set.clone(), adapter.clone())
            .register_fallback(set, adapter)
    }

    /// Finishes the builder. The maps are read-only from here on.
    #[must_use]
    pub fn build(self) -> Caster {
        Caster {
            preferred: self.preferred,
            fallback: self.fallback,
        }
    }
}

/// The conversion engine: resolves adapters and drives the recursive
/// pipeline.
///
/// A caster is cheap to share: both maps are read-only after construction,
/// so concurrent `cast` calls need no synchronization. Adapter resolutions
/// and pipes are local to each call.
#[derive(Clone)]
pub struct Caster {
    preferred: SpecializationMap<Arc<dyn Adapter>>,
    fallback: SpecializationMap<Arc<dyn Adapter>>,
}

impl Default for Caster {
    fn default() -> Self {
        Caster::new()
    }
}

enum Source {
    Adapter(Resolved),
    SelfMade(Arc<dyn SelfDescribing>),
}

enum Target {
    Adapter(Resolved),
    SelfMade(Arc<dyn SelfDescribing>),
}

impl Caster {
    /// A caster with the built-in kind registrations.
    #[must_use]
    pub fn new() -> Self {
        CasterBuilder::with_defaults().build()
    }

    /// An empty builder; see also [`CasterBuilder::with_defaults`].
    #[must_use]
    pub fn builder() -> CasterBuilder {
        CasterBuilder::new()
    }

    /// Converts a value, driving the full resolution and recursion cycle.
    ///
    /// Self-describing inputs use their own decomposition regardless of the
    /// hints or registrations. Otherwise the source resolves through the
    /// `from` hint (defaulting to the input's runtime type) and the target
    /// through the `to` hint — or, when `to` carries no type information,
    /// through the fallback map, then through the input's own recomposer if
    /// it offers one, and failing all that the cast aborts with
    /// [`Error::NoAdapterFound`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recast::{value, Caster, Hint, TypeDesc};
    ///
    /// let caster = Caster::new();
    /// let out = caster
    ///     .cast(value!([1, 2]), Hint::Auto, Hint::Type(TypeDesc::sequence()))
    ///     .unwrap();
    /// assert_eq!(out, value!([1, 2]));
    /// ```
    pub fn cast(&self, value: Value, from: Hint, to: Hint) -> Result<Value> {
        let subject_desc = value.type_desc();
        let subject_kind = value.kind_desc();

        // Source decomposition. Self-description takes precedence over any
        // hint or registration.
        let source = if let Value::Custom(custom) = &value {
            Source::SelfMade(custom.clone())
        } else {
            let resolver = from
                .into_resolver()
                .unwrap_or_else(|| SchemaResolver::Hint(subject_desc.clone()));
            Source::Adapter(resolver.resolve(&subject_desc, &self.preferred, Direction::Source)?)
        };

        let (pairs, source_schema) = match &source {
            Source::Adapter(resolved) => {
                let schema = resolved.adapter.schema(&resolved.desc);
                (resolved.adapter.decompose(&resolved.desc, value)?, schema)
            }
            Source::SelfMade(custom) => (custom.decompose()?, custom.schema()),
        };

        // Target resolution: explicit hint, else fallback map, else the
        // source's own recomposer.
        let target = match to.into_resolver() {
            Some(resolver) => {
                Target::Adapter(resolver.resolve(&subject_desc, &self.preferred, Direction::Target)?)
            }
            None => match self.fallback.lookup(&subject_desc)? {
                // A fallback target has no structural hint: the kind-level
                // descriptor keeps its schema uninformed, so nested fields
                // stay on the fallback path too.
                Some(adapter) => Target::Adapter(Resolved {
                    adapter: adapter.clone(),
                    desc: subject_kind,
                }),
                None => match &source {
                    Source::SelfMade(custom) if custom.can_recompose() => {
                        Target::SelfMade(custom.clone())
                    }
                    _ => return Err(Error::no_adapter(Direction::Target, &subject_desc)),
                },
            },
        };

        let target_schema = match &target {
            Target::Adapter(resolved) => resolved.adapter.schema(&resolved.desc),
            Target::SelfMade(custom) => custom.schema(),
        };

        let mut pipe = LazyPipe::new(self, pairs.into_iter(), &source_schema, &target_schema);
        match target {
            Target::Adapter(resolved) => resolved.adapter.recompose(&resolved.desc, &mut pipe),
            Target::SelfMade(custom) => custom.recompose(&mut pipe),
        }
    }

    /// Converts a value toward a target type, resolving the source from the
    /// runtime value.
    pub fn cast_to(&self, value: Value, to: TypeDesc) -> Result<Value> {
        self.cast(value, Hint::Auto, Hint::Type(to))
    }

    /// Per-key recursion entry used by [`LazyPipe`]: schema resolvers become
    /// hints, absent resolvers mean `Auto`.
    pub(crate) fn cast_resolved(
        &self,
        value: Value,
        from: Option<&SchemaResolver>,
        to: Option<&SchemaResolver>,
    ) -> Result<Value> {
        let from = from.cloned().map_or(Hint::Auto, Hint::from);
        let to = to.cloned().map_or(Hint::Auto, Hint::from);
        self.cast(value, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::Pairs;
    use crate::schema::{Key, Schema};
    use crate::value;

    #[test]
    fn scalars_round_trip_unhinted() {
        let caster = Caster::new();
        for v in [
            Value::Null,
            Value::from(true),
            Value::from(42),
            Value::from("text"),
        ] {
            assert_eq!(caster.cast(v.clone(), Hint::Auto, Hint::Auto).unwrap(), v);
        }
    }

    #[test]
    fn containers_round_trip_unhinted() {
        let caster = Caster::new();
        let input = value!({"name": "Ada", "tags": ["x", "y"], "depth": {"inner": 1}});
        assert_eq!(
            caster.cast(input.clone(), Hint::Auto, Hint::Auto).unwrap(),
            input
        );
    }

    #[test]
    fn unresolvable_targets_fail_explicitly() {
        // No fallback registrations at all: an unhinted target must fail,
        // not silently return the input.
        let caster = Caster::builder()
            .register(
                ClassSet::subtypes(TypeDesc::Int),
                Arc::new(IdentityAdapter),
            )
            .build();
        let err = caster
            .cast(Value::from(1), Hint::Auto, Hint::Auto)
            .unwrap_err();
        assert!(matches!(err, Error::NoAdapterFound { .. }));
    }

    #[test]
    fn explicit_adapter_hints_bypass_the_maps() {
        // The sequence kind is never registered; both sides are supplied
        // directly. Only the int elements resolve through the map.
        let caster = Caster::builder()
            .register(
                ClassSet::subtypes(TypeDesc::Int),
                Arc::new(IdentityAdapter),
            )
            .build();
        let out = caster
            .cast(
                value!([2, 1]),
                Hint::Adapter(Arc::new(SequenceAdapter::new())),
                Hint::Adapter(Arc::new(SequenceAdapter::new())),
            )
            .unwrap();
        assert_eq!(out, value!([2, 1]));
    }

    #[derive(Debug)]
    struct Point {
        x: i64,
        y: i64,
    }

    impl SelfDescribing for Point {
        fn decompose(&self) -> Result<Vec<(Key, Value)>> {
            Ok(vec![
                (Key::name("x"), Value::from(self.x)),
                (Key::name("y"), Value::from(self.y)),
            ])
        }

        fn schema(&self) -> Schema {
            Schema::new()
        }

        fn can_recompose(&self) -> bool {
            true
        }

        fn recompose(&self, pairs: Pairs<'_>) -> Result<Value> {
            let mut point = crate::ObjectValue::new("Point");
            for pair in pairs {
                let (key, value) = pair?;
                if let Key::Name(name) = key {
                    point.set(name, value);
                }
            }
            Ok(Value::Object(point))
        }
    }

    #[test]
    fn self_description_takes_precedence() {
        // The default engine has registrations for every kind, but a custom
        // value must still decompose through its own logic.
        let caster = Caster::new();
        let point = Value::Custom(Arc::new(Point { x: 1, y: 2 }));
        let out = caster
            .cast(point, Hint::Auto, Hint::Type(TypeDesc::mapping()))
            .unwrap();
        assert_eq!(out, value!({"x": 1, "y": 2}));
    }

    #[test]
    fn self_describing_values_recompose_themselves_when_nothing_else_can() {
        // No fallback entry for the value's own type, so the source's
        // recomposer is the last resort; the int fields still resolve.
        let caster = Caster::builder()
            .register_both(
                ClassSet::subtypes(TypeDesc::Int),
                Arc::new(IdentityAdapter),
            )
            .build();
        let point = Value::Custom(Arc::new(Point { x: 3, y: 4 }));
        let out = caster.cast(point, Hint::Auto, Hint::Auto).unwrap();
        let obj = out.as_object().unwrap();
        assert_eq!(obj.class(), "Point");
        assert_eq!(obj.get("x"), Some(&Value::from(3)));
        assert_eq!(obj.get("y"), Some(&Value::from(4)));
    }

    #[test]
    fn nested_failures_name_their_path() {
        let caster = Caster::builder()
            .register(
                ClassSet::subtypes(TypeDesc::mapping()),
                Arc::new(MappingAdapter::new()),
            )
            .register_fallback(
                ClassSet::subtypes(TypeDesc::mapping()),
                Arc::new(MappingAdapter::new()),
            )
            .build();
        // The inner string has no registration anywhere.
        let err = caster
            .cast(
                value!({"outer": {"inner": "boom"}}),
                Hint::Auto,
                Hint::Type(TypeDesc::mapping()),
            )
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("at outer"), "got: {}", message);
        assert!(message.contains("at inner"), "got: {}", message);
    }
}
