//! Keys, per-key schemas, and adapter resolution requests.
//!
//! A decomposed value is a sequence of ([`Key`], value) pairs. The adapter
//! that produced them also declares a [`Schema`]: which resolver applies to
//! each key when the pair's value is recursively cast. Two reserved notions
//! keep schemas small: an ANY entry applies to every key not explicitly
//! listed, and a terminal schema marks the FINAL pair of a scalar — the
//! value itself, not a container of further values.
//!
//! A [`SchemaResolver`] is a *request* for an adapter, resolved lazily
//! against a runtime type and a [`SpecializationMap`]: a direct adapter
//! reference, an ordered candidate list whose last element acts as the
//! catch-all, or a single type hint.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::adapter::Adapter;
use crate::desc::{ClassSet, TypeDesc};
use crate::error::Direction;
use crate::registry::SpecializationMap;
use crate::{Error, Result};

/// The key half of a decomposed pair.
///
/// Scalars emit a single [`Key::Final`] pair; sequences emit 0-based
/// [`Key::Index`] pairs; mappings and objects emit [`Key::Name`] pairs.
///
/// Keys are totally ordered (`Final`, then indices, then names) so that
/// sequence recompose can sort pairs back into positional order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// The single implicit key used by scalars: the pair's value *is* the
    /// subject, and the pipeline passes it through unconverted.
    Final,
    /// A 0-based position in a sequence.
    Index(usize),
    /// A mapping key or object field name.
    Name(String),
}

impl Key {
    /// Convenience constructor for name keys.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Key::Name(name.into())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Final => write!(f, "<value>"),
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(s) => write!(f, "{}", s),
        }
    }
}

/// A request for an adapter, resolved against a runtime type.
#[derive(Clone)]
pub enum SchemaResolver {
    /// A concrete adapter, used as-is.
    Adapter(Arc<dyn Adapter>),
    /// An ordered candidate list; the first candidate whose
    /// all-specializations set contains the runtime type wins, and the last
    /// acts as the catch-all when none matches.
    OneOf(Vec<TypeDesc>),
    /// A single type hint, looked up in the specialization map.
    Hint(TypeDesc),
}

impl SchemaResolver {
    /// Convenience constructor for type-hint resolvers.
    #[must_use]
    pub fn hint(desc: TypeDesc) -> Self {
        SchemaResolver::Hint(desc)
    }

    /// Resolves this request to a concrete adapter.
    ///
    /// Resolution is deterministic given the subject's runtime type and the
    /// candidate order. The returned descriptor is the one the adapter
    /// should derive its schema from: the hint (or chosen candidate) when
    /// one was given, the subject's runtime type for direct adapters.
    pub fn resolve(
        &self,
        subject: &TypeDesc,
        map: &SpecializationMap<Arc<dyn Adapter>>,
        direction: Direction,
    ) -> Result<Resolved> {
        match self {
            SchemaResolver::Adapter(adapter) => Ok(Resolved {
                adapter: adapter.clone(),
                desc: subject.clone(),
            }),
            SchemaResolver::Hint(desc) => match map.lookup(desc)? {
                Some(adapter) => Ok(Resolved {
                    adapter: adapter.clone(),
                    desc: desc.clone(),
                }),
                None => Err(Error::no_adapter(direction, desc)),
            },
            SchemaResolver::OneOf(candidates) => {
                let chosen = candidates
                    .iter()
                    .find(|c| ClassSet::subtypes((*c).clone()).contains(subject))
                    .or_else(|| candidates.last())
                    .ok_or_else(|| Error::no_adapter(direction, subject))?;
                match map.lookup(chosen)? {
                    Some(adapter) => Ok(Resolved {
                        adapter: adapter.clone(),
                        desc: chosen.clone(),
                    }),
                    None => Err(Error::no_adapter(direction, chosen)),
                }
            }
        }
    }
}

impl fmt::Debug for SchemaResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaResolver::Adapter(a) => f.debug_tuple("Adapter").field(&a.kind()).finish(),
            SchemaResolver::OneOf(c) => f.debug_tuple("OneOf").field(c).finish(),
            SchemaResolver::Hint(d) => f.debug_tuple("Hint").field(d).finish(),
        }
    }
}

/// The outcome of resolving a [`SchemaResolver`]: the adapter plus the
/// descriptor it was resolved for.
#[derive(Clone)]
pub struct Resolved {
    pub adapter: Arc<dyn Adapter>,
    pub desc: TypeDesc,
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("adapter", &self.adapter.kind())
            .field("desc", &self.desc)
            .finish()
    }
}

/// The per-key structure an adapter declares for its pairs.
///
/// Explicit entries bind a resolver to a key; the ANY entry applies to every
/// key not listed; a terminal schema belongs to scalar adapters and carries
/// no entries at all.
///
/// # Examples
///
/// ```rust
/// use recast::{Key, Schema, SchemaResolver, TypeDesc};
///
/// let schema = Schema::new()
///     .with(Key::name("books"), SchemaResolver::hint(TypeDesc::sequence()))
///     .with_any(SchemaResolver::hint(TypeDesc::Str));
///
/// assert!(schema.resolver_for(&Key::name("books")).is_some());
/// assert!(schema.resolver_for(&Key::name("title")).is_some()); // via ANY
/// ```
#[derive(Clone, Debug, Default)]
pub struct Schema {
    entries: IndexMap<Key, SchemaResolver>,
    any: Option<SchemaResolver>,
    terminal: bool,
}

impl Schema {
    /// Creates an empty, open schema: no entries, no ANY resolver.
    #[must_use]
    pub fn new() -> Self {
        Schema::default()
    }

    /// The schema of a scalar adapter: its single FINAL pair *is* the value.
    #[must_use]
    pub fn terminal() -> Self {
        Schema {
            terminal: true,
            ..Schema::default()
        }
    }

    /// A schema whose ANY entry applies the same resolver to every key.
    #[must_use]
    pub fn uniform(resolver: SchemaResolver) -> Self {
        Schema {
            any: Some(resolver),
            ..Schema::default()
        }
    }

    /// Binds a resolver to an explicit key.
    #[must_use]
    pub fn with(mut self, key: Key, resolver: SchemaResolver) -> Self {
        self.entries.insert(key, resolver);
        self
    }

    /// Sets the ANY resolver, applied to every key without an explicit entry.
    #[must_use]
    pub fn with_any(mut self, resolver: SchemaResolver) -> Self {
        self.any = Some(resolver);
        self
    }

    /// Returns `true` for scalar schemas.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// The resolver applying to a key: its explicit entry, else ANY, else
    /// nothing (the caller falls back to runtime resolution).
    #[must_use]
    pub fn resolver_for(&self, key: &Key) -> Option<&SchemaResolver> {
        self.entries.get(key).or(self.any.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{IdentityAdapter, SequenceAdapter};

    fn builtin_map() -> SpecializationMap<Arc<dyn Adapter>> {
        let mut map: SpecializationMap<Arc<dyn Adapter>> = SpecializationMap::new();
        map.insert(
            ClassSet::subtypes(TypeDesc::Int),
            Arc::new(IdentityAdapter),
        );
        map.insert(
            ClassSet::subtypes(TypeDesc::sequence()),
            Arc::new(SequenceAdapter::new()),
        );
        map
    }

    #[test]
    fn keys_sort_by_position() {
        let mut keys = vec![Key::name("z"), Key::Index(2), Key::Index(0), Key::Final];
        keys.sort();
        assert_eq!(
            keys,
            vec![Key::Final, Key::Index(0), Key::Index(2), Key::name("z")]
        );
    }

    #[test]
    fn explicit_entry_beats_any() {
        let schema = Schema::new()
            .with(Key::name("a"), SchemaResolver::hint(TypeDesc::Int))
            .with_any(SchemaResolver::hint(TypeDesc::Str));
        match schema.resolver_for(&Key::name("a")) {
            Some(SchemaResolver::Hint(TypeDesc::Int)) => {}
            other => panic!("unexpected resolver: {:?}", other),
        }
        match schema.resolver_for(&Key::name("b")) {
            Some(SchemaResolver::Hint(TypeDesc::Str)) => {}
            other => panic!("unexpected resolver: {:?}", other),
        }
        assert!(Schema::new().resolver_for(&Key::name("a")).is_none());
    }

    #[test]
    fn hint_resolution_uses_the_map() {
        let map = builtin_map();
        let resolved = SchemaResolver::hint(TypeDesc::Int)
            .resolve(&TypeDesc::Int, &map, Direction::Source)
            .unwrap();
        assert_eq!(resolved.desc, TypeDesc::Int);

        let err = SchemaResolver::hint(TypeDesc::Str)
            .resolve(&TypeDesc::Str, &map, Direction::Target)
            .unwrap_err();
        assert!(matches!(err, Error::NoAdapterFound { .. }));
    }

    #[test]
    fn candidate_lists_pick_the_first_match() {
        let map = builtin_map();
        let resolver = SchemaResolver::OneOf(vec![TypeDesc::sequence(), TypeDesc::Int]);
        let resolved = resolver
            .resolve(
                &TypeDesc::sequence_of(TypeDesc::Int),
                &map,
                Direction::Source,
            )
            .unwrap();
        assert_eq!(resolved.desc, TypeDesc::sequence());
    }

    #[test]
    fn the_last_candidate_is_the_catch_all() {
        let map = builtin_map();
        let resolver = SchemaResolver::OneOf(vec![TypeDesc::sequence(), TypeDesc::Int]);
        // A string matches neither candidate; the last one still applies.
        let resolved = resolver
            .resolve(&TypeDesc::Str, &map, Direction::Source)
            .unwrap();
        assert_eq!(resolved.desc, TypeDesc::Int);
    }
}
