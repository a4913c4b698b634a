//! Most-specific-match lookup over registered class sets.
//!
//! A [`SpecializationMap`] is the dispatch table of the engine: an ordered
//! collection of ([`ClassSet`], value) pairs, queried by a concrete
//! [`TypeDesc`]. Lookup returns the value attached to the narrowest
//! registered set containing the type — nearest-ancestor resolution over a
//! subtyping lattice, driven by the sets' partial order rather than a class
//! hierarchy walk.
//!
//! Two or more matching sets with no unique narrowest entry are a
//! configuration mistake and surface as
//! [`Error::AmbiguousSpecialization`](crate::Error); no insertion-order
//! tie-break is applied.

use crate::desc::{ClassSet, TypeDesc};
use crate::{Error, Result};

/// An ordered table of `(ClassSet, V)` pairs resolved by narrowest match.
///
/// Registration replaces the value when an equal set is already present;
/// otherwise entries accumulate in insertion order. The map is built once
/// when a [`Caster`](crate::Caster) is constructed and is read-only
/// afterwards.
///
/// # Examples
///
/// ```rust
/// use recast::{ClassSet, SpecializationMap, TypeDesc};
///
/// let mut map = SpecializationMap::new();
/// map.insert(ClassSet::subtypes(TypeDesc::Any), "anything");
/// map.insert(ClassSet::subtypes(TypeDesc::sequence()), "sequences");
/// map.insert(
///     ClassSet::subtypes(TypeDesc::sequence_of(TypeDesc::Int)),
///     "int sequences",
/// );
///
/// let hit = map
///     .lookup(&TypeDesc::sequence_of(TypeDesc::Int))
///     .unwrap();
/// assert_eq!(hit, Some(&"int sequences"));
///
/// assert_eq!(map.lookup(&TypeDesc::Str).unwrap(), Some(&"anything"));
/// ```
#[derive(Clone, Debug)]
pub struct SpecializationMap<V> {
    entries: Vec<(ClassSet, V)>,
}

impl<V> Default for SpecializationMap<V> {
    fn default() -> Self {
        SpecializationMap {
            entries: Vec::new(),
        }
    }
}

impl<V> SpecializationMap<V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        SpecializationMap {
            entries: Vec::new(),
        }
    }

    /// Registers a value under a class set.
    ///
    /// An existing entry with an equal set is replaced in place; new sets
    /// append in insertion order.
    pub fn insert(&mut self, set: ClassSet, value: V) {
        if let Some(entry) = self.entries.iter_mut().find(|(s, _)| *s == set) {
            entry.1 = value;
        } else {
            self.entries.push((set, value));
        }
    }

    /// Returns the number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a concrete type to the value registered under the most
    /// specific matching set.
    ///
    /// Returns `Ok(None)` when no registered set contains the type — an
    /// explicit no-match, never a default. Returns
    /// [`Error::AmbiguousSpecialization`] when several sets match and none
    /// is narrower than or equal to every other match.
    pub fn lookup(&self, desc: &TypeDesc) -> Result<Option<&V>> {
        let matches: Vec<&(ClassSet, V)> = self
            .entries
            .iter()
            .filter(|(set, _)| set.contains(desc))
            .collect();
        if matches.is_empty() {
            return Ok(None);
        }

        'candidates: for candidate in &matches {
            for other in &matches {
                match candidate.0.partial_cmp(&other.0) {
                    Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal) => {}
                    _ => continue 'candidates,
                }
            }
            return Ok(Some(&candidate.1));
        }

        // No infimum: every candidate is beaten or incomparable somewhere.
        Err(Error::ambiguous(desc, &matches[0].0, &matches[1].0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_level_map() -> SpecializationMap<&'static str> {
        let mut map = SpecializationMap::new();
        map.insert(ClassSet::subtypes(TypeDesc::Any), "any");
        map.insert(ClassSet::subtypes(TypeDesc::sequence()), "sequence");
        map.insert(
            ClassSet::subtypes(TypeDesc::sequence_of(TypeDesc::Int)),
            "int sequence",
        );
        map
    }

    #[test]
    fn narrowest_registration_wins() {
        let map = three_level_map();
        assert_eq!(
            map.lookup(&TypeDesc::sequence_of(TypeDesc::Int)).unwrap(),
            Some(&"int sequence")
        );
        assert_eq!(
            map.lookup(&TypeDesc::sequence_of(TypeDesc::Str)).unwrap(),
            Some(&"sequence")
        );
        assert_eq!(map.lookup(&TypeDesc::sequence()).unwrap(), Some(&"sequence"));
        assert_eq!(map.lookup(&TypeDesc::Bool).unwrap(), Some(&"any"));
    }

    #[test]
    fn exact_beats_the_family_on_the_same_type() {
        let mut map = three_level_map();
        map.insert(ClassSet::exact(TypeDesc::sequence()), "exactly sequence");
        assert_eq!(
            map.lookup(&TypeDesc::sequence()).unwrap(),
            Some(&"exactly sequence")
        );
        // Refined descriptors are not members of the exact set.
        assert_eq!(
            map.lookup(&TypeDesc::sequence_of(TypeDesc::Int)).unwrap(),
            Some(&"int sequence")
        );
    }

    #[test]
    fn no_match_is_explicit() {
        let mut map = SpecializationMap::new();
        map.insert(ClassSet::subtypes(TypeDesc::sequence()), "sequence");
        assert_eq!(map.lookup(&TypeDesc::Str).unwrap(), None);
        assert_eq!(SpecializationMap::<&str>::new().lookup(&TypeDesc::Str).unwrap(), None);
    }

    #[test]
    fn registration_replaces_equal_sets() {
        let mut map = SpecializationMap::new();
        map.insert(ClassSet::subtypes(TypeDesc::Int), "first");
        map.insert(ClassSet::subtypes(TypeDesc::Int), "second");
        assert_eq!(map.len(), 1);
        assert_eq!(map.lookup(&TypeDesc::Int).unwrap(), Some(&"second"));
    }
}
