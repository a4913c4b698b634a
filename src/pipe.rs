//! The pull-based pipeline driving recursive per-field conversion.
//!
//! A [`LazyPipe`] sits between a source adapter's pairs and a target
//! adapter's recompose step. Nothing is converted until the target pulls:
//! each `next` takes one raw pair, looks up the per-key resolvers on both
//! schemas, and recursively casts the value through the owning
//! [`Caster`](crate::Caster). Pairs under [`Key::Final`] pass through
//! unconverted — they already are the value, not a container of further
//! values.
//!
//! Pipes are single-pass and call-local: one exists per cast, is consumed
//! exactly once, and holds no state beyond the iterator position.

use crate::caster::Caster;
use crate::schema::{Key, Schema};
use crate::{Result, Value};

/// Iterator of recursively casted pairs.
///
/// Errors raised while converting a nested field come out wrapped with the
/// failing key, so deep failures name their path.
pub struct LazyPipe<'a, I> {
    caster: &'a Caster,
    pairs: I,
    source: &'a Schema,
    target: &'a Schema,
}

impl<'a, I> LazyPipe<'a, I>
where
    I: Iterator<Item = (Key, Value)>,
{
    /// Builds a pipe over raw source pairs and the two per-key schemas.
    pub fn new(caster: &'a Caster, pairs: I, source: &'a Schema, target: &'a Schema) -> Self {
        LazyPipe {
            caster,
            pairs,
            source,
            target,
        }
    }
}

impl<'a, I> Iterator for LazyPipe<'a, I>
where
    I: Iterator<Item = (Key, Value)>,
{
    type Item = Result<(Key, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.pairs.next()?;
        if key == Key::Final {
            return Some(Ok((key, value)));
        }
        let from = self.source.resolver_for(&key);
        let to = self.target.resolver_for(&key);
        match self.caster.cast_resolved(value, from, to) {
            Ok(casted) => Some(Ok((key, casted))),
            Err(err) => Some(Err(err.at(&key))),
        }
    }
}
