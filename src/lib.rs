//! # recast
//!
//! A type-directed object transformation engine: give it a value and a
//! description of the shape you want, and it converts the value into a
//! structurally equivalent one of a different representation — nested
//! mappings into typed object graphs, object graphs back into plain
//! mappings — applying type-directed conversions recursively to every
//! nested field. It is the kind of engine that sits behind
//! serialization/deserialization tooling.
//!
//! ## How It Works
//!
//! - **Adapters** ([`Adapter`]) know how to decompose one kind of value
//!   (scalar, sequence, mapping, structured object) into (key, value) pairs
//!   and how to recompose such pairs back into a value.
//! - **Class sets** ([`ClassSet`]) and the **specialization map**
//!   ([`SpecializationMap`]) dispatch a runtime type to the most specific
//!   registered adapter — narrowest registration wins.
//! - The **caster** ([`Caster`]) resolves a source and a target adapter for
//!   each conversion and drives a lazy, pull-based pipeline ([`LazyPipe`])
//!   that recursively casts every nested field on demand.
//!
//! ## Quick Start
//!
//! ```rust
//! use recast::{cast, value, TypeDesc};
//!
//! let input = value!({"name": "Ada", "scores": [1, 2, 3]});
//! let out = cast(input.clone(), TypeDesc::mapping()).unwrap();
//! assert_eq!(out, input);
//! ```
//!
//! ## Casting Into Object Graphs
//!
//! Registrations specialize the engine. Here a nested mapping becomes a
//! typed object graph: the `books` field is declared to be a sequence of
//! `Book` objects, and every level converts accordingly:
//!
//! ```rust
//! use std::sync::Arc;
//! use recast::{
//!     value, CasterBuilder, ClassSet, Hint, ObjectAdapter, ObjectConfig,
//!     SchemaResolver, TypeDesc,
//! };
//!
//! let caster = CasterBuilder::with_defaults()
//!     .register(
//!         ClassSet::subtypes(TypeDesc::object("Book")),
//!         Arc::new(ObjectAdapter::new(ObjectConfig::for_class("Book"))),
//!     )
//!     .register(
//!         ClassSet::subtypes(TypeDesc::object("Author")),
//!         Arc::new(ObjectAdapter::new(
//!             ObjectConfig::for_class("Author").with_resolver(
//!                 "books",
//!                 SchemaResolver::hint(TypeDesc::sequence_of(TypeDesc::object("Book"))),
//!             ),
//!         )),
//!     )
//!     .build();
//!
//! let input = value!({
//!     "name": "Orwell",
//!     "books": [{"title": "1984"}, {"title": "Animal Farm"}]
//! });
//! let author = caster
//!     .cast(input, Hint::Auto, Hint::Type(TypeDesc::object("Author")))
//!     .unwrap();
//!
//! let author = author.as_object().unwrap();
//! assert_eq!(author.class(), "Author");
//! let books = author.get("books").and_then(|v| v.as_sequence()).unwrap();
//! assert_eq!(books.len(), 2);
//! assert_eq!(books[0].as_object().unwrap().class(), "Book");
//! ```
//!
//! ## Design Notes
//!
//! - Dispatch is **specificity-based**: registering adapters for `any`,
//!   `sequence`, and `sequence<int>` and looking up `sequence<int>` picks
//!   the last. Matching registrations with no unique narrowest entry are an
//!   error, never an insertion-order coin toss.
//! - Conversion is **lazy**: the target adapter pulls pairs one at a time,
//!   and each nested field is cast only when pulled.
//! - The engine performs **no validation** and adds no retry layer; adapter
//!   errors propagate to the caller wrapped with the failing key path.
//! - Values that implement [`SelfDescribing`] bypass dispatch entirely and
//!   always win over registrations.

pub mod adapter;
pub mod caster;
pub mod config;
pub mod desc;
pub mod error;
pub mod macros;
pub mod map;
pub mod pipe;
pub mod registry;
pub mod schema;
pub mod value;

pub use adapter::{
    Adapter, AdapterKind, IdentityAdapter, MappingAdapter, ObjectAdapter, Pairs, SelfDescribing,
    SequenceAdapter,
};
pub use caster::{Caster, CasterBuilder, Hint};
pub use config::{FieldAccess, FieldSpec, Getter, ObjectConfig, Setter};
pub use desc::{ClassSet, TypeDesc};
pub use error::{Direction, Error, Result};
pub use map::ValueMap;
pub use pipe::LazyPipe;
pub use registry::SpecializationMap;
pub use schema::{Key, Resolved, Schema, SchemaResolver};
pub use value::{Number, ObjectValue, Value};

/// Converts a value toward a target type with a default engine.
///
/// The source side resolves from the runtime value; the engine carries the
/// built-in kind registrations only. Build a [`Caster`] for anything that
/// needs custom registrations — and to amortize construction over many
/// calls.
///
/// # Examples
///
/// ```rust
/// use recast::{cast, value, TypeDesc};
///
/// let out = cast(value!([1, 2, 3]), TypeDesc::sequence()).unwrap();
/// assert_eq!(out, value!([1, 2, 3]));
/// ```
///
/// # Errors
///
/// Returns an error if no adapter resolves for either side or a nested
/// conversion fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn cast(value: Value, to: TypeDesc) -> Result<Value> {
    Caster::new().cast_to(value, to)
}

/// Converts a value between explicit hints with a default engine.
///
/// # Examples
///
/// ```rust
/// use recast::{cast_with, value, Hint, TypeDesc};
///
/// let out = cast_with(
///     value!({"a": 1}),
///     Hint::Auto,
///     Hint::Type(TypeDesc::mapping()),
/// )
/// .unwrap();
/// assert_eq!(out, value!({"a": 1}));
/// ```
///
/// # Errors
///
/// Returns an error if no adapter resolves for either side or a nested
/// conversion fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn cast_with(value: Value, from: Hint, to: Hint) -> Result<Value> {
    Caster::new().cast(value, from, to)
}
