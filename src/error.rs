//! Error types for cast resolution and conversion.
//!
//! This module provides the error taxonomy shared by every stage of a cast:
//! adapter resolution, specialization lookup, decompose/recompose, and the
//! recursive per-field pipeline.
//!
//! ## Error Categories
//!
//! - **Resolution errors**: no adapter could be found for a type, or two
//!   registrations matched with no determinable narrowest entry
//! - **Shape errors**: a scalar recompose received no pairs, or a value had
//!   the wrong kind for the adapter driving it
//! - **Field errors**: a structured object was missing a required field
//!
//! Errors raised while converting a nested field are wrapped with the failing
//! key on the way out, so a deep failure names its path:
//!
//! ```text
//! at books: at 1: missing field `title` on `Book`
//! ```

use std::fmt;
use thiserror::Error;

use crate::schema::Key;
use crate::TypeDesc;

/// Which side of a conversion an adapter was being resolved for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Source,
    Target,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Source => write!(f, "source"),
            Direction::Target => write!(f, "target"),
        }
    }
}

/// Represents all possible errors raised during a cast.
///
/// Every error aborts the enclosing cast entirely; partial output is never
/// returned.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Neither an explicit adapter, a specialization lookup, nor a fallback
    /// produced a usable adapter for the given type and direction.
    #[error("no {direction} adapter found for `{desc}`")]
    NoAdapterFound { direction: Direction, desc: String },

    /// A scalar recompose received zero pairs.
    #[error("scalar recompose received an empty pair sequence")]
    EmptyScalarInput,

    /// A specialization lookup matched two or more class sets with no unique
    /// narrowest entry. Surfaced rather than resolved by insertion order.
    #[error("ambiguous specialization for `{desc}`: `{first}` and `{second}` both match and neither is narrower")]
    AmbiguousSpecialization {
        desc: String,
        first: String,
        second: String,
    },

    /// A structured object had no stored field and no getter hook for a name
    /// the adapter was asked to read.
    #[error("missing field `{field}` on `{class}`")]
    MissingField { class: String, field: String },

    /// A value had the wrong kind for the adapter driving it.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// An error raised while converting a nested field, wrapped with the
    /// failing key.
    #[error("at {key}: {source}")]
    Nested {
        key: String,
        #[source]
        source: Box<Error>,
    },

    /// Generic message.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a "no adapter found" error for a type and direction.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recast::{Direction, Error, TypeDesc};
    ///
    /// let err = Error::no_adapter(Direction::Target, &TypeDesc::Int);
    /// assert!(err.to_string().contains("target"));
    /// ```
    pub fn no_adapter(direction: Direction, desc: &TypeDesc) -> Self {
        Error::NoAdapterFound {
            direction,
            desc: desc.to_string(),
        }
    }

    /// Creates an ambiguous-specialization error naming two incomparable
    /// matching entries.
    pub fn ambiguous(desc: &TypeDesc, first: impl fmt::Display, second: impl fmt::Display) -> Self {
        Error::AmbiguousSpecialization {
            desc: desc.to_string(),
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    /// Creates a missing-field error for a structured object.
    pub fn missing_field(class: &str, field: &str) -> Self {
        Error::MissingField {
            class: class.to_string(),
            field: field.to_string(),
        }
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recast::Error;
    ///
    /// let err = Error::type_mismatch("sequence", "bool");
    /// assert!(err.to_string().contains("expected sequence"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }

    /// Wraps this error with the key of the field that was being converted
    /// when it was raised.
    #[must_use]
    pub fn at(self, key: &Key) -> Self {
        Error::Nested {
            key: key.to_string(),
            source: Box::new(self),
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
