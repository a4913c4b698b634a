//! Dynamic value representation for the conversion engine.
//!
//! This module provides the [`Value`] enum which represents any value the
//! engine can decompose or recompose: scalars, sequences, mappings, and
//! structured objects, plus self-describing values that carry their own
//! decomposition.
//!
//! ## Core Types
//!
//! - [`Value`]: any engine value (null, bool, number, string, date, bigint,
//!   sequence, mapping, object, custom)
//! - [`Number`]: integer or floating-point numeric value
//! - [`ObjectValue`]: a class name plus an ordered field map
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use recast::{value, Value};
//!
//! let null = Value::Null;
//! let flag = Value::from(true);
//! let count = Value::from(42);
//! let name = Value::from("Ada");
//!
//! let record = value!({
//!     "name": "Ada",
//!     "scores": [1, 2, 3]
//! });
//! assert!(record.is_mapping());
//! ```
//!
//! ### Type Checking and Extraction
//!
//! ```rust
//! use recast::Value;
//!
//! let value = Value::from(42);
//! assert!(value.is_number());
//! assert_eq!(value.as_i64(), Some(42));
//!
//! let num: i64 = i64::try_from(value).unwrap();
//! assert_eq!(num, 42);
//! ```
//!
//! ### Runtime Descriptors
//!
//! Every value reports its runtime [`TypeDesc`]; homogeneous containers
//! refine it with an element parameter so "sequence of int" registrations
//! can match real data:
//!
//! ```rust
//! use recast::{value, TypeDesc};
//!
//! let ints = value!([1, 2, 3]);
//! assert_eq!(ints.type_desc(), TypeDesc::sequence_of(TypeDesc::Int));
//!
//! let mixed = value!([1, "two"]);
//! assert_eq!(mixed.type_desc(), TypeDesc::sequence());
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::adapter::SelfDescribing;
use crate::schema::Key;
use crate::{TypeDesc, ValueMap};

/// A dynamically-typed value the engine converts.
///
/// Scalar variants (everything up to and including `BigInt`) are handled by
/// the identity adapter; `Sequence`, `Mapping`, and `Object` are container
/// kinds decomposed into key/value pairs; `Custom` wraps a
/// [`SelfDescribing`] value that supplies its own decomposition.
///
/// # Examples
///
/// ```rust
/// use recast::{Number, Value};
///
/// let num = Value::Number(Number::Integer(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Date(DateTime<Utc>),
    BigInt(BigInt),
    Sequence(Vec<Value>),
    Mapping(ValueMap),
    Object(ObjectValue),
    Custom(Arc<dyn SelfDescribing>),
}

/// A numeric value, either integer or floating-point.
///
/// # Examples
///
/// ```rust
/// use recast::Number;
///
/// let integer = Number::Integer(42);
/// let float = Number::Float(3.5);
///
/// assert!(integer.is_integer());
/// assert_eq!(integer.as_i64(), Some(42));
/// assert_eq!(float.as_f64(), 3.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Returns `true` if this is an integer value.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns `true` if this is a floating-point value.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Converts this number to an `i64` if possible.
    ///
    /// Returns `Some` for integers and for floats with no fractional part
    /// that fit in the i64 range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recast::Number;
    ///
    /// assert_eq!(Number::Integer(42).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }

    /// Converts this number to an `f64`. Always succeeds.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

/// A structured object: a class name plus an ordered field map.
///
/// The class name ties the value to registrations made under
/// [`TypeDesc::object`]; an empty class name reads as the anonymous object
/// kind.
///
/// # Examples
///
/// ```rust
/// use recast::{ObjectValue, Value};
///
/// let mut book = ObjectValue::new("Book");
/// book.set("title", Value::from("1984"));
///
/// assert_eq!(book.class(), "Book");
/// assert_eq!(book.get("title").and_then(|v| v.as_str()), Some("1984"));
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ObjectValue {
    class: String,
    fields: ValueMap,
}

impl ObjectValue {
    /// Creates an empty object of the given class.
    #[must_use]
    pub fn new(class: impl Into<String>) -> Self {
        ObjectValue {
            class: class.into(),
            fields: ValueMap::new(),
        }
    }

    /// Creates an object of the given class with the given fields.
    #[must_use]
    pub fn with_fields(class: impl Into<String>, fields: ValueMap) -> Self {
        ObjectValue {
            class: class.into(),
            fields,
        }
    }

    /// The object's class name. Empty for anonymous objects.
    #[inline]
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Returns a reference to the stored field, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Stores a field, replacing any previous value under the same name.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    /// The ordered field map.
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &ValueMap {
        &self.fields
    }

    /// The object's runtime descriptor.
    #[must_use]
    pub fn type_desc(&self) -> TypeDesc {
        if self.class.is_empty() {
            TypeDesc::any_object()
        } else {
            TypeDesc::object(self.class.clone())
        }
    }
}

fn unify_all<I: Iterator<Item = TypeDesc>>(mut descs: I) -> Option<Box<TypeDesc>> {
    let first = descs.next()?;
    let unified = descs.fold(first, |acc, d| acc.unify(&d));
    if unified == TypeDesc::Any {
        None
    } else {
        Some(Box::new(unified))
    }
}

impl Value {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is a sequence.
    #[inline]
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    /// Returns `true` if the value is a mapping.
    #[inline]
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Returns `true` if the value is a structured object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an integer or whole-number float, returns it as `i64`.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// If the value is a number, returns it as `f64`.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    /// If the value is a sequence, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// If the value is a mapping, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_mapping(&self) -> Option<&ValueMap> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// If the value is a structured object, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The value's kind descriptor, without container parameters.
    #[must_use]
    pub fn kind_desc(&self) -> TypeDesc {
        match self {
            Value::Null => TypeDesc::Null,
            Value::Bool(_) => TypeDesc::Bool,
            Value::Number(Number::Integer(_)) => TypeDesc::Int,
            Value::Number(Number::Float(_)) => TypeDesc::Float,
            Value::String(_) => TypeDesc::Str,
            Value::Date(_) => TypeDesc::Date,
            Value::BigInt(_) => TypeDesc::BigInt,
            Value::Sequence(_) => TypeDesc::sequence(),
            Value::Mapping(_) => TypeDesc::mapping(),
            Value::Object(obj) => obj.type_desc(),
            Value::Custom(custom) => custom.type_desc(),
        }
    }

    /// The value's runtime descriptor.
    ///
    /// Containers infer an element parameter one level deep by unifying the
    /// kinds of their children; heterogeneous or empty containers report the
    /// unparameterized descriptor.
    #[must_use]
    pub fn type_desc(&self) -> TypeDesc {
        match self {
            Value::Sequence(items) => {
                TypeDesc::Sequence(unify_all(items.iter().map(Value::kind_desc)))
            }
            Value::Mapping(map) => TypeDesc::Mapping(unify_all(map.values().map(Value::kind_desc))),
            other => other.kind_desc(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Mapping(a), Value::Mapping(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            // Custom values carry opaque behavior; identity is the only
            // equality that makes sense for them.
            (Value::Custom(a), Value::Custom(b)) => {
                std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Date(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::BigInt(bi) => write!(f, "{}", bi),
            Value::Sequence(items) => {
                write!(
                    f,
                    "[{}]",
                    items
                        .iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            Value::Mapping(map) => {
                write!(
                    f,
                    "{{{}}}",
                    map.iter()
                        .map(|(k, v)| format!("{}: {}", k, v))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            Value::Object(obj) => {
                write!(
                    f,
                    "{}{{{}}}",
                    obj.class(),
                    obj.fields()
                        .iter()
                        .map(|(k, v)| format!("{}: {}", k, v))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            Value::Custom(_) => write!(f, "<custom>"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Value::BigInt(bi) => serializer.serialize_str(&bi.to_string()),
            Value::Sequence(items) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for element in items {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Mapping(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            // The class name does not survive the serde bridge; objects
            // serialize as plain field maps.
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let fields = obj.fields();
                let mut out = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Custom(custom) => {
                use serde::ser::{Error as _, SerializeMap};
                let pairs = custom.decompose().map_err(S::Error::custom)?;
                if pairs.len() == 1 && pairs[0].0 == Key::Final {
                    return pairs[0].1.serialize(serializer);
                }
                let mut out = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in &pairs {
                    out.serialize_entry(&k.to_string(), v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any castable value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                if value <= i64::MAX as u64 {
                    Ok(Value::Number(Number::Integer(value as i64)))
                } else {
                    Ok(Value::Number(Number::Float(value as f64)))
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    items.push(elem);
                }
                Ok(Value::Sequence(items))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = ValueMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Mapping(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// TryFrom implementations for extracting values
impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(Number::Integer(i)) => Ok(i),
            Value::Number(Number::Float(f)) => {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Ok(f as i64)
                } else {
                    Err(crate::Error::custom(format!(
                        "cannot convert float {} to i64",
                        f
                    )))
                }
            }
            _ => Err(crate::Error::type_mismatch("integer", &value.to_string())),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Number(n) => Ok(n.as_f64()),
            _ => Err(crate::Error::type_mismatch("number", &value.to_string())),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::type_mismatch("bool", &value.to_string())),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::type_mismatch("string", &value.to_string())),
        }
    }
}

// From implementations for creating values from primitives
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Integer(i64::from(value)))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Integer(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Integer(i64::from(value)))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(Number::Float(f64::from(value)))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Sequence(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Mapping(value)
    }
}

impl From<ObjectValue> for Value {
    fn from(value: ObjectValue) -> Self {
        Value::Object(value)
    }
}
