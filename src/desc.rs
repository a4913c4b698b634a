//! Type descriptors and the specialization predicate.
//!
//! [`TypeDesc`] names a runtime value kind, optionally refined by a container
//! parameter ("sequence of int") or an object class name. The lattice is
//! closed: every kind specializes [`TypeDesc::Any`], a parameterized
//! container specializes its unparameterized counterpart, and a named object
//! class specializes the anonymous object kind. There is no open-ended
//! subclass enumeration; dispatch generality comes from the unparameterized
//! levels of the lattice.
//!
//! [`ClassSet`] turns a descriptor into a dispatch key: either the exact type
//! alone, or the type together with everything that specializes it. Sets are
//! compared by narrowness through [`PartialOrd`]; incomparable sets yield
//! `None`, which is what makes ambiguous registrations detectable instead of
//! silently ordered.

use std::cmp::Ordering;
use std::fmt;

/// Describes the runtime type of a [`Value`](crate::Value).
///
/// Sequences and mappings may carry an element parameter; objects may carry a
/// class name. An absent parameter means "any".
///
/// # Examples
///
/// ```rust
/// use recast::TypeDesc;
///
/// let ints = TypeDesc::sequence_of(TypeDesc::Int);
/// assert!(ints.specializes(&TypeDesc::sequence()));
/// assert!(ints.specializes(&TypeDesc::Any));
/// assert!(!TypeDesc::sequence().specializes(&ints));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    Any,
    Null,
    Bool,
    Int,
    Float,
    Str,
    Date,
    BigInt,
    Sequence(Option<Box<TypeDesc>>),
    Mapping(Option<Box<TypeDesc>>),
    Object(Option<String>),
}

impl TypeDesc {
    /// The unparameterized sequence descriptor.
    #[must_use]
    pub fn sequence() -> Self {
        TypeDesc::Sequence(None)
    }

    /// A sequence descriptor refined by an element parameter.
    #[must_use]
    pub fn sequence_of(element: TypeDesc) -> Self {
        TypeDesc::Sequence(Some(Box::new(element)))
    }

    /// The unparameterized mapping descriptor.
    #[must_use]
    pub fn mapping() -> Self {
        TypeDesc::Mapping(None)
    }

    /// A mapping descriptor refined by a value parameter.
    #[must_use]
    pub fn mapping_of(value: TypeDesc) -> Self {
        TypeDesc::Mapping(Some(Box::new(value)))
    }

    /// A structured-object descriptor for a named class.
    #[must_use]
    pub fn object(class: impl Into<String>) -> Self {
        TypeDesc::Object(Some(class.into()))
    }

    /// The anonymous structured-object descriptor, matching any class.
    #[must_use]
    pub fn any_object() -> Self {
        TypeDesc::Object(None)
    }

    /// Returns `true` if every value described by `self` is also described
    /// by `other`.
    ///
    /// Specialization is reflexive and transitive. For containers it requires
    /// the outer kind to match and, when both sides declare a parameter, the
    /// parameter to specialize recursively; an unparameterized side behaves
    /// as "parameter = any".
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recast::TypeDesc;
    ///
    /// assert!(TypeDesc::Int.specializes(&TypeDesc::Int));
    /// assert!(TypeDesc::object("Book").specializes(&TypeDesc::any_object()));
    /// assert!(TypeDesc::sequence_of(TypeDesc::Int)
    ///     .specializes(&TypeDesc::sequence_of(TypeDesc::Any)));
    /// ```
    #[must_use]
    pub fn specializes(&self, other: &TypeDesc) -> bool {
        if matches!(other, TypeDesc::Any) {
            return true;
        }
        match (self, other) {
            (TypeDesc::Sequence(p), TypeDesc::Sequence(q))
            | (TypeDesc::Mapping(p), TypeDesc::Mapping(q)) => match (p, q) {
                (_, None) => true,
                (Some(p), Some(q)) => p.specializes(q),
                (None, Some(_)) => false,
            },
            (TypeDesc::Object(c), TypeDesc::Object(d)) => match (c, d) {
                (_, None) => true,
                (Some(c), Some(d)) => c == d,
                (None, Some(_)) => false,
            },
            (a, b) => a == b,
        }
    }

    /// Returns the nearest common ancestor of two descriptors in the lattice.
    #[must_use]
    pub fn unify(&self, other: &TypeDesc) -> TypeDesc {
        if self.specializes(other) {
            return other.clone();
        }
        if other.specializes(self) {
            return self.clone();
        }
        match (self, other) {
            (TypeDesc::Sequence(_), TypeDesc::Sequence(_)) => TypeDesc::Sequence(None),
            (TypeDesc::Mapping(_), TypeDesc::Mapping(_)) => TypeDesc::Mapping(None),
            (TypeDesc::Object(_), TypeDesc::Object(_)) => TypeDesc::Object(None),
            _ => TypeDesc::Any,
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Any => write!(f, "any"),
            TypeDesc::Null => write!(f, "null"),
            TypeDesc::Bool => write!(f, "bool"),
            TypeDesc::Int => write!(f, "int"),
            TypeDesc::Float => write!(f, "float"),
            TypeDesc::Str => write!(f, "str"),
            TypeDesc::Date => write!(f, "date"),
            TypeDesc::BigInt => write!(f, "bigint"),
            TypeDesc::Sequence(None) => write!(f, "sequence"),
            TypeDesc::Sequence(Some(p)) => write!(f, "sequence<{}>", p),
            TypeDesc::Mapping(None) => write!(f, "mapping"),
            TypeDesc::Mapping(Some(p)) => write!(f, "mapping<{}>", p),
            TypeDesc::Object(None) => write!(f, "object"),
            TypeDesc::Object(Some(c)) => write!(f, "object<{}>", c),
        }
    }
}

/// A dispatch key standing for a type, or a type plus all its
/// specializations.
///
/// `ClassSet` values are immutable and freely cloned; they are used as keys
/// in a [`SpecializationMap`](crate::SpecializationMap). Narrowness is the
/// subset relation, exposed through [`PartialOrd`]: `Less` means strictly
/// narrower, `None` means the sets are incomparable.
///
/// # Examples
///
/// ```rust
/// use recast::{ClassSet, TypeDesc};
///
/// let all_sequences = ClassSet::subtypes(TypeDesc::sequence());
/// let int_sequences = ClassSet::subtypes(TypeDesc::sequence_of(TypeDesc::Int));
///
/// assert!(all_sequences.contains(&TypeDesc::sequence_of(TypeDesc::Int)));
/// assert!(int_sequences < all_sequences);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassSet {
    /// The exact type only.
    Exact(TypeDesc),
    /// The type together with everything that specializes it.
    Subtypes(TypeDesc),
}

impl ClassSet {
    /// The set containing exactly one descriptor.
    #[must_use]
    pub fn exact(desc: TypeDesc) -> Self {
        ClassSet::Exact(desc)
    }

    /// The set containing a descriptor and all its specializations.
    #[must_use]
    pub fn subtypes(desc: TypeDesc) -> Self {
        ClassSet::Subtypes(desc)
    }

    /// Returns `true` if the set contains the descriptor.
    #[must_use]
    pub fn contains(&self, desc: &TypeDesc) -> bool {
        match self {
            ClassSet::Exact(d) => d == desc,
            ClassSet::Subtypes(d) => desc.specializes(d),
        }
    }

    /// Returns `true` if this set is a strict subset of `other`.
    #[must_use]
    pub fn is_narrower_than(&self, other: &ClassSet) -> bool {
        self.partial_cmp(other) == Some(Ordering::Less)
    }
}

impl PartialOrd for ClassSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        match (self, other) {
            (ClassSet::Exact(_), ClassSet::Exact(_)) => None,
            (ClassSet::Exact(a), ClassSet::Subtypes(b)) => {
                a.specializes(b).then_some(Ordering::Less)
            }
            (ClassSet::Subtypes(a), ClassSet::Exact(b)) => {
                b.specializes(a).then_some(Ordering::Greater)
            }
            (ClassSet::Subtypes(a), ClassSet::Subtypes(b)) => {
                if a.specializes(b) {
                    Some(Ordering::Less)
                } else if b.specializes(a) {
                    Some(Ordering::Greater)
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for ClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassSet::Exact(d) => write!(f, "exactly {}", d),
            ClassSet::Subtypes(d) => write!(f, "{} and subtypes", d),
        }
    }
}
