use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use mongodb::bson::Bson;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub trait TypedIdMarker {
    fn tag() -> &'static str;
}

/// An opaque identifier. Generated ids look like `MKT-<UUID>`, but any
/// non-blank string read from the store is accepted as-is, including the
/// decimal form of legacy numeric ids.
pub struct TypedId<T: TypedIdMarker>(String, PhantomData<T>);

impl<T: TypedIdMarker> TypedId<T> {
    pub fn new() -> TypedId<T> {
        TypedId(format!("{}-{:X}", T::tag(), Uuid::new_v4()), PhantomData)
    }

    /// Placeholder for an id that has not been assigned. Never stored.
    pub fn blank() -> TypedId<T> {
        TypedId(String::new(), PhantomData)
    }

    /// `<parent>-<index>`, stable for a given parent and position.
    pub fn derived<P: TypedIdMarker>(parent: &TypedId<P>, index: usize) -> TypedId<T> {
        TypedId(format!("{}-{}", parent.0, index), PhantomData)
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: TypedIdMarker> Default for TypedId<T> {
    fn default() -> TypedId<T> {
        TypedId::new()
    }
}

impl<T: TypedIdMarker> Clone for TypedId<T> {
    fn clone(&self) -> TypedId<T> {
        TypedId(self.0.clone(), PhantomData)
    }
}

impl<T: TypedIdMarker> PartialEq for TypedId<T> {
    fn eq(&self, other: &TypedId<T>) -> bool {
        self.0 == other.0
    }
}

impl<T: TypedIdMarker> Eq for TypedId<T> {}

impl<T: TypedIdMarker> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

// lexical only, ids carry no numeric meaning
impl<T: TypedIdMarker> PartialOrd for TypedId<T> {
    fn partial_cmp(&self, other: &TypedId<T>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TypedIdMarker> Ord for TypedId<T> {
    fn cmp(&self, other: &TypedId<T>) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T: TypedIdMarker> Display for TypedId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(&self.0)
    }
}

impl<T: TypedIdMarker> Debug for TypedId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Display::fmt(self, f)
    }
}

impl<T: TypedIdMarker> FromStr for TypedId<T> {
    type Err = TypedIdParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TypedIdParseError::Empty);
        }

        Ok(TypedId(s.to_owned(), PhantomData))
    }
}

impl<T: TypedIdMarker> Serialize for TypedId<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

struct IdVisitor<T> {
    allow_blank: bool,
    marker: PhantomData<T>,
}

impl<T> IdVisitor<T> {
    fn new(allow_blank: bool) -> IdVisitor<T> {
        IdVisitor {
            allow_blank,
            marker: PhantomData,
        }
    }
}

impl<'de, T: TypedIdMarker> Visitor<'de> for IdVisitor<T> {
    type Value = TypedId<T>;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a non-empty string or an integer id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if self.allow_blank && v.trim().is_empty() {
            return Ok(TypedId::blank());
        }

        TypedId::from_str(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(TypedId(v.to_string(), PhantomData))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(TypedId(v.to_string(), PhantomData))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        // numeric ids written from javascript come back as doubles
        if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.007_199_254_740_992e15 {
            Ok(TypedId(format!("{}", v as i64), PhantomData))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        if self.allow_blank {
            Ok(TypedId::blank())
        } else {
            Err(E::invalid_type(de::Unexpected::Option, &self))
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        if self.allow_blank {
            Ok(TypedId::blank())
        } else {
            Err(E::invalid_type(de::Unexpected::Unit, &self))
        }
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_str(self)
    }
}

impl<'de, T: TypedIdMarker> Deserialize<'de> for TypedId<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // a string hint keeps path extractors working; self-describing
        // formats still hand numeric legacy ids to the visitor
        deserializer.deserialize_str(IdVisitor::new(false))
    }
}

/// Reads a nested id where `null`, `""` or an absent field mean "not
/// assigned yet". Those come back as [`TypedId::blank`].
pub fn lenient_id<'de, D, T>(deserializer: D) -> Result<TypedId<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TypedIdMarker,
{
    deserializer.deserialize_option(IdVisitor::new(true))
}

impl<T: TypedIdMarker> From<TypedId<T>> for Bson {
    fn from(id: TypedId<T>) -> Bson {
        id.0.into()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypedIdParseError {
    Empty,
}

impl Display for TypedIdParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}
