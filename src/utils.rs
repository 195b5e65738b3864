//! Lenient readers for numeric fields of stored documents.
//!
//! Campaign documents are written by hand-edited forms and a javascript
//! client, so a "count" may come back as a double, a numeric string, `null`
//! or not at all. Every reader here maps anything it cannot use to `0`
//! instead of failing the whole document.

use std::fmt;

use serde::de::{self, Visitor};
use serde::Deserializer;

struct NumberVisitor;

impl<'de> Visitor<'de> for NumberVisitor {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, a numeric string or null")
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        Ok(v.trim().replace(',', "").parse().unwrap_or(0.0))
    }

    fn visit_none<E: de::Error>(self) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(NumberVisitor)
    }
}

fn read_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(NumberVisitor)
}

/// Clamps to a finite, non-negative value.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Rounds to a count that still fits a signed 64-bit bson integer.
pub fn sanitize_count(value: f64) -> u64 {
    let value = sanitize_amount(value).round();
    if value >= MAX_STORED_COUNT as f64 {
        MAX_STORED_COUNT
    } else {
        value as u64
    }
}

pub const MAX_STORED_COUNT: u64 = i64::MAX as u64;

/// Currency amounts and supplied ratios.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    read_number(deserializer).map(sanitize_amount)
}

/// Integer counts; integral doubles are accepted, fractions are rounded.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    read_number(deserializer).map(sanitize_count)
}

/// Upstream pre-computed values, kept only so they round-trip.
pub fn lenient_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OptionalVisitor;

    impl<'de> Visitor<'de> for OptionalVisitor {
        type Value = Option<f64>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an optional number")
        }

        fn visit_none<E: de::Error>(self) -> Result<Option<f64>, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Option<f64>, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Option<f64>, D::Error> {
            lenient_amount(d).map(Some)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Option<f64>, E> {
            NumberVisitor.visit_bool(v).map(|v| Some(sanitize_amount(v)))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Option<f64>, E> {
            NumberVisitor.visit_i64(v).map(|v| Some(sanitize_amount(v)))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Option<f64>, E> {
            NumberVisitor.visit_u64(v).map(|v| Some(sanitize_amount(v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Option<f64>, E> {
            NumberVisitor.visit_f64(v).map(|v| Some(sanitize_amount(v)))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Option<f64>, E> {
            NumberVisitor.visit_str(v).map(|v| Some(sanitize_amount(v)))
        }
    }

    deserializer.deserialize_any(OptionalVisitor)
}
