//! Lenient deserializers for loosely typed API payloads.
//!
//! The inventory API is not consistent about numeric fields: the same
//! measurement may arrive as a number, a numeric string, an empty string,
//! or `null` depending on the record. These helpers collapse all of those
//! into `Option<T>` instead of failing the whole page. Lists may arrive as
//! `null` and flags as `0`/`1` or strings; those are normalized here too.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Deserialize a number, numeric string, or null into `Option<f64>`.
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawNumber::Number(n)) if n.is_finite() => Some(n),
        Some(RawNumber::Text(s)) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    })
}

/// Deserialize a non-negative whole number into `Option<u32>`.
pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_f64(deserializer)?
        .filter(|n| *n >= 0.0 && *n <= u32::MAX as f64)
        .map(|n| n.round() as u32))
}

/// Deserialize a count-like field, defaulting to zero.
pub fn u64_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_f64(deserializer)?
        .filter(|n| *n >= 0.0)
        .map(|n| n.round() as u64)
        .unwrap_or(0))
}

/// Deserialize a list that may be `null` into a possibly empty `Vec`.
pub fn vec_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Deserialize a flag sent as a boolean, `0`/`1`, or `null`.
/// Anything unrecognized reads as `false`.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawFlag>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawFlag::Bool(b)) => b,
        Some(RawFlag::Number(n)) => n == 1.0,
        Some(RawFlag::Text(s)) => matches!(s.trim(), "1" | "true"),
        _ => false,
    })
}
