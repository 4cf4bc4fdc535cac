//! Lenient deserializers.
//!
//! The REST API sends ids as numbers on some endpoints and as strings on
//! others, and the Ynison protocol encodes 64-bit integers as strings
//! (protobuf JSON mapping). These helpers accept both forms.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

struct StringOrNumber;

impl<'de> Visitor<'de> for StringOrNumber {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or a number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.to_owned())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(String::new())
    }
}

/// Deserialize a `String` from a JSON string or number. `null` becomes `""`.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(StringOrNumber)
}

/// Deserialize an `Option<String>` from a JSON string, number or `null`.
///
/// Empty strings are treated as absent.
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = deserializer.deserialize_any(StringOrNumber)?;
    Ok(if value.is_empty() { None } else { Some(value) })
}

struct LenientI64;

impl<'de> Visitor<'de> for LenientI64 {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or a string containing an integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v).map_err(|_| E::custom(format!("integer {v} out of range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(v as i64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }
        trimmed
            .parse::<i64>()
            .map_err(|e| E::custom(format!("invalid integer {trimmed:?}: {e}")))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(0)
    }
}

/// Deserialize an `i64` from a JSON number or numeric string. `null` becomes `0`.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientI64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "opt_string_or_number")]
        album: Option<String>,
        #[serde(default, deserialize_with = "lenient_i64")]
        ts: i64,
    }

    #[test]
    fn accepts_numbers_and_strings() {
        let a: Sample = serde_json::from_str(r#"{"id": 42, "album": 7, "ts": 1700000000000}"#).unwrap();
        let b: Sample =
            serde_json::from_str(r#"{"id": "42", "album": "7", "ts": "1700000000000"}"#).unwrap();

        assert_eq!(a.id, "42");
        assert_eq!(a.id, b.id);
        assert_eq!(a.album, b.album);
        assert_eq!(a.ts, 1_700_000_000_000);
        assert_eq!(a.ts, b.ts);
    }

    #[test]
    fn null_and_missing_fall_back_to_defaults() {
        let s: Sample = serde_json::from_str(r#"{"id": null, "album": null, "ts": null}"#).unwrap();
        assert_eq!(s.id, "");
        assert!(s.album.is_none());
        assert_eq!(s.ts, 0);

        let s: Sample = serde_json::from_str("{}").unwrap();
        assert!(s.album.is_none());
        assert_eq!(s.ts, 0);
    }

    #[test]
    fn empty_string_album_is_absent() {
        let s: Sample = serde_json::from_str(r#"{"album": ""}"#).unwrap();
        assert!(s.album.is_none());
    }

    #[test]
    fn rejects_garbage_integer() {
        let result: std::result::Result<Sample, _> = serde_json::from_str(r#"{"ts": "soon"}"#);
        assert!(result.is_err());
    }
}
