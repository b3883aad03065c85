//! Lenient deserializers for query strings and partial-update bodies.
//!
//! Browsers happily send `?page=&createdBy=` for untouched form fields, so
//! empty strings are treated as absent.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// `true`, `1` and `yes` (any case) are on; anything else, including absence, is off.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(matches!(
        opt.as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("true" | "1" | "yes")
    ))
}

/// Distinguishes a missing field (`None`) from an explicit `null` (`Some(None)`).
///
/// Use with `#[serde(default, deserialize_with = "deserialize_double_option")]`.
pub fn deserialize_double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Treats empty strings as absent.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Query {
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        created_by: Option<Uuid>,
        #[serde(default, deserialize_with = "deserialize_flag")]
        include_password: bool,
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        search: Option<String>,
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_double_option")]
        thumbnail: Option<Option<String>>,
    }

    #[test]
    fn test_empty_values_are_absent() {
        let q: Query =
            serde_json::from_str(r#"{"created_by":"","include_password":"","search":"  "}"#)
                .unwrap();
        assert!(q.created_by.is_none());
        assert!(!q.include_password);
        assert!(q.search.is_none());
    }

    #[test]
    fn test_flag_values() {
        for (raw, expected) in [("true", true), ("TRUE", true), ("1", true), ("false", false)] {
            let json = format!(r#"{{"include_password":"{}"}}"#, raw);
            let q: Query = serde_json::from_str(&json).unwrap();
            assert_eq!(q.include_password, expected, "value {raw}");
        }
    }

    #[test]
    fn test_missing_flag_is_false() {
        let q: Query = serde_json::from_str("{}").unwrap();
        assert!(!q.include_password);
    }

    #[test]
    fn test_invalid_uuid_is_rejected() {
        let result: Result<Query, _> = serde_json::from_str(r#"{"created_by":"nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_double_option() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.thumbnail, None);

        let cleared: Patch = serde_json::from_str(r#"{"thumbnail":null}"#).unwrap();
        assert_eq!(cleared.thumbnail, Some(None));

        let set: Patch = serde_json::from_str(r#"{"thumbnail":"https://x/y.png"}"#).unwrap();
        assert_eq!(set.thumbnail, Some(Some("https://x/y.png".to_string())));
    }
}
