//! Shipping attribute values.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One shipping attribute value (weight, height, width or length).
///
/// The store reports these as numeric strings. Absent, `null` and `""` all
/// mean "not set". Every other value counts as set, including `"0"` and
/// whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Measure(Option<String>);

impl Measure {
    /// A measure with a value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    /// A measure with no value.
    pub const fn unset() -> Self {
        Self(None)
    }

    /// Whether the attribute is missing.
    pub fn is_missing(&self) -> bool {
        matches!(self.0.as_deref(), None | Some(""))
    }

    /// The raw value, if one was set.
    pub fn value(&self) -> Option<&str> {
        self.0.as_deref().filter(|v| !v.is_empty())
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => f.write_str(v),
            None => f.write_str("-"),
        }
    }
}

impl From<&str> for Measure {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMeasure {
    Text(String),
    Number(serde_json::Number),
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for Measure {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawMeasure>::deserialize(deserializer)?;
        Ok(Measure(raw.map(|raw| match raw {
            RawMeasure::Text(s) => s,
            RawMeasure::Number(n) => n.to_string(),
            RawMeasure::Other(v) => v.to_string(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Measure {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_empty_string_is_missing() {
        assert!(decode(r#""""#).is_missing());
        assert!(decode("null").is_missing());
        assert!(Measure::unset().is_missing());
        assert!(Measure::default().is_missing());
    }

    #[test]
    fn test_zero_is_present() {
        assert!(!decode(r#""0""#).is_missing());
        assert!(!decode("0").is_missing());
        assert_eq!(decode("0").value(), Some("0"));
    }

    #[test]
    fn test_whitespace_is_present() {
        assert!(!decode(r#"" ""#).is_missing());
    }

    #[test]
    fn test_numbers_keep_their_text() {
        assert_eq!(decode("1.25").value(), Some("1.25"));
        assert_eq!(decode(r#""12.5""#).value(), Some("12.5"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Measure::new("3").to_string(), "3");
        assert_eq!(Measure::new("").to_string(), "-");
    }
}
