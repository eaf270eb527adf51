//! Deserializers for snapshot fields that arrive as numbers, numeric
//! strings, empty strings or null depending on how the row was exported.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl NumberOrText {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Text(text) => parse_number(text),
        }
    }

    fn into_text(self) -> Option<String> {
        let text = match self {
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Text(text) => text,
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Parse a numeric text column. Empty or non-numeric text is `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_f64(deserializer)?.unwrap_or(0.0))
}

pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_f64(deserializer)?
        .filter(|value| value.fract() == 0.0)
        .map(|value| value as i64))
}

pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_f64(deserializer)?
        .filter(|value| *value >= 0.0 && value.fract() == 0.0 && *value <= u32::MAX as f64)
        .map(|value| value as u32))
}

pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(value.and_then(NumberOrText::into_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_f64")]
        weight: Option<f64>,
        #[serde(default, deserialize_with = "opt_string")]
        membership: Option<String>,
        #[serde(default, deserialize_with = "opt_u32")]
        age: Option<u32>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_numbers_and_numeric_strings() {
        let p = probe(r#"{"weight": "102.5", "membership": 12345, "age": "17"}"#);
        assert_eq!(p.weight, Some(102.5));
        assert_eq!(p.membership.as_deref(), Some("12345"));
        assert_eq!(p.age, Some(17));

        let p = probe(r#"{"weight": 99, "age": 31.0}"#);
        assert_eq!(p.weight, Some(99.0));
        assert_eq!(p.age, Some(31));
    }

    #[test]
    fn test_empty_null_and_missing() {
        let p = probe(r#"{"weight": "", "membership": "  ", "age": null}"#);
        assert_eq!(p.weight, None);
        assert_eq!(p.membership, None);
        assert_eq!(p.age, None);

        let p = probe("{}");
        assert_eq!(p.weight, None);
    }

    #[test]
    fn test_non_numeric_text_is_absent() {
        let p = probe(r#"{"weight": "---", "age": "-3"}"#);
        assert_eq!(p.weight, None);
        assert_eq!(p.age, None);
    }
}
