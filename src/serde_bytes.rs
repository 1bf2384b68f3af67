//! Serde helpers for JSON-RPC numbers
//!
//! The Sui JSON-RPC encodes 64-bit integers as decimal strings, but some
//! fields (e.g. `initial_shared_version`) arrive as plain JSON numbers.
//! `u64_string` accepts both and always emits a string.

use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

impl NumberOrString {
    fn into_u64<E: serde::de::Error>(self) -> Result<u64, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid u64 string `{}`", s))),
        }
    }
}

/// Serialize/deserialize u64 as decimal string (accepting numbers on input)
pub mod u64_string {
    use super::*;

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        NumberOrString::deserialize(deserializer)?.into_u64::<D::Error>()
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Versioned {
        #[serde(with = "super::u64_string")]
        version: u64,
    }

    #[test]
    fn test_accepts_number_or_string() {
        let a: Versioned = serde_json::from_str(r#"{"version": 7}"#).unwrap();
        let b: Versioned = serde_json::from_str(r#"{"version": " 7"}"#).unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<Versioned>(r#"{"version": "seven"}"#).is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Versioned { version: 18_446_744_073_709_551_615 }).unwrap();
        assert_eq!(json, r#"{"version":"18446744073709551615"}"#);
    }
}
