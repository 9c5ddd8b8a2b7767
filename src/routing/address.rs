//! ADS endpoint addressing.
//!
//! # Responsibilities
//! - Parse the textual `a.b.c.d.e.f` form of an AMS Net ID
//! - Reject wrong arity, non-numeric and out-of-range components
//! - Render back to the canonical dotted form
//!
//! # Design Decisions
//! - Stored as six raw octets; equality is byte equality
//! - Parsing is strict: no whitespace, no signs, no empty components

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of dot-separated components in an AMS Net ID.
pub const NET_ID_COMPONENTS: usize = 6;

/// Reasons an AMS Net ID string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("expected {NET_ID_COMPONENTS} dot-separated components, found {0}")]
    WrongArity(usize),

    #[error("component {index} ({text:?}) is not a number")]
    NotNumeric { index: usize, text: String },

    #[error("component {index} ({text}) is outside 0..=255")]
    OutOfRange { index: usize, text: String },
}

/// Hierarchical identifier of an ADS endpoint, e.g. `5.6.7.8.1.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AmsNetId([u8; NET_ID_COMPONENTS]);

impl AmsNetId {
    pub const fn new(octets: [u8; NET_ID_COMPONENTS]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; NET_ID_COMPONENTS] {
        self.0
    }
}

impl FromStr for AmsNetId {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != NET_ID_COMPONENTS {
            return Err(AddressError::WrongArity(parts.len()));
        }

        let mut octets = [0u8; NET_ID_COMPONENTS];
        for (index, text) in parts.iter().enumerate() {
            if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(AddressError::NotNumeric {
                    index,
                    text: text.to_string(),
                });
            }
            // All-digit strings only fail to parse on overflow.
            octets[index] = text.parse::<u8>().map_err(|_| AddressError::OutOfRange {
                index,
                text: text.to_string(),
            })?;
        }

        Ok(Self(octets))
    }
}

impl fmt::Display for AmsNetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a}.{b}.{c}.{d}.{e}.{g}")
    }
}

impl Serialize for AmsNetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AmsNetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id: AmsNetId = "5.6.7.8.1.1".parse().unwrap();
        assert_eq!(id.octets(), [5, 6, 7, 8, 1, 1]);
        assert_eq!(id.to_string(), "5.6.7.8.1.1");

        let max: AmsNetId = "255.255.255.255.255.255".parse().unwrap();
        assert_eq!(max.octets(), [255; 6]);
    }

    #[test]
    fn test_wrong_arity() {
        assert_eq!("abc".parse::<AmsNetId>(), Err(AddressError::WrongArity(1)));
        assert_eq!("".parse::<AmsNetId>(), Err(AddressError::WrongArity(1)));
        assert_eq!("1.2.3.4.1".parse::<AmsNetId>(), Err(AddressError::WrongArity(5)));
        assert_eq!(
            "1.2.3.4.1.1.1".parse::<AmsNetId>(),
            Err(AddressError::WrongArity(7))
        );
    }

    #[test]
    fn test_out_of_range() {
        let err = "1.2.3.256.1.1".parse::<AmsNetId>().unwrap_err();
        assert_eq!(
            err,
            AddressError::OutOfRange {
                index: 3,
                text: "256".into()
            }
        );

        // Overflowing far past u8 is still a range error, not a parse error.
        let err = "1.2.3.4.1.99999999999999999999".parse::<AmsNetId>().unwrap_err();
        assert!(matches!(err, AddressError::OutOfRange { index: 5, .. }));
    }

    #[test]
    fn test_non_numeric_components() {
        for input in ["1.2.x.4.1.1", "1.2..4.1.1", "1.2.+3.4.1.1", "1.2. 3.4.1.1"] {
            let err = input.parse::<AmsNetId>().unwrap_err();
            assert!(
                matches!(err, AddressError::NotNumeric { .. }),
                "{input} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_serde_uses_dotted_form() {
        let id: AmsNetId = "1.2.3.4.1.1".parse().unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1.2.3.4.1.1\"");
        assert!(serde_json::from_str::<AmsNetId>("\"1.2.3\"").is_err());
    }
}
