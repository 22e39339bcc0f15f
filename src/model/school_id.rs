//! SchoolId value object.
//!
//! Schools are addressed by a four-digit identifier. Every operation that
//! takes a school validates it through this type before building a request,
//! so a malformed id never reaches the network.

use crate::error::{ConsoleError, ConsoleResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A validated four-digit school identifier.
///
/// ```rust
/// use school_console::SchoolId;
///
/// let id = SchoolId::new("0421").unwrap();
/// assert_eq!(id.as_str(), "0421");
///
/// assert!(SchoolId::new("421").is_err());
/// assert!(SchoolId::new("04a1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchoolId(String);

impl SchoolId {
    /// Validate and wrap a school identifier.
    pub fn new(value: impl AsRef<str>) -> ConsoleResult<Self> {
        let value = value.as_ref();
        Self::validate_format(value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the identifier.
    pub fn as_u16(&self) -> u16 {
        // Four ASCII digits always fit.
        self.0.bytes().fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'))
    }

    fn validate_format(value: &str) -> ConsoleResult<()> {
        if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(())
        } else {
            Err(ConsoleError::invalid_school(value))
        }
    }
}

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SchoolId {
    type Err = ConsoleError;

    fn from_str(s: &str) -> ConsoleResult<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for SchoolId {
    type Error = ConsoleError;

    fn try_from(value: &str) -> ConsoleResult<Self> {
        Self::new(value)
    }
}

impl TryFrom<String> for SchoolId {
    type Error = ConsoleError;

    fn try_from(value: String) -> ConsoleResult<Self> {
        Self::new(value)
    }
}

/// Vendor payloads carry school ids as integers; `421` is school `0421`.
impl TryFrom<u64> for SchoolId {
    type Error = ConsoleError;

    fn try_from(value: u64) -> ConsoleResult<Self> {
        if value > 9999 {
            return Err(ConsoleError::invalid_school(value.to_string()));
        }
        Ok(Self(format!("{:04}", value)))
    }
}

impl AsRef<str> for SchoolId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for SchoolId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SchoolId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
