//! Strongly-typed identifiers for OpenL2M resources.
//!
//! Devices and groups are numbered by the server; interfaces are keyed by an
//! opaque string (usually the SNMP ifIndex rendered as text). Wrapping them
//! keeps a device id from being passed where a group id is expected.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Macro to generate numeric identifier wrapper types.
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw numeric id.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw numeric id.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Parses an id from its decimal text form, as used in JSON map keys.
            ///
            /// # Errors
            ///
            /// Returns [`Error::ProtocolError`] if the text is not a decimal number.
            pub fn parse_str(input: &str) -> Result<Self> {
                input.trim().parse::<u64>().map(Self).map_err(|_| {
                    Error::ProtocolError(format!(
                        "invalid {} `{input}`",
                        stringify!($name)
                    ))
                })
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse_str(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(DeviceId, "Device (switch) id");
numeric_id!(GroupId, "Device group id");

/// Interface key within one device.
///
/// Deserializes from either a JSON string or a JSON integer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct InterfaceId(String);

impl InterfaceId {
    /// Creates an interface id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InterfaceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for InterfaceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for InterfaceId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for InterfaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for InterfaceId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct InterfaceIdVisitor;

        impl Visitor<'_> for InterfaceIdVisitor {
            type Value = InterfaceId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an interface id as string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<InterfaceId, E> {
                Ok(InterfaceId(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<InterfaceId, E> {
                Ok(InterfaceId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<InterfaceId, E> {
                Ok(InterfaceId(v.to_string()))
            }
        }

        deserializer.deserialize_any(InterfaceIdVisitor)
    }
}
