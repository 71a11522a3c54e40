//! Strongly-typed identifiers for integration records.
//!
//! Identifiers are caller-supplied strings (the persisted records are keyed by
//! them verbatim), so the wrappers serialize transparently. Freshly generated
//! identifiers use a prefixed ULID.

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Macro to generate a string-backed ID wrapper.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Generates a fresh identifier from a random ULID.
            #[must_use]
            pub fn generate() -> Self {
                Self(format!("{}_{}", $prefix, Ulid::new()))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Returns the prefix used by [`Self::generate`].
            #[must_use]
            pub const fn prefix() -> &'static str {
                $prefix
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Primary key of an integration record.
    IntegrationId,
    "int"
);

define_id!(
    /// Primary key of an integration config record.
    IntegrationConfigId,
    "cfg"
);

define_id!(
    /// Identifies the point-of-sale tenant an integration belongs to.
    PosId,
    "pos"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_id_carries_prefix() {
        let id = IntegrationId::generate();
        assert!(id.as_str().starts_with("int_"));

        let id = IntegrationConfigId::generate();
        assert!(id.as_str().starts_with("cfg_"));
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(IntegrationId::generate(), IntegrationId::generate());
    }

    #[test]
    fn display_is_the_raw_value() {
        let id = IntegrationId::new("int-1");
        assert_eq!(id.to_string(), "int-1");
    }

    #[test]
    fn empty_ids_are_representable() {
        assert!(IntegrationId::default().is_empty());
        assert!(!PosId::from("pos-9").is_empty());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = IntegrationConfigId::new("cfg-1");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"cfg-1\"");

        let parsed: IntegrationConfigId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, id);
    }
}
