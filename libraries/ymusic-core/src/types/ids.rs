//! Catalog identifiers
//!
//! The API is inconsistent about id encoding: the same track id shows up as
//! `3348297` in one payload and `"3348297"` in another. Ids are kept as
//! strings and accept both on the way in.

use crate::serde_util::string_or_number;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new id
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the inner string
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True if the id carries no value
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                string_or_number(deserializer).map(Self)
            }
        }
    };
}

catalog_id!(
    /// Track identifier
    TrackId
);
catalog_id!(
    /// Album identifier
    AlbumId
);
catalog_id!(
    /// Artist identifier
    ArtistId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_are_equal() {
        let a: TrackId = serde_json::from_str("3348297").unwrap();
        let b: TrackId = serde_json::from_str("\"3348297\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "3348297");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = AlbumId::new("297567");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"297567\"");
    }
}
