//! Control-plane identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! object_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// The inner String is private to ensure all construction goes through
        /// the defined constructors.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First eight characters, for progress lines.
            #[must_use]
            pub fn short(&self) -> &str {
                match self.0.char_indices().nth(8) {
                    Some((idx, _)) => &self.0[..idx],
                    None => &self.0,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

object_id!(
    /// Project identifier (platform ObjectID).
    ProjectId
);

object_id!(
    /// Service identifier (platform ObjectID).
    ServiceId
);

object_id!(
    /// Deployment identifier (platform ObjectID).
    DeploymentId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_truncates_long_ids() {
        let id = DeploymentId::new("65f1c0ffee00112233445566");
        assert_eq!(id.short(), "65f1c0ff");
    }

    #[test]
    fn short_keeps_short_ids() {
        assert_eq!(ServiceId::new("abc").short(), "abc");
    }

    #[test]
    fn ids_deserialize_from_plain_strings() {
        let id: ProjectId = serde_json::from_str("\"p-1\"").unwrap();
        assert_eq!(id.as_str(), "p-1");
    }
}
