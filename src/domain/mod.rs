//! Domain types for workers, items and missions with strong typing.
//!
//! Identifiers follow the Newtype pattern so a `MissionId` can never be passed
//! where a `WorkerId` is expected, even though all of them are UUID strings
//! on disk.

pub mod state;

pub use state::{MissionState, WorkerState};

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Wraps an identifier received from a client or the database.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Unique identifier of a worker.
    ///
    /// ```rust
    /// use worker_missions::domain::WorkerId;
    ///
    /// let id = WorkerId::new("w-1");
    /// assert_eq!(id.as_str(), "w-1");
    /// assert_eq!(id.to_string(), "w-1");
    /// ```
    WorkerId
);

string_id!(
    /// Unique identifier of an item.
    ItemId
);

string_id!(
    /// Unique identifier of a mission.
    MissionId
);

/// Anything addressable by a string identifier.
pub trait Identified {
    fn id_str(&self) -> &str;
}

/// A reference to another record that may or may not have been looked up.
///
/// Serialized untagged: an unresolved reference is the bare id string, a
/// resolved one is the full object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Id(String),
    Resolved(T),
}

impl<T: Identified> Reference<T> {
    /// Identifier of the referenced record, whether resolved or not.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Resolved(value) => value.id_str(),
        }
    }

    #[must_use]
    pub const fn resolved(&self) -> Option<&T> {
        match self {
            Self::Id(_) => None,
            Self::Resolved(value) => Some(value),
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Thing {
        id: String,
        weight: f64,
    }

    impl Identified for Thing {
        fn id_str(&self) -> &str {
            &self.id
        }
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(WorkerId::generate(), WorkerId::generate());
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let id = MissionId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        let back: MissionId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn reference_id_is_available_in_both_forms() {
        let unresolved: Reference<Thing> = Reference::Id("t1".to_string());
        let resolved = Reference::Resolved(Thing {
            id: "t2".to_string(),
            weight: 3.0,
        });

        assert_eq!(unresolved.id(), "t1");
        assert_eq!(resolved.id(), "t2");
        assert!(!unresolved.is_resolved());
        assert_eq!(resolved.resolved().map(|t| t.weight), Some(3.0));
    }

    #[test]
    fn reference_serializes_untagged() {
        let unresolved: Reference<Thing> = Reference::Id("t1".to_string());
        assert_eq!(serde_json::to_value(&unresolved).unwrap(), "t1");

        let resolved = Reference::Resolved(Thing {
            id: "t2".to_string(),
            weight: 1.5,
        });
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["id"], "t2");
        assert_eq!(json["weight"], 1.5);
    }
}
