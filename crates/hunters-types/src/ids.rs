//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Hunters, monsters, and missions each get a distinct id type so a
//! `MonsterId` can never be passed where a `HunterId` is expected. All ids
//! use UUID v7 (time-ordered), so ordered maps keyed by id iterate in
//! creation order.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a hunter.
    HunterId
}

define_id! {
    /// Unique identifier for a monster. Presence records reference it too.
    MonsterId
}

define_id! {
    /// Unique identifier for a mission.
    MissionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_uuid_strings() {
        let id = HunterId::new();
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json, Some(format!("\"{}\"", id.into_inner())));
    }

    #[test]
    fn ids_are_time_ordered() {
        let first = MissionId::new();
        let second = MissionId::new();
        assert!(first < second);
    }

    #[test]
    fn malformed_uuid_is_rejected() {
        let parsed: Result<MonsterId, _> = serde_json::from_str("\"monster-1\"");
        assert!(parsed.is_err());
    }
}
