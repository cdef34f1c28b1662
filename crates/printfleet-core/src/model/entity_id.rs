// ── Printer identity ──
//
// Print servers key printers by UUID or by their own string keys (database
// object ids, small integers). Both compare, hash and order as ids.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one printer on the print server.
///
/// Orders UUIDs before string keys, then by value, so id sets iterate
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Uuid(Uuid),
    /// Any key that is not a UUID, kept verbatim.
    Key(String),
}

impl EntityId {
    pub fn is_uuid(&self) -> bool {
        matches!(self, Self::Uuid(_))
    }

    /// An empty or whitespace-only key. Never a valid printer id.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Key(key) => key.trim().is_empty(),
            Self::Uuid(_) => false,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(u) => fmt::Display::fmt(u, f),
            Self::Key(key) => f.write_str(key),
        }
    }
}

impl From<Uuid> for EntityId {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<String> for EntityId {
    fn from(raw: String) -> Self {
        Uuid::parse_str(&raw).map_or(Self::Key(raw), Self::Uuid)
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        Uuid::parse_str(raw).map_or_else(|_| Self::Key(raw.to_owned()), Self::Uuid)
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self::Key(n.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE_UUID: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn uuid_text_becomes_uuid_variant() {
        assert!(EntityId::from(SAMPLE_UUID).is_uuid());
        assert!(EntityId::from(SAMPLE_UUID.to_owned()).is_uuid());
        assert_eq!(EntityId::from(SAMPLE_UUID).to_string(), SAMPLE_UUID);
    }

    #[test]
    fn object_ids_and_numbers_are_keys() {
        let mongo = EntityId::from("507f1f77bcf86cd799439011");
        assert_eq!(mongo, EntityId::Key("507f1f77bcf86cd799439011".into()));
        assert_eq!(EntityId::from(42_u64), EntityId::from("42"));
    }

    #[test]
    fn blank_keys() {
        assert!(EntityId::from("").is_blank());
        assert!(EntityId::from(" \t").is_blank());
        assert!(!EntityId::from("7").is_blank());
        assert!(!EntityId::Uuid(Uuid::nil()).is_blank());
    }

    #[test]
    fn uuids_sort_before_keys() {
        let mut ids = vec![EntityId::from("a"), EntityId::Uuid(Uuid::nil())];
        ids.sort();
        assert!(ids[0].is_uuid());
    }

    #[test]
    fn wire_form_is_a_bare_string() {
        let id: EntityId = serde_json::from_str(&format!("\"{SAMPLE_UUID}\"")).unwrap();
        assert!(id.is_uuid());

        let id: EntityId = serde_json::from_str("\"printer-7\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"printer-7\"");
    }
}
