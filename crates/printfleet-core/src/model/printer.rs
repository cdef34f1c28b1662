// ── Printer domain types ──

use std::cmp::Ordering;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use super::entity_id::EntityId;

/// A status flag as last reported by the print server.
///
/// `Unknown` means "not yet received". It renders like `Off` but never
/// counts as a confirmed state when gating commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum StatusFlag {
    #[default]
    Unknown,
    On,
    Off,
}

impl StatusFlag {
    /// Confirmed `true`.
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// Confirmed `false`.
    pub fn is_off(self) -> bool {
        matches!(self, Self::Off)
    }

    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Display value: unknown collapses to `false`.
    pub fn shown(self) -> bool {
        self.is_on()
    }
}

impl From<Option<bool>> for StatusFlag {
    fn from(v: Option<bool>) -> Self {
        match v {
            Some(true) => Self::On,
            Some(false) => Self::Off,
            None => Self::Unknown,
        }
    }
}

impl From<bool> for StatusFlag {
    fn from(v: bool) -> Self {
        Self::from(Some(v))
    }
}

impl From<StatusFlag> for Option<bool> {
    fn from(flag: StatusFlag) -> Self {
        match flag {
            StatusFlag::On => Some(true),
            StatusFlag::Off => Some(false),
            StatusFlag::Unknown => None,
        }
    }
}

/// Live state flags reported for a printer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterState {
    #[serde(default)]
    pub operational: StatusFlag,
    #[serde(default)]
    pub printing: StatusFlag,
}

/// The canonical printer record, as mirrored from the print server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Printer {
    pub id: EntityId,
    pub name: String,
    /// Network-accessible for commands.
    #[serde(default)]
    pub reachable: bool,
    #[serde(default)]
    pub state_flags: PrinterState,
}

impl Printer {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            reachable: false,
            state_flags: PrinterState::default(),
        }
    }

    #[must_use]
    pub fn with_reachable(mut self, reachable: bool) -> Self {
        self.reachable = reachable;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, operational: StatusFlag, printing: StatusFlag) -> Self {
        self.state_flags = PrinterState {
            operational,
            printing,
        };
        self
    }

    pub fn is_printing(&self) -> bool {
        self.state_flags.printing.is_on()
    }

    /// List order: case-insensitive name, then id as a tie-break so the
    /// order is total.
    pub fn display_order(a: &Self, b: &Self) -> Ordering {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
    }
}

/// Payload for create / update / connection-test calls.
///
/// Not serializable: the API key stays inside `SecretString` and is
/// handed to the transport as-is.
#[derive(Debug, Clone)]
pub struct PrinterSpec {
    pub name: String,
    pub url: Url,
    pub api_key: Option<SecretString>,
    pub enabled: bool,
}

impl PrinterSpec {
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            url,
            api_key: None,
            enabled: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_flags_deserialize_as_unknown() {
        let p: Printer = serde_json::from_value(json!({
            "id": "1",
            "name": "Prusa",
            "reachable": true,
        }))
        .unwrap();
        assert_eq!(p.state_flags.printing, StatusFlag::Unknown);
        assert_eq!(p.state_flags.operational, StatusFlag::Unknown);
        assert!(!p.is_printing());
    }

    #[test]
    fn null_and_explicit_flags() {
        let p: Printer = serde_json::from_value(json!({
            "id": "1",
            "name": "Prusa",
            "stateFlags": { "operational": true, "printing": null },
        }))
        .unwrap();
        assert_eq!(p.state_flags.operational, StatusFlag::On);
        assert_eq!(p.state_flags.printing, StatusFlag::Unknown);
        assert!(!p.reachable);
    }

    #[test]
    fn unknown_is_shown_as_off_but_not_known() {
        let flag = StatusFlag::Unknown;
        assert!(!flag.shown());
        assert!(!flag.is_off());
        assert!(!flag.is_known());
    }

    #[test]
    fn display_order_ignores_case() {
        let a = Printer::new("1", "alpha");
        let b = Printer::new("2", "Bravo");
        assert_eq!(Printer::display_order(&a, &b), Ordering::Less);
        assert_eq!(Printer::display_order(&b, &a), Ordering::Greater);
    }

    #[test]
    fn display_order_breaks_ties_by_id() {
        let a = Printer::new("a", "Mk4");
        let b = Printer::new("b", "MK4");
        assert_eq!(Printer::display_order(&a, &b), Ordering::Less);
    }
}
