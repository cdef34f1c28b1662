// ── Core error types ──
//
// User-facing errors from printfleet-core. Remote failures arrive as
// `ServiceError` from the collaborators and are wrapped unchanged.
// Declined job commands are NOT errors; see `dispatch::JobOutcome`.

use thiserror::Error;

use crate::service::ServiceError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors (raised before any remote call) ─────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Remote errors ────────────────────────────────────────────────
    #[error("Remote call failed: {0}")]
    Service(#[from] ServiceError),

    #[error("Malformed response from {operation}: {message}")]
    MalformedResponse { operation: String, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// Rejected locally before anything was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }

    /// The remote side failed or answered with something unusable.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Service(_) | Self::MalformedResponse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_disjoint() {
        let v = CoreError::validation("empty selection");
        assert!(v.is_validation());
        assert!(!v.is_remote());

        let r = CoreError::from(ServiceError::Unavailable("refused".into()));
        assert!(r.is_remote());
        assert!(!r.is_validation());
        assert_eq!(r.to_string(), "Remote call failed: service unavailable: refused");
    }
}
