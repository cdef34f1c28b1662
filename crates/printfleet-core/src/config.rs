// ── Runtime fleet configuration ──
//
// Describes *where* the print server lives and how the controller should
// behave by default. Carries credentials but never touches disk; hosts
// build a `FleetConfig` (directly or via printfleet-config) and hand it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Configuration for one print server connection.
#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// Print server base URL (e.g., `http://printfarm.local:4000`).
    pub server: Url,
    /// API key for the print server, if it requires one.
    pub api_key: Option<SecretString>,
    /// Request timeout for transport collaborators. The core itself never
    /// times out a call.
    pub timeout: Duration,
    /// Default for file listings when a command does not say.
    pub recursive_file_listing: bool,
}

impl FleetConfig {
    pub fn new(server: Url) -> Self {
        Self {
            server,
            api_key: None,
            timeout: Duration::from_secs(30),
            recursive_file_listing: false,
        }
    }
}
