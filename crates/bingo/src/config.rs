//! Hub configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the session hub and its connection tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Roster and chat label for connections without a player identity.
    pub guest_label: String,

    /// Sender name on chat lines the hub itself produces.
    pub system_sender: String,

    /// How long one outbound frame may take before the connection is
    /// considered dead.
    pub send_timeout: Duration,

    /// How long a new peer may take to finish its WebSocket upgrade.
    pub handshake_timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            guest_label: "Guest".to_string(),
            system_sender: "SYSTEM".to_string(),
            send_timeout: Duration::from_secs(5),
            handshake_timeout: Duration::from_secs(10),
        }
    }
}
