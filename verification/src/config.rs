//! Verifier configuration.

use serde::{Deserialize, Serialize};

/// Endpoint value that selects the offline randomized stub.
pub const DEBUG_ENDPOINT: &str = "debug";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Authority URL, or `"debug"` for the offline stub.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Sent as the `X-API-KEY` header.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEBUG_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl VerifierConfig {
    pub fn is_debug(&self) -> bool {
        self.endpoint.trim().eq_ignore_ascii_case(DEBUG_ENDPOINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_debug_stub() {
        assert!(VerifierConfig::default().is_debug());
    }

    #[test]
    fn url_endpoint_is_not_debug() {
        let config = VerifierConfig {
            endpoint: "https://auth.example.org/user-check".into(),
            ..VerifierConfig::default()
        };
        assert!(!config.is_debug());
    }
}
