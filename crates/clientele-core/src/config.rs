// ── Runtime console configuration ──
//
// Describes *where* the customer service lives and how patient to be
// with it. Never touches disk: the CLI (or any other view adapter)
// builds a `ConsoleConfig` and hands it in.

use std::time::Duration;

use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for talking to one customer service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Base URL of the service API (e.g. `http://localhost:5000/api/`).
    pub api_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ConsoleConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn transport(&self) -> clientele_api::TransportConfig {
        clientele_api::TransportConfig::default().with_timeout(self.timeout)
    }
}
