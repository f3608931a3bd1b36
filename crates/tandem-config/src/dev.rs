//! Development server configuration types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DEV_SERVER_HOST: &str = "0.0.0.0";
pub const DEV_SERVER_PORT: u16 = 3000;

pub const COEP_HEADER: &str = "Cross-Origin-Embedder-Policy";
pub const COEP_VALUE: &str = "require-corp";
pub const COOP_HEADER: &str = "Cross-Origin-Opener-Policy";
pub const COOP_VALUE: &str = "same-origin";

/// Settings for the development server that fronts the `main` target.
///
/// The worker bundle is served by the same process; it never gets a
/// server configuration of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Added to every served response
    #[serde(default = "cross_origin_isolation_headers")]
    pub headers: IndexMap<String, String>,
}

impl DevServerConfig {
    /// `0.0.0.0:3000` with cross-origin isolation enabled.
    pub fn cross_origin_isolated() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            headers: cross_origin_isolation_headers(),
        }
    }

    /// `host:port` as handed to the server process.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether the response headers are exactly the isolation pair.
    pub fn is_cross_origin_isolated(&self) -> bool {
        self.headers == cross_origin_isolation_headers()
    }
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self::cross_origin_isolated()
    }
}

/// Headers that unlock `SharedArrayBuffer` (and threaded wasm) in the page.
pub fn cross_origin_isolation_headers() -> IndexMap<String, String> {
    IndexMap::from([
        (COEP_HEADER.to_string(), COEP_VALUE.to_string()),
        (COOP_HEADER.to_string(), COOP_VALUE.to_string()),
    ])
}

fn default_host() -> String {
    DEV_SERVER_HOST.into()
}

fn default_port() -> u16 {
    DEV_SERVER_PORT
}
