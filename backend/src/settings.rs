//! Process configuration loaded via OrthoConfig.
//!
//! Provider values use the `MC_` prefix (`MC_API_KEY`, `MC_LIST_ID`); server
//! values use `WAITLIST_`. Missing provider values do not stop the process:
//! they surface as a config failure on each signup instead.

use std::fmt;
use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{CredentialsError, ProviderCredentials};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MIN_TIMEOUT_SECS: u64 = 1;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Mailing-list provider settings.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MC")]
pub struct ProviderSettings {
    /// API key in `<key>-<datacenter>` form.
    pub api_key: Option<String>,
    /// Audience (list) identifier.
    pub list_id: Option<String>,
    /// Override for the API root, normally derived from the datacenter.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl ProviderSettings {
    /// Parse the credentials, keeping the error for per-request reporting.
    pub fn credentials(&self) -> Result<ProviderCredentials, CredentialsError> {
        ProviderCredentials::new(self.api_key.as_deref(), self.list_id.as_deref())
    }

    /// Request timeout. Zero is raised to one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(MIN_TIMEOUT_SECS))
    }

    /// Parsed API root override, if one is configured.
    ///
    /// # Errors
    /// Returns [`url::ParseError`] when the override is not an absolute URL.
    pub fn base_url(&self) -> Result<Option<Url>, url::ParseError> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Url::parse)
            .transpose()
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("list_id", &self.list_id)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WAITLIST")]
pub struct ServerSettings {
    /// Socket address to bind, for example `127.0.0.1:8080`.
    #[ortho_config(default = String::from(DEFAULT_BIND_ADDR))]
    pub bind_addr: String,
}

impl ServerSettings {
    /// Parsed bind address; `0.0.0.0:8080` unless configured.
    ///
    /// # Errors
    /// Returns [`AddrParseError`] when the value is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr.trim().parse()
    }
}
