//! HTTP server configuration object.

use std::net::SocketAddr;

use backend::settings::ProviderSettings;

/// Everything `create_server` needs, resolved from settings in `main`.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) provider: ProviderSettings,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, provider: ProviderSettings) -> Self {
        Self {
            bind_addr,
            provider,
        }
    }
}
