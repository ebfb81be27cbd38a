//! Backend entry-point: loads settings, wires the Mailchimp adapter and
//! serves the waitlist API.

mod server;

use std::ffi::OsString;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::settings::{ProviderSettings, ServerSettings};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    // Both structs read env and config files; neither owns the command line.
    let program = [OsString::from(env!("CARGO_PKG_NAME"))];
    let provider = ProviderSettings::load_from_iter(program.clone())
        .map_err(|e| std::io::Error::other(format!("provider settings: {e}")))?;
    let server_settings = ServerSettings::load_from_iter(program)
        .map_err(|e| std::io::Error::other(format!("server settings: {e}")))?;
    let bind_addr = server_settings
        .bind_addr()
        .map_err(|e| std::io::Error::other(format!("invalid WAITLIST_BIND_ADDR: {e}")))?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, provider))?;
    server.await
}
