//! `login-scout serve` — run the REST API and browser UI.

use crate::rest::{self, AppState};
use anyhow::{Context, Result};
use login_scout::{Scout, ScoutConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Start the HTTP server and block until Ctrl-C.
pub async fn run(host: &str, port: u16, config: &ScoutConfig) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    let scout = Scout::from_config(config)?;
    let state = Arc::new(AppState::new(scout));

    info!("starting login-scout v{}", env!("CARGO_PKG_VERSION"));
    rest::start(addr, state).await
}
