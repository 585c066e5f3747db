//! `fieldguard` — service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables; a missing
//!    `ENCRYPTION_KEY` aborts here.
//! 2. Initialise the telemetry pipeline.
//! 3. Build the [`FieldCodec`] from the passphrase and parse the
//!    sensitive-field paths.
//! 4. Build the Axum router and start the server.

mod config;
mod crypto;
mod fields;
mod server;
mod telemetry;

use anyhow::Result;
use tracing::info;

use config::Config;
use crypto::{FieldCodec, Passphrase};
use fields::SensitiveFields;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        "fieldguard starting"
    );

    // -----------------------------------------------------------------------
    // 3. Codec and sensitive-field set
    // -----------------------------------------------------------------------
    let codec = FieldCodec::new(Passphrase::new(cfg.encryption_key.clone()));
    let fields = SensitiveFields::parse(&cfg.sensitive_fields);
    info!(paths = fields.len(), "sensitive fields configured");

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(codec, fields);
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
