//! Standalone fixture server for interactive development.
//!
//! Brings the harness up with an empty fixture and an empty mock set so a
//! device, emulator, or tunnel can be pointed at the servers by hand. Runs
//! until SIGINT.
//!
//! Environment overrides (all optional):
//! - `FIXTURE_STATE_PORT` — state server port (default 12345)
//! - `FIXTURE_MOCK_PORT` — mock server port (default 8000)
//! - `FIXTURE_NO_MATCH_POLICY` — `error` or `passthrough` (default `error`;
//!   the library itself never defaults this, but a bare dev server needs a
//!   working answer for unmatched traffic)

use anyhow::Context;
use fixture_core::constants::{DEFAULT_MOCK_SERVER_PORT, DEFAULT_STATE_SERVER_PORT};
use fixture_core::StateFixture;
use fixture_match::MockBundle;
use fixture_server::{Harness, HarnessConfig, NoMatchPolicy};
use tracing_subscriber::EnvFilter;

fn env_port(var: &str, default: u16) -> u16 {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let policy = match std::env::var("FIXTURE_NO_MATCH_POLICY") {
        Ok(value) => value
            .parse::<NoMatchPolicy>()
            .context("FIXTURE_NO_MATCH_POLICY")?,
        Err(_) => NoMatchPolicy::ErrorStatus,
    };

    let mut config = HarnessConfig::new(policy);
    config.state_port = env_port("FIXTURE_STATE_PORT", DEFAULT_STATE_SERVER_PORT);
    config.mock_port = env_port("FIXTURE_MOCK_PORT", DEFAULT_MOCK_SERVER_PORT);

    let mut harness = Harness::new();
    harness
        .start(config.clone(), MockBundle::default(), StateFixture::default())
        .await?;

    tracing::info!(
        "state document at http://localhost:{}/state.json",
        config.state_port
    );
    tracing::info!(
        "mock interception on http://localhost:{}",
        config.mock_port
    );

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    tracing::info!("shutting down fixture servers");
    harness.stop().await;
    Ok(())
}
