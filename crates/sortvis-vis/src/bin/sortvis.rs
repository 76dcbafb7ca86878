//! Sorting Visualizer Server
//!
//! Generate a sequence and serve the playback API.

use std::env;

use sortvis_vis::{VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sortvis=info,sortvis_vis=info,sortvis_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Environment first, then positional args: [port] [seed]
    let config = VisConfig::from_env()?.with_args(env::args().skip(1))?;
    config.validate()?;

    tracing::info!(
        port = config.port,
        algorithm = config.default_algorithm.id(),
        speed_ms = config.default_speed.millis(),
        theme = %config.theme,
        "Starting sorting visualizer"
    );

    let server = VisServer::new(config)?;
    let snapshot = server.state().controller().snapshot().await;
    tracing::info!(len = snapshot.sequence.len(), "Initial sequence generated");

    server.serve().await?;

    Ok(())
}
