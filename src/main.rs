// src/main.rs - Standalone control server over a simulated host scene
use std::sync::Arc;

use clap::Parser;

use cammove_rs::config::{self, Config};
use cammove_rs::context::CameraContext;
use cammove_rs::host::SimulatedHost;
use cammove_rs::motion::MotionEngine;
use cammove_rs::router::CommandRouter;
use cammove_rs::server::CommandServer;

#[derive(Parser)]
#[command(name = "cammove-server")]
#[command(about = "TCP control server for camera motion")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting cammove server");

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => config::load_config(path).map_err(|e| {
            tracing::error!("Failed to load config from '{}': {}", path, e);
            e
        })?,
        None => {
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    tracing::info!("Listening port: {}", config.server.port);
    tracing::info!("Loopback-only policy: {}", config.server.loopback_only);
    tracing::info!("Camera speed: {} px/s", config.motion.speed_px_per_sec);

    // The standalone binary serves a simulated scene with a single camera
    // source; embedders construct the same wiring around their own
    // PositioningService implementation.
    let host = Arc::new(SimulatedHost::new());
    host.add_source("Camera", 0.0, 0.0);

    let ctx = Arc::new(CameraContext::new(host));
    ctx.set_camera_names(vec!["Camera".to_string()]);

    let engine = Arc::new(MotionEngine::new(ctx.clone(), config.motion.speed_px_per_sec));
    let router = Arc::new(CommandRouter::new(ctx, engine.clone()));
    let server = CommandServer::new(config.server, router, engine);

    server.start().await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    server.stop().await;

    Ok(())
}
