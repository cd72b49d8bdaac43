//! sigpad-core - Main entry point
//!
//! Signature pad integration service: exposes the capture API over
//! HTTP and drives the attached pen tablet.

use clap::Parser;
use log::{error, info, warn};
use sigpad_core::args::Args;
use sigpad_core::config::Config;
use sigpad_core::render::LabelFont;
use sigpad_core::web::{run_http_server, SharedState};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration before logging so the configured level applies
    let (mut config, config_err) = match args.load_config() {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e.to_string())),
    };

    let log_level = if args.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    env_logger::Builder::new()
        .parse_filters(&std::env::var("SIGPAD_LOG").unwrap_or(log_level))
        .init();

    info!("sigpad-core v{}", env!("CARGO_PKG_VERSION"));
    match config_err {
        None => info!("Loaded configuration from {:?}", args.config),
        Some(e) => warn!("Failed to load config: {}, using defaults", e),
    }

    // Apply command line overrides
    if let Some(addr) = args.device_addr {
        config.device.addr = addr;
    }
    if let Some(port) = args.http_port {
        info!("Overriding HTTP port to {}", port);
        config.http.port = port;
    }
    if let Some(font) = args.font {
        config.ui.font_path = font.display().to_string();
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    info!("Signature pad expected at {}", config.device.addr);
    let font = LabelFont::load(Path::new(&config.ui.font_path));

    let state = Arc::new(SharedState::new(config, font));
    run_http_server(state).await
}
