use clap::Parser;
use std::path::PathBuf;

use crate::config;

#[derive(Parser, Debug)]
#[command(name = "sigpad-core")]
#[command(author = "Sigpad Team")]
#[command(version = "0.2.0")]
#[command(about = "Signature pad integration core", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/sigpad-core.toml")]
    pub config: PathBuf,

    /// Tablet device address (host:port), overrides config
    #[arg(short, long)]
    pub device_addr: Option<String>,

    /// HTTP port for the capture API
    #[arg(long)]
    pub http_port: Option<u16>,

    /// Font file for on-device button labels, overrides config
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action)]
    pub verbose: bool,
}

impl Args {
    pub fn load_config(&self) -> Result<config::Config, Box<dyn std::error::Error>> {
        config::Config::load(&self.config)
    }
}
