//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::ServerConfig;

#[derive(Parser)]
#[command(name = "playground")]
#[command(about = "SMS Playground broker", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP broker (config from env; port can override PLAYGROUND_PORT).
    Run {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Load ServerConfig from environment. If `port` is provided it overrides PLAYGROUND_PORT.
pub fn load_config(port: Option<u16>) -> Result<ServerConfig> {
    ServerConfig::load(port)
}
