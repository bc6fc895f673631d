//! Binary for the SMS playground broker.

use anyhow::Result;
use clap::Parser;
use playground_server::{load_config, run_server, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { port } => {
            let config = load_config(port)?;
            run_server(config).await
        }
    }
}
