mod cli;

use auditscan::config::Config;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    auditscan::observability::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let mut config =
                Config::load().map_err(|e| format!("Failed to load config: {}", e))?;
            if let Some(address) = args.address {
                config.server.bind_addr = address;
            }
            auditscan::api::run(config).await?
        }
    }

    Ok(())
}
