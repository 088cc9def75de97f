//! Broadcast Relay - Binary Entry Point

use clap::Parser;
use tracing_subscriber::EnvFilter;

use broadcast_relay::config::{Cli, Command};
use broadcast_relay::{client, RelayConfig, RelayResult, RelayServer};

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> RelayResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => {
            init_tracing("info");
            let config = RelayConfig::from_args(&args)?;
            let server = RelayServer::bind(config).await?;
            server.run_until_ctrl_c().await
        }
        Command::Client(args) => {
            // The UI owns the terminal; keep logs quiet unless asked for
            init_tracing("off");
            client::run(args).await
        }
    }
}
