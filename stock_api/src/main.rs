use std::{net::SocketAddr, time::Duration};

use clap::Parser;
use stock_api::{DEFAULT_LOG_FILTER, config::ServerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Stock market data API")]
struct Cli {
    /// Address to listen on (overrides STOCK_API_ADDR)
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Provider timeout in seconds (overrides STOCK_API_PROVIDER_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Return raw provider error text in 500 responses
    #[arg(long)]
    expose_error_detail: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(addr) = cli.addr {
        config.addr = addr;
    }
    if let Some(secs) = cli.timeout_secs {
        config.provider_timeout = Duration::from_secs(secs);
    }
    if cli.expose_error_detail {
        config.expose_error_detail = true;
    }
    config.validate()?;

    stock_api::serve(config).await
}
