//! `matcalc-server`: serve the matrix API over HTTP

use anyhow::{Context, Result};
use clap::Parser;
use matcalc::server::{self, ServerConfig};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Dense matrix calculator HTTP server
#[derive(Parser, Debug)]
#[command(name = "matcalc-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ServerConfig::default()
        .with_host(cli.host)
        .with_port(cli.port);
    let addr = config.bind_addr();
    server::serve(config)
        .await
        .with_context(|| format!("server on {addr} failed"))
}
