use anyhow::Result;
use axum::Router;
use clap::Parser;
use sift_core::{EngineConfig, MINIMUM_SCORE};
use sift_server::build_app;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Collection input (JSON/JSONL file or directory); repeat for several collections
    #[arg(long = "input", required = true)]
    inputs: Vec<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Drop vector results scoring at or below this value
    #[arg(long, default_value_t = MINIMUM_SCORE)]
    min_score: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = EngineConfig::with_min_score(args.min_score)?;
    let app: Router = build_app(&args.inputs, config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
