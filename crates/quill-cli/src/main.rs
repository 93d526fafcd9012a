//! Quill client binary.
//!
//! # Usage
//!
//! ```bash
//! # Local development server
//! quill
//!
//! # Remote server over TLS, verbose logging
//! quill --origin https://chat.example --log-level debug
//! ```

use clap::Parser;
use quill_cli::Runtime;
use quill_client::DEFAULT_MAX_UPLOAD_SIZE;
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Quill chat client
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(about = "Terminal client for Quill chat")]
#[command(version)]
struct Args {
    /// Server origin; the socket and download URLs are derived from it
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    origin: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Largest file accepted by /file, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_SIZE)]
    max_upload_size: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // stdout carries the conversation
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut runtime = Runtime::connect_to(&args.origin, args.max_upload_size)?;
    tracing::info!(origin = %args.origin, "quill starting");

    runtime.run(BufReader::new(tokio::io::stdin())).await?;
    Ok(())
}
