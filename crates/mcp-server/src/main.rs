use std::path::PathBuf;

use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use recap_mcp_server::{serve, ServerContext};

/// Recap tool server. Speaks newline-delimited JSON-RPC on stdio.
#[derive(Parser)]
#[command(name = "recap-mcp", version)]
struct Cli {
    /// Path to the local notes store (JSON array of note objects).
    #[arg(long, default_value = "data/notes.json")]
    notes: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries the protocol, so diagnostics go to stderr only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let ctx = ServerContext::new(cli.notes)?;

    tracing::debug!("recap-mcp serving on stdio");
    serve(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &ctx,
    )
    .await?;

    Ok(())
}
