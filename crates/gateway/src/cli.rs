//! Command-line interface for `recapd`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use recap_domain::config::Config;

#[derive(Parser)]
#[command(name = "recapd", version, about = "Recap gateway server")]
pub struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "recap.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server (the default).
    Serve,
    /// Print the version and exit.
    Version,
}

/// Load the config file, falling back to defaults when it is absent.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: Config =
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/recap.toml")).unwrap();
        assert_eq!(config.server.port, 8787);
    }
}
