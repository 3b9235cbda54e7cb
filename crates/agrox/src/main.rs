// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AgroX - query clarification and routing for a farming assistant.
//!
//! This is the binary entry point. Results go to stdout as JSON; logs and
//! diagnostics go to stderr.

mod check;
mod route;

use std::path::PathBuf;

use agrox_config::{AgroxConfig, ConfigError};
use clap::{Parser, Subcommand};

/// AgroX - route farming questions to guides, soil data, or both.
#[derive(Parser, Debug)]
#[command(name = "agrox", version, about, long_about = None)]
struct Cli {
    /// Load this config file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Clarify and route a single query.
    Route {
        /// The farming question, as the user asked it.
        query: String,
    },
    /// Route a batch of queries and report cache statistics.
    Batch {
        /// File with one query per line (defaults to the built-in demo queries).
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Load and validate configuration, then print a summary.
    CheckConfig,
}

fn load_config(path: Option<&std::path::Path>) -> Result<AgroxConfig, Vec<ConfigError>> {
    match path {
        Some(path) => agrox_config::load_and_validate_path(path),
        None => agrox_config::load_and_validate(),
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("agrox={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            agrox_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Commands::Route { query } => route::run_route(&config, &query).await,
        Commands::Batch { file } => route::run_batch(&config, file.as_deref()).await,
        Commands::CheckConfig => {
            check::run_check_config(&config, cli.config.as_deref());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("agrox: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_route_with_global_config() {
        let cli = Cli::parse_from(["agrox", "route", "soil pH for tomatoes", "--config", "x.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        match cli.command {
            Commands::Route { query } => assert_eq!(query, "soil pH for tomatoes"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_batch_and_check_config() {
        let cli = Cli::parse_from(["agrox", "batch", "--file", "queries.txt"]);
        assert!(matches!(cli.command, Commands::Batch { file: Some(_) }));
        let cli = Cli::parse_from(["agrox", "check-config"]);
        assert!(matches!(cli.command, Commands::CheckConfig));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = agrox_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.defaults.crop, "maize");
        assert!(config.router.keyword_fallback);
    }
}
