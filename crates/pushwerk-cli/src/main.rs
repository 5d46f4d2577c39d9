// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pushwerk — signed web push package builder.
//
// Entry point. Initialises logging, loads the TOML configuration, and
// dispatches to the package pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};

use pushwerk_core::config::PackageConfig;
use pushwerk_core::error::{PushwerkError, Result};
use pushwerk_package::workspace::sweep_stale;
use pushwerk_package::PackageBuilder;

#[derive(Debug, Parser)]
#[command(name = "pushwerk", version, about = "Signed web push package builder")]
struct Cli {
    /// Path to the pushwerk TOML configuration.
    #[arg(long, global = true, env = "PUSHWERK_CONFIG", default_value = "pushwerk.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a signed push package for one subscriber.
    Build {
        /// Per-subscriber authentication token (opaque, ≥16 characters).
        #[arg(long)]
        token: String,
        /// Where to write the finished pushpackage.zip.
        #[arg(long, default_value = "pushpackage.zip")]
        out: PathBuf,
    },
    /// Remove build workspaces orphaned by crashed builds.
    Sweep {
        /// Only remove workspaces older than this many hours.
        #[arg(long, default_value_t = 24)]
        max_age_hours: u64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "pushwerk failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config)?;

    match cli.command {
        Command::Build { token, out } => {
            let builder = PackageBuilder::new(config)?;
            let package = builder.build(&token)?;

            for missing in package.missing_assets() {
                tracing::warn!(entry = %missing, "package is missing an icon");
            }

            let written = package.persist_to(&out)?;
            tracing::info!(archive = %written.display(), "push package written");
        }
        Command::Sweep { max_age_hours } => {
            let removed = sweep_stale(
                &config.workspace_parent,
                Duration::from_secs(max_age_hours * 3600),
            )?;
            tracing::info!(removed, "stale workspace sweep finished");
        }
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<PackageConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        PushwerkError::Configuration(format!("cannot read config {}: {e}", path.display()))
    })?;
    toml::from_str(&text).map_err(|e| {
        PushwerkError::Configuration(format!("cannot parse config {}: {e}", path.display()))
    })
}
