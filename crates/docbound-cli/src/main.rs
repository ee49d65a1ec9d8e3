// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docbound: document boundary detection from the command line.
//
// Entry point. Initialises logging, loads configuration, and dispatches to
// the subcommands.

mod commands;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use docbound_core::BoundaryStrategy;
use docbound_core::human_errors::humanize_error;

#[derive(Debug, Parser)]
#[command(name = "docbound", version, about = "Find document boundaries in camera frames")]
struct Cli {
    /// JSON detection config; defaults apply to anything it leaves out.
    #[arg(long, short, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the configured strategy.
    #[arg(long, global = true, value_enum)]
    strategy: Option<StrategyArg>,

    /// Reject self-intersecting or concave corner sets.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum StrategyArg {
    Gradient,
    Contour,
}

impl From<StrategyArg> for BoundaryStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Gradient => BoundaryStrategy::Gradient,
            StrategyArg::Contour => BoundaryStrategy::Contour,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one detection pass over an image.
    Detect {
        image: PathBuf,
        /// Write the (cropped) photo as JPEG.
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Replay a directory of frames through the live detection loop.
    Watch {
        dir: PathBuf,
        /// Capture the last frame as JPEG when done.
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration, or write it to a file.
    Config {
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "docbound starting");

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        // Ran fine but no boundary was found.
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            let human = humanize_error(&e);
            tracing::error!(error = %e, "docbound failed");
            eprintln!("{}\n  {}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> docbound_core::error::Result<bool> {
    let mut config = commands::load_config(cli.config.as_deref())?;
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy.into();
    }
    config.strict_geometry |= cli.strict;

    match cli.command {
        Command::Detect { image, output } => commands::detect(&image, &config, output.as_deref()),
        Command::Watch { dir, output } => commands::watch(&dir, &config, output.as_deref()).await,
        Command::Config { output } => {
            commands::write_config(&config, output.as_deref())?;
            Ok(true)
        }
    }
}
