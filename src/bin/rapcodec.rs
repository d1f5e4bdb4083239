// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # rapcodec CLI
//!
//! Command-line tool for RAP recording files.
//!
//! ## Usage
//!
//! ```sh
//! # Show the recording tree and capture counts
//! rapcodec inspect info demo.rap
//!
//! # Rewrite a v1 or v2 file as v2 with the default encoders
//! rapcodec upgrade old.rap new.rap
//!
//! # Dump metadata as JSON
//! rapcodec metadata demo.rap --pretty
//!
//! # Check that capture times never go backwards
//! rapcodec validate demo.rap
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{InspectCmd, MetadataCmd, UpgradeCmd, ValidateCmd};
use common::Result;

/// rapcodec - RAP recording toolkit
///
/// Inspect, upgrade and validate recordings of timestamped 3D captures.
#[derive(Parser, Clone)]
#[command(name = "rapcodec")]
#[command(about = "Toolkit for RAP recording files", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Inspect file contents (info, tree, collections)
    #[command(subcommand)]
    Inspect(InspectCmd),

    /// Rewrite a v1 or v2 recording as v2
    Upgrade(UpgradeCmd),

    /// Dump recording metadata as JSON
    Metadata(MetadataCmd),

    /// Check that capture times are chronological
    Validate(ValidateCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(cmd) => cmd.run(),
        Commands::Upgrade(cmd) => cmd.run(),
        Commands::Metadata(cmd) => cmd.run(),
        Commands::Validate(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
