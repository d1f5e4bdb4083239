// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - show file information, the recording tree and collections.

use std::path::PathBuf;

use clap::Subcommand;

use crate::common::{format_duration, open_recording, Result};
use rapcodec::{CaptureCollection, Recording};

/// Inspect file contents.
#[derive(Subcommand, Clone, Debug)]
pub enum InspectCmd {
    /// Show basic file information and summary
    Info {
        /// Input recording
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the recording tree
    Tree {
        /// Input recording
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Stop descending below this depth
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// List collections of every recording
    Collections {
        /// Input recording
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only show collections whose name or signature contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        match self {
            InspectCmd::Info { input } => cmd_info(input),
            InspectCmd::Tree { input, depth } => cmd_tree(input, depth),
            InspectCmd::Collections { input, filter } => cmd_collections(input, filter),
        }
    }
}

/// Cmd: Show file info
fn cmd_info(input: PathBuf) -> Result<()> {
    let (version, recording) = open_recording(&input)?;
    let nodes = recording.preorder();

    println!("=== {} ===", input.display());
    println!("Version: {}", version);
    println!("Id: {}", recording.id());
    println!("Name: {}", recording.name());
    println!("Recordings: {}", nodes.len());
    println!(
        "Collections: {}",
        nodes.iter().map(|r| r.collections().len()).sum::<usize>()
    );
    println!("Captures: {}", recording.capture_count());

    if let Some((start, end)) = recording.time_range() {
        println!("Start: {:.3}s", start);
        println!("End: {:.3}s", end);
        println!("Duration: {}", format_duration(end - start));
    }

    let binaries: usize = nodes.iter().map(|r| r.binaries().len()).sum();
    let references: usize = nodes.iter().map(|r| r.binary_references().len()).sum();
    if binaries + references > 0 {
        println!("Binaries: {} inline, {} referenced", binaries, references);
    }

    Ok(())
}

/// Cmd: Print tree
fn cmd_tree(input: PathBuf, depth: Option<usize>) -> Result<()> {
    let (_, recording) = open_recording(&input)?;
    print_node(&recording, 0, depth);
    Ok(())
}

fn print_node(recording: &Recording, level: usize, max_depth: Option<usize>) {
    let indent = "  ".repeat(level);
    println!(
        "{}[{}] {} | {} collections | {} captures",
        indent,
        recording.id(),
        recording.name(),
        recording.collections().len(),
        recording
            .collections()
            .iter()
            .map(|c| c.length())
            .sum::<usize>()
    );

    if max_depth.is_some_and(|d| level >= d) {
        if !recording.recordings().is_empty() {
            println!("{}  ... {} more", indent, recording.recordings().len());
        }
        return;
    }
    for child in recording.recordings() {
        print_node(child, level + 1, max_depth);
    }
}

/// Cmd: List collections
fn cmd_collections(input: PathBuf, filter: Option<String>) -> Result<()> {
    let (_, recording) = open_recording(&input)?;

    println!("=== Collections in {} ===", input.display());
    for node in recording.preorder() {
        let matching: Vec<&CaptureCollection> = node
            .collections()
            .iter()
            .filter(|c| matches_filter(c, filter.as_deref()))
            .collect();
        if matching.is_empty() {
            continue;
        }

        println!();
        println!("[{}] {}", node.id(), node.name());
        for collection in matching {
            print!(
                "  {} | {} | {} captures",
                collection.name(),
                collection.signature(),
                collection.length()
            );
            if let (Some(start), Some(end)) = (collection.start(), collection.end()) {
                print!(" | {:.3}s - {:.3}s", start, end);
            }
            println!();
        }
    }

    Ok(())
}

fn matches_filter(collection: &CaptureCollection, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(pattern) => {
            let lower = pattern.to_lowercase();
            collection.name().to_lowercase().contains(&lower)
                || collection.signature().to_lowercase().contains(&lower)
        }
    }
}
