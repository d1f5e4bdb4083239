// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Metadata command - dump the metadata of a recording tree as JSON.

use std::path::PathBuf;

use clap::Args;
use serde_json::{json, Value};

use crate::common::{metadata_to_json, open_recording, Result};
use rapcodec::Recording;

/// Dump recording, binary and reference metadata as JSON.
#[derive(Args, Clone, Debug)]
pub struct MetadataCmd {
    /// Input recording
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Pretty-print the output
    #[arg(short, long)]
    pretty: bool,
}

impl MetadataCmd {
    pub fn run(self) -> Result<()> {
        let (_, recording) = open_recording(&self.input)?;
        let value = recording_to_json(&recording);
        let text = if self.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        println!("{}", text);
        Ok(())
    }
}

fn recording_to_json(recording: &Recording) -> Value {
    let binaries: Vec<Value> = recording
        .binaries()
        .iter()
        .map(|b| {
            json!({
                "name": b.name,
                "size": b.size(),
                "metadata": metadata_to_json(&b.metadata),
            })
        })
        .collect();
    let references: Vec<Value> = recording
        .binary_references()
        .iter()
        .map(|r| {
            json!({
                "name": r.name,
                "uri": r.uri,
                "size": r.size,
                "metadata": metadata_to_json(&r.metadata),
            })
        })
        .collect();

    json!({
        "id": recording.id(),
        "name": recording.name(),
        "metadata": metadata_to_json(recording.metadata()),
        "binaries": binaries,
        "binary_references": references,
        "recordings": recording.recordings().iter().map(recording_to_json).collect::<Vec<_>>(),
    })
}
