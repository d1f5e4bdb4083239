// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Upgrade command - rewrite a v1 or v2 recording as v2.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::common::{open_recording, Result};
use rapcodec::io::WriterBuilder;

/// Rewrite a recording with the default encoders.
#[derive(Args, Clone, Debug)]
pub struct UpgradeCmd {
    /// Input recording (v1 or v2)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// DEFLATE level, 0-9
    #[arg(short, long, default_value_t = 9, value_parser = clap::value_parser!(u32).range(0..=9))]
    level: u32,
}

impl UpgradeCmd {
    pub fn run(self) -> Result<()> {
        let (version, recording) = open_recording(&self.input)?;

        let file = File::create(&self.output)
            .with_context(|| format!("Failed to create {}", self.output.display()))?;
        let mut writer = WriterBuilder::new()
            .compression_level(self.level)
            .build(BufWriter::new(file))?;
        let written = writer
            .write(&recording)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        println!(
            "Upgraded {} ({}) -> {} ({} bytes, {} captures)",
            self.input.display(),
            version,
            self.output.display(),
            written,
            recording.capture_count()
        );
        Ok(())
    }
}
