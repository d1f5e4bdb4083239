// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Validate command - check that capture times never go backwards.

use std::path::PathBuf;

use clap::Args;

use crate::common::{open_recording, Result};
use rapcodec::{validate, ValidationOption};

/// Check a recording for out-of-order captures.
#[derive(Args, Clone, Debug)]
pub struct ValidateCmd {
    /// Input recording
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

impl ValidateCmd {
    pub fn run(self) -> Result<()> {
        let (_, recording) = open_recording(&self.input)?;
        validate(
            &recording,
            &[ValidationOption::RequireChronologicalCapture(true)],
        )?;
        println!(
            "{}: OK ({} recordings, {} captures)",
            self.input.display(),
            recording.preorder().len(),
            recording.capture_count()
        );
        Ok(())
    }
}
