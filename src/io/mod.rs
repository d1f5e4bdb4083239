// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Reading and writing recording files.
//!
//! - [`RecordingWriter`] / [`WriterBuilder`] - version 2 encoding
//! - [`RecordingReader`] - version 1 and version 2 decoding
//! - [`legacy`] - the version 1 protobuf schema and loader
//! - [`detection`] - version sniffing

use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use crate::core::{Recording, Result};

pub mod detection;
pub mod legacy;
pub mod reader;
pub mod writer;

pub use detection::{detect_file_version, detect_version, FileVersion};
pub use reader::RecordingReader;
pub use writer::{RecordingWriter, WriterBuilder, WriterConfig};

/// Read one recording from `source` with the default encoders.
pub fn load<R: Read>(source: R) -> Result<Recording> {
    RecordingReader::with_default_encoders(source).read()
}

/// Read one recording from a file with the default encoders.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Recording> {
    let file = File::open(path.as_ref())?;
    load(BufReader::new(file))
}

/// Write `recording` to a file with the default encoders.
///
/// Returns the number of bytes written.
pub fn save_file<P: AsRef<Path>>(path: P, recording: &Recording) -> Result<usize> {
    let file = File::create(path.as_ref())?;
    RecordingWriter::with_default_encoders(BufWriter::new(file)).write(recording)
}
