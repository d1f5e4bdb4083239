// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! File version detection.
//!
//! Recordings carry their format version in the first byte. Detection
//! only peeks at that byte; it does not validate the rest of the file.
//!
//! # Example
//!
//! ```
//! use rapcodec::io::detection::{detect_version, FileVersion};
//!
//! assert_eq!(detect_version(&[2, 0, 0, 1]), FileVersion::V2);
//! assert_eq!(detect_version(&[]), FileVersion::Empty);
//! ```

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::legacy::LEGACY_VERSION;
use super::writer::FILE_VERSION;
use crate::core::Result;

/// Format version found at the start of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileVersion {
    /// Length-prefixed protobuf format
    Legacy,
    /// Current encoder-based format
    V2,
    /// A version byte this crate does not read
    Unknown(u8),
    /// No bytes at all
    Empty,
}

impl FileVersion {
    /// Whether [`RecordingReader`](super::RecordingReader) can load the file.
    pub fn is_supported(&self) -> bool {
        matches!(self, FileVersion::Legacy | FileVersion::V2)
    }
}

impl fmt::Display for FileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileVersion::Legacy => write!(f, "v1 (legacy)"),
            FileVersion::V2 => write!(f, "v2"),
            FileVersion::Unknown(v) => write!(f, "unknown ({v})"),
            FileVersion::Empty => write!(f, "empty"),
        }
    }
}

/// Classify the leading bytes of a file.
pub fn detect_version(header: &[u8]) -> FileVersion {
    match header.first() {
        None => FileVersion::Empty,
        Some(&LEGACY_VERSION) => FileVersion::Legacy,
        Some(&FILE_VERSION) => FileVersion::V2,
        Some(&other) => FileVersion::Unknown(other),
    }
}

/// Read the first byte of the file at `path` and classify it.
pub fn detect_file_version<P: AsRef<Path>>(path: P) -> Result<FileVersion> {
    let mut file = File::open(path.as_ref())?;
    let mut header = [0u8; 1];
    let n = file.read(&mut header)?;
    let version = detect_version(&header[..n]);
    tracing::debug!(path = %path.as_ref().display(), %version, "detected file version");
    Ok(version)
}
