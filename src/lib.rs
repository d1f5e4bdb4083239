// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # rapcodec
//!
//! Codec library for RAP recording files: trees of timestamped 3D/VR
//! captures (positions, rotations, events, enums, scalars) with typed
//! metadata, written through pluggable lossy and lossless channel codecs.
//!
//! ## Architecture
//!
//! - `core/` - in-memory model (recordings, collections, captures, metadata) and errors
//! - `encoding/` - wire primitives, quantizers and the per-channel codecs
//! - `io/` - version 2 writer, version 1/2 reader, legacy loader, version detection
//!
//! ## Example: Round trip
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use rapcodec::{Collection, Metadata, PositionCapture, Recording};
//! use rapcodec::io::{RecordingReader, WriterBuilder};
//!
//! let recording = Recording::builder("lap")
//!     .metadata(Metadata::new().with("track", "north"))
//!     .collection(Collection::new(
//!         "Head",
//!         vec![
//!             PositionCapture::new(0.0, 0.0, 1.7, 0.0),
//!             PositionCapture::new(0.1, 0.05, 1.7, 0.1),
//!         ],
//!     ))
//!     .build();
//!
//! let mut writer = WriterBuilder::new().build(Vec::new())?;
//! writer.write(&recording)?;
//! let bytes = writer.into_inner();
//!
//! let decoded = RecordingReader::with_default_encoders(bytes.as_slice()).read()?;
//! assert_eq!(decoded.name(), "lap");
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Wire encoding and channel codecs
pub mod encoding;

// File reading and writing
pub mod io;

pub use crate::core::{
    signatures, validate, Binary, BinaryReference, Capture, CaptureCollection, Collection,
    EnumCapture, EnumCollection, ErrorKind, EulerZxyCapture, EventCapture, ExtensionCollection,
    FloatCapture, Metadata, PositionCapture, Property, RapError, Recording, RecordingBuilder,
    Result, ValidationOption, Vector3,
};
pub use encoding::{default_encoders, ChannelCodec, EncodedCollections, Encoder};
pub use io::{load, load_file, save_file, RecordingReader, RecordingWriter, WriterBuilder};
