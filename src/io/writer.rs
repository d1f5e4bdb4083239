// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Version 2 recording writer.
//!
//! The file starts with an uncompressed preamble naming the encoders the
//! recording needs, followed by a raw DEFLATE stream:
//!
//! ```text
//! u8 2 ‖ stringArray(signatures) ‖ uvarintArray(versions) ‖ u8 compressed
//! deflate(
//!     byteArray(encoder_header)*  one per listed encoder
//!     stringArray(metadata_keys)
//!     byteArray(root_body)
//! )
//! ```
//!
//! A recording body holds, in order: id, name, metadata (key indices into
//! the global key table, then one property per index), collections
//! (encoder index and `time ‖ payload` blob), binary references, inline
//! binaries, and the bodies of child recordings.
//!
//! # Example
//!
//! ```
//! use rapcodec::core::{Collection, PositionCapture, Recording};
//! use rapcodec::io::WriterBuilder;
//!
//! let recording = Recording::builder("demo")
//!     .collection(Collection::new("P", vec![PositionCapture::new(0.0, 1.0, 2.0, 3.0)]))
//!     .build();
//!
//! let mut writer = WriterBuilder::new().build(Vec::new()).unwrap();
//! writer.write(&recording).unwrap();
//! let bytes = writer.into_inner();
//! assert_eq!(bytes[0], 2);
//! ```

use std::io::Write;

use byteorder::WriteBytesExt;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::core::{CaptureCollection, RapError, Recording, Result};
use crate::encoding::property::{write_block, write_property};
use crate::encoding::time::encode_times;
use crate::encoding::{
    default_encoders, ChannelCodec, Encoder, EncoderRegistry, Interner, RapWrite,
};

/// File format version produced by [`RecordingWriter`].
pub const FILE_VERSION: u8 = 2;

/// Compressed-flag value for a raw DEFLATE stream.
pub const FLAG_DEFLATE: u8 = 1;

/// Compressed-flag value for an uncompressed stream.
pub const FLAG_PLAIN: u8 = 0;

/// Default DEFLATE level (best compression).
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// Configuration for creating a writer.
#[derive(Debug)]
pub struct WriterConfig {
    /// Encoders in priority order; the first one accepting a collection wins
    pub encoders: Vec<Encoder>,
    /// DEFLATE level, 0-9
    pub compression_level: u32,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            encoders: default_encoders(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

/// Builder for [`RecordingWriter`].
#[derive(Debug, Default)]
pub struct WriterBuilder {
    encoders: Option<Vec<Encoder>>,
    compression_level: Option<u32>,
}

impl WriterBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the encoder list.
    pub fn encoders(mut self, encoders: Vec<Encoder>) -> Self {
        self.encoders = Some(encoders);
        self
    }

    /// Append one encoder. The first call discards the default list.
    pub fn encoder(mut self, encoder: impl Into<Encoder>) -> Self {
        self.encoders.get_or_insert_with(Vec::new).push(encoder.into());
        self
    }

    /// Set the DEFLATE level (clamped to 9).
    pub fn compression_level(mut self, level: u32) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Resolve the configuration without a sink.
    pub fn config(self) -> WriterConfig {
        WriterConfig {
            encoders: self.encoders.unwrap_or_else(default_encoders),
            compression_level: self
                .compression_level
                .unwrap_or(DEFAULT_COMPRESSION_LEVEL),
        }
    }

    /// Build a writer over `sink`.
    ///
    /// # Errors
    ///
    /// Returns a policy error if two encoders share a signature.
    pub fn build<W: Write>(self, sink: W) -> Result<RecordingWriter<W>> {
        RecordingWriter::from_config(self.config(), sink)
    }
}

/// Writes recordings in the version 2 format.
#[derive(Debug)]
pub struct RecordingWriter<W: Write> {
    sink: W,
    registry: EncoderRegistry,
    compression_level: u32,
}

impl<W: Write> RecordingWriter<W> {
    /// Create a writer with an explicit encoder list.
    pub fn new(encoders: Vec<Encoder>, sink: W) -> Result<Self> {
        Self::from_config(
            WriterConfig {
                encoders,
                ..WriterConfig::default()
            },
            sink,
        )
    }

    /// Create a writer with [`default_encoders`].
    pub fn with_default_encoders(sink: W) -> Self {
        Self {
            sink,
            registry: EncoderRegistry::default(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    pub fn from_config(config: WriterConfig, sink: W) -> Result<Self> {
        Ok(Self {
            sink,
            registry: EncoderRegistry::new(config.encoders)?,
            compression_level: config.compression_level.min(9),
        })
    }

    pub fn registry(&self) -> &EncoderRegistry {
        &self.registry
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Encode `recording` and write it to the sink.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// - Policy: no recording was given, or no encoder accepts a collection
    /// - Io: the sink failed
    pub fn write<'a>(&mut self, recording: impl Into<Option<&'a Recording>>) -> Result<usize> {
        let recording = recording.into().ok_or_else(RapError::nil_recording)?;
        let bytes = self.encode(recording)?;
        self.sink.write_all(&bytes)?;
        self.sink.flush()?;
        Ok(bytes.len())
    }

    /// Encode `recording` into a complete file image.
    pub fn encode(&self, recording: &Recording) -> Result<Vec<u8>> {
        let plan = EncodingPlan::build(&self.registry, recording)?;

        let mut out = Vec::new();
        out.write_u8(FILE_VERSION)?;
        let signatures: Vec<&str> = plan.used.iter().map(|u| u.encoder.signature()).collect();
        let versions: Vec<u64> = plan
            .used
            .iter()
            .map(|u| u64::from(u.encoder.version()))
            .collect();
        out.write_string_array(&signatures)?;
        out.write_uvarint_array(&versions)?;
        out.write_u8(FLAG_DEFLATE)?;

        let mut deflate = DeflateEncoder::new(out, Compression::new(self.compression_level));
        for used in &plan.used {
            deflate.write_byte_array(&used.header)?;
        }
        deflate.write_string_array(plan.keys.values())?;

        let mut cursor = BodyCursor::default();
        let body = plan.encode_body(recording, &mut cursor)?;
        deflate.write_byte_array(&body)?;
        let out = deflate.finish()?;

        tracing::debug!(
            encoders = plan.used.len(),
            keys = plan.keys.len(),
            body_bytes = body.len(),
            file_bytes = out.len(),
            "encoded recording"
        );
        Ok(out)
    }
}

/// An encoder that at least one collection was assigned to.
struct UsedEncoder<'r> {
    encoder: &'r Encoder,
    header: Vec<u8>,
    /// Payloads in assignment order
    payloads: Vec<Vec<u8>>,
}

/// Where one collection's payload lives.
#[derive(Debug, Clone, Copy)]
struct Slot {
    /// Index into the file's encoder list
    file_encoder: usize,
    /// Index into that encoder's payloads
    payload: usize,
}

struct EncodingPlan<'r> {
    used: Vec<UsedEncoder<'r>>,
    /// Per recording in pre-order, per collection
    slots: Vec<Vec<Slot>>,
    keys: Interner,
}

#[derive(Default)]
struct BodyCursor {
    preorder: usize,
}

impl<'r> EncodingPlan<'r> {
    fn build(registry: &'r EncoderRegistry, root: &Recording) -> Result<Self> {
        let nodes = root.preorder();

        // Assign every collection in the tree to its encoder.
        let mut assigned: Vec<Vec<&CaptureCollection>> = vec![Vec::new(); registry.len()];
        let mut picks: Vec<Vec<(usize, usize)>> = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let mut node_picks = Vec::with_capacity(node.collections().len());
            for collection in node.collections() {
                let index = registry.select(collection)?;
                node_picks.push((index, assigned[index].len()));
                assigned[index].push(collection);
            }
            picks.push(node_picks);
        }

        // Encode per encoder, keeping registration order on disk.
        let mut used = Vec::new();
        let mut file_index = vec![usize::MAX; registry.len()];
        for (index, collections) in assigned.iter().enumerate() {
            if collections.is_empty() {
                continue;
            }
            let Some(encoder) = registry.get(index) else {
                continue;
            };
            let encoded = encoder.encode(collections)?;
            if encoded.collections.len() != collections.len() {
                return Err(RapError::format(format!(
                    "encoder {} produced {} payloads for {} collections",
                    encoder.signature(),
                    encoded.collections.len(),
                    collections.len()
                )));
            }

            let mut payloads = Vec::with_capacity(collections.len());
            for (collection, payload) in collections.iter().zip(encoded.collections) {
                let mut blob = Vec::with_capacity(payload.len() + 16);
                encode_times(&mut blob, encoder.time_technique(), &collection.times())?;
                blob.extend_from_slice(&payload);
                payloads.push(blob);
            }

            tracing::debug!(
                signature = encoder.signature(),
                collections = collections.len(),
                header_bytes = encoded.header.len(),
                "selected encoder"
            );
            file_index[index] = used.len();
            used.push(UsedEncoder {
                encoder,
                header: encoded.header,
                payloads,
            });
        }

        let slots = picks
            .into_iter()
            .map(|node_picks| {
                node_picks
                    .into_iter()
                    .map(|(index, payload)| Slot {
                        file_encoder: file_index[index],
                        payload,
                    })
                    .collect()
            })
            .collect();

        let mut keys = Interner::new();
        for node in &nodes {
            for key in node.metadata().keys() {
                keys.intern(key);
            }
        }

        Ok(Self { used, slots, keys })
    }

    fn encode_body(&self, recording: &Recording, cursor: &mut BodyCursor) -> Result<Vec<u8>> {
        let node = cursor.preorder;
        cursor.preorder += 1;

        let mut out = Vec::new();
        out.write_string(recording.id())?;
        out.write_string(recording.name())?;

        let mut indices = Vec::with_capacity(recording.metadata().len());
        for key in recording.metadata().keys() {
            let index = self
                .keys
                .get(key)
                .ok_or_else(|| RapError::format(format!("metadata key {key} was not interned")))?;
            indices.push(index as u64);
        }
        out.write_uvarint_array(&indices)?;
        for (_, property) in recording.metadata().iter() {
            write_property(&mut out, property)?;
        }

        let slots = self.slots.get(node).map(Vec::as_slice).unwrap_or_default();
        out.write_len(slots.len())?;
        for slot in slots {
            out.write_len(slot.file_encoder)?;
            out.write_byte_array(&self.used[slot.file_encoder].payloads[slot.payload])?;
        }

        out.write_len(recording.binary_references().len())?;
        for reference in recording.binary_references() {
            out.write_string(&reference.name)?;
            out.write_string(&reference.uri)?;
            out.write_uvarint(reference.size)?;
            write_block(&mut out, &reference.metadata)?;
        }

        out.write_len(recording.binaries().len())?;
        for binary in recording.binaries() {
            out.write_string(&binary.name)?;
            out.write_uvarint(binary.size())?;
            write_block(&mut out, &binary.metadata)?;
            out.write_all(&binary.data)?;
        }

        out.write_len(recording.recordings().len())?;
        for child in recording.recordings() {
            let body = self.encode_body(child, cursor)?;
            out.write_byte_array(&body)?;
        }
        Ok(out)
    }
}
