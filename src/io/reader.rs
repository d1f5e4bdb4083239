// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Recording reader.
//!
//! Dispatches on the first byte of the stream: version 1 files go through
//! the [legacy loader](super::legacy), version 2 files are decoded with the
//! registered encoders. Any other version is rejected after reading that
//! single byte.
//!
//! # Example
//!
//! ```
//! use rapcodec::core::Recording;
//! use rapcodec::io::{RecordingReader, RecordingWriter};
//!
//! let recording = Recording::builder("demo").id("1").build();
//! let mut writer = RecordingWriter::with_default_encoders(Vec::new());
//! writer.write(&recording).unwrap();
//! let bytes = writer.into_inner();
//!
//! let mut reader = RecordingReader::with_default_encoders(bytes.as_slice());
//! let decoded = reader.read().unwrap();
//! assert_eq!(decoded.name(), "demo");
//! ```

use std::io::{Cursor, Read};

use byteorder::ReadBytesExt;
use flate2::read::DeflateDecoder;

use super::legacy::{read_legacy, LEGACY_VERSION};
use super::writer::{FILE_VERSION, FLAG_DEFLATE, FLAG_PLAIN};
use crate::core::{Binary, BinaryReference, Metadata, RapError, Recording, Result};
use crate::encoding::property::{read_block, read_property};
use crate::encoding::time::decode_times;
use crate::encoding::{ChannelCodec, Encoder, EncoderRegistry, RapRead};

/// Reads recordings from a byte source.
#[derive(Debug)]
pub struct RecordingReader<R: Read> {
    source: R,
    registry: EncoderRegistry,
}

impl<R: Read> RecordingReader<R> {
    /// Create a reader able to decode collections written by `encoders`.
    ///
    /// # Errors
    ///
    /// Returns a policy error if two encoders share a signature.
    pub fn new(encoders: Vec<Encoder>, source: R) -> Result<Self> {
        Ok(Self {
            source,
            registry: EncoderRegistry::new(encoders)?,
        })
    }

    /// Create a reader with the default encoders.
    pub fn with_default_encoders(source: R) -> Self {
        Self {
            source,
            registry: EncoderRegistry::default(),
        }
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    /// Read one recording.
    ///
    /// # Errors
    ///
    /// - Io: short read, DEFLATE failure
    /// - Format: unknown version, flag, tag or technique
    /// - Registry: missing or outdated encoder
    /// - Policy: duplicate metadata key
    pub fn read(&mut self) -> Result<Recording> {
        let version = self.source.read_u8()?;
        tracing::debug!(version, "detected file version");
        match version {
            LEGACY_VERSION => read_legacy(&mut self.source),
            FILE_VERSION => self.read_v2(),
            other => Err(RapError::unrecognized_version(other)),
        }
    }

    fn read_v2(&mut self) -> Result<Recording> {
        let signatures = self.source.read_string_array()?;
        let versions = self.source.read_uvarint_array()?;
        if signatures.len() != versions.len() {
            return Err(RapError::format(format!(
                "{} encoder signatures but {} versions",
                signatures.len(),
                versions.len()
            )));
        }

        let mut file_encoders = Vec::with_capacity(signatures.len());
        for (signature, version) in signatures.iter().zip(&versions) {
            let version = u32::try_from(*version).map_err(|_| {
                RapError::format(format!("encoder version {version} out of range"))
            })?;
            file_encoders.push(self.registry.resolve(signature, version)?);
        }

        let flag = self.source.read_u8()?;
        let mut stream: Box<dyn Read + '_> = match flag {
            FLAG_DEFLATE => Box::new(DeflateDecoder::new(&mut self.source)),
            FLAG_PLAIN => Box::new(&mut self.source),
            other => {
                return Err(RapError::format(format!(
                    "unrecognized compression flag: {other}"
                )))
            }
        };

        let mut headers = Vec::with_capacity(file_encoders.len());
        for _ in &file_encoders {
            headers.push(stream.read_byte_array()?);
        }
        let keys = stream.read_string_array()?;
        let body = stream.read_byte_array()?;

        let context = DecodeContext {
            registry: &self.registry,
            file_encoders: &file_encoders,
            headers: &headers,
            keys: &keys,
        };
        context.decode_body(&body)
    }
}

/// Tables a recording body refers into.
struct DecodeContext<'a> {
    registry: &'a EncoderRegistry,
    /// Registry index per file encoder
    file_encoders: &'a [usize],
    headers: &'a [Vec<u8>],
    keys: &'a [String],
}

impl DecodeContext<'_> {
    fn decode_body(&self, body: &[u8]) -> Result<Recording> {
        let mut r = Cursor::new(body);
        let id = r.read_string()?;
        let name = r.read_string()?;

        let mut metadata = Metadata::new();
        for index in r.read_uvarint_array()? {
            let key = usize::try_from(index)
                .ok()
                .and_then(|i| self.keys.get(i))
                .ok_or_else(|| {
                    RapError::format(format!(
                        "metadata key index {index} out of range for {} keys",
                        self.keys.len()
                    ))
                })?;
            let property = read_property(&mut r)?;
            if metadata.contains_key(key) {
                return Err(RapError::duplicate_key(key));
            }
            metadata.insert(key.as_str(), property);
        }

        let count = r.read_len()?;
        let mut collections = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let file_encoder = r.read_len()?;
            let blob = r.read_byte_array()?;
            let registry_index = *self.file_encoders.get(file_encoder).ok_or_else(|| {
                RapError::format(format!(
                    "encoder index {file_encoder} out of range for {} encoders",
                    self.file_encoders.len()
                ))
            })?;
            let encoder = self
                .registry
                .get(registry_index)
                .ok_or_else(|| RapError::format(format!("encoder {registry_index} missing")))?;

            let mut blob_reader = Cursor::new(blob.as_slice());
            let times = decode_times(&mut blob_reader)?;
            let payload = &blob[blob_reader.position() as usize..];
            collections.push(encoder.decode(&self.headers[file_encoder], payload, &times)?);
        }

        let count = r.read_len()?;
        let mut references = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let name = r.read_string()?;
            let uri = r.read_string()?;
            let size = r.read_uvarint()?;
            let metadata = read_block(&mut r)?;
            references.push(BinaryReference::new(name, uri, size, metadata));
        }

        let count = r.read_len()?;
        let mut binaries = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let name = r.read_string()?;
            let size = r.read_len()?;
            let metadata = read_block(&mut r)?;
            let data = r.read_exact_vec(size)?;
            binaries.push(Binary::new(name, data, metadata));
        }

        let count = r.read_len()?;
        let mut children = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            let child = r.read_byte_array()?;
            children.push(self.decode_body(&child)?);
        }

        Ok(Recording::new(
            id,
            name,
            collections,
            children,
            metadata,
            binaries,
            references,
        ))
    }
}
