// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Scalar float codec.
//!
//! Body: `string name ‖ u8 technique ‖ varint count` then `time ‖ value`
//! pairs, `f64` for Raw64 and `f32` for Raw32. Technique 2 is reserved for
//! a quantized form and is rejected on read.

use std::io::Cursor;

use byteorder::{ReadBytesExt, WriteBytesExt};

use super::codec::{count_mismatch, wrong_kind, ChannelCodec, EncodedCollections};
use super::primitives::{RapRead, RapWrite};
use super::time::TimeTechnique;
use crate::core::{signatures, CaptureCollection, Collection, FloatCapture, RapError, Result};

/// Codec format version.
pub const FLOAT_ENCODER_VERSION: u32 = 1;

const RESERVED_BST16: u8 = 2;

/// Width of the stored time and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FloatTechnique {
    Raw64 = 0,
    Raw32 = 1,
}

impl TryFrom<u8> for FloatTechnique {
    type Error = RapError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(FloatTechnique::Raw64),
            1 => Ok(FloatTechnique::Raw32),
            RESERVED_BST16 => Err(RapError::format(
                "float encoding technique 2 (bst16) is not supported",
            )),
            other => Err(RapError::format(format!(
                "unknown float encoding technique: {other}"
            ))),
        }
    }
}

/// Encoder for `recolude.float` collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatEncoder {
    technique: FloatTechnique,
    time_technique: TimeTechnique,
}

impl FloatEncoder {
    pub fn new(technique: FloatTechnique) -> Self {
        let time_technique = match technique {
            FloatTechnique::Raw64 => TimeTechnique::Raw64,
            FloatTechnique::Raw32 => TimeTechnique::Raw32,
        };
        Self {
            technique,
            time_technique,
        }
    }

    pub fn with_time_technique(mut self, time_technique: TimeTechnique) -> Self {
        self.time_technique = time_technique;
        self
    }

    pub fn technique(&self) -> FloatTechnique {
        self.technique
    }

    fn encode_one(&self, collection: &Collection<FloatCapture>) -> Result<Vec<u8>> {
        let captures = collection.captures();
        let mut out = Vec::with_capacity(collection.name().len() + 4 + captures.len() * 16);
        out.write_string(collection.name())?;
        out.write_u8(self.technique as u8)?;
        out.write_len(captures.len())?;
        for c in captures {
            match self.technique {
                FloatTechnique::Raw64 => {
                    out.write_f64_le(c.time)?;
                    out.write_f64_le(c.value)?;
                }
                FloatTechnique::Raw32 => {
                    out.write_f32_le(c.time as f32)?;
                    out.write_f32_le(c.value as f32)?;
                }
            }
        }
        Ok(out)
    }
}

impl ChannelCodec for FloatEncoder {
    fn signature(&self) -> &str {
        signatures::FLOAT
    }

    fn version(&self) -> u32 {
        FLOAT_ENCODER_VERSION
    }

    fn time_technique(&self) -> TimeTechnique {
        self.time_technique
    }

    fn encode(&self, collections: &[&CaptureCollection]) -> Result<EncodedCollections> {
        let mut encoded = EncodedCollections::default();
        for collection in collections {
            let floats = collection
                .as_float()
                .ok_or_else(|| wrong_kind("float", collection))?;
            encoded.collections.push(self.encode_one(floats)?);
        }
        Ok(encoded)
    }

    fn decode(&self, _header: &[u8], body: &[u8], times: &[f64]) -> Result<CaptureCollection> {
        let mut r = Cursor::new(body);
        let name = r.read_string()?;
        let technique = FloatTechnique::try_from(r.read_u8()?)?;
        let count = r.read_len()?;
        if count != times.len() {
            return Err(count_mismatch(&name, count, times.len()));
        }

        let mut captures = Vec::with_capacity(count);
        for _ in 0..count {
            let capture = match technique {
                FloatTechnique::Raw64 => FloatCapture::new(r.read_f64_le()?, r.read_f64_le()?),
                FloatTechnique::Raw32 => {
                    FloatCapture::new(r.read_f32_le()? as f64, r.read_f32_le()? as f64)
                }
            };
            captures.push(capture);
        }
        Ok(CaptureCollection::Float(Collection::new(name, captures)))
    }
}
