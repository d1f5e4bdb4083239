// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Enum codec.
//!
//! Body: `string name ‖ stringArray(members) ‖ u8 technique ‖ varint count`
//! then per capture `time ‖ varint value`, with `f64` times for Raw64 and
//! `f32` for Raw32.

use std::io::Cursor;

use byteorder::{ReadBytesExt, WriteBytesExt};

use super::codec::{count_mismatch, wrong_kind, ChannelCodec, EncodedCollections};
use super::primitives::{RapRead, RapWrite};
use super::time::TimeTechnique;
use crate::core::{signatures, CaptureCollection, EnumCapture, EnumCollection, RapError, Result};

/// Codec format version.
pub const ENUM_ENCODER_VERSION: u32 = 1;

/// Width of the embedded capture times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EnumTechnique {
    Raw64 = 0,
    Raw32 = 1,
}

impl TryFrom<u8> for EnumTechnique {
    type Error = RapError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(EnumTechnique::Raw64),
            1 => Ok(EnumTechnique::Raw32),
            other => Err(RapError::format(format!(
                "unknown enum encoding technique: {other}"
            ))),
        }
    }
}

/// Encoder for `recolude.enum` collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumEncoder {
    technique: EnumTechnique,
    time_technique: TimeTechnique,
}

impl EnumEncoder {
    pub fn new(technique: EnumTechnique) -> Self {
        let time_technique = match technique {
            EnumTechnique::Raw64 => TimeTechnique::Raw64,
            EnumTechnique::Raw32 => TimeTechnique::Raw32,
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

    pub fn technique(&self) -> EnumTechnique {
        self.technique
    }

    fn encode_one(&self, collection: &EnumCollection) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.write_string(collection.name())?;
        out.write_string_array(collection.members())?;
        out.write_u8(self.technique as u8)?;
        out.write_len(collection.captures().len())?;
        for capture in collection.captures() {
            match self.technique {
                EnumTechnique::Raw64 => out.write_f64_le(capture.time)?,
                EnumTechnique::Raw32 => out.write_f32_le(capture.time as f32)?,
            }
            out.write_len(capture.value)?;
        }
        Ok(out)
    }
}

impl ChannelCodec for EnumEncoder {
    fn signature(&self) -> &str {
        signatures::ENUM
    }

    fn version(&self) -> u32 {
        ENUM_ENCODER_VERSION
    }

    fn time_technique(&self) -> TimeTechnique {
        self.time_technique
    }

    fn encode(&self, collections: &[&CaptureCollection]) -> Result<EncodedCollections> {
        let mut encoded = EncodedCollections::default();
        for collection in collections {
            let enums = collection
                .as_enum()
                .ok_or_else(|| wrong_kind("enum", collection))?;
            encoded.collections.push(self.encode_one(enums)?);
        }
        Ok(encoded)
    }

    fn decode(&self, _header: &[u8], body: &[u8], times: &[f64]) -> Result<CaptureCollection> {
        let mut r = Cursor::new(body);
        let name = r.read_string()?;
        let members = r.read_string_array()?;
        let technique = EnumTechnique::try_from(r.read_u8()?)?;
        let count = r.read_len()?;
        if count != times.len() {
            return Err(count_mismatch(&name, count, times.len()));
        }

        let mut captures = Vec::with_capacity(count);
        for _ in 0..count {
            let time = match technique {
                EnumTechnique::Raw64 => r.read_f64_le()?,
                EnumTechnique::Raw32 => r.read_f32_le()? as f64,
            };
            captures.push(EnumCapture::new(time, r.read_len()?));
        }
        Ok(CaptureCollection::Enum(EnumCollection::new(name, members, captures)))
    }
}
