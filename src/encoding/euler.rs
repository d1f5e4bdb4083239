// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ZXY euler rotation codec.
//!
//! Payload: `string name ‖ u8 technique ‖ samples`. Raw16 wraps every
//! angle into `[0, 360)` and stores each component as a two-byte BST over
//! that range; a lone capture is stored as three `f32` instead.

use std::io::{Cursor, Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};

use super::bst;
use super::codec::{count_mismatch, wrong_kind, ChannelCodec, EncodedCollections};
use super::primitives::{RapRead, RapWrite};
use super::time::TimeTechnique;
use crate::core::vector::Vector3;
use crate::core::{
    signatures, CaptureCollection, Collection, EulerZxyCapture, RapError, Result,
};

/// Codec format version.
pub const EULER_ENCODER_VERSION: u32 = 1;

const FULL_TURN: f64 = 360.0;

/// Storage technique for rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EulerTechnique {
    Raw64 = 0,
    Raw32 = 1,
    Raw16 = 2,
}

impl TryFrom<u8> for EulerTechnique {
    type Error = RapError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(EulerTechnique::Raw64),
            1 => Ok(EulerTechnique::Raw32),
            2 => Ok(EulerTechnique::Raw16),
            other => Err(RapError::unknown_euler_technique(other)),
        }
    }
}

/// Encoder for `recolude.euler` collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EulerEncoder {
    technique: EulerTechnique,
    time_technique: TimeTechnique,
}

impl EulerEncoder {
    pub fn new(technique: EulerTechnique) -> Self {
        let time_technique = match technique {
            EulerTechnique::Raw64 => TimeTechnique::Raw64,
            EulerTechnique::Raw32 => TimeTechnique::Raw32,
            EulerTechnique::Raw16 => TimeTechnique::Bst16,
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

    pub fn technique(&self) -> EulerTechnique {
        self.technique
    }

    fn encode_one(&self, collection: &Collection<EulerZxyCapture>) -> Result<Vec<u8>> {
        let captures = collection.captures();
        let mut out = Vec::with_capacity(collection.name().len() + 2 + captures.len() * 6);
        out.write_string(collection.name())?;
        out.write_u8(self.technique as u8)?;
        match self.technique {
            EulerTechnique::Raw64 => {
                for c in captures {
                    out.write_vector3_f64(c.rotation)?;
                }
            }
            EulerTechnique::Raw32 => {
                for c in captures {
                    out.write_vector3_f32(c.rotation)?;
                }
            }
            EulerTechnique::Raw16 => encode_raw16(&mut out, captures)?,
        }
        Ok(out)
    }
}

impl ChannelCodec for EulerEncoder {
    fn signature(&self) -> &str {
        signatures::EULER
    }

    fn version(&self) -> u32 {
        EULER_ENCODER_VERSION
    }

    fn time_technique(&self) -> TimeTechnique {
        self.time_technique
    }

    fn encode(&self, collections: &[&CaptureCollection]) -> Result<EncodedCollections> {
        let mut encoded = EncodedCollections::default();
        for collection in collections {
            let rotations = collection
                .as_euler()
                .ok_or_else(|| wrong_kind("euler", collection))?;
            encoded.collections.push(self.encode_one(rotations)?);
        }
        Ok(encoded)
    }

    fn decode(&self, _header: &[u8], body: &[u8], times: &[f64]) -> Result<CaptureCollection> {
        let mut r = Cursor::new(body);
        let name = r.read_string()?;
        let technique = EulerTechnique::try_from(r.read_u8()?)?;

        let rotations = match technique {
            EulerTechnique::Raw64 => read_n(&mut r, times.len(), |r| r.read_vector3_f64())?,
            EulerTechnique::Raw32 => read_n(&mut r, times.len(), |r| r.read_vector3_f32())?,
            EulerTechnique::Raw16 if times.len() == 1 => vec![r.read_vector3_f32()?],
            EulerTechnique::Raw16 => read_n(&mut r, times.len(), read_raw16)?,
        };

        if rotations.len() != times.len() {
            return Err(count_mismatch(&name, rotations.len(), times.len()));
        }
        let captures = times
            .iter()
            .zip(rotations)
            .map(|(&time, rotation)| EulerZxyCapture { time, rotation })
            .collect();
        Ok(CaptureCollection::Euler(Collection::new(name, captures)))
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
fn wrap_degrees(angle: f64) -> f64 {
    angle - FULL_TURN * (angle / FULL_TURN).floor()
}

fn wrap(v: Vector3) -> Vector3 {
    Vector3::new(wrap_degrees(v.x), wrap_degrees(v.y), wrap_degrees(v.z))
}

fn encode_raw16<W: Write + ?Sized>(w: &mut W, captures: &[EulerZxyCapture]) -> Result<()> {
    if let [only] = captures {
        return w.write_vector3_f32(wrap(only.rotation));
    }
    for c in captures {
        let v = wrap(c.rotation);
        for component in [v.x, v.y, v.z] {
            w.write_all(&bst::encode16(component, 0.0, FULL_TURN))?;
        }
    }
    Ok(())
}

fn read_raw16(r: &mut Cursor<&[u8]>) -> Result<Vector3> {
    let mut buf = [0u8; 6];
    r.read_exact(&mut buf)?;
    Ok(Vector3::new(
        bst::decode(0.0, FULL_TURN, &buf[0..2]),
        bst::decode(0.0, FULL_TURN, &buf[2..4]),
        bst::decode(0.0, FULL_TURN, &buf[4..6]),
    ))
}

fn read_n<F>(r: &mut Cursor<&[u8]>, n: usize, mut read_one: F) -> Result<Vec<Vector3>>
where
    F: FnMut(&mut Cursor<&[u8]>) -> Result<Vector3>,
{
    (0..n).map(|_| read_one(r)).collect()
}
