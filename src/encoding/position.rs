// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Position channel codec.
//!
//! Payload: `string name ‖ u8 technique ‖ samples`.
//!
//! | Technique | Samples |
//! |-----------|---------|
//! | Raw64 (0) | `f64 x, y, z` per capture |
//! | Raw32 (1) | `f32 x, y, z` per capture |
//! | Oct48 (2) | self-timed: BST-2 time deltas and 16-deep octree deltas |
//! | Oct24 (3) | 8-deep octree deltas against the running quantized position |
//!
//! For the octree techniques with at least two captures, the box is the
//! per-axis range of consecutive deltas, stored as six `f32`, followed by
//! the first position. Each later capture stores the delta from the
//! position the decoder will have reconstructed so far, which keeps the
//! quantization error from accumulating. The box is padded by one cell on
//! every side so that a delta plus the carried error never falls outside
//! it. A single capture is stored as three `f32`.

use std::io::{Cursor, Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};

use super::codec::{count_mismatch, wrong_kind, ChannelCodec, EncodedCollections};
use super::octree;
use super::primitives::{RapRead, RapWrite};
use super::time::{delta_domain, DeltaQuantizer, TimeTechnique};
use crate::core::vector::Vector3;
use crate::core::{
    signatures, CaptureCollection, Collection, PositionCapture, RapError, Result,
};

/// Codec format version.
pub const POSITION_ENCODER_VERSION: u32 = 1;

const OCT24_DEPTH: i32 = 8;
const OCT48_DEPTH: i32 = 16;

/// Storage technique for positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PositionTechnique {
    Raw64 = 0,
    Raw32 = 1,
    Oct48 = 2,
    Oct24 = 3,
}

impl TryFrom<u8> for PositionTechnique {
    type Error = RapError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(PositionTechnique::Raw64),
            1 => Ok(PositionTechnique::Raw32),
            2 => Ok(PositionTechnique::Oct48),
            3 => Ok(PositionTechnique::Oct24),
            other => Err(RapError::unknown_position_technique(other)),
        }
    }
}

/// Encoder for `recolude.position` collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionEncoder {
    technique: PositionTechnique,
    time_technique: TimeTechnique,
}

impl PositionEncoder {
    pub fn new(technique: PositionTechnique) -> Self {
        let time_technique = match technique {
            PositionTechnique::Raw64 => TimeTechnique::Raw64,
            PositionTechnique::Raw32 | PositionTechnique::Oct48 => TimeTechnique::Raw32,
            PositionTechnique::Oct24 => TimeTechnique::Bst16,
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

    pub fn technique(&self) -> PositionTechnique {
        self.technique
    }

    fn encode_one(&self, collection: &Collection<PositionCapture>) -> Result<Vec<u8>> {
        let captures = collection.captures();
        let mut out = Vec::with_capacity(collection.name().len() + 2 + captures.len() * 12);
        out.write_string(collection.name())?;
        out.write_u8(self.technique as u8)?;
        match self.technique {
            PositionTechnique::Raw64 => {
                for c in captures {
                    out.write_vector3_f64(c.position)?;
                }
            }
            PositionTechnique::Raw32 => {
                for c in captures {
                    out.write_vector3_f32(c.position)?;
                }
            }
            PositionTechnique::Oct24 => encode_oct24(&mut out, captures)?,
            PositionTechnique::Oct48 => encode_oct48(&mut out, captures)?,
        }
        Ok(out)
    }
}

impl ChannelCodec for PositionEncoder {
    fn signature(&self) -> &str {
        signatures::POSITION
    }

    fn version(&self) -> u32 {
        POSITION_ENCODER_VERSION
    }

    fn time_technique(&self) -> TimeTechnique {
        self.time_technique
    }

    fn encode(&self, collections: &[&CaptureCollection]) -> Result<EncodedCollections> {
        let mut encoded = EncodedCollections::default();
        for collection in collections {
            let positions = collection
                .as_position()
                .ok_or_else(|| wrong_kind("position", collection))?;
            encoded.collections.push(self.encode_one(positions)?);
        }
        Ok(encoded)
    }

    fn decode(&self, _header: &[u8], body: &[u8], times: &[f64]) -> Result<CaptureCollection> {
        let mut r = Cursor::new(body);
        let name = r.read_string()?;
        let technique = PositionTechnique::try_from(r.read_u8()?)?;
        let n = times.len();

        let captures = match technique {
            PositionTechnique::Raw64 => times
                .iter()
                .map(|&time| -> Result<PositionCapture> {
                    Ok(PositionCapture {
                        time,
                        position: r.read_vector3_f64()?,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            PositionTechnique::Raw32 => times
                .iter()
                .map(|&time| -> Result<PositionCapture> {
                    Ok(PositionCapture {
                        time,
                        position: r.read_vector3_f32()?,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            PositionTechnique::Oct24 => {
                let positions = decode_oct24(&mut r, n)?;
                times
                    .iter()
                    .zip(positions)
                    .map(|(&time, position)| PositionCapture { time, position })
                    .collect()
            }
            PositionTechnique::Oct48 => decode_oct48(&mut r, n)?,
        };

        if captures.len() != n {
            return Err(count_mismatch(&name, captures.len(), n));
        }
        Ok(CaptureCollection::Position(Collection::new(name, captures)))
    }
}

/// Per-axis range of consecutive deltas for an octree of `depth` levels,
/// padded and rounded to what the reader sees.
///
/// The decoder returns cell centers, so the carried error is at most half
/// a cell of the padded box. One cell of the unpadded range covers that,
/// and the relative term absorbs the `f32` rounding of the bounds.
fn delta_bounds(positions: &[Vector3], depth: i32) -> (Vector3, Vector3) {
    let mut deltas = positions.windows(2).map(|w| w[1].sub(w[0]));
    let first = deltas.next().unwrap_or_default();
    let (min, max) = deltas.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));

    let cells = 2f64.powi(depth);
    let pad = |lo: f64, hi: f64| {
        (hi - lo) / cells + lo.abs().max(hi.abs()) * f64::from(f32::EPSILON) * 4.0
    };
    let margin = Vector3::new(
        pad(min.x, max.x),
        pad(min.y, max.y),
        pad(min.z, max.z),
    );
    (
        min.sub(margin).to_f32_precision(),
        max.add(margin).to_f32_precision(),
    )
}

fn encode_oct24<W: Write + ?Sized>(w: &mut W, captures: &[PositionCapture]) -> Result<()> {
    match captures {
        [] => Ok(()),
        [only] => w.write_vector3_f32(only.position),
        [first, rest @ ..] => {
            let positions: Vec<Vector3> = captures.iter().map(|c| c.position).collect();
            let (min, max) = delta_bounds(&positions, OCT24_DEPTH);
            w.write_vector3_f32(min)?;
            w.write_vector3_f32(max)?;
            w.write_vector3_f32(first.position)?;

            let mut quantized = first.position.to_f32_precision();
            for c in rest {
                let bytes = octree::encode24(c.position.sub(quantized), min, max);
                w.write_all(&bytes)?;
                quantized = quantized.add(octree::decode(&bytes, min, max));
            }
            Ok(())
        }
    }
}

fn decode_oct24<R: Read + ?Sized>(r: &mut R, n: usize) -> Result<Vec<Vector3>> {
    match n {
        0 => Ok(Vec::new()),
        1 => Ok(vec![r.read_vector3_f32()?]),
        _ => {
            let min = r.read_vector3_f32()?;
            let max = r.read_vector3_f32()?;
            let mut current = r.read_vector3_f32()?;
            let mut out = Vec::with_capacity(n);
            out.push(current);
            let mut buf = [0u8; 3];
            for _ in 1..n {
                r.read_exact(&mut buf)?;
                current = current.add(octree::decode(&buf, min, max));
                out.push(current);
            }
            Ok(out)
        }
    }
}

fn encode_oct48<W: Write + ?Sized>(w: &mut W, captures: &[PositionCapture]) -> Result<()> {
    match captures {
        [] => Ok(()),
        [only] => {
            w.write_f32_le(only.time as f32)?;
            w.write_vector3_f32(only.position)
        }
        [first, rest @ ..] => {
            let times: Vec<f64> = captures.iter().map(|c| c.time).collect();
            let positions: Vec<Vector3> = captures.iter().map(|c| c.position).collect();
            let start = first.time as f32;
            let max_delta = delta_domain(&times);
            let (min, max) = delta_bounds(&positions, OCT48_DEPTH);

            w.write_f32_le(start)?;
            w.write_f32_le(max_delta)?;
            w.write_vector3_f32(first.position)?;
            w.write_vector3_f32(min)?;
            w.write_vector3_f32(max)?;

            let mut clock = DeltaQuantizer::new(start as f64, max_delta as f64);
            let mut quantized = first.position.to_f32_precision();
            for c in rest {
                w.write_all(&clock.encode(c.time))?;
                let bytes = octree::encode48(c.position.sub(quantized), min, max);
                w.write_all(&bytes)?;
                quantized = quantized.add(octree::decode(&bytes, min, max));
            }
            Ok(())
        }
    }
}

fn decode_oct48<R: Read + ?Sized>(r: &mut R, n: usize) -> Result<Vec<PositionCapture>> {
    match n {
        0 => Ok(Vec::new()),
        1 => {
            let time = r.read_f32_le()? as f64;
            let position = r.read_vector3_f32()?;
            Ok(vec![PositionCapture { time, position }])
        }
        _ => {
            let start = r.read_f32_le()? as f64;
            let max_delta = r.read_f32_le()? as f64;
            let mut current = r.read_vector3_f32()?;
            let min = r.read_vector3_f32()?;
            let max = r.read_vector3_f32()?;

            let mut clock = DeltaQuantizer::new(start, max_delta);
            let mut out = Vec::with_capacity(n);
            out.push(PositionCapture {
                time: start,
                position: current,
            });
            let mut time_buf = [0u8; 2];
            let mut dir_buf = [0u8; 6];
            for _ in 1..n {
                r.read_exact(&mut time_buf)?;
                r.read_exact(&mut dir_buf)?;
                let time = clock.decode(&time_buf);
                current = current.add(octree::decode(&dir_buf, min, max));
                out.push(PositionCapture {
                    time,
                    position: current,
                });
            }
            Ok(out)
        }
    }
}
