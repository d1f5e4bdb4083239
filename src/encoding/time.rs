// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Per-collection time sequence codec.
//!
//! Wire layout: `u8 technique ‖ varint(count) ‖ time bytes`.
//!
//! | Technique | Time bytes |
//! |-----------|------------|
//! | Raw64 (0) | `f64 × count` |
//! | Raw32 (1) | `f32 × count` |
//! | BST16 (2) | `f32 start`, then if `count ≥ 2`: `f32 max_delta` and one BST-2 delta per remaining capture |
//!
//! BST16 deltas are taken against the running quantized time, not the
//! exact previous time, so quantization error does not accumulate.

use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};

use super::bst;
use super::primitives::{RapRead, RapWrite};
use crate::core::{RapError, Result};

/// Storage technique for a time sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TimeTechnique {
    #[default]
    Raw64 = 0,
    Raw32 = 1,
    Bst16 = 2,
}

impl TryFrom<u8> for TimeTechnique {
    type Error = RapError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(TimeTechnique::Raw64),
            1 => Ok(TimeTechnique::Raw32),
            2 => Ok(TimeTechnique::Bst16),
            other => Err(RapError::unknown_time_encoding(other)),
        }
    }
}

/// Running BST-2 delta coder over `[0, duration]`.
///
/// Encoding and decoding share this type so both sides accumulate exactly
/// the same quantized values.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DeltaQuantizer {
    current: f64,
    duration: f64,
}

impl DeltaQuantizer {
    pub(crate) fn new(start: f64, duration: f64) -> Self {
        Self {
            current: start,
            duration,
        }
    }

    /// Quantize `value - current` and advance by the quantized delta.
    pub(crate) fn encode(&mut self, value: f64) -> [u8; 2] {
        let bytes = bst::encode16(value - self.current, 0.0, self.duration);
        self.decode(&bytes);
        bytes
    }

    /// Advance by a quantized delta and return the new running value.
    pub(crate) fn decode(&mut self, bytes: &[u8]) -> f64 {
        self.current += bst::decode(0.0, self.duration, bytes);
        self.current
    }
}

/// Largest step between consecutive values, never below zero.
fn max_step(values: &[f64]) -> f64 {
    values
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold(0.0, f64::max)
}

/// Duration of the delta domain for `values`.
///
/// Padded past the largest step so that a maximal step plus the carried
/// error still lands inside the domain instead of clamping to its top.
pub(crate) fn delta_domain(values: &[f64]) -> f32 {
    let step = max_step(values);
    (step + step / 32_768.0) as f32
}

/// Write a time sequence with the given technique.
pub fn encode_times<W: Write + ?Sized>(
    w: &mut W,
    technique: TimeTechnique,
    times: &[f64],
) -> Result<()> {
    w.write_u8(technique as u8)?;
    w.write_len(times.len())?;
    match technique {
        TimeTechnique::Raw64 => times.iter().try_for_each(|t| w.write_f64_le(*t)),
        TimeTechnique::Raw32 => times.iter().try_for_each(|t| w.write_f32_le(*t as f32)),
        TimeTechnique::Bst16 => {
            let Some(&first) = times.first() else {
                return Ok(());
            };
            let start = first as f32;
            w.write_f32_le(start)?;
            if times.len() < 2 {
                return Ok(());
            }
            let max_delta = delta_domain(times);
            w.write_f32_le(max_delta)?;

            let mut quantizer = DeltaQuantizer::new(start as f64, max_delta as f64);
            for &t in &times[1..] {
                w.write_all(&quantizer.encode(t))?;
            }
            Ok(())
        }
    }
}

/// Encode a time sequence into a fresh buffer.
pub fn times_to_bytes(technique: TimeTechnique, times: &[f64]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(2 + times.len() * 8);
    encode_times(&mut out, technique, times)?;
    Ok(out)
}

/// Read a time sequence.
pub fn decode_times<R: Read + ?Sized>(r: &mut R) -> Result<Vec<f64>> {
    let technique = TimeTechnique::try_from(r.read_u8()?)?;
    let count = r.read_len()?;
    let mut times = Vec::with_capacity(count.min(1 << 16));
    match technique {
        TimeTechnique::Raw64 => {
            for _ in 0..count {
                times.push(r.read_f64_le()?);
            }
        }
        TimeTechnique::Raw32 => {
            for _ in 0..count {
                times.push(r.read_f32_le()? as f64);
            }
        }
        TimeTechnique::Bst16 => {
            if count == 0 {
                return Ok(times);
            }
            let start = r.read_f32_le()? as f64;
            times.push(start);
            if count < 2 {
                return Ok(times);
            }
            let max_delta = r.read_f32_le()? as f64;
            let mut quantizer = DeltaQuantizer::new(start, max_delta);
            let mut buf = [0u8; 2];
            for _ in 1..count {
                r.read_exact(&mut buf)?;
                times.push(quantizer.decode(&buf));
            }
        }
    }
    Ok(times)
}
