// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bit-serial binary search tree float quantizer.
//!
//! A value in `[start, start + duration]` is located by binary search over
//! the range; each search step emits one bit (1 when the value is at or
//! above the current midpoint). Bits are packed least significant first
//! within each byte. `N` bytes give `8N` steps of precision and a worst
//! case error of `duration * 2^(-8N - 1)`.

/// Quantize `value` into `out.len()` bytes.
pub fn encode_into(value: f64, start: f64, duration: f64, out: &mut [u8]) {
    let mut cur = start + duration / 2.0;
    let mut inc = duration / 4.0;
    for byte in out.iter_mut() {
        *byte = 0;
        for bit in 0..8 {
            if value < cur {
                cur -= inc;
            } else {
                *byte |= 1 << bit;
                cur += inc;
            }
            inc /= 2.0;
        }
    }
}

/// Recover the quantized value from its bytes.
pub fn decode(start: f64, duration: f64, bytes: &[u8]) -> f64 {
    let mut cur = start + duration / 2.0;
    let mut inc = duration / 4.0;
    for byte in bytes {
        for bit in 0..8 {
            if byte & (1 << bit) == 0 {
                cur -= inc;
            } else {
                cur += inc;
            }
            inc /= 2.0;
        }
    }
    cur
}

/// Quantize into two bytes.
pub fn encode16(value: f64, start: f64, duration: f64) -> [u8; 2] {
    let mut out = [0u8; 2];
    encode_into(value, start, duration, &mut out);
    out
}

/// Quantize into four bytes.
pub fn encode32(value: f64, start: f64, duration: f64) -> [u8; 4] {
    let mut out = [0u8; 4];
    encode_into(value, start, duration, &mut out);
    out
}
