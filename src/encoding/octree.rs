// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Octree directional coder.
//!
//! A vector inside the box `[min, max]` is located by repeatedly splitting
//! the box into octants. Each level records a 3-bit octant index
//! `top << 2 | right << 1 | forward`, where `top` is `y < center.y`,
//! `right` is `x < center.x` and `forward` is `z < center.z`.
//!
//! Cells are packed in groups of eight into three bytes by bitplane
//! transposition: byte 0 holds bit 0 of every cell, byte 1 bit 1, byte 2
//! bit 2. Values outside the box land in the nearest edge cell.

use crate::core::vector::Vector3;

/// Cells per packed group.
pub const CELLS_PER_GROUP: usize = 8;

/// Bytes per packed group.
pub const BYTES_PER_GROUP: usize = 3;

#[derive(Debug, Clone, Copy)]
struct Bounds {
    lo: Vector3,
    hi: Vector3,
}

impl Bounds {
    fn center(&self) -> Vector3 {
        self.lo.midpoint(self.hi)
    }

    /// Split into the octant selected by `cell`.
    fn narrow(&mut self, cell: u8) {
        let center = self.center();
        if cell & 0b100 != 0 {
            self.hi.y = center.y;
        } else {
            self.lo.y = center.y;
        }
        if cell & 0b010 != 0 {
            self.hi.x = center.x;
        } else {
            self.lo.x = center.x;
        }
        if cell & 0b001 != 0 {
            self.hi.z = center.z;
        } else {
            self.lo.z = center.z;
        }
    }
}

/// Encode `value` into `out`, whose length must be a multiple of three.
///
/// The tree depth is `out.len() / 3 * 8`.
pub fn encode_into(value: Vector3, min: Vector3, max: Vector3, out: &mut [u8]) {
    debug_assert_eq!(out.len() % BYTES_PER_GROUP, 0);
    let mut bounds = Bounds { lo: min, hi: max };
    for group in out.chunks_mut(BYTES_PER_GROUP) {
        group.fill(0);
        for i in 0..CELLS_PER_GROUP {
            let center = bounds.center();
            let top = u8::from(value.y < center.y);
            let right = u8::from(value.x < center.x);
            let forward = u8::from(value.z < center.z);
            let cell = top << 2 | right << 1 | forward;

            group[0] |= (cell & 1) << i;
            group[1] |= ((cell >> 1) & 1) << i;
            group[2] |= ((cell >> 2) & 1) << i;

            bounds.narrow(cell);
        }
    }
}

/// Decode a vector from packed groups; returns the center of the final cell.
pub fn decode(bytes: &[u8], min: Vector3, max: Vector3) -> Vector3 {
    let mut bounds = Bounds { lo: min, hi: max };
    for group in bytes.chunks_exact(BYTES_PER_GROUP) {
        for i in 0..CELLS_PER_GROUP {
            let cell = ((group[0] >> i) & 1) | ((group[1] >> i) & 1) << 1 | ((group[2] >> i) & 1) << 2;
            bounds.narrow(cell);
        }
    }
    bounds.center()
}

/// Encode into a single three-byte group (depth 8).
pub fn encode24(value: Vector3, min: Vector3, max: Vector3) -> [u8; 3] {
    let mut out = [0u8; 3];
    encode_into(value, min, max, &mut out);
    out
}

/// Encode into two three-byte groups (depth 16).
pub fn encode48(value: Vector3, min: Vector3, max: Vector3) -> [u8; 6] {
    let mut out = [0u8; 6];
    encode_into(value, min, max, &mut out);
    out
}
