// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Small fixed-size value types carried by captures and metadata.

use serde::Serialize;

/// Two-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Three-component vector, used for positions and ZXY euler angles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise difference `self - other`.
    pub fn sub(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Component-wise sum.
    pub fn add(self, other: Vector3) -> Vector3 {
        Vector3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Component-wise minimum.
    pub fn min(self, other: Vector3) -> Vector3 {
        Vector3::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Component-wise maximum.
    pub fn max(self, other: Vector3) -> Vector3 {
        Vector3::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    /// Midpoint between `self` and `other`.
    pub fn midpoint(self, other: Vector3) -> Vector3 {
        Vector3::new(
            (self.x + other.x) / 2.0,
            (self.y + other.y) / 2.0,
            (self.z + other.z) / 2.0,
        )
    }

    /// Round every component through `f32`, matching what a reader sees
    /// after a 32-bit round trip.
    pub fn to_f32_precision(self) -> Vector3 {
        Vector3::new(
            self.x as f32 as f64,
            self.y as f32 as f64,
            self.z as f32 as f64,
        )
    }
}

/// Rotation quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }
}

/// Row-major 3x3 matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Matrix3x3(pub [f64; 9]);

/// Row-major 4x4 matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Matrix4x4(pub [f64; 16]);

impl Matrix3x3 {
    pub fn identity() -> Self {
        let mut m = [0.0; 9];
        m[0] = 1.0;
        m[4] = 1.0;
        m[8] = 1.0;
        Self(m)
    }
}

impl Matrix4x4 {
    pub fn identity() -> Self {
        let mut m = [0.0; 16];
        m[0] = 1.0;
        m[5] = 1.0;
        m[10] = 1.0;
        m[15] = 1.0;
        Self(m)
    }
}
