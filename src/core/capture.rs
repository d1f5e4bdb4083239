// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Timestamped samples held by capture collections.

use serde::Serialize;

use super::metadata::Metadata;
use super::vector::Vector3;

/// Anything carrying a capture time.
pub trait Capture {
    /// Time of the sample, in seconds relative to the recording.
    fn time(&self) -> f64;
}

/// A position sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionCapture {
    pub time: f64,
    pub position: Vector3,
}

impl PositionCapture {
    pub fn new(time: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            time,
            position: Vector3::new(x, y, z),
        }
    }
}

/// A rotation sample stored as euler angles in degrees, applied in Z, X, Y order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EulerZxyCapture {
    pub time: f64,
    pub rotation: Vector3,
}

impl EulerZxyCapture {
    pub fn new(time: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            time,
            rotation: Vector3::new(x, y, z),
        }
    }
}

/// A named event with its own metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventCapture {
    pub time: f64,
    pub name: String,
    pub metadata: Metadata,
}

impl EventCapture {
    pub fn new(time: f64, name: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            time,
            name: name.into(),
            metadata,
        }
    }
}

/// Index into the owning collection's enumerator list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnumCapture {
    pub time: f64,
    pub value: usize,
}

impl EnumCapture {
    pub fn new(time: f64, value: usize) -> Self {
        Self { time, value }
    }
}

/// A scalar sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloatCapture {
    pub time: f64,
    pub value: f64,
}

impl FloatCapture {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

macro_rules! impl_capture {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Capture for $ty {
                #[inline]
                fn time(&self) -> f64 {
                    self.time
                }
            }
        )*
    };
}

impl_capture!(
    PositionCapture,
    EulerZxyCapture,
    EventCapture,
    EnumCapture,
    FloatCapture
);
