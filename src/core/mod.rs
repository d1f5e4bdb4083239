// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout rapcodec.
//!
//! This module provides the in-memory recording model:
//! - [`RapError`] - Error handling
//! - [`Property`] / [`Metadata`] - Typed metadata
//! - [`CaptureCollection`] - Timestamped capture sequences
//! - [`Recording`] - The recording tree
//! - [`validate`] - Rule-based validation

pub mod capture;
pub mod collection;
pub mod error;
pub mod metadata;
pub mod recording;
pub mod validation;
pub mod vector;

pub use capture::{
    Capture, EnumCapture, EulerZxyCapture, EventCapture, FloatCapture, PositionCapture,
};
pub use collection::{
    signatures, CaptureCollection, Collection, EnumCollection, ExtensionCollection,
};
pub use error::{ErrorKind, RapError, Result};
pub use metadata::{Metadata, Property};
pub use recording::{Binary, BinaryReference, Recording, RecordingBuilder};
pub use validation::{validate, ValidationOption};
pub use vector::{Matrix3x3, Matrix4x4, Quaternion, Vector2, Vector3};
