// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire encoding for recordings.
//!
//! Building blocks:
//! - [`primitives`] - varints, strings, length-prefixed arrays
//! - [`bst`] - bit-serial float quantizer
//! - [`octree`] - octree directional coder
//! - [`property`] - typed metadata properties and blocks
//! - [`time`] - per-collection time sequences
//!
//! Channel codecs:
//! - [`codec`] - the [`ChannelCodec`] contract and the [`Encoder`] sum type
//! - [`position`], [`euler`], [`event`], [`enumeration`], [`float`] - built-in codecs
//! - [`registry`] - ordered, signature-unique encoder set

pub mod bst;
pub mod codec;
pub mod enumeration;
pub mod euler;
pub mod event;
pub mod float;
pub mod interner;
pub mod octree;
pub mod position;
pub mod primitives;
pub mod property;
pub mod registry;
pub mod time;

pub use codec::{default_encoders, ChannelCodec, EncodedCollections, Encoder};
pub use enumeration::{EnumEncoder, EnumTechnique};
pub use euler::{EulerEncoder, EulerTechnique};
pub use event::{EventEncoder, EventTechnique};
pub use float::{FloatEncoder, FloatTechnique};
pub use interner::Interner;
pub use position::{PositionEncoder, PositionTechnique};
pub use primitives::{bytes_array_to_bytes, uvarint_to_bytes, RapRead, RapWrite};
pub use registry::EncoderRegistry;
pub use time::{decode_times, encode_times, times_to_bytes, TimeTechnique};
