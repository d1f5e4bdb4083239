// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Channel codec interface.
//!
//! Every capture collection is written by a channel codec selected by the
//! collection's signature. The built-in codecs cover the five built-in
//! collection kinds; user codecs plug in through [`Encoder::Extension`].
//!
//! ## Architecture
//!
//! - [`ChannelCodec`] - the common contract (signature, version, encode, decode)
//! - [`Encoder`] - closed sum over the built-in codecs plus an extension slot
//! - [`default_encoders`] - the encoder list used when none is configured
//!
//! The recording writer prefixes every encoded collection with its time
//! sequence (see [`super::time`]), so decoders receive the times up front.

use std::fmt;

use super::enumeration::{EnumEncoder, EnumTechnique};
use super::euler::{EulerEncoder, EulerTechnique};
use super::event::{EventEncoder, EventTechnique};
use super::float::{FloatEncoder, FloatTechnique};
use super::position::{PositionEncoder, PositionTechnique};
use super::time::TimeTechnique;
use crate::core::{CaptureCollection, RapError, Result};

/// Output of encoding every collection a codec was assigned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedCollections {
    /// Codec-wide header, possibly empty
    pub header: Vec<u8>,
    /// One payload per input collection, in input order
    pub collections: Vec<Vec<u8>>,
}

/// Contract shared by all channel codecs.
pub trait ChannelCodec: Send + Sync {
    /// Signature of the collections this codec handles.
    fn signature(&self) -> &str;

    /// Codec format version. Readers refuse files written by a newer version.
    fn version(&self) -> u32;

    /// Whether this codec can encode `collection`.
    fn accepts(&self, collection: &CaptureCollection) -> bool {
        collection.signature() == self.signature()
    }

    /// Technique used for the time sequence written before each payload.
    fn time_technique(&self) -> TimeTechnique {
        TimeTechnique::Raw64
    }

    /// Encode all collections assigned to this codec in one call.
    ///
    /// The codec may intern symbols across the collections and store the
    /// tables in the returned header.
    fn encode(&self, collections: &[&CaptureCollection]) -> Result<EncodedCollections>;

    /// Decode one collection.
    ///
    /// `times` is the separately decoded time sequence; the result must
    /// hold exactly `times.len()` captures.
    fn decode(&self, header: &[u8], body: &[u8], times: &[f64]) -> Result<CaptureCollection>;
}

/// A registered encoder.
pub enum Encoder {
    Position(PositionEncoder),
    Euler(EulerEncoder),
    Event(EventEncoder),
    Enum(EnumEncoder),
    Float(FloatEncoder),
    /// User-provided codec
    Extension(Box<dyn ChannelCodec>),
}

impl Encoder {
    /// Wrap a user codec.
    pub fn extension(codec: impl ChannelCodec + 'static) -> Self {
        Encoder::Extension(Box::new(codec))
    }

    fn codec(&self) -> &dyn ChannelCodec {
        match self {
            Encoder::Position(c) => c,
            Encoder::Euler(c) => c,
            Encoder::Event(c) => c,
            Encoder::Enum(c) => c,
            Encoder::Float(c) => c,
            Encoder::Extension(c) => c.as_ref(),
        }
    }
}

impl ChannelCodec for Encoder {
    fn signature(&self) -> &str {
        self.codec().signature()
    }

    fn version(&self) -> u32 {
        self.codec().version()
    }

    fn accepts(&self, collection: &CaptureCollection) -> bool {
        self.codec().accepts(collection)
    }

    fn time_technique(&self) -> TimeTechnique {
        self.codec().time_technique()
    }

    fn encode(&self, collections: &[&CaptureCollection]) -> Result<EncodedCollections> {
        self.codec().encode(collections)
    }

    fn decode(&self, header: &[u8], body: &[u8], times: &[f64]) -> Result<CaptureCollection> {
        self.codec().decode(header, body, times)
    }
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoder::Position(c) => f.debug_tuple("Position").field(c).finish(),
            Encoder::Euler(c) => f.debug_tuple("Euler").field(c).finish(),
            Encoder::Event(c) => f.debug_tuple("Event").field(c).finish(),
            Encoder::Enum(c) => f.debug_tuple("Enum").field(c).finish(),
            Encoder::Float(c) => f.debug_tuple("Float").field(c).finish(),
            Encoder::Extension(c) => f
                .debug_struct("Extension")
                .field("signature", &c.signature())
                .field("version", &c.version())
                .finish(),
        }
    }
}

impl From<PositionEncoder> for Encoder {
    fn from(e: PositionEncoder) -> Self {
        Encoder::Position(e)
    }
}

impl From<EulerEncoder> for Encoder {
    fn from(e: EulerEncoder) -> Self {
        Encoder::Euler(e)
    }
}

impl From<EventEncoder> for Encoder {
    fn from(e: EventEncoder) -> Self {
        Encoder::Event(e)
    }
}

impl From<EnumEncoder> for Encoder {
    fn from(e: EnumEncoder) -> Self {
        Encoder::Enum(e)
    }
}

impl From<FloatEncoder> for Encoder {
    fn from(e: FloatEncoder) -> Self {
        Encoder::Float(e)
    }
}

/// Encoders used when a writer or reader is not given an explicit list.
pub fn default_encoders() -> Vec<Encoder> {
    vec![
        PositionEncoder::new(PositionTechnique::Oct24).into(),
        EulerEncoder::new(EulerTechnique::Raw16).into(),
        EventEncoder::new(EventTechnique::Raw32).into(),
        EnumEncoder::new(EnumTechnique::Raw32).into(),
        FloatEncoder::new(FloatTechnique::Raw32).into(),
    ]
}

/// Error for a collection routed to a codec of another kind.
pub(crate) fn wrong_kind(codec: &str, collection: &CaptureCollection) -> RapError {
    RapError::policy(format!(
        "{codec} encoder can not handle stream: {}",
        collection.signature()
    ))
}

/// Error for a payload whose embedded capture count disagrees with its times.
pub(crate) fn count_mismatch(name: &str, embedded: usize, times: usize) -> RapError {
    tracing::warn!(
        collection = name,
        embedded,
        times,
        "capture count does not match time sequence"
    );
    RapError::format(format!(
        "collection {name} holds {embedded} captures but {times} times were decoded"
    ))
}
