// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Custom event codec.
//!
//! Event names and metadata keys are interned across every event
//! collection handed to one [`ChannelCodec::encode`] call. The codec
//! header holds the two tables:
//!
//! ```text
//! stringArray(event_names) ‖ stringArray(metadata_keys)
//! ```
//!
//! Each collection body is:
//!
//! ```text
//! string name ‖ u8 technique ‖ varint count ‖ capture*
//! capture = time ‖ varint name_idx ‖ uvarintArray(key_idx) ‖ (code ‖ payload)*
//! ```
//!
//! where `time` is `f64` for Raw64 and `f32` for Raw32.

use std::io::Cursor;

use byteorder::{ReadBytesExt, WriteBytesExt};

use super::codec::{count_mismatch, wrong_kind, ChannelCodec, EncodedCollections};
use super::interner::Interner;
use super::primitives::{RapRead, RapWrite};
use super::property::{read_property, write_property};
use super::time::TimeTechnique;
use crate::core::{
    signatures, CaptureCollection, Collection, EventCapture, Metadata, RapError, Result,
};

/// Codec format version.
pub const EVENT_ENCODER_VERSION: u32 = 1;

/// Width of the embedded capture times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventTechnique {
    Raw64 = 0,
    Raw32 = 1,
}

impl TryFrom<u8> for EventTechnique {
    type Error = RapError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(EventTechnique::Raw64),
            1 => Ok(EventTechnique::Raw32),
            other => Err(RapError::format(format!(
                "unknown event encoding technique: {other}"
            ))),
        }
    }
}

/// Encoder for `recolude.event` collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventEncoder {
    technique: EventTechnique,
    time_technique: TimeTechnique,
}

impl EventEncoder {
    pub fn new(technique: EventTechnique) -> Self {
        let time_technique = match technique {
            EventTechnique::Raw64 => TimeTechnique::Raw64,
            EventTechnique::Raw32 => TimeTechnique::Raw32,
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

    pub fn technique(&self) -> EventTechnique {
        self.technique
    }

    fn encode_one(
        &self,
        collection: &Collection<EventCapture>,
        names: &mut Interner,
        keys: &mut Interner,
    ) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.write_string(collection.name())?;
        out.write_u8(self.technique as u8)?;
        out.write_len(collection.length())?;
        for capture in collection.captures() {
            match self.technique {
                EventTechnique::Raw64 => out.write_f64_le(capture.time)?,
                EventTechnique::Raw32 => out.write_f32_le(capture.time as f32)?,
            }
            out.write_len(names.intern(&capture.name))?;

            let indices: Vec<u64> = capture
                .metadata
                .keys()
                .map(|k| keys.intern(k) as u64)
                .collect();
            out.write_uvarint_array(&indices)?;
            for (_, property) in capture.metadata.iter() {
                write_property(&mut out, property)?;
            }
        }
        Ok(out)
    }
}

impl ChannelCodec for EventEncoder {
    fn signature(&self) -> &str {
        signatures::EVENT
    }

    fn version(&self) -> u32 {
        EVENT_ENCODER_VERSION
    }

    fn time_technique(&self) -> TimeTechnique {
        self.time_technique
    }

    fn encode(&self, collections: &[&CaptureCollection]) -> Result<EncodedCollections> {
        let mut names = Interner::new();
        let mut keys = Interner::new();
        let mut bodies = Vec::with_capacity(collections.len());
        for collection in collections {
            let events = collection
                .as_event()
                .ok_or_else(|| wrong_kind("event", collection))?;
            bodies.push(self.encode_one(events, &mut names, &mut keys)?);
        }

        let mut header = Vec::new();
        header.write_string_array(names.values())?;
        header.write_string_array(keys.values())?;
        tracing::debug!(
            names = names.len(),
            keys = keys.len(),
            collections = bodies.len(),
            "interned event symbols"
        );
        Ok(EncodedCollections {
            header,
            collections: bodies,
        })
    }

    fn decode(&self, header: &[u8], body: &[u8], times: &[f64]) -> Result<CaptureCollection> {
        let (names, keys) = if header.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            let mut h = Cursor::new(header);
            (h.read_string_array()?, h.read_string_array()?)
        };

        let mut r = Cursor::new(body);
        let name = r.read_string()?;
        let technique = EventTechnique::try_from(r.read_u8()?)?;
        let count = r.read_len()?;
        if count != times.len() {
            return Err(count_mismatch(&name, count, times.len()));
        }

        let mut captures = Vec::with_capacity(count);
        for _ in 0..count {
            let time = match technique {
                EventTechnique::Raw64 => r.read_f64_le()?,
                EventTechnique::Raw32 => r.read_f32_le()? as f64,
            };
            let event_name = lookup(&names, r.read_uvarint()?, "event name")?;

            let indices = r.read_uvarint_array()?;
            let mut metadata = Metadata::new();
            for index in indices {
                let key = lookup(&keys, index, "metadata key")?;
                let property = read_property(&mut r)?;
                if metadata.contains_key(key) {
                    return Err(RapError::duplicate_key(key));
                }
                metadata.insert(key, property);
            }
            captures.push(EventCapture::new(time, event_name, metadata));
        }
        Ok(CaptureCollection::Event(Collection::new(name, captures)))
    }
}

fn lookup<'a>(table: &'a [String], index: u64, what: &str) -> Result<&'a str> {
    usize::try_from(index)
        .ok()
        .and_then(|i| table.get(i))
        .map(String::as_str)
        .ok_or_else(|| {
            RapError::format(format!(
                "{what} index {index} out of range for table of {}",
                table.len()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ErrorKind, Property};

    fn events() -> Vec<EventCapture> {
        vec![
            EventCapture::new(
                0.5,
                "Jump",
                Metadata::new().with("height", 2.5f32).with("who", "player"),
            ),
            EventCapture::new(1.25, "Land", Metadata::new()),
            EventCapture::new(
                3.0,
                "Jump",
                Metadata::new().with("height", 1.0f32).with("combo", true),
            ),
        ]
    }

    #[test]
    fn test_roundtrip_shares_tables_across_collections() {
        let a: CaptureCollection = Collection::new("A", events()).into();
        let b: CaptureCollection = Collection::new(
            "B",
            vec![EventCapture::new(2.0, "Land", Metadata::new().with("who", "npc"))],
        )
        .into();
        let encoder = EventEncoder::new(EventTechnique::Raw64);
        let encoded = encoder.encode(&[&a, &b]).unwrap();

        let mut h = Cursor::new(encoded.header.as_slice());
        assert_eq!(h.read_string_array().unwrap(), vec!["Jump", "Land"]);
        assert_eq!(h.read_string_array().unwrap(), vec!["height", "who", "combo"]);

        let decoded_a = encoder
            .decode(&encoded.header, &encoded.collections[0], &a.times())
            .unwrap();
        assert_eq!(decoded_a.name(), "A");
        assert_eq!(decoded_a.as_event().unwrap().captures(), events().as_slice());

        let decoded_b = encoder
            .decode(&encoded.header, &encoded.collections[1], &b.times())
            .unwrap();
        let capture = &decoded_b.as_event().unwrap().captures()[0];
        assert_eq!(capture.name, "Land");
        assert_eq!(capture.metadata.get("who"), Some(&Property::from("npc")));
    }

    #[test]
    fn test_raw32_times() {
        let a: CaptureCollection = Collection::new("A", events()).into();
        let encoder = EventEncoder::new(EventTechnique::Raw32);
        let encoded = encoder.encode(&[&a]).unwrap();
        let decoded = encoder
            .decode(&encoded.header, &encoded.collections[0], &[0.0, 0.0, 0.0])
            .unwrap();
        let times = decoded.times();
        assert_eq!(times, vec![0.5, 1.25, 3.0]);
    }

    #[test]
    fn test_empty_collection() {
        let a: CaptureCollection = Collection::<EventCapture>::new("E", vec![]).into();
        let encoder = EventEncoder::new(EventTechnique::Raw32);
        let encoded = encoder.encode(&[&a]).unwrap();
        let decoded = encoder
            .decode(&encoded.header, &encoded.collections[0], &[])
            .unwrap();
        assert!(decoded.is_empty());
        assert_eq!(decoded.name(), "E");
    }

    #[test]
    fn test_count_mismatch() {
        let a: CaptureCollection = Collection::new("A", events()).into();
        let encoder = EventEncoder::new(EventTechnique::Raw64);
        let encoded = encoder.encode(&[&a]).unwrap();
        let err = encoder
            .decode(&encoded.header, &encoded.collections[0], &[0.5])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut header = Vec::new();
        header.write_string_array(&["Ping"]).unwrap();
        header.write_string_array(&["k"]).unwrap();

        let mut body = Vec::new();
        body.write_string("A").unwrap();
        body.push(EventTechnique::Raw64 as u8);
        body.write_len(1).unwrap();
        body.write_f64_le(1.0).unwrap();
        body.write_len(0).unwrap();
        body.write_uvarint_array(&[0, 0]).unwrap();
        write_property(&mut body, &Property::from(1i32)).unwrap();
        write_property(&mut body, &Property::from(2i32)).unwrap();

        let err = EventEncoder::new(EventTechnique::Raw64)
            .decode(&header, &body, &[1.0])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Policy);
        assert_eq!(err.to_string(), "duplicate metadata key: k");
    }

    #[test]
    fn test_name_index_out_of_range() {
        let mut header = Vec::new();
        header.write_string_array::<&str>(&[]).unwrap();
        header.write_string_array::<&str>(&[]).unwrap();

        let mut body = Vec::new();
        body.write_string("A").unwrap();
        body.push(EventTechnique::Raw64 as u8);
        body.write_len(1).unwrap();
        body.write_f64_le(1.0).unwrap();
        body.write_len(3).unwrap();
        body.write_uvarint_array(&[]).unwrap();

        let err = EventEncoder::new(EventTechnique::Raw64)
            .decode(&header, &body, &[1.0])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
