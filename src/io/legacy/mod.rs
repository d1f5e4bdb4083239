// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Version 1 loader.
//!
//! A version 1 file is laid out as
//!
//! ```text
//! u8 1 ‖ u32le recording_count ‖ u64le compressed_size ‖ deflate(protobuf)
//! ```
//!
//! where the count must be 1 and the protobuf payload is a
//! [`schema::Recording`]. Loading lifts it into the current model:
//!
//! - the root keeps its name and metadata and gets a `Custom Event`
//!   collection
//! - each subject becomes a child with `Position`, `Rotation`,
//!   `Custom Event` and `Life Cycle` collections, in that order
//! - an event without metadata gets `{"value": contents}`

pub mod schema;

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use prost::Message;

use crate::core::vector::Vector3;
use crate::core::{
    CaptureCollection, Collection, EnumCapture, EnumCollection, EulerZxyCapture, EventCapture,
    Metadata, PositionCapture, RapError, Recording, Result,
};
use crate::encoding::RapRead;

use schema::LifeCycleEvent;

/// Version byte of the legacy format.
pub const LEGACY_VERSION: u8 = 1;

pub const POSITION_COLLECTION: &str = "Position";
pub const ROTATION_COLLECTION: &str = "Rotation";
pub const CUSTOM_EVENT_COLLECTION: &str = "Custom Event";
pub const LIFE_CYCLE_COLLECTION: &str = "Life Cycle";

/// Metadata key given to the contents of an event without metadata.
pub const EVENT_CONTENTS_KEY: &str = "value";

/// Read a version 1 file whose version byte was already consumed.
pub fn read_legacy<R: Read + ?Sized>(r: &mut R) -> Result<Recording> {
    let count = r.read_u32::<LittleEndian>()?;
    if count != 1 {
        tracing::warn!(count, "legacy file does not hold exactly one recording");
        return Err(RapError::format(format!(
            "legacy file holds {count} recordings, expected 1"
        )));
    }

    let size = r.read_u64::<LittleEndian>()?;
    let size = usize::try_from(size)
        .map_err(|_| RapError::format(format!("legacy payload of {size} bytes is too large")))?;
    let compressed = r.read_exact_vec(size)?;

    let mut inflated = Vec::new();
    DeflateDecoder::new(compressed.as_slice()).read_to_end(&mut inflated)?;
    let proto = schema::Recording::decode(inflated.as_slice())?;

    let recording = lift(proto)?;
    tracing::debug!(
        subjects = recording.recordings().len(),
        captures = recording.capture_count(),
        "upgraded legacy recording"
    );
    Ok(recording)
}

/// Encode a complete version 1 file, version byte included.
pub fn write_legacy<W: Write + ?Sized>(w: &mut W, proto: &schema::Recording) -> Result<()> {
    let mut deflate = DeflateEncoder::new(Vec::new(), Compression::best());
    deflate.write_all(&proto.encode_to_vec())?;
    let compressed = deflate.finish()?;

    w.write_u8(LEGACY_VERSION)?;
    w.write_u32::<LittleEndian>(1)?;
    w.write_u64::<LittleEndian>(compressed.len() as u64)?;
    w.write_all(&compressed)?;
    Ok(())
}

/// Convert a decoded version 1 recording into the current model.
pub fn lift(proto: schema::Recording) -> Result<Recording> {
    let children = proto
        .subjects
        .into_iter()
        .map(lift_subject)
        .collect::<Result<Vec<_>>>()?;

    Ok(Recording::new(
        "",
        proto.name,
        vec![events(proto.custom_events)],
        children,
        string_metadata(proto.metadata),
        Vec::new(),
        Vec::new(),
    ))
}

fn lift_subject(subject: schema::SubjectRecording) -> Result<Recording> {
    let positions: Vec<PositionCapture> = subject
        .captured_positions
        .iter()
        .map(|c| PositionCapture {
            time: f64::from(c.time),
            position: widen(c),
        })
        .collect();
    let rotations: Vec<EulerZxyCapture> = subject
        .captured_rotations
        .iter()
        .map(|c| EulerZxyCapture {
            time: f64::from(c.time),
            rotation: widen(c),
        })
        .collect();
    let life_cycle = subject
        .lifecycle_events
        .iter()
        .map(|c| {
            let event = LifeCycleEvent::try_from(c.r#type).map_err(|_| {
                RapError::format(format!("unknown life cycle event: {}", c.r#type))
            })?;
            Ok(EnumCapture::new(f64::from(c.time), event as usize))
        })
        .collect::<Result<Vec<_>>>()?;

    let collections = vec![
        Collection::new(POSITION_COLLECTION, positions).into(),
        Collection::new(ROTATION_COLLECTION, rotations).into(),
        events(subject.custom_events),
        EnumCollection::new(
            LIFE_CYCLE_COLLECTION,
            LifeCycleEvent::NAMES.iter().map(|s| s.to_string()).collect(),
            life_cycle,
        )
        .into(),
    ];

    Ok(Recording::new(
        subject.id,
        subject.name,
        collections,
        Vec::new(),
        string_metadata(subject.metadata),
        Vec::new(),
        Vec::new(),
    ))
}

fn events(captures: Vec<schema::CustomEventCapture>) -> CaptureCollection {
    let captures: Vec<EventCapture> = captures
        .into_iter()
        .map(|c| {
            let metadata = if c.metadata.is_empty() {
                Metadata::new().with(EVENT_CONTENTS_KEY, c.contents)
            } else {
                string_metadata(c.metadata)
            };
            EventCapture::new(f64::from(c.time), c.name, metadata)
        })
        .collect();
    Collection::new(CUSTOM_EVENT_COLLECTION, captures).into()
}

fn widen(c: &schema::VectorCapture) -> Vector3 {
    Vector3::new(f64::from(c.x), f64::from(c.y), f64::from(c.z))
}

fn string_metadata(map: std::collections::HashMap<String, String>) -> Metadata {
    map.into_iter().collect()
}
