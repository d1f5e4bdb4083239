// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Error behavior of the reader, writer and validator.

mod common;

use std::io::Cursor;

use rapcodec::encoding::{
    default_encoders, times_to_bytes, uvarint_to_bytes, EncodedCollections, FloatEncoder,
    FloatTechnique, RapWrite, TimeTechnique,
};
use rapcodec::{
    validate, CaptureCollection, ChannelCodec, Collection, Encoder, ErrorKind, FloatCapture,
    PositionCapture, Recording, RecordingReader, RecordingWriter, Result,
    ValidationOption,
};

/// Codec with a configurable version that stores nothing.
struct Versioned(u32);

impl ChannelCodec for Versioned {
    fn signature(&self) -> &str {
        "test.versioned"
    }

    fn version(&self) -> u32 {
        self.0
    }

    fn accepts(&self, collection: &CaptureCollection) -> bool {
        collection.name() == "versioned"
    }

    fn encode(&self, collections: &[&CaptureCollection]) -> Result<EncodedCollections> {
        Ok(EncodedCollections {
            header: Vec::new(),
            collections: vec![Vec::new(); collections.len()],
        })
    }

    fn decode(&self, _header: &[u8], _body: &[u8], times: &[f64]) -> Result<CaptureCollection> {
        Ok(Collection::new(
            "versioned",
            times.iter().map(|&t| FloatCapture::new(t, 0.0)).collect(),
        )
        .into())
    }
}

fn versioned_file(version: u32) -> Vec<u8> {
    let recording = Recording::builder("v")
        .collection(Collection::new("versioned", vec![FloatCapture::new(1.0, 2.0)]))
        .build();
    let mut writer = RecordingWriter::new(vec![Encoder::extension(Versioned(version))], Vec::new())
        .unwrap();
    writer.write(&recording).unwrap();
    writer.into_inner()
}

/// Uncompressed file with a single position collection whose payload is `payload`.
fn plain_position_file(payload: &[u8]) -> Vec<u8> {
    let mut blob = times_to_bytes(TimeTechnique::Raw64, &[0.0]).unwrap();
    blob.extend_from_slice(payload);

    let mut body = Vec::new();
    body.write_string("").unwrap();
    body.write_string("").unwrap();
    body.write_uvarint_array(&[]).unwrap();
    body.write_len(1).unwrap();
    body.write_len(0).unwrap();
    body.write_byte_array(&blob).unwrap();
    body.extend([0, 0, 0]);

    let mut file = vec![2u8];
    file.write_string_array(&["recolude.position"]).unwrap();
    file.write_uvarint_array(&[1]).unwrap();
    file.push(0);
    file.write_byte_array(&[]).unwrap();
    file.write_string_array::<&str>(&[]).unwrap();
    file.write_byte_array(&body).unwrap();
    file
}

// ============================================================================
// Reader
// ============================================================================

#[test]
fn test_version_refusal_consumes_one_byte() {
    let bytes = [0x03u8, 0x10, 0x20, 0x30];
    let mut cursor = Cursor::new(&bytes[..]);
    let err = RecordingReader::with_default_encoders(&mut cursor)
        .read()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert_eq!(err.to_string(), "Unrecognized file version: 3");
    assert_eq!(cursor.position(), 1);
}

#[test]
fn test_empty_input_is_unexpected_eof() {
    let err = rapcodec::load(&[0u8; 0][..]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.is_unexpected_eof());
}

#[test]
fn test_truncated_file() {
    let recording = Recording::builder("cut")
        .collection(Collection::new(
            "P",
            (0..100)
                .map(|i| PositionCapture::new(i as f64, i as f64, 0.0, -(i as f64)))
                .collect(),
        ))
        .build();
    let mut writer = RecordingWriter::with_default_encoders(Vec::new());
    writer.write(&recording).unwrap();
    let bytes = writer.into_inner();

    for cut in [1, 5, bytes.len() / 2, bytes.len() - 8] {
        let err = rapcodec::load(&bytes[..cut]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io, "cut at {cut}: {err}");
    }
}

#[test]
fn test_encoder_behind() {
    let bytes = versioned_file(3);
    let err = RecordingReader::new(vec![Encoder::extension(Versioned(2))], bytes.as_slice())
        .unwrap()
        .read()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Registry);
    assert_eq!(
        err.to_string(),
        "registered encoder (test.versioned) version is behind what is found in recording: 2 < 3"
    );
}

#[test]
fn test_newer_reader_accepts_older_file() {
    let bytes = versioned_file(1);
    let decoded = RecordingReader::new(vec![Encoder::extension(Versioned(4))], bytes.as_slice())
        .unwrap()
        .read()
        .unwrap();
    assert_eq!(decoded.collections()[0].length(), 1);
}

#[test]
fn test_unregistered_signature() {
    let bytes = versioned_file(1);
    let err = RecordingReader::new(default_encoders(), bytes.as_slice())
        .unwrap()
        .read()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Registry);
    assert_eq!(
        err.to_string(),
        "no registered encoder has signature test.versioned"
    );
}

#[test]
fn test_unknown_position_technique() {
    let mut payload = Vec::new();
    payload.write_string("P").unwrap();
    payload.push(9);
    let bytes = plain_position_file(&payload);

    let err = rapcodec::load(bytes.as_slice()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert_eq!(err.to_string(), "unknown positional encoding technique: 9");
}

#[test]
fn test_plain_position_file() {
    let mut payload = Vec::new();
    payload.write_string("P").unwrap();
    payload.push(0);
    payload.extend(1.0f64.to_le_bytes());
    payload.extend(2.0f64.to_le_bytes());
    payload.extend(3.0f64.to_le_bytes());
    let bytes = plain_position_file(&payload);

    let decoded = rapcodec::load(bytes.as_slice()).unwrap();
    let captures = decoded.collections()[0].as_position().unwrap().captures();
    assert_eq!(captures, [PositionCapture::new(0.0, 1.0, 2.0, 3.0)]);
}

#[test]
fn test_bad_metadata_key_index() {
    let mut body = Vec::new();
    body.write_string("").unwrap();
    body.write_string("").unwrap();
    body.write_uvarint_array(&[5]).unwrap();
    body.extend(uvarint_to_bytes(0));

    let mut file = vec![2u8, 0, 0, 0];
    file.write_string_array(&["only"]).unwrap();
    file.write_byte_array(&body).unwrap();

    let err = rapcodec::load(file.as_slice()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

// ============================================================================
// Writer
// ============================================================================

#[test]
fn test_nil_recording() {
    let mut writer = RecordingWriter::with_default_encoders(Vec::new());
    let err = writer.write(None::<&Recording>).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Policy);
    assert_eq!(err.to_string(), "can not write nil recording");
    assert!(writer.get_ref().is_empty());
}

#[test]
fn test_unhandled_stream() {
    let recording = Recording::builder("r")
        .collection(Collection::new("P", vec![PositionCapture::new(0.0, 1.0, 1.0, 1.0)]))
        .build();
    let mut writer = RecordingWriter::new(
        vec![FloatEncoder::new(FloatTechnique::Raw32).into()],
        Vec::new(),
    )
    .unwrap();
    let err = writer.write(&recording).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Policy);
    assert_eq!(
        err.to_string(),
        "no encoder registered to handle stream: recolude.position"
    );
}

#[test]
fn test_duplicate_encoder_signature() {
    let err = RecordingWriter::new(
        vec![
            FloatEncoder::new(FloatTechnique::Raw32).into(),
            FloatEncoder::new(FloatTechnique::Raw64).into(),
        ],
        Vec::new(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Policy);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_validation_rejects_out_of_order_times() {
    let captures = [1.0, 4.0, 3.0, 7.0]
        .iter()
        .map(|&t| PositionCapture::new(t, 0.0, 0.0, 0.0))
        .collect();
    let recording = Recording::builder("rec")
        .id("abc")
        .collection(Collection::new("path", captures))
        .build();

    let err = validate(
        &recording,
        &[ValidationOption::RequireChronologicalCapture(true)],
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.to_string(),
        "[abc] rec: path capture collection violates chronological event validator"
    );

    assert!(matches!(
        validate(&recording, &[ValidationOption::RequireChronologicalCapture(false)]),
        Ok(())
    ));

    // The writer does not enforce ordering.
    let decoded = common::round_trip(&recording);
    assert_eq!(decoded.capture_count(), 4);
}
