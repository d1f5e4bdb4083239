// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use rapcodec::{
    EnumCapture, EnumCollection, EulerZxyCapture, EventCapture, FloatCapture, Metadata,
    PositionCapture, Recording, RecordingReader, RecordingWriter, Vector3,
};
use rapcodec::Encoder;

// ============================================================================
// Deterministic Data
// ============================================================================

/// Tiny xorshift generator for reproducible test data.
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform value in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Increasing times with steps drawn from `[0, max_step)`.
pub fn walk_times(rng: &mut XorShift, n: usize, max_step: f64) -> Vec<f64> {
    let mut t = 0.0;
    (0..n)
        .map(|_| {
            t += rng.range(0.0, max_step);
            t
        })
        .collect()
}

/// Cumulative random walk with per-axis steps drawn from `[lo, hi)`.
pub fn walk_positions(rng: &mut XorShift, times: &[f64], lo: f64, hi: f64) -> Vec<PositionCapture> {
    let mut p = Vector3::new(0.0, 0.0, 0.0);
    times
        .iter()
        .map(|&t| {
            p = p.add(Vector3::new(rng.range(lo, hi), rng.range(lo, hi), rng.range(lo, hi)));
            PositionCapture {
                time: t,
                position: p,
            }
        })
        .collect()
}

pub fn walk_rotations(rng: &mut XorShift, times: &[f64]) -> Vec<EulerZxyCapture> {
    times
        .iter()
        .map(|&t| {
            EulerZxyCapture::new(
                t,
                rng.range(-720.0, 720.0),
                rng.range(0.0, 360.0),
                rng.range(-180.0, 180.0),
            )
        })
        .collect()
}

pub fn sample_events(rng: &mut XorShift, times: &[f64]) -> Vec<EventCapture> {
    let names = ["Jump", "Land", "Hit"];
    times
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let metadata = Metadata::new()
                .with("index", i as i32)
                .with("strength", rng.range(0.0, 1.0) as f32);
            EventCapture::new(t, names[i % names.len()], metadata)
        })
        .collect()
}

pub fn sample_enum(times: &[f64]) -> EnumCollection {
    let members = vec!["Idle".to_string(), "Walk".to_string(), "Run".to_string()];
    let captures = times
        .iter()
        .enumerate()
        .map(|(i, &t)| EnumCapture::new(t, (i * 7) % members.len()))
        .collect();
    EnumCollection::new("Gait", members, captures)
}

pub fn sample_floats(rng: &mut XorShift, times: &[f64]) -> Vec<FloatCapture> {
    times
        .iter()
        .map(|&t| FloatCapture::new(t, rng.range(-1000.0, 1000.0)))
        .collect()
}

// ============================================================================
// Round Trips
// ============================================================================

/// Write with `encoders`, then read back with the default encoders plus any
/// extension the caller registers through `reader_encoders`.
pub fn round_trip_with(
    recording: &Recording,
    writer_encoders: Vec<Encoder>,
    reader_encoders: Vec<Encoder>,
) -> Recording {
    let mut writer = RecordingWriter::new(writer_encoders, Vec::new()).unwrap();
    writer.write(recording).unwrap();
    let bytes = writer.into_inner();
    RecordingReader::new(reader_encoders, bytes.as_slice())
        .unwrap()
        .read()
        .unwrap()
}

pub fn round_trip(recording: &Recording) -> Recording {
    let mut writer = RecordingWriter::with_default_encoders(Vec::new());
    writer.write(recording).unwrap();
    let bytes = writer.into_inner();
    RecordingReader::with_default_encoders(bytes.as_slice())
        .read()
        .unwrap()
}

// ============================================================================
// Assertions
// ============================================================================

pub fn assert_close(actual: f64, expected: f64, tolerance: f64, what: &str) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "{what}: {actual} differs from {expected} by more than {tolerance}"
    );
}

pub fn assert_vector_close(actual: Vector3, expected: Vector3, tolerance: f64, what: &str) {
    assert_close(actual.x, expected.x, tolerance, what);
    assert_close(actual.y, expected.y, tolerance, what);
    assert_close(actual.z, expected.z, tolerance, what);
}

/// Smallest distance between two angles in degrees.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

pub fn assert_angles_close(actual: Vector3, expected: Vector3, tolerance: f64, what: &str) {
    for (a, e) in [
        (actual.x, expected.x),
        (actual.y, expected.y),
        (actual.z, expected.z),
    ] {
        assert!(
            angular_distance(a, e) <= tolerance,
            "{what}: angle {a} differs from {e} by more than {tolerance}"
        );
    }
}

// ============================================================================
// Temporary Files
// ============================================================================

/// Directory removed when dropped.
pub struct TempDir(pub PathBuf);

impl TempDir {
    pub fn new(label: &str) -> Self {
        let random = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .subsec_nanos();
        let dir = std::env::temp_dir().join(format!(
            "rapcodec_{}_{}_{}",
            label,
            std::process::id(),
            random
        ));
        fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}
