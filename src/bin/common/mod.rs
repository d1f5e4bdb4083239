// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::path::Path;

use anyhow::{bail, Context};
use serde_json::{json, Map, Value};

use rapcodec::io::{detect_file_version, load_file, FileVersion};
use rapcodec::{Metadata, Property, Recording};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(seconds: f64) -> String {
    let nanos = (seconds.max(0.0) * 1e9).round() as u64;
    let secs = nanos / 1_000_000_000;
    let millis = (nanos % 1_000_000_000) / 1_000_000;

    if secs >= 3600 {
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        format!("{}h {}m", hours, minutes)
    } else if secs >= 60 {
        let minutes = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}m {}s", minutes, remaining_secs)
    } else if secs > 0 {
        format!("{}.{:03}s", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}

/// Format a timestamp in nanoseconds since the Unix epoch.
pub fn format_timestamp(nanos: i64) -> String {
    let secs = nanos.div_euclid(1_000_000_000);
    let sub = nanos.rem_euclid(1_000_000_000) as u32;
    match chrono::DateTime::<chrono::Utc>::from_timestamp(secs, sub) {
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        None => format!("{} ns", nanos),
    }
}

/// Load a recording, reporting unsupported versions before decoding.
pub fn open_recording(path: &Path) -> Result<(FileVersion, Recording)> {
    let version = detect_file_version(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    if !version.is_supported() {
        bail!("{}: unsupported file version {}", path.display(), version);
    }
    let recording =
        load_file(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok((version, recording))
}

/// Metadata as a JSON object, with times rendered as UTC timestamps.
pub fn metadata_to_json(metadata: &Metadata) -> Value {
    let mut map = Map::new();
    for (key, property) in metadata.iter() {
        map.insert(key.to_string(), property_to_json(property));
    }
    Value::Object(map)
}

pub fn property_to_json(property: &Property) -> Value {
    match property {
        Property::Time(ns) => json!(format_timestamp(*ns)),
        Property::TimeArray(items) => {
            json!(items.iter().map(|ns| format_timestamp(*ns)).collect::<Vec<_>>())
        }
        Property::Metadata(m) => metadata_to_json(m),
        Property::MetadataArray(items) => Value::Array(items.iter().map(metadata_to_json).collect()),
        Property::ByteArray(bytes) => json!(hex::encode(bytes)),
        other => untagged(other),
    }
}

/// Serialize a property without its variant tag.
fn untagged(property: &Property) -> Value {
    match serde_json::to_value(property) {
        Ok(Value::Object(map)) if map.len() == 1 => {
            map.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null)
        }
        Ok(value) => value,
        Err(_) => Value::Null,
    }
}
