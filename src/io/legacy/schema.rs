// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Protobuf messages of the version 1 format.

use std::collections::HashMap;

/// Root of a version 1 file.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Recording {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, repeated, tag = "2")]
    pub subjects: Vec<SubjectRecording>,
    #[prost(message, repeated, tag = "3")]
    pub custom_events: Vec<CustomEventCapture>,
    #[prost(map = "string, string", tag = "4")]
    pub metadata: HashMap<String, String>,
}

/// One tracked subject.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SubjectRecording {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(message, repeated, tag = "3")]
    pub captured_positions: Vec<VectorCapture>,
    #[prost(message, repeated, tag = "4")]
    pub captured_rotations: Vec<VectorCapture>,
    #[prost(message, repeated, tag = "5")]
    pub lifecycle_events: Vec<LifeCycleEventCapture>,
    #[prost(message, repeated, tag = "6")]
    pub custom_events: Vec<CustomEventCapture>,
    #[prost(map = "string, string", tag = "7")]
    pub metadata: HashMap<String, String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VectorCapture {
    #[prost(float, tag = "1")]
    pub time: f32,
    #[prost(float, tag = "2")]
    pub x: f32,
    #[prost(float, tag = "3")]
    pub y: f32,
    #[prost(float, tag = "4")]
    pub z: f32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomEventCapture {
    #[prost(float, tag = "1")]
    pub time: f32,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub contents: String,
    #[prost(map = "string, string", tag = "4")]
    pub metadata: HashMap<String, String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LifeCycleEventCapture {
    #[prost(float, tag = "1")]
    pub time: f32,
    #[prost(enumeration = "LifeCycleEvent", tag = "2")]
    pub r#type: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum LifeCycleEvent {
    Start = 0,
    Enable = 1,
    Disable = 2,
    Destroy = 3,
}

impl LifeCycleEvent {
    /// Enumerator names, indexed by value.
    pub const NAMES: [&'static str; 4] = ["START", "ENABLE", "DISABLE", "DESTROY"];

    pub fn as_str_name(&self) -> &'static str {
        Self::NAMES[*self as usize]
    }
}
