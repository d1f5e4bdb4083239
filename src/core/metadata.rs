// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Typed metadata attached to recordings, events and binaries.
//!
//! A [`Metadata`] block maps unique string keys to [`Property`] values.
//! Properties form a closed set of tagged values; every tag has a stable
//! numeric type code used on the wire (see [`Property::type_code`]).

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::vector::{Matrix3x3, Matrix4x4, Quaternion, Vector2, Vector3};

/// Property type codes as written to the wire.
pub mod codes {
    pub const STRING: u8 = 0;
    pub const INT32: u8 = 1;
    pub const FLOAT32: u8 = 2;
    pub const BOOL_TRUE: u8 = 3;
    pub const BOOL_FALSE: u8 = 4;
    pub const BYTE: u8 = 5;
    pub const VECTOR2: u8 = 6;
    pub const VECTOR3: u8 = 7;
    pub const QUATERNION: u8 = 8;
    pub const MATRIX3X3: u8 = 9;
    pub const MATRIX4X4: u8 = 10;
    pub const METADATA: u8 = 11;
    pub const TIME: u8 = 12;

    /// Offset added to a base code to mark an array of that base.
    pub const ARRAY_OFFSET: u8 = 13;
    /// Highest valid array code.
    pub const MAX_ARRAY: u8 = ARRAY_OFFSET + TIME;

    /// Legacy code that carries a raw length-prefixed byte buffer.
    pub const LEGACY_BYTE_BLOB: u8 = ARRAY_OFFSET + BOOL_TRUE;
    pub const BOOL_ARRAY: u8 = ARRAY_OFFSET + BOOL_FALSE;
    pub const BYTE_ARRAY: u8 = ARRAY_OFFSET + BYTE;
}

/// A single typed metadata value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Property {
    String(String),
    Int32(i32),
    Float32(f32),
    Bool(bool),
    Byte(u8),
    Vector2(Vector2),
    Vector3(Vector3),
    Quaternion(Quaternion),
    Matrix3x3(Matrix3x3),
    Matrix4x4(Matrix4x4),
    Metadata(Metadata),
    /// Nanoseconds since the Unix epoch
    Time(i64),

    StringArray(Vec<String>),
    Int32Array(Vec<i32>),
    Float32Array(Vec<f32>),
    BoolArray(Vec<bool>),
    ByteArray(Vec<u8>),
    Vector2Array(Vec<Vector2>),
    Vector3Array(Vec<Vector3>),
    QuaternionArray(Vec<Quaternion>),
    Matrix3x3Array(Vec<Matrix3x3>),
    Matrix4x4Array(Vec<Matrix4x4>),
    MetadataArray(Vec<Metadata>),
    TimeArray(Vec<i64>),
}

impl Property {
    /// Wire type code for this value.
    ///
    /// Booleans encode their value in the code itself. Byte arrays use the
    /// array-of-byte code; the legacy blob code is never produced. Boolean
    /// arrays only keep their own code when every element is `false`.
    pub fn type_code(&self) -> u8 {
        use codes::*;
        match self {
            Property::String(_) => STRING,
            Property::Int32(_) => INT32,
            Property::Float32(_) => FLOAT32,
            Property::Bool(true) => BOOL_TRUE,
            Property::Bool(false) => BOOL_FALSE,
            Property::Byte(_) => BYTE,
            Property::Vector2(_) => VECTOR2,
            Property::Vector3(_) => VECTOR3,
            Property::Quaternion(_) => QUATERNION,
            Property::Matrix3x3(_) => MATRIX3X3,
            Property::Matrix4x4(_) => MATRIX4X4,
            Property::Metadata(_) => METADATA,
            Property::Time(_) => TIME,
            Property::StringArray(_) => ARRAY_OFFSET + STRING,
            Property::Int32Array(_) => ARRAY_OFFSET + INT32,
            Property::Float32Array(_) => ARRAY_OFFSET + FLOAT32,
            Property::BoolArray(items) if items.iter().any(|b| *b) => BYTE_ARRAY,
            Property::BoolArray(_) => BOOL_ARRAY,
            Property::ByteArray(_) => BYTE_ARRAY,
            Property::Vector2Array(_) => ARRAY_OFFSET + VECTOR2,
            Property::Vector3Array(_) => ARRAY_OFFSET + VECTOR3,
            Property::QuaternionArray(_) => ARRAY_OFFSET + QUATERNION,
            Property::Matrix3x3Array(_) => ARRAY_OFFSET + MATRIX3X3,
            Property::Matrix4x4Array(_) => ARRAY_OFFSET + MATRIX4X4,
            Property::MetadataArray(_) => ARRAY_OFFSET + METADATA,
            Property::TimeArray(_) => ARRAY_OFFSET + TIME,
        }
    }

    /// Human readable type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Property::String(_) => "string",
            Property::Int32(_) => "int32",
            Property::Float32(_) => "float32",
            Property::Bool(_) => "bool",
            Property::Byte(_) => "byte",
            Property::Vector2(_) => "vector2",
            Property::Vector3(_) => "vector3",
            Property::Quaternion(_) => "quaternion",
            Property::Matrix3x3(_) => "matrix3x3",
            Property::Matrix4x4(_) => "matrix4x4",
            Property::Metadata(_) => "metadata",
            Property::Time(_) => "time",
            Property::StringArray(_) => "string[]",
            Property::Int32Array(_) => "int32[]",
            Property::Float32Array(_) => "float32[]",
            Property::BoolArray(_) => "bool[]",
            Property::ByteArray(_) => "byte[]",
            Property::Vector2Array(_) => "vector2[]",
            Property::Vector3Array(_) => "vector3[]",
            Property::QuaternionArray(_) => "quaternion[]",
            Property::Matrix3x3Array(_) => "matrix3x3[]",
            Property::Matrix4x4Array(_) => "matrix4x4[]",
            Property::MetadataArray(_) => "metadata[]",
            Property::TimeArray(_) => "time[]",
        }
    }

    /// Whether this value is one of the array variants.
    pub fn is_array(&self) -> bool {
        self.type_code() >= codes::ARRAY_OFFSET
    }

    /// Try to get the inner string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Property::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the inner boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Property::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to convert a scalar numeric value to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Property::Int32(v) => Some(*v as f64),
            Property::Float32(v) => Some(*v as f64),
            Property::Byte(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get the nested block.
    pub fn as_metadata(&self) -> Option<&Metadata> {
        match self {
            Property::Metadata(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::String(v) => write!(f, "{v}"),
            Property::Int32(v) => write!(f, "{v}"),
            Property::Float32(v) => write!(f, "{v}"),
            Property::Bool(v) => write!(f, "{v}"),
            Property::Byte(v) => write!(f, "{v}"),
            Property::Vector2(v) => write!(f, "({}, {})", v.x, v.y),
            Property::Vector3(v) => write!(f, "({}, {}, {})", v.x, v.y, v.z),
            Property::Quaternion(v) => write!(f, "({}, {}, {}, {})", v.x, v.y, v.z, v.w),
            Property::Matrix3x3(m) => write!(f, "{:?}", m.0),
            Property::Matrix4x4(m) => write!(f, "{:?}", m.0),
            Property::Metadata(m) => write!(f, "{{{} keys}}", m.len()),
            Property::Time(ns) => write!(f, "{ns}ns"),
            other => write!(f, "{}", other.type_name()),
        }
    }
}

impl From<&str> for Property {
    fn from(value: &str) -> Self {
        Property::String(value.to_string())
    }
}

impl From<String> for Property {
    fn from(value: String) -> Self {
        Property::String(value)
    }
}

impl From<i32> for Property {
    fn from(value: i32) -> Self {
        Property::Int32(value)
    }
}

impl From<f32> for Property {
    fn from(value: f32) -> Self {
        Property::Float32(value)
    }
}

impl From<bool> for Property {
    fn from(value: bool) -> Self {
        Property::Bool(value)
    }
}

impl From<u8> for Property {
    fn from(value: u8) -> Self {
        Property::Byte(value)
    }
}

impl From<Vector3> for Property {
    fn from(value: Vector3) -> Self {
        Property::Vector3(value)
    }
}

impl From<Metadata> for Property {
    fn from(value: Metadata) -> Self {
        Property::Metadata(value)
    }
}

/// Mapping from unique string keys to properties.
///
/// Iteration is in key order, which makes encoding deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: BTreeMap<String, Property>,
}

impl Metadata {
    /// Create an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value under that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Property>) -> Option<Property> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Property>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Property> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Property>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (k, v) in iter {
            metadata.insert(k, v);
        }
        metadata
    }
}
