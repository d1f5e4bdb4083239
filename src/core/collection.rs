// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Capture collections.
//!
//! A collection is a named, ordered sequence of same-kind captures. The
//! built-in kinds are modelled as variants of [`CaptureCollection`], each
//! identified by a signature string. User-defined kinds plug in through
//! [`ExtensionCollection`].

use std::any::Any;
use std::fmt;

use serde::Serialize;

use super::capture::{
    Capture, EnumCapture, EulerZxyCapture, EventCapture, FloatCapture, PositionCapture,
};

/// Signature strings of the built-in collection kinds.
pub mod signatures {
    pub const POSITION: &str = "recolude.position";
    pub const EULER: &str = "recolude.euler";
    pub const EVENT: &str = "recolude.event";
    pub const ENUM: &str = "recolude.enum";
    pub const FLOAT: &str = "recolude.float";
}

/// Named ordered sequence of captures of one kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection<C> {
    name: String,
    captures: Vec<C>,
}

impl<C: Capture + Clone> Collection<C> {
    pub fn new(name: impl Into<String>, captures: Vec<C>) -> Self {
        Self {
            name: name.into(),
            captures,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn captures(&self) -> &[C] {
        &self.captures
    }

    /// Number of captures.
    pub fn length(&self) -> usize {
        self.captures.len()
    }

    /// Time of the first capture.
    pub fn start(&self) -> Option<f64> {
        self.captures.first().map(Capture::time)
    }

    /// Time of the last capture.
    pub fn end(&self) -> Option<f64> {
        self.captures.last().map(Capture::time)
    }

    /// Capture times in stored order.
    pub fn times(&self) -> Vec<f64> {
        self.captures.iter().map(Capture::time).collect()
    }

    /// Keep the captures whose time lies in `[begin, end)`.
    pub fn slice(&self, begin: f64, end: f64) -> Self {
        Self {
            name: self.name.clone(),
            captures: self
                .captures
                .iter()
                .filter(|c| begin <= c.time() && c.time() < end)
                .cloned()
                .collect(),
        }
    }
}

/// Enum collection: indices into a fixed list of enumerator names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumCollection {
    inner: Collection<EnumCapture>,
    members: Vec<String>,
}

impl EnumCollection {
    pub fn new(name: impl Into<String>, members: Vec<String>, captures: Vec<EnumCapture>) -> Self {
        Self {
            inner: Collection::new(name, captures),
            members,
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn captures(&self) -> &[EnumCapture] {
        self.inner.captures()
    }

    /// Enumerator names, indexed by capture value.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Enumerator name of a capture, if its value is in range.
    pub fn member_of(&self, capture: &EnumCapture) -> Option<&str> {
        self.members.get(capture.value).map(String::as_str)
    }

    pub fn slice(&self, begin: f64, end: f64) -> Self {
        Self {
            inner: self.inner.slice(begin, end),
            members: self.members.clone(),
        }
    }

    pub fn as_collection(&self) -> &Collection<EnumCapture> {
        &self.inner
    }
}

/// User-defined collection kind handled by an extension encoder.
pub trait ExtensionCollection: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn signature(&self) -> &str;

    /// Capture times in stored order.
    fn times(&self) -> Vec<f64>;

    /// Keep the captures whose time lies in `[begin, end)`.
    fn slice(&self, begin: f64, end: f64) -> Box<dyn ExtensionCollection>;

    fn box_clone(&self) -> Box<dyn ExtensionCollection>;

    /// Get a reference as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// A capture collection of any supported kind.
#[derive(Debug)]
pub enum CaptureCollection {
    Position(Collection<PositionCapture>),
    Euler(Collection<EulerZxyCapture>),
    Event(Collection<EventCapture>),
    Enum(EnumCollection),
    Float(Collection<FloatCapture>),
    Extension(Box<dyn ExtensionCollection>),
}

impl Clone for CaptureCollection {
    fn clone(&self) -> Self {
        match self {
            CaptureCollection::Position(c) => CaptureCollection::Position(c.clone()),
            CaptureCollection::Euler(c) => CaptureCollection::Euler(c.clone()),
            CaptureCollection::Event(c) => CaptureCollection::Event(c.clone()),
            CaptureCollection::Enum(c) => CaptureCollection::Enum(c.clone()),
            CaptureCollection::Float(c) => CaptureCollection::Float(c.clone()),
            CaptureCollection::Extension(c) => CaptureCollection::Extension(c.box_clone()),
        }
    }
}

impl CaptureCollection {
    pub fn name(&self) -> &str {
        match self {
            CaptureCollection::Position(c) => c.name(),
            CaptureCollection::Euler(c) => c.name(),
            CaptureCollection::Event(c) => c.name(),
            CaptureCollection::Enum(c) => c.name(),
            CaptureCollection::Float(c) => c.name(),
            CaptureCollection::Extension(c) => c.name(),
        }
    }

    /// Signature string identifying the collection kind.
    pub fn signature(&self) -> &str {
        match self {
            CaptureCollection::Position(_) => signatures::POSITION,
            CaptureCollection::Euler(_) => signatures::EULER,
            CaptureCollection::Event(_) => signatures::EVENT,
            CaptureCollection::Enum(_) => signatures::ENUM,
            CaptureCollection::Float(_) => signatures::FLOAT,
            CaptureCollection::Extension(c) => c.signature(),
        }
    }

    /// Capture times in stored order.
    pub fn times(&self) -> Vec<f64> {
        match self {
            CaptureCollection::Position(c) => c.times(),
            CaptureCollection::Euler(c) => c.times(),
            CaptureCollection::Event(c) => c.times(),
            CaptureCollection::Enum(c) => c.as_collection().times(),
            CaptureCollection::Float(c) => c.times(),
            CaptureCollection::Extension(c) => c.times(),
        }
    }

    /// Number of captures.
    pub fn length(&self) -> usize {
        match self {
            CaptureCollection::Position(c) => c.length(),
            CaptureCollection::Euler(c) => c.length(),
            CaptureCollection::Event(c) => c.length(),
            CaptureCollection::Enum(c) => c.as_collection().length(),
            CaptureCollection::Float(c) => c.length(),
            CaptureCollection::Extension(c) => c.times().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// Time of the first capture.
    pub fn start(&self) -> Option<f64> {
        self.times().first().copied()
    }

    /// Time of the last capture.
    pub fn end(&self) -> Option<f64> {
        self.times().last().copied()
    }

    /// Keep the captures whose time lies in `[begin, end)`.
    pub fn slice(&self, begin: f64, end: f64) -> CaptureCollection {
        match self {
            CaptureCollection::Position(c) => CaptureCollection::Position(c.slice(begin, end)),
            CaptureCollection::Euler(c) => CaptureCollection::Euler(c.slice(begin, end)),
            CaptureCollection::Event(c) => CaptureCollection::Event(c.slice(begin, end)),
            CaptureCollection::Enum(c) => CaptureCollection::Enum(c.slice(begin, end)),
            CaptureCollection::Float(c) => CaptureCollection::Float(c.slice(begin, end)),
            CaptureCollection::Extension(c) => CaptureCollection::Extension(c.slice(begin, end)),
        }
    }

    pub fn as_position(&self) -> Option<&Collection<PositionCapture>> {
        match self {
            CaptureCollection::Position(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_euler(&self) -> Option<&Collection<EulerZxyCapture>> {
        match self {
            CaptureCollection::Euler(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<&Collection<EventCapture>> {
        match self {
            CaptureCollection::Event(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumCollection> {
        match self {
            CaptureCollection::Enum(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&Collection<FloatCapture>> {
        match self {
            CaptureCollection::Float(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Collection<PositionCapture>> for CaptureCollection {
    fn from(c: Collection<PositionCapture>) -> Self {
        CaptureCollection::Position(c)
    }
}

impl From<Collection<EulerZxyCapture>> for CaptureCollection {
    fn from(c: Collection<EulerZxyCapture>) -> Self {
        CaptureCollection::Euler(c)
    }
}

impl From<Collection<EventCapture>> for CaptureCollection {
    fn from(c: Collection<EventCapture>) -> Self {
        CaptureCollection::Event(c)
    }
}

impl From<EnumCollection> for CaptureCollection {
    fn from(c: EnumCollection) -> Self {
        CaptureCollection::Enum(c)
    }
}

impl From<Collection<FloatCapture>> for CaptureCollection {
    fn from(c: Collection<FloatCapture>) -> Self {
        CaptureCollection::Float(c)
    }
}
