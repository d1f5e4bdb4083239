// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The recording tree.
//!
//! A [`Recording`] owns its capture collections, its binaries and its child
//! recordings. Trees are built once (by a [`RecordingBuilder`], the v1
//! upgrade path or a reader) and are not mutated by the codecs.

use serde::Serialize;

use super::collection::CaptureCollection;
use super::metadata::Metadata;

/// Named opaque payload stored inline in the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binary {
    pub name: String,
    pub data: Vec<u8>,
    pub metadata: Metadata,
}

impl Binary {
    pub fn new(name: impl Into<String>, data: Vec<u8>, metadata: Metadata) -> Self {
        Self {
            name: name.into(),
            data,
            metadata,
        }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Named payload stored outside the file, located by URI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryReference {
    pub name: String,
    pub uri: String,
    pub size: u64,
    pub metadata: Metadata,
}

impl BinaryReference {
    pub fn new(
        name: impl Into<String>,
        uri: impl Into<String>,
        size: u64,
        metadata: Metadata,
    ) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            size,
            metadata,
        }
    }
}

/// A node in the recording tree.
#[derive(Debug, Clone, Default)]
pub struct Recording {
    id: String,
    name: String,
    collections: Vec<CaptureCollection>,
    recordings: Vec<Recording>,
    metadata: Metadata,
    binaries: Vec<Binary>,
    binary_references: Vec<BinaryReference>,
}

impl Recording {
    /// Create a recording with every part given explicitly.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        collections: Vec<CaptureCollection>,
        recordings: Vec<Recording>,
        metadata: Metadata,
        binaries: Vec<Binary>,
        binary_references: Vec<BinaryReference>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            collections,
            recordings,
            metadata,
            binaries,
            binary_references,
        }
    }

    /// Start building a recording with the given name.
    pub fn builder(name: impl Into<String>) -> RecordingBuilder {
        RecordingBuilder::new(name)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collections(&self) -> &[CaptureCollection] {
        &self.collections
    }

    /// Child recordings in stored order.
    pub fn recordings(&self) -> &[Recording] {
        &self.recordings
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn binaries(&self) -> &[Binary] {
        &self.binaries
    }

    pub fn binary_references(&self) -> &[BinaryReference] {
        &self.binary_references
    }

    /// Collections of this node with the given signature.
    pub fn collections_by_signature<'a>(
        &'a self,
        signature: &'a str,
    ) -> impl Iterator<Item = &'a CaptureCollection> + 'a {
        self.collections
            .iter()
            .filter(move |c| c.signature() == signature)
    }

    /// First collection of this node with the given name.
    pub fn collection(&self, name: &str) -> Option<&CaptureCollection> {
        self.collections.iter().find(|c| c.name() == name)
    }

    /// First direct child with the given id.
    pub fn find_child(&self, id: &str) -> Option<&Recording> {
        self.recordings.iter().find(|r| r.id == id)
    }

    /// Visit this node and every descendant in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Recording)) {
        visit(self);
        for child in &self.recordings {
            child.walk(visit);
        }
    }

    /// Nodes of the tree in pre-order, starting with `self`.
    pub fn preorder(&self) -> Vec<&Recording> {
        let mut nodes = Vec::new();
        self.walk(&mut |r| nodes.push(r));
        nodes
    }

    /// Total captures across the whole tree.
    pub fn capture_count(&self) -> usize {
        let mut total = 0;
        self.walk(&mut |r| total += r.collections.iter().map(|c| c.length()).sum::<usize>());
        total
    }

    /// Earliest start and latest end across the whole tree.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        self.walk(&mut |r| {
            for c in &r.collections {
                if let (Some(s), Some(e)) = (c.start(), c.end()) {
                    range = Some(match range {
                        Some((lo, hi)) => (lo.min(s), hi.max(e)),
                        None => (s, e),
                    });
                }
            }
        });
        range
    }

    /// Span of [`time_range`](Self::time_range), or zero for an empty tree.
    pub fn duration(&self) -> f64 {
        self.time_range().map(|(s, e)| e - s).unwrap_or(0.0)
    }
}

/// Builder for [`Recording`].
///
/// A random UUID is used as the id when none is supplied.
#[derive(Debug, Default)]
pub struct RecordingBuilder {
    id: Option<String>,
    name: String,
    collections: Vec<CaptureCollection>,
    recordings: Vec<Recording>,
    metadata: Metadata,
    binaries: Vec<Binary>,
    binary_references: Vec<BinaryReference>,
}

impl RecordingBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn collection(mut self, collection: impl Into<CaptureCollection>) -> Self {
        self.collections.push(collection.into());
        self
    }

    pub fn child(mut self, recording: Recording) -> Self {
        self.recordings.push(recording);
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn binary(mut self, binary: Binary) -> Self {
        self.binaries.push(binary);
        self
    }

    pub fn binary_reference(mut self, reference: BinaryReference) -> Self {
        self.binary_references.push(reference);
        self
    }

    pub fn build(self) -> Recording {
        Recording {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: self.name,
            collections: self.collections,
            recordings: self.recordings,
            metadata: self.metadata,
            binaries: self.binaries,
            binary_references: self.binary_references,
        }
    }
}
