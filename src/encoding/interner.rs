// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dense string interning in first-seen order.

use std::collections::HashMap;

/// Assigns each distinct string the next free index, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    indices: HashMap<String, usize>,
    values: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `value`, assigning a new one if unseen.
    pub fn intern(&mut self, value: &str) -> usize {
        if let Some(&index) = self.indices.get(value) {
            return index;
        }
        let index = self.values.len();
        self.indices.insert(value.to_string(), index);
        self.values.push(value.to_string());
        index
    }

    /// Index of an already interned value.
    pub fn get(&self, value: &str) -> Option<usize> {
        self.indices.get(value).copied()
    }

    /// Interned strings, ordered by index.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<String> {
        self.values
    }
}
