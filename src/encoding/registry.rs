// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encoder registry.
//!
//! Holds the encoders a writer or reader was configured with, in
//! registration order. Writers use it to pick an encoder per collection;
//! readers use it to map the signatures listed in a file header back to
//! encoders able to decode them.
//!
//! # Example
//!
//! ```
//! use rapcodec::encoding::{default_encoders, EncoderRegistry};
//!
//! let registry = EncoderRegistry::new(default_encoders()).unwrap();
//! assert!(registry.resolve("recolude.position", 1).is_ok());
//! ```

use std::collections::HashMap;

use super::codec::{default_encoders, ChannelCodec, Encoder};
use crate::core::{CaptureCollection, RapError, Result};

/// Ordered set of encoders with unique signatures.
#[derive(Debug)]
pub struct EncoderRegistry {
    encoders: Vec<Encoder>,
    by_signature: HashMap<String, usize>,
}

impl EncoderRegistry {
    /// Build a registry.
    ///
    /// # Errors
    ///
    /// Returns a policy error if two encoders claim the same signature.
    pub fn new(encoders: Vec<Encoder>) -> Result<Self> {
        let mut by_signature = HashMap::with_capacity(encoders.len());
        for (index, encoder) in encoders.iter().enumerate() {
            let signature = encoder.signature().to_string();
            if by_signature.insert(signature, index).is_some() {
                return Err(RapError::policy(format!(
                    "more than one encoder registered for signature {}",
                    encoder.signature()
                )));
            }
        }
        Ok(Self {
            encoders,
            by_signature,
        })
    }

    /// Registered encoders, in registration order.
    pub fn encoders(&self) -> &[Encoder] {
        &self.encoders
    }

    pub fn get(&self, index: usize) -> Option<&Encoder> {
        self.encoders.get(index)
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    /// Signatures in registration order.
    pub fn signatures(&self) -> Vec<&str> {
        self.encoders.iter().map(|e| e.signature()).collect()
    }

    /// Index of the first encoder accepting `collection`.
    ///
    /// # Errors
    ///
    /// Returns a policy error if no encoder accepts it.
    pub fn select(&self, collection: &CaptureCollection) -> Result<usize> {
        self.encoders
            .iter()
            .position(|e| e.accepts(collection))
            .ok_or_else(|| RapError::no_encoder_for_stream(collection.signature()))
    }

    /// Index of the encoder for a signature found in a file.
    ///
    /// # Errors
    ///
    /// Returns a registry error if nothing is registered for `signature` or
    /// the registered encoder is older than `version`.
    pub fn resolve(&self, signature: &str, version: u32) -> Result<usize> {
        let index = *self
            .by_signature
            .get(signature)
            .ok_or_else(|| RapError::no_registered_encoder(signature))?;
        let have = self.encoders[index].version();
        if have < version {
            return Err(RapError::encoder_behind(signature, have, version));
        }
        Ok(index)
    }
}

impl Default for EncoderRegistry {
    /// Registry over [`default_encoders`], whose signatures are distinct.
    fn default() -> Self {
        let encoders = default_encoders();
        let by_signature = encoders
            .iter()
            .enumerate()
            .map(|(index, e)| (e.signature().to_string(), index))
            .collect();
        Self {
            encoders,
            by_signature,
        }
    }
}
