// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for rapcodec.
//!
//! Every fallible operation in the crate returns [`RapError`], which falls
//! into one of five kinds:
//! - I/O failures and short reads
//! - Malformed data (unknown version, tag, technique, varint overflow)
//! - Encoder registry failures (missing or outdated encoders)
//! - Policy violations (nil recording, unhandled stream, duplicate keys)
//! - Validation rule violations

use thiserror::Error;

/// Coarse classification of a [`RapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Underlying reader/writer failure or short read
    Io,
    /// Data that does not follow the file format
    Format,
    /// Missing or too-old encoder
    Registry,
    /// Input rejected by a writer or decoder policy
    Policy,
    /// A validation rule was violated
    Validation,
}

impl ErrorKind {
    /// Lowercase name used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Io => "io",
            ErrorKind::Format => "format",
            ErrorKind::Registry => "registry",
            ErrorKind::Policy => "policy",
            ErrorKind::Validation => "validation",
        }
    }
}

/// Errors that can occur while encoding, decoding or validating recordings.
#[derive(Debug, Error)]
pub enum RapError {
    /// Underlying reader/writer failure or short read
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Malformed or unrecognized data
    #[error("{message}")]
    Format {
        /// Stable, user-visible message
        message: String,
    },

    /// Encoder registry failure
    #[error("{message}")]
    Registry {
        /// Stable, user-visible message
        message: String,
    },

    /// Policy violation
    #[error("{message}")]
    Policy {
        /// Stable, user-visible message
        message: String,
    },

    /// Validation rule violation
    #[error("{message}")]
    Validation {
        /// Stable, user-visible message
        message: String,
    },
}

impl RapError {
    /// Create a format error.
    pub fn format(message: impl Into<String>) -> Self {
        RapError::Format {
            message: message.into(),
        }
    }

    /// Create a registry error.
    pub fn registry(message: impl Into<String>) -> Self {
        RapError::Registry {
            message: message.into(),
        }
    }

    /// Create a policy error.
    pub fn policy(message: impl Into<String>) -> Self {
        RapError::Policy {
            message: message.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        RapError::Validation {
            message: message.into(),
        }
    }

    /// Create an I/O error for a read that ran out of bytes.
    pub fn unexpected_eof(context: impl Into<String>) -> Self {
        RapError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            context.into(),
        ))
    }

    /// The first byte of a file named a version this crate does not know.
    pub fn unrecognized_version(version: u8) -> Self {
        Self::format(format!("Unrecognized file version: {version}"))
    }

    /// A registered encoder is older than the one that wrote the file.
    pub fn encoder_behind(signature: &str, have: u32, want: u32) -> Self {
        Self::registry(format!(
            "registered encoder ({signature}) version is behind what is found in recording: {have} < {want}"
        ))
    }

    /// The file references an encoder signature nobody registered.
    pub fn no_registered_encoder(signature: &str) -> Self {
        Self::registry(format!("no registered encoder has signature {signature}"))
    }

    /// No registered encoder accepts a collection handed to the writer.
    pub fn no_encoder_for_stream(signature: &str) -> Self {
        Self::policy(format!("no encoder registered to handle stream: {signature}"))
    }

    /// The writer was given no recording.
    pub fn nil_recording() -> Self {
        Self::policy("can not write nil recording")
    }

    /// A duplicate key was found in a metadata block.
    pub fn duplicate_key(key: &str) -> Self {
        Self::policy(format!("duplicate metadata key: {key}"))
    }

    /// Unknown metadata property type code.
    pub fn unknown_property_code(code: u8) -> Self {
        Self::format(format!("unrecognized property type code: {code}"))
    }

    /// Unknown time storage technique.
    pub fn unknown_time_encoding(code: u8) -> Self {
        Self::format(format!("unrecognized time encoding: {code}"))
    }

    /// Unknown position storage technique.
    pub fn unknown_position_technique(code: u8) -> Self {
        Self::format(format!("unknown positional encoding technique: {code}"))
    }

    /// Unknown euler storage technique.
    pub fn unknown_euler_technique(code: u8) -> Self {
        Self::format(format!("unknown euler encoding technique: {code}"))
    }

    /// LEB128 varint did not terminate within ten bytes.
    pub fn varint_overflow() -> Self {
        Self::format("varint overflows a 64-bit integer")
    }

    /// Get the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RapError::Io(_) => ErrorKind::Io,
            RapError::Format { .. } => ErrorKind::Format,
            RapError::Registry { .. } => ErrorKind::Registry,
            RapError::Policy { .. } => ErrorKind::Policy,
            RapError::Validation { .. } => ErrorKind::Validation,
        }
    }

    /// Whether this error was caused by running out of input.
    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self, RapError::Io(err) if err.kind() == std::io::ErrorKind::UnexpectedEof)
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("kind", self.kind().as_str().to_string())];
        match self {
            RapError::Io(err) => {
                fields.push(("io_kind", format!("{:?}", err.kind())));
                fields.push(("message", err.to_string()));
            }
            RapError::Format { message }
            | RapError::Registry { message }
            | RapError::Policy { message }
            | RapError::Validation { message } => fields.push(("message", message.clone())),
        }
        fields
    }
}

impl From<prost::DecodeError> for RapError {
    fn from(err: prost::DecodeError) -> Self {
        RapError::format(format!("malformed v1 protobuf payload: {err}"))
    }
}

/// Result type for rapcodec operations.
pub type Result<T> = std::result::Result<T, RapError>;
