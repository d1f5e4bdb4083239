// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Byte-level primitives shared by every codec.
//!
//! - Unsigned LEB128 varints (at most 10 bytes)
//! - Length-prefixed byte arrays and UTF-8 strings
//! - Count-prefixed string and varint arrays
//!
//! Fixed-width scalars are little-endian and go through `byteorder`.
//! Reading is exposed as the [`RapRead`] extension trait over any
//! [`std::io::Read`], writing as [`RapWrite`] over any [`std::io::Write`].

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::core::vector::Vector3;
use crate::core::{RapError, Result};

/// Maximum encoded length of a 64-bit varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Extension methods for reading wire primitives.
pub trait RapRead: Read {
    /// Read an unsigned LEB128 varint.
    fn read_uvarint(&mut self) -> Result<u64> {
        let mut value = 0u64;
        let mut shift = 0u32;
        for i in 0..MAX_VARINT_LEN {
            let byte = self.read_u8()?;
            if byte < 0x80 {
                if i == MAX_VARINT_LEN - 1 && byte > 1 {
                    return Err(RapError::varint_overflow());
                }
                return Ok(value | (u64::from(byte) << shift));
            }
            value |= u64::from(byte & 0x7f) << shift;
            shift += 7;
        }
        Err(RapError::varint_overflow())
    }

    /// Read a varint that is used as a length or count.
    fn read_len(&mut self) -> Result<usize> {
        let value = self.read_uvarint()?;
        usize::try_from(value)
            .map_err(|_| RapError::format(format!("length {value} does not fit in memory")))
    }

    /// Read a `varint(len) ‖ bytes` array.
    fn read_byte_array(&mut self) -> Result<Vec<u8>> {
        let len = self.read_len()?;
        self.read_exact_vec(len)
    }

    /// Read exactly `len` bytes into a new buffer.
    fn read_exact_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let read = Read::take(&mut *self, len as u64).read_to_end(&mut buf)?;
        if read != len {
            return Err(RapError::unexpected_eof(format!(
                "expected {len} bytes, found {read}"
            )));
        }
        Ok(buf)
    }

    /// Read a `varint(len) ‖ utf8` string.
    fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_byte_array()?;
        String::from_utf8(bytes).map_err(|e| RapError::format(format!("invalid UTF-8 string: {e}")))
    }

    /// Read a `varint(count) ‖ string…` array.
    fn read_string_array(&mut self) -> Result<Vec<String>> {
        let count = self.read_len()?;
        let mut out = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            out.push(self.read_string()?);
        }
        Ok(out)
    }

    /// Read a `varint(count) ‖ varint…` array.
    fn read_uvarint_array(&mut self) -> Result<Vec<u64>> {
        let count = self.read_len()?;
        let mut out = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            out.push(self.read_uvarint()?);
        }
        Ok(out)
    }

    fn read_f32_le(&mut self) -> Result<f32> {
        Ok(self.read_f32::<LittleEndian>()?)
    }

    fn read_f64_le(&mut self) -> Result<f64> {
        Ok(self.read_f64::<LittleEndian>()?)
    }

    /// Read three `f32` components, widened to `f64`.
    fn read_vector3_f32(&mut self) -> Result<Vector3> {
        let x = self.read_f32_le()? as f64;
        let y = self.read_f32_le()? as f64;
        let z = self.read_f32_le()? as f64;
        Ok(Vector3::new(x, y, z))
    }

    /// Read three `f64` components.
    fn read_vector3_f64(&mut self) -> Result<Vector3> {
        let x = self.read_f64_le()?;
        let y = self.read_f64_le()?;
        let z = self.read_f64_le()?;
        Ok(Vector3::new(x, y, z))
    }
}

impl<R: Read + ?Sized> RapRead for R {}

/// Extension methods for writing wire primitives.
pub trait RapWrite: Write {
    /// Write an unsigned LEB128 varint, returning the number of bytes written.
    fn write_uvarint(&mut self, mut value: u64) -> Result<usize> {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let mut i = 0;
        while value >= 0x80 {
            buf[i] = (value as u8) | 0x80;
            value >>= 7;
            i += 1;
        }
        buf[i] = value as u8;
        self.write_all(&buf[..=i])?;
        Ok(i + 1)
    }

    /// Write a length or count.
    fn write_len(&mut self, len: usize) -> Result<usize> {
        self.write_uvarint(len as u64)
    }

    /// Write a `varint(len) ‖ bytes` array.
    fn write_byte_array(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_len(bytes.len())?;
        self.write_all(bytes)?;
        Ok(())
    }

    /// Write a `varint(len) ‖ utf8` string.
    fn write_string(&mut self, s: &str) -> Result<()> {
        self.write_byte_array(s.as_bytes())
    }

    /// Write a `varint(count) ‖ string…` array.
    fn write_string_array<S: AsRef<str>>(&mut self, strings: &[S]) -> Result<()> {
        self.write_len(strings.len())?;
        for s in strings {
            self.write_string(s.as_ref())?;
        }
        Ok(())
    }

    /// Write a `varint(count) ‖ varint…` array.
    fn write_uvarint_array(&mut self, values: &[u64]) -> Result<()> {
        self.write_len(values.len())?;
        for &v in values {
            self.write_uvarint(v)?;
        }
        Ok(())
    }

    fn write_f32_le(&mut self, value: f32) -> Result<()> {
        Ok(self.write_f32::<LittleEndian>(value)?)
    }

    fn write_f64_le(&mut self, value: f64) -> Result<()> {
        Ok(self.write_f64::<LittleEndian>(value)?)
    }

    /// Write three components narrowed to `f32`.
    fn write_vector3_f32(&mut self, v: Vector3) -> Result<()> {
        self.write_f32_le(v.x as f32)?;
        self.write_f32_le(v.y as f32)?;
        self.write_f32_le(v.z as f32)
    }

    /// Write three `f64` components.
    fn write_vector3_f64(&mut self, v: Vector3) -> Result<()> {
        self.write_f64_le(v.x)?;
        self.write_f64_le(v.y)?;
        self.write_f64_le(v.z)
    }
}

impl<W: Write + ?Sized> RapWrite for W {}

/// Encode a varint into a fresh buffer.
pub fn uvarint_to_bytes(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_LEN);
    // Writing to a Vec cannot fail.
    let _ = out.write_uvarint(value);
    out
}

/// Length-prefix a byte slice.
pub fn bytes_array_to_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = uvarint_to_bytes(bytes.len() as u64);
    out.extend_from_slice(bytes);
    out
}
