// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Metadata property codec.
//!
//! A property is written as `u8 code ‖ payload`. Booleans carry their value
//! in the code and have no payload. Arrays (codes 13..=25) are written as
//! `varint(count)` followed by the element payloads of the base type
//! `code - 13`, with no per-element tag. Nested blocks are written as
//! `stringArray(keys)` followed by one `code ‖ payload` per key.
//!
//! The boolean array codes have no element payload. Code 17 is `n` false
//! values and nothing more. Code 16 is read as a raw length-prefixed byte
//! buffer and never written. A boolean array holding any `true` is written
//! as a byte array of `0`/`1` values and reads back as [`Property::ByteArray`].

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::primitives::{RapRead, RapWrite};
use crate::core::metadata::codes;
use crate::core::vector::{Matrix3x3, Matrix4x4, Quaternion, Vector2};
use crate::core::{Metadata, Property, RapError, Result};

/// Largest count accepted for code 17, which has no payload to run out of.
const MAX_FALSE_ARRAY: usize = 1 << 24;

/// Write `code ‖ payload`.
pub fn write_property<W: Write + ?Sized>(w: &mut W, property: &Property) -> Result<()> {
    w.write_u8(property.type_code())?;
    write_payload(w, property)
}

/// Write only the payload of a property.
pub fn write_payload<W: Write + ?Sized>(w: &mut W, property: &Property) -> Result<()> {
    match property {
        Property::String(s) => w.write_string(s),
        Property::Int32(v) => Ok(w.write_i32::<LittleEndian>(*v)?),
        Property::Float32(v) => w.write_f32_le(*v),
        Property::Bool(_) => Ok(()),
        Property::Byte(v) => Ok(w.write_u8(*v)?),
        Property::Vector2(v) => write_vector2(w, v),
        Property::Vector3(v) => w.write_vector3_f64(*v),
        Property::Quaternion(q) => write_quaternion(w, q),
        Property::Matrix3x3(m) => write_f64s(w, &m.0),
        Property::Matrix4x4(m) => write_f64s(w, &m.0),
        Property::Metadata(m) => write_block(w, m),
        Property::Time(ns) => Ok(w.write_i64::<LittleEndian>(*ns)?),

        Property::StringArray(items) => {
            w.write_len(items.len())?;
            items.iter().try_for_each(|s| w.write_string(s))
        }
        Property::Int32Array(items) => {
            w.write_len(items.len())?;
            for v in items {
                w.write_i32::<LittleEndian>(*v)?;
            }
            Ok(())
        }
        Property::Float32Array(items) => {
            w.write_len(items.len())?;
            items.iter().try_for_each(|v| w.write_f32_le(*v))
        }
        Property::BoolArray(items) => {
            w.write_len(items.len())?;
            if items.iter().any(|b| *b) {
                for b in items {
                    w.write_u8(u8::from(*b))?;
                }
            }
            Ok(())
        }
        Property::ByteArray(bytes) => w.write_byte_array(bytes),
        Property::Vector2Array(items) => {
            w.write_len(items.len())?;
            items.iter().try_for_each(|v| write_vector2(w, v))
        }
        Property::Vector3Array(items) => {
            w.write_len(items.len())?;
            items.iter().try_for_each(|v| w.write_vector3_f64(*v))
        }
        Property::QuaternionArray(items) => {
            w.write_len(items.len())?;
            items.iter().try_for_each(|q| write_quaternion(w, q))
        }
        Property::Matrix3x3Array(items) => {
            w.write_len(items.len())?;
            items.iter().try_for_each(|m| write_f64s(w, &m.0))
        }
        Property::Matrix4x4Array(items) => {
            w.write_len(items.len())?;
            items.iter().try_for_each(|m| write_f64s(w, &m.0))
        }
        Property::MetadataArray(items) => {
            w.write_len(items.len())?;
            items.iter().try_for_each(|m| write_block(w, m))
        }
        Property::TimeArray(items) => {
            w.write_len(items.len())?;
            for ns in items {
                w.write_i64::<LittleEndian>(*ns)?;
            }
            Ok(())
        }
    }
}

/// Write a nested block: `stringArray(keys)` then `code ‖ payload` per key.
pub fn write_block<W: Write + ?Sized>(w: &mut W, metadata: &Metadata) -> Result<()> {
    let keys: Vec<&str> = metadata.keys().collect();
    w.write_string_array(&keys)?;
    for (_, property) in metadata.iter() {
        write_property(w, property)?;
    }
    Ok(())
}

/// Read `code ‖ payload`.
pub fn read_property<R: Read + ?Sized>(r: &mut R) -> Result<Property> {
    let code = r.read_u8()?;
    read_value(r, code)
}

/// Read the payload for an already consumed type code.
pub fn read_value<R: Read + ?Sized>(r: &mut R, code: u8) -> Result<Property> {
    match code {
        codes::STRING => Ok(Property::String(r.read_string()?)),
        codes::INT32 => Ok(Property::Int32(r.read_i32::<LittleEndian>()?)),
        codes::FLOAT32 => Ok(Property::Float32(r.read_f32_le()?)),
        codes::BOOL_TRUE => Ok(Property::Bool(true)),
        codes::BOOL_FALSE => Ok(Property::Bool(false)),
        codes::BYTE => Ok(Property::Byte(r.read_u8()?)),
        codes::VECTOR2 => Ok(Property::Vector2(read_vector2(r)?)),
        codes::VECTOR3 => Ok(Property::Vector3(r.read_vector3_f64()?)),
        codes::QUATERNION => Ok(Property::Quaternion(read_quaternion(r)?)),
        codes::MATRIX3X3 => Ok(Property::Matrix3x3(Matrix3x3(read_f64s::<_, 9>(r)?))),
        codes::MATRIX4X4 => Ok(Property::Matrix4x4(Matrix4x4(read_f64s::<_, 16>(r)?))),
        codes::METADATA => Ok(Property::Metadata(read_block(r)?)),
        codes::TIME => Ok(Property::Time(r.read_i64::<LittleEndian>()?)),
        codes::LEGACY_BYTE_BLOB => Ok(Property::ByteArray(r.read_byte_array()?)),
        codes::BOOL_ARRAY => {
            let n = r.read_len()?;
            if n > MAX_FALSE_ARRAY {
                return Err(RapError::format(format!(
                    "boolean array of {n} elements exceeds {MAX_FALSE_ARRAY}"
                )));
            }
            Ok(Property::BoolArray(vec![false; n]))
        }
        c if (codes::ARRAY_OFFSET..=codes::MAX_ARRAY).contains(&c) => {
            read_array(r, c - codes::ARRAY_OFFSET)
        }
        c => Err(RapError::unknown_property_code(c)),
    }
}

fn read_array<R: Read + ?Sized>(r: &mut R, base: u8) -> Result<Property> {
    let n = r.read_len()?;
    let property = match base {
        codes::STRING => Property::StringArray(read_n(r, n, |r| r.read_string())?),
        codes::INT32 => {
            Property::Int32Array(read_n(r, n, |r| Ok(r.read_i32::<LittleEndian>()?))?)
        }
        codes::FLOAT32 => Property::Float32Array(read_n(r, n, |r| r.read_f32_le())?),
        codes::BYTE => Property::ByteArray(r.read_exact_vec(n)?),
        codes::VECTOR2 => Property::Vector2Array(read_n(r, n, |r| read_vector2(r))?),
        codes::VECTOR3 => Property::Vector3Array(read_n(r, n, |r| r.read_vector3_f64())?),
        codes::QUATERNION => Property::QuaternionArray(read_n(r, n, |r| read_quaternion(r))?),
        codes::MATRIX3X3 => {
            Property::Matrix3x3Array(read_n(r, n, |r| Ok(Matrix3x3(read_f64s::<_, 9>(r)?)))?)
        }
        codes::MATRIX4X4 => {
            Property::Matrix4x4Array(read_n(r, n, |r| Ok(Matrix4x4(read_f64s::<_, 16>(r)?)))?)
        }
        codes::METADATA => Property::MetadataArray(read_n(r, n, |r| read_block(r))?),
        codes::TIME => Property::TimeArray(read_n(r, n, |r| Ok(r.read_i64::<LittleEndian>()?))?),
        other => return Err(RapError::unknown_property_code(other + codes::ARRAY_OFFSET)),
    };
    Ok(property)
}

/// Read a nested block, rejecting duplicate keys.
pub fn read_block<R: Read + ?Sized>(r: &mut R) -> Result<Metadata> {
    let keys = r.read_string_array()?;
    let mut metadata = Metadata::new();
    for key in keys {
        let property = read_property(r)?;
        if metadata.contains_key(&key) {
            return Err(RapError::duplicate_key(&key));
        }
        metadata.insert(key, property);
    }
    Ok(metadata)
}

fn read_n<R, T, F>(r: &mut R, n: usize, mut read_one: F) -> Result<Vec<T>>
where
    R: Read + ?Sized,
    F: FnMut(&mut R) -> Result<T>,
{
    let mut out = Vec::with_capacity(n.min(4096));
    for _ in 0..n {
        out.push(read_one(r)?);
    }
    Ok(out)
}

fn write_vector2<W: Write + ?Sized>(w: &mut W, v: &Vector2) -> Result<()> {
    w.write_f64_le(v.x)?;
    w.write_f64_le(v.y)
}

fn read_vector2<R: Read + ?Sized>(r: &mut R) -> Result<Vector2> {
    let x = r.read_f64_le()?;
    let y = r.read_f64_le()?;
    Ok(Vector2::new(x, y))
}

fn write_quaternion<W: Write + ?Sized>(w: &mut W, q: &Quaternion) -> Result<()> {
    write_f64s(w, &[q.x, q.y, q.z, q.w])
}

fn read_quaternion<R: Read + ?Sized>(r: &mut R) -> Result<Quaternion> {
    let [x, y, z, w] = read_f64s::<_, 4>(r)?;
    Ok(Quaternion::new(x, y, z, w))
}

fn write_f64s<W: Write + ?Sized>(w: &mut W, values: &[f64]) -> Result<()> {
    values.iter().try_for_each(|v| w.write_f64_le(*v))
}

fn read_f64s<R: Read + ?Sized, const N: usize>(r: &mut R) -> Result<[f64; N]> {
    let mut out = [0.0; N];
    for v in out.iter_mut() {
        *v = r.read_f64_le()?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vector::Vector3;
    use crate::core::ErrorKind;
    use std::io::Cursor;

    fn roundtrip(p: &Property) -> Property {
        let mut buf = Vec::new();
        write_property(&mut buf, p).unwrap();
        let mut cursor = Cursor::new(buf);
        let back = read_property(&mut cursor).unwrap();
        assert_eq!(cursor.position() as usize, cursor.get_ref().len());
        back
    }

    #[test]
    fn test_scalar_properties() {
        let values = vec![
            Property::from("apple sauce"),
            Property::Int32(-42),
            Property::Float32(6.9),
            Property::Bool(true),
            Property::Bool(false),
            Property::Byte(200),
            Property::Vector2(Vector2::new(1.0, -1.0)),
            Property::Vector3(Vector3::new(1.0, 2.0, 3.0)),
            Property::Quaternion(Quaternion::new(0.0, 0.0, 0.0, 1.0)),
            Property::Matrix3x3(Matrix3x3::identity()),
            Property::Matrix4x4(Matrix4x4::identity()),
            Property::Time(1_600_000_000_123_456_789),
        ];
        for value in &values {
            assert_eq!(&roundtrip(value), value);
        }
    }

    #[test]
    fn test_booleans_have_no_payload() {
        let mut buf = Vec::new();
        write_property(&mut buf, &Property::Bool(true)).unwrap();
        write_property(&mut buf, &Property::Bool(false)).unwrap();
        assert_eq!(buf, vec![3, 4]);
    }

    #[test]
    fn test_array_properties() {
        let nested = Metadata::new().with("a", 1).with("b", "two");
        let values = vec![
            Property::StringArray(vec!["x".into(), "".into()]),
            Property::Int32Array(vec![1, -2, 3]),
            Property::Float32Array(vec![0.5, 1.5]),
            Property::BoolArray(vec![false; 3]),
            Property::BoolArray(Vec::new()),
            Property::ByteArray(vec![0, 1, 255]),
            Property::Vector2Array(vec![Vector2::new(1.0, 2.0)]),
            Property::Vector3Array(vec![Vector3::new(1.0, 2.0, 3.0); 2]),
            Property::QuaternionArray(vec![Quaternion::new(1.0, 2.0, 3.0, 4.0)]),
            Property::Matrix3x3Array(vec![Matrix3x3::identity()]),
            Property::Matrix4x4Array(vec![Matrix4x4::identity(); 3]),
            Property::MetadataArray(vec![nested.clone(), Metadata::new()]),
            Property::TimeArray(vec![0, -1, i64::MAX]),
        ];
        for value in &values {
            assert_eq!(&roundtrip(value), value);
        }
    }

    #[test]
    fn test_byte_array_never_uses_code_16() {
        let mut buf = Vec::new();
        write_property(&mut buf, &Property::ByteArray(vec![9, 8])).unwrap();
        assert_eq!(buf, vec![18, 2, 9, 8]);
    }

    #[test]
    fn test_code_17_is_false_values_without_payload() {
        let mut cursor = Cursor::new(vec![17, 2, 0, 1, b'x']);
        assert_eq!(
            read_property(&mut cursor).unwrap(),
            Property::BoolArray(vec![false, false])
        );
        assert_eq!(read_property(&mut cursor).unwrap(), Property::from("x"));
    }

    #[test]
    fn test_false_bool_array_layout() {
        let mut buf = Vec::new();
        write_property(&mut buf, &Property::BoolArray(vec![false; 4])).unwrap();
        assert_eq!(buf, vec![17, 4]);
    }

    #[test]
    fn test_mixed_bool_array_lowers_to_bytes() {
        let value = Property::BoolArray(vec![true, false, true]);
        let mut buf = Vec::new();
        write_property(&mut buf, &value).unwrap();
        assert_eq!(buf, vec![18, 3, 1, 0, 1]);
        assert_eq!(roundtrip(&value), Property::ByteArray(vec![1, 0, 1]));
    }

    #[test]
    fn test_code_16_reads_as_byte_blob() {
        let buf = vec![16, 3, 0xaa, 0xbb, 0xcc];
        let value = read_property(&mut Cursor::new(buf)).unwrap();
        assert_eq!(value, Property::ByteArray(vec![0xaa, 0xbb, 0xcc]));
    }

    #[test]
    fn test_nested_block() {
        let inner = Metadata::new().with("deep", Vector3::new(0.0, 1.0, 0.0));
        let block = Metadata::new()
            .with("criss-cross", "apple sauce")
            .with("inner", inner);
        let value = Property::Metadata(block);
        assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn test_unknown_code() {
        let err = read_property(&mut Cursor::new(vec![26])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.to_string(), "unrecognized property type code: 26");
    }

    #[test]
    fn test_duplicate_block_key() {
        let mut buf = Vec::new();
        buf.write_string_array(&["k", "k"]).unwrap();
        write_property(&mut buf, &Property::Int32(1)).unwrap();
        write_property(&mut buf, &Property::Int32(2)).unwrap();
        let err = read_block(&mut Cursor::new(buf)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Policy);
    }

    #[test]
    fn test_truncated_payload() {
        let err = read_property(&mut Cursor::new(vec![7, 0, 0, 0])).unwrap_err();
        assert!(err.is_unexpected_eof());
    }
}
