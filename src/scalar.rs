//! Byte-level transcoding of single field payloads.
//!
//! | DataType                     | WireType | Payload                          |
//! |------------------------------|----------|----------------------------------|
//! | bool, (u)int32/64            | varint   | two's-complement, no zig-zag     |
//! | sint32/64                    | varint   | zig-zag                          |
//! | float, fixed32, sfixed32     | i32      | 4 bytes little-endian            |
//! | double, fixed64, sfixed64    | i64      | 8 bytes little-endian            |
//! | string, url, bytes, identifier | len    | varint length + bytes            |
//! | structure                    | len      | varint length + nested fields    |
//! | byte                         | byte     | 1 raw octet                      |

use bytes::{Buf, BufMut};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::varint::{zigzag_decode, zigzag_encode};
use crate::wire::{ensure_remaining, get_len};
use crate::{decode, encode, DataType, DecodeError, FieldValue, Options, VarIntBuf, VarIntBufMut};

/// Returns true if `value` is the variant `put_value()` writes for `data_type`.
pub(crate) fn accepts(data_type: &DataType, value: &FieldValue) -> bool {
    matches!(
        (data_type, value),
        (DataType::Bool, FieldValue::Bool(_))
            | (
                DataType::Int32 | DataType::SInt32 | DataType::SFixed32,
                FieldValue::Int32(_)
            )
            | (
                DataType::Int64 | DataType::SInt64 | DataType::SFixed64,
                FieldValue::Int64(_)
            )
            | (DataType::UInt32 | DataType::Fixed32, FieldValue::UInt32(_))
            | (DataType::UInt64 | DataType::Fixed64, FieldValue::UInt64(_))
            | (DataType::Float, FieldValue::Float(_))
            | (DataType::Double, FieldValue::Double(_))
            | (DataType::String, FieldValue::String(_))
            | (DataType::Bytes, FieldValue::Bytes(_))
            | (DataType::Byte, FieldValue::Byte(_))
            | (DataType::Identifier, FieldValue::Identifier(_))
            | (DataType::Url, FieldValue::Url(_))
            | (DataType::Structure(_), FieldValue::Structure(_))
    )
}

/// Slices off a length-delimited payload, advancing `buf` past it.
fn get_len_delimited<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], DecodeError> {
    let len = get_len(buf)?;
    let data: &'a [u8] = *buf;
    let (payload, rest) = data.split_at(len);
    *buf = rest;
    Ok(payload)
}

fn put_len_delimited<B: BufMut>(buf: &mut B, payload: &[u8]) {
    buf.put_varint(payload.len() as u64);
    buf.put_slice(payload);
}

/// Writes the payload of `value`, without a tag.
///
/// Pairs rejected by `accepts()` write nothing.
pub(crate) fn put_value<B: BufMut>(buf: &mut B, data_type: &DataType, value: &FieldValue) {
    match (data_type, value) {
        (DataType::Bool, FieldValue::Bool(v)) => buf.put_varint(u64::from(*v)),
        (DataType::Int32, FieldValue::Int32(v)) => buf.put_varint(*v),
        (DataType::Int64, FieldValue::Int64(v)) => buf.put_varint(*v),
        (DataType::UInt32, FieldValue::UInt32(v)) => buf.put_varint(*v),
        (DataType::UInt64, FieldValue::UInt64(v)) => buf.put_varint(*v),
        (DataType::SInt32, FieldValue::Int32(v)) => buf.put_varint(zigzag_encode((*v).into())),
        (DataType::SInt64, FieldValue::Int64(v)) => buf.put_varint(zigzag_encode(*v)),
        (DataType::Fixed32, FieldValue::UInt32(v)) => buf.put_u32_le(*v),
        (DataType::SFixed32, FieldValue::Int32(v)) => buf.put_i32_le(*v),
        (DataType::Float, FieldValue::Float(v)) => buf.put_f32_le(*v),
        (DataType::Fixed64, FieldValue::UInt64(v)) => buf.put_u64_le(*v),
        (DataType::SFixed64, FieldValue::Int64(v)) => buf.put_i64_le(*v),
        (DataType::Double, FieldValue::Double(v)) => buf.put_f64_le(*v),
        (DataType::String, FieldValue::String(v)) => put_len_delimited(buf, v.as_bytes()),
        (DataType::Bytes, FieldValue::Bytes(v)) => put_len_delimited(buf, v),
        (DataType::Identifier, FieldValue::Identifier(v)) => put_len_delimited(buf, v.as_bytes()),
        (DataType::Url, FieldValue::Url(v)) => put_len_delimited(buf, v.as_str().as_bytes()),
        (DataType::Byte, FieldValue::Byte(v)) => buf.put_u8(*v),
        (DataType::Structure(schema), FieldValue::Structure(v)) => {
            let mut nested = Vec::new();
            encode::put_fields(&mut nested, schema, |n| v.get(n).map(std::borrow::Cow::Borrowed));
            put_len_delimited(buf, &nested);
        }
        _ => {}
    }
}

/// Reads one payload of `data_type` from `buf`.
///
/// The caller has already checked the tag's wire type against `data_type.wire_type()`.
/// Length-delimited payloads are consumed in full before their contents are interpreted, so a
/// payload whose content is unusable (an identifier that is not 16 bytes, an unparseable URL)
/// yields `Ok(None)` with `buf` positioned at the next tag.
pub(crate) fn get_value(
    buf: &mut &[u8],
    data_type: &DataType,
    field_number: u32,
    depth: usize,
    options: &Options,
) -> Result<Option<FieldValue>, DecodeError> {
    let value = match data_type {
        DataType::Bool => FieldValue::Bool(buf.get_varint::<u64>()? != 0),
        // Narrow types keep the low bits, as other protobuf readers do.
        DataType::Int32 => FieldValue::Int32(buf.get_varint::<u64>()? as i32),
        DataType::Int64 => FieldValue::Int64(buf.get_varint::<u64>()? as i64),
        DataType::UInt32 => FieldValue::UInt32(buf.get_varint::<u64>()? as u32),
        DataType::UInt64 => FieldValue::UInt64(buf.get_varint::<u64>()?),
        DataType::SInt32 => {
            let raw = buf.get_varint::<u64>()? as u32;
            FieldValue::Int32(zigzag_decode(raw.into()) as i32)
        }
        DataType::SInt64 => FieldValue::Int64(zigzag_decode(buf.get_varint::<u64>()?)),
        DataType::Fixed32 | DataType::SFixed32 | DataType::Float => {
            ensure_remaining(buf, 4)?;
            match data_type {
                DataType::Fixed32 => FieldValue::UInt32(buf.get_u32_le()),
                DataType::SFixed32 => FieldValue::Int32(buf.get_i32_le()),
                _ => FieldValue::Float(buf.get_f32_le()),
            }
        }
        DataType::Fixed64 | DataType::SFixed64 | DataType::Double => {
            ensure_remaining(buf, 8)?;
            match data_type {
                DataType::Fixed64 => FieldValue::UInt64(buf.get_u64_le()),
                DataType::SFixed64 => FieldValue::Int64(buf.get_i64_le()),
                _ => FieldValue::Double(buf.get_f64_le()),
            }
        }
        DataType::Byte => {
            ensure_remaining(buf, 1)?;
            FieldValue::Byte(buf.get_u8())
        }
        DataType::String => {
            FieldValue::String(String::from_utf8_lossy(get_len_delimited(buf)?).into_owned())
        }
        DataType::Bytes => FieldValue::Bytes(get_len_delimited(buf)?.to_vec()),
        DataType::Identifier => {
            let payload = get_len_delimited(buf)?;
            match <[u8; 16]>::try_from(payload) {
                Ok(b) => FieldValue::Identifier(Uuid::from_bytes(b)),
                Err(_) => {
                    debug!(
                        field_number,
                        len = payload.len(),
                        "identifier payload is not 16 bytes, skipping field"
                    );
                    return Ok(None);
                }
            }
        }
        DataType::Url => {
            let payload = get_len_delimited(buf)?;
            match Url::parse(&String::from_utf8_lossy(payload)) {
                Ok(url) => FieldValue::Url(url),
                Err(err) => {
                    debug!(field_number, %err, "malformed url, skipping field");
                    return Ok(None);
                }
            }
        }
        DataType::Structure(schema) => {
            let payload = get_len_delimited(buf)?;
            FieldValue::Structure(decode::decode_dynamic(payload, *schema, depth + 1, options)?)
        }
        DataType::Optional(_)
        | DataType::Repeated(_)
        | DataType::Map { .. }
        | DataType::Reserved(_) => return Err(DecodeError::UnsupportedDataType { field_number }),
    };
    Ok(Some(value))
}
