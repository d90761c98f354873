//! Structure decoder: walks the byte stream tag by tag and applies each known field through the
//! record's setter.
//!
//! Fields may arrive in any order. Unknown and reserved field numbers are skipped by wire type so
//! newer writers stay readable.

use std::collections::BTreeMap;

use bytes::Buf;
use tracing::{debug, trace};

use crate::wire::{get_tag, skip, WireType};
use crate::{scalar, DataType, DecodeError, DynamicRecord, FieldValue, Options, Record, Schema};

/// Deserializes an `R` from `data` with default `Options`.
///
/// Decoding is all-or-nothing: on error the partially populated record is dropped.
///
/// # Errors
///
/// Any `DecodeError` means `data` is not a valid encoding of `R`.
pub fn deserialize<R: Record>(data: &[u8]) -> Result<R, DecodeError> {
    deserialize_with(data, &Options::default())
}

pub fn deserialize_with<R: Record>(data: &[u8], options: &Options) -> Result<R, DecodeError> {
    let mut record = R::default();
    decode_fields(data, R::schema(), 0, options, |n, v| record.set(n, v))?;
    Ok(record)
}

/// Deserializes `data` against `schema` without a concrete record type.
pub fn deserialize_dynamic(
    data: &[u8],
    schema: &'static Schema,
    options: &Options,
) -> Result<DynamicRecord, DecodeError> {
    decode_dynamic(data, schema, 0, options)
}

pub(crate) fn decode_dynamic(
    data: &[u8],
    schema: &'static Schema,
    depth: usize,
    options: &Options,
) -> Result<DynamicRecord, DecodeError> {
    let mut record = DynamicRecord::new(schema);
    decode_fields(data, schema, depth, options, |n, v| record.set(n, v))?;
    Ok(record)
}

fn decode_fields<F>(
    mut buf: &[u8],
    schema: &Schema,
    depth: usize,
    options: &Options,
    mut set: F,
) -> Result<(), DecodeError>
where
    F: FnMut(u32, FieldValue),
{
    if depth > options.get_max_depth() {
        return Err(DecodeError::RecursionLimitExceeded(options.get_max_depth()));
    }

    // Repeated fields may be interleaved with others; deliver each as one value at the end.
    let mut repeated: BTreeMap<u32, Vec<FieldValue>> = BTreeMap::new();
    while buf.has_remaining() {
        let tag = get_tag(&mut buf)?;
        let field = match tag.schema_field_number().and_then(|n| schema.field(n)) {
            Some(f) => f,
            None => {
                trace!(
                    field_number = tag.field_number,
                    wire_type = ?tag.wire_type,
                    "skipping unknown field"
                );
                skip(&mut buf, tag.wire_type)?;
                continue;
            }
        };

        match field.data_type.unwrap_optional() {
            DataType::Repeated(element) => {
                if let Some(v) =
                    get_field(&mut buf, field.number, element, tag.wire_type, depth, options)?
                {
                    repeated.entry(field.number).or_default().push(v);
                }
            }
            DataType::Map { .. } => {
                return Err(DecodeError::UnsupportedDataType {
                    field_number: field.number,
                })
            }
            data_type => {
                if let Some(v) =
                    get_field(&mut buf, field.number, data_type, tag.wire_type, depth, options)?
                {
                    set(field.number, v);
                }
            }
        }
    }

    for (n, items) in repeated {
        set(n, FieldValue::Repeated(items));
    }
    Ok(())
}

/// Decodes one payload, or skips it if the tag's wire type disagrees with the schema.
fn get_field(
    buf: &mut &[u8],
    field_number: u32,
    data_type: &DataType,
    wire_type: WireType,
    depth: usize,
    options: &Options,
) -> Result<Option<FieldValue>, DecodeError> {
    let expected = data_type
        .wire_type()
        .ok_or(DecodeError::UnsupportedDataType { field_number })?;
    if expected != wire_type {
        debug!(
            field_number,
            ?expected,
            actual = ?wire_type,
            "wire type does not match schema, skipping field"
        );
        skip(buf, wire_type)?;
        return Ok(None);
    }
    scalar::get_value(buf, data_type, field_number, depth, options)
}
