//! Structure encoder: walks a schema in declaration order and emits tag + payload per field.

use std::borrow::Cow;

use bytes::BufMut;
use tracing::warn;

use crate::wire::put_tag;
use crate::{scalar, DataType, DynamicRecord, FieldValue, Options, Record, Schema};

/// Serializes `record` with default `Options`.
///
/// The top-level record is not length-prefixed; use `write_delimited()` to frame records on a
/// stream.
///
/// ```
/// # use std::sync::OnceLock;
/// # use protowire::{DataType, FieldValue, Record, Schema};
/// #[derive(Default)]
/// struct Point {
///     x: i32,
/// }
///
/// impl Record for Point {
///     fn schema() -> &'static Schema {
///         static SCHEMA: OnceLock<Schema> = OnceLock::new();
///         SCHEMA.get_or_init(|| Schema::sequential([DataType::Int32]))
///     }
///     fn get(&self, field_number: u32) -> Option<FieldValue> {
///         (field_number == 1).then(|| self.x.into())
///     }
///     fn set(&mut self, field_number: u32, value: FieldValue) {
///         if let (1, FieldValue::Int32(x)) = (field_number, value) {
///             self.x = x;
///         }
///     }
/// }
///
/// assert_eq!(protowire::serialize(&Point { x: 150 }), [0x08, 0x96, 0x01]);
/// ```
pub fn serialize<R: Record>(record: &R) -> Vec<u8> {
    serialize_with(record, &Options::default())
}

/// Serializes `record` into a buffer of `options.get_reserve_capacity()` initial capacity.
pub fn serialize_with<R: Record>(record: &R, options: &Options) -> Vec<u8> {
    let mut buf = Vec::with_capacity(options.get_reserve_capacity());
    serialize_into(record, &mut buf);
    buf
}

/// Appends the encoding of `record` to `buf`.
pub fn serialize_into<R: Record, B: BufMut>(record: &R, buf: &mut B) {
    put_fields(buf, R::schema(), |n| record.get(n).map(Cow::Owned));
}

/// Serializes a `DynamicRecord` against its own schema.
pub fn serialize_dynamic(record: &DynamicRecord) -> Vec<u8> {
    let mut buf = Vec::with_capacity(Options::default().get_reserve_capacity());
    put_fields(&mut buf, record.schema(), |n| record.get(n).map(Cow::Borrowed));
    buf
}

/// Encodes every present field of `schema`, fetching values through `get`.
///
/// Absent values are omitted: the wire format has no null.
pub(crate) fn put_fields<'a, B, F>(buf: &mut B, schema: &Schema, get: F)
where
    B: BufMut,
    F: Fn(u32) -> Option<Cow<'a, FieldValue>>,
{
    for field in schema.fields() {
        if field.data_type.is_reserved() {
            continue;
        }
        if let Some(value) = get(field.number) {
            put_field(buf, field.number, field.data_type.unwrap_optional(), &value);
        }
    }
}

fn put_field<B: BufMut>(buf: &mut B, field_number: u32, data_type: &DataType, value: &FieldValue) {
    match (data_type, value) {
        (DataType::Repeated(element), FieldValue::Repeated(items)) => {
            for item in items {
                put_single(buf, field_number, element, item);
            }
        }
        _ => put_single(buf, field_number, data_type, value),
    }
}

fn put_single<B: BufMut>(buf: &mut B, field_number: u32, data_type: &DataType, value: &FieldValue) {
    let wire_type = match data_type.wire_type() {
        Some(w) if scalar::accepts(data_type, value) => w,
        _ => {
            warn!(
                field_number,
                ?data_type,
                "value cannot be encoded as the declared type, omitting field"
            );
            return;
        }
    };
    put_tag(buf, field_number, wire_type);
    scalar::put_value(buf, data_type, value);
}
