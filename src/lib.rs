//! A schema-driven codec for the [Protocol Buffers](https://protobuf.dev/programming-guides/encoding/)
//! wire format.
//!
//! Every field is written as a varint tag, `(field_number << 3) | wire_type`, followed by a
//! payload whose shape the wire type describes. What the payload *means* comes from a `Schema`
//! published by the record type, so decoding walks the stream tag by tag, looks each field number
//! up in the schema, and hands the decoded `FieldValue` to the record's setter. Field order on the
//! wire is not significant and unknown field numbers are skipped.
//!
//! Record types implement `Record`: a `Default` instance to decode into, a static `Schema`, and
//! get/set accessors keyed by field number.
//!
//! ```
//! use std::sync::OnceLock;
//! use protowire::{DataType, FieldValue, Record, Schema};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Example {
//!     id: i32,
//!     name: String,
//!     is_true: bool,
//! }
//!
//! impl Record for Example {
//!     fn schema() -> &'static Schema {
//!         static SCHEMA: OnceLock<Schema> = OnceLock::new();
//!         SCHEMA.get_or_init(|| {
//!             Schema::sequential([DataType::Int32, DataType::String, DataType::Bool])
//!         })
//!     }
//!
//!     fn get(&self, field_number: u32) -> Option<FieldValue> {
//!         match field_number {
//!             1 => Some(self.id.into()),
//!             2 => Some(self.name.clone().into()),
//!             3 => Some(self.is_true.into()),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set(&mut self, field_number: u32, value: FieldValue) {
//!         match (field_number, value) {
//!             (1, FieldValue::Int32(v)) => self.id = v,
//!             (2, FieldValue::String(v)) => self.name = v,
//!             (3, FieldValue::Bool(v)) => self.is_true = v,
//!             _ => {}
//!         }
//!     }
//! }
//!
//! let example = Example { id: 9, name: "HOOPLA".into(), is_true: true };
//! let bytes = protowire::serialize(&example);
//! assert_eq!(bytes, b"\x08\x09\x12\x06HOOPLA\x18\x01");
//! assert_eq!(protowire::deserialize::<Example>(&bytes).unwrap(), example);
//! ```
//!
//! The varint primitives are usable on their own, directly on byte slices, on
//! `bytes::{Buf,BufMut}`, and on `std::io::{Read,Write}`:
//!
//! ```
//! use bytes::Buf;
//! use protowire::{VarInt, VarIntBufMut, VarIntBuf};
//!
//! // value_buf is the maximum size needed to encode a value.
//! let mut value_buf = [0u8; protowire::MAX_LEN];
//! assert_eq!(300u64.encode_varint(&mut value_buf), 2);
//! assert_eq!((300u64, 2), u64::decode_varint(&value_buf).unwrap());
//!
//! let mut buf_mut = vec![];
//! for v in (0..100).step_by(3) {
//!   buf_mut.put_varint(v);
//! }
//!
//! // NB: need a mutable slice to use as VarIntBuf
//! let mut buf = buf_mut.as_slice();
//! while let Ok(v) = buf.get_varint::<u64>() {
//!   assert_eq!(v % 3, 0);
//! }
//! assert!(!buf.has_remaining());
//! ```
mod bytes;
mod decode;
mod encode;
mod error;
mod io;
mod options;
mod raw;
mod record;
mod scalar;
mod schema;
#[cfg(test)]
mod tests;
pub(crate) mod varint;
pub mod wire;

pub use crate::bytes::{VarIntBuf, VarIntBufMut, VarIntIter};
pub use crate::decode::{deserialize, deserialize_dynamic, deserialize_with};
pub use crate::encode::{serialize, serialize_dynamic, serialize_into, serialize_with};
pub use crate::error::{DecodeError, SchemaError};
pub use crate::io::{read_delimited, read_varint, read_varint_buf, write_delimited, write_varint};
pub use crate::options::{Options, DEFAULT_MAX_DEPTH, DEFAULT_RESERVE_CAPACITY};
pub use crate::record::{DynamicRecord, FieldValue, Record};
pub use crate::schema::{DataType, Field, Reserved, Schema};
pub use crate::varint::{EncodedVarInt, Int, VarInt};
pub use crate::wire::{Tag, WireType};

/// Maximum number of bytes a single encoded 64-bit varint will occupy.
pub const MAX_LEN: usize = 10;
