use thiserror::Error;

use crate::wire::WireType;

/// Errors that may occur when decoding varints, tags, or records.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DecodeError {
    /// Reached end-of-buffer before a varint's terminating byte.
    ///
    /// This may happen if you attempt to decode an empty buffer or if the last byte of the buffer
    /// still has its continuation bit set.
    #[error("malformed varint: buffer ended before the terminating byte")]
    MalformedVarInt,
    /// The varint is longer than 10 bytes, carries bits beyond bit 63, or does not fit in the
    /// destination type.
    #[error("varint overflow")]
    VarIntOverflow,
    /// The low 3 bits of a tag are not a recognized wire type.
    #[error("unknown wire type {0}")]
    UnknownWireType(u8),
    /// Group start/end markers are recognized but not supported.
    #[error("unsupported wire type {0:?}")]
    UnsupportedWireType(WireType),
    /// A fixed-width or length-delimited payload runs past the end of the buffer.
    #[error("truncated payload: needed {needed} bytes, {remaining} remaining")]
    TruncatedPayload { needed: u64, remaining: usize },
    /// The schema declares a type this codec cannot materialize (e.g. a map).
    #[error("field {field_number} has a data type that cannot be decoded")]
    UnsupportedDataType { field_number: u32 },
    /// Nested structures exceeded the configured depth.
    #[error("nesting deeper than {0} levels")]
    RecursionLimitExceeded(usize),
}

/// Errors raised when building a [`Schema`](crate::Schema).
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SchemaError {
    #[error("field numbers must be at least 1")]
    ZeroFieldNumber,
    #[error("field number {0} is declared more than once")]
    DuplicateFieldNumber(u32),
}
