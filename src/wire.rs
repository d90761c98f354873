//! Wire types and field tags.
//!
//! Every field on the wire starts with a tag: the varint `(field_number << 3) | wire_type`. The
//! wire type says how many payload bytes follow, never what they mean.

use bytes::{Buf, BufMut};

use crate::{DecodeError, VarIntBuf, VarIntBufMut};

/// The payload shape encoded in the low 3 bits of a tag.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum WireType {
    /// A base-128 varint.
    Varint = 0,
    /// 8 little-endian bytes.
    I64 = 1,
    /// A varint length followed by that many bytes.
    Len = 2,
    /// Group start. Parsed but not supported.
    StartGroup = 3,
    /// Group end. Parsed but not supported.
    EndGroup = 4,
    /// 4 little-endian bytes.
    I32 = 5,
    /// A single raw octet.
    ///
    /// This is an extension used by `byte` (u8) fields. Standard protobuf readers will reject
    /// it, so records that use `DataType::Byte` are not interoperable with other codecs.
    Byte = 6,
}

impl WireType {
    /// Maps the low 3 bits of a tag to a wire type.
    #[inline]
    pub fn from_code(code: u8) -> Result<Self, DecodeError> {
        match code {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::I64),
            2 => Ok(WireType::Len),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::I32),
            6 => Ok(WireType::Byte),
            _ => Err(DecodeError::UnknownWireType(code)),
        }
    }

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// A decoded field tag.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct Tag {
    /// Field number. Numbers that do not fit in 32 bits are kept so the payload can be skipped.
    pub field_number: u64,
    pub wire_type: WireType,
}

impl Tag {
    #[inline]
    pub const fn new(field_number: u32, wire_type: WireType) -> Self {
        Self {
            field_number: field_number as u64,
            wire_type,
        }
    }

    /// Returns the packed, un-varinted tag value.
    #[inline]
    pub const fn to_raw(self) -> u64 {
        (self.field_number << 3) | self.wire_type.code() as u64
    }

    /// Splits a raw tag value.
    ///
    /// Group markers are rejected with `UnsupportedWireType`.
    #[inline]
    pub fn from_raw(raw: u64) -> Result<Self, DecodeError> {
        let wire_type = WireType::from_code((raw & 0x7) as u8)?;
        if matches!(wire_type, WireType::StartGroup | WireType::EndGroup) {
            return Err(DecodeError::UnsupportedWireType(wire_type));
        }
        Ok(Self {
            field_number: raw >> 3,
            wire_type,
        })
    }

    /// Returns the field number if it is a valid schema field number.
    #[inline]
    pub fn schema_field_number(self) -> Option<u32> {
        u32::try_from(self.field_number).ok().filter(|&n| n > 0)
    }
}

/// Writes the tag for `field_number`/`wire_type` to `buf`.
#[inline]
pub fn put_tag<B: BufMut>(buf: &mut B, field_number: u32, wire_type: WireType) {
    buf.put_varint(Tag::new(field_number, wire_type).to_raw());
}

/// Reads a tag from `buf`.
#[inline]
pub fn get_tag<B: Buf>(buf: &mut B) -> Result<Tag, DecodeError> {
    Tag::from_raw(buf.get_varint::<u64>()?)
}

/// Ensures `needed` more bytes are available in `buf`.
#[inline]
pub(crate) fn ensure_remaining<B: Buf>(buf: &B, needed: u64) -> Result<(), DecodeError> {
    let remaining = buf.remaining();
    if needed > remaining as u64 {
        Err(DecodeError::TruncatedPayload { needed, remaining })
    } else {
        Ok(())
    }
}

/// Reads a varint length prefix and checks the payload it announces is fully present.
#[inline]
pub(crate) fn get_len<B: Buf>(buf: &mut B) -> Result<usize, DecodeError> {
    let len = buf.get_varint::<u64>()?;
    ensure_remaining(buf, len)?;
    // ensure_remaining() bounds len by a usize.
    Ok(len as usize)
}

/// Discards one payload of `wire_type` from `buf`.
pub fn skip<B: Buf>(buf: &mut B, wire_type: WireType) -> Result<(), DecodeError> {
    let len = match wire_type {
        WireType::Varint => {
            buf.get_varint::<u64>()?;
            return Ok(());
        }
        WireType::I64 => 8,
        WireType::I32 => 4,
        WireType::Byte => 1,
        WireType::Len => get_len(buf)?,
        WireType::StartGroup | WireType::EndGroup => {
            return Err(DecodeError::UnsupportedWireType(wire_type))
        }
    };
    ensure_remaining(buf, len as u64)?;
    buf.advance(len);
    Ok(())
}
