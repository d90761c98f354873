//! Routines for working with raw (u64) base-128 varints.
//!
//! Other types should be shuffled to/from raw values using the `varint::Int` trait.

use crate::{DecodeError, MAX_LEN};

/// Return the number of bytes required to encode `v` in `[1,MAX_LEN]`.
#[inline]
pub(crate) const fn len(v: u64) -> usize {
    // One byte per started group of 7 significant bits. OR-ing in 1 makes zero take one byte.
    (70 - (v | 1).leading_zeros() as usize) / 7
}

/// Encodes `v` into `buf`, returning the number of bytes written.
#[inline]
pub(crate) fn encode(mut v: u64, buf: &mut [u8; MAX_LEN]) -> usize {
    let mut i = 0;
    while v >= 0x80 {
        buf[i] = (v as u8) | 0x80;
        v >>= 7;
        i += 1;
    }
    buf[i] = v as u8;
    i + 1
}

/// Decodes a varint from the front of `buf`, returning the raw value and the number of bytes
/// consumed.
///
/// Errors with `MalformedVarInt` if `buf` ends before a byte with a clear continuation bit and
/// with `VarIntOverflow` if the value does not fit in 64 bits.
#[inline]
pub(crate) fn decode(buf: &[u8]) -> Result<(u64, usize), DecodeError> {
    match buf.first() {
        None => Err(DecodeError::MalformedVarInt),
        Some(&b) if b < 0x80 => Ok((b.into(), 1)),
        Some(_) => decode_multibyte(buf),
    }
}

/// Decodes a varint known to start with a continuation byte.
///
/// This is the cold path so it is not inlined.
fn decode_multibyte(buf: &[u8]) -> Result<(u64, usize), DecodeError> {
    let mut value = 0u64;
    for (i, &b) in buf.iter().take(MAX_LEN).enumerate() {
        if i == MAX_LEN - 1 && b > 1 {
            // The 10th byte holds bit 63 alone; anything else is either too long or too wide.
            return Err(DecodeError::VarIntOverflow);
        }
        value |= u64::from(b & 0x7f) << (i * 7);
        if b < 0x80 {
            return Ok((value, i + 1));
        }
    }
    if buf.len() >= MAX_LEN {
        Err(DecodeError::VarIntOverflow)
    } else {
        Err(DecodeError::MalformedVarInt)
    }
}
