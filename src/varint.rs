//! Integer types that can be written as base-128 varints.

use crate::{raw, DecodeError, MAX_LEN};

/// Conversion between an integer type and the raw `u64` a varint carries.
///
/// Signed values travel as their two's-complement bit pattern sign-extended to 64 bits, so every
/// negative `i32` takes the full 10 bytes. That is how `int32`/`int64` fields are defined;
/// `sint32`/`sint64` fields are zig-zag coded before they get here.
pub trait Int: Sized + Copy {
    fn to_varint_raw(self) -> u64;
    /// Returns `None` if `raw` is out of range for `Self`.
    fn from_varint_raw(raw: u64) -> Option<Self>;
}

impl Int for u64 {
    #[inline(always)]
    fn to_varint_raw(self) -> u64 {
        self
    }
    #[inline(always)]
    fn from_varint_raw(raw: u64) -> Option<Self> {
        Some(raw)
    }
}

impl Int for i64 {
    #[inline(always)]
    fn to_varint_raw(self) -> u64 {
        self as u64
    }
    #[inline(always)]
    fn from_varint_raw(raw: u64) -> Option<Self> {
        Some(raw as i64)
    }
}

// Narrower types widen through the 64-bit type of the same signedness.
macro_rules! impl_int {
    ($narrow:ty, $wide:ty) => {
        impl Int for $narrow {
            #[inline(always)]
            fn to_varint_raw(self) -> u64 {
                <$wide>::from(self).to_varint_raw()
            }
            #[inline(always)]
            fn from_varint_raw(raw: u64) -> Option<Self> {
                <$wide>::from_varint_raw(raw).and_then(|w| <$narrow>::try_from(w).ok())
            }
        }
    };
}
impl_int!(u16, u64);
impl_int!(u32, u64);
impl_int!(i32, i64);

/// Zig-zag maps signed to unsigned so that small magnitudes stay short: 0, -1, 1, -2 become
/// 0, 1, 2, 3.
#[inline]
pub(crate) fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

#[inline]
pub(crate) fn zigzag_decode(z: u64) -> i64 {
    ((z >> 1) as i64) ^ -((z & 1) as i64)
}

/// The encoded bytes of one varint, held inline.
#[derive(Clone, Copy, Debug)]
pub struct EncodedVarInt {
    bytes: [u8; MAX_LEN],
    used: u8,
}

#[allow(clippy::len_without_is_empty)]
impl EncodedVarInt {
    fn from_raw(raw: u64) -> Self {
        let mut bytes = [0u8; MAX_LEN];
        let used = raw::encode(raw, &mut bytes) as u8;
        Self { bytes, used }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..usize::from(self.used)]
    }

    /// Encoded length in bytes, in `[1, MAX_LEN]`.
    pub fn len(&self) -> usize {
        usize::from(self.used)
    }
}

impl AsRef<[u8]> for EncodedVarInt {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Integer types that can be varint coded directly to and from byte slices.
///
/// See `VarIntBuf`/`VarIntBufMut` for `bytes` buffers and `read_varint()`/`write_varint()` for
/// `std::io`.
pub trait VarInt: Sized + Copy + Int {
    /// Bytes needed to encode `self`, always in `[1, MAX_LEN]`.
    #[inline]
    fn varint_len(self) -> usize {
        raw::len(self.to_varint_raw())
    }

    /// Writes `self` to the front of `buf`, returning the number of bytes written.
    ///
    /// # Panics
    ///
    /// If `buf` is shorter than `self.varint_len()`.
    #[inline]
    fn encode_varint(self, buf: &mut [u8]) -> usize {
        let enc = self.to_varint_bytes();
        buf[..enc.len()].copy_from_slice(enc.as_slice());
        enc.len()
    }

    /// Reads a value from the front of `buf`, returning it with the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// `MalformedVarInt` if `buf` ends mid-value, `VarIntOverflow` if the value is too long or
    /// does not fit in `Self`.
    #[inline]
    fn decode_varint(buf: &[u8]) -> Result<(Self, usize), DecodeError> {
        let (raw, consumed) = raw::decode(buf)?;
        let v = Self::from_varint_raw(raw).ok_or(DecodeError::VarIntOverflow)?;
        Ok((v, consumed))
    }

    #[inline]
    fn to_varint_bytes(self) -> EncodedVarInt {
        EncodedVarInt::from_raw(self.to_varint_raw())
    }
}

impl VarInt for u16 {}
impl VarInt for u32 {}
impl VarInt for u64 {}
impl VarInt for i32 {}
impl VarInt for i64 {}
