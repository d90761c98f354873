//! Traits that allow writing/reading `VarInt` types on `bytes::{BufMut,Buf}`.

use crate::{raw, DecodeError, VarInt, MAX_LEN};

use bytes::{Buf, BufMut};

/// Extension for `buf::BufMut` to write any `VarInt` type.
pub trait VarIntBufMut {
    fn put_varint<V: VarInt>(&mut self, v: V);
}

impl<Inner: BufMut> VarIntBufMut for Inner {
    /// Writes a `VarInt` value to the buffer.
    #[inline]
    fn put_varint<V: VarInt>(&mut self, v: V) {
        self.put_slice(v.to_varint_bytes().as_slice());
    }
}

fn get_varint_slow<B: Buf>(buf: &mut B) -> Result<u64, DecodeError> {
    let mut value = 0u64;
    for i in 0..MAX_LEN {
        if !buf.has_remaining() {
            return Err(DecodeError::MalformedVarInt);
        }
        let b = buf.get_u8();
        if i == MAX_LEN - 1 && b > 1 {
            return Err(DecodeError::VarIntOverflow);
        }
        value |= u64::from(b & 0x7f) << (i * 7);
        if b < 0x80 {
            return Ok(value);
        }
    }
    Err(DecodeError::VarIntOverflow)
}

/// Extension for `buf::Buf` to read any `VarInt` type.
pub trait VarIntBuf {
    /// Reads a `VarInt` from the buffer. After a successful read, the
    /// buffer will be advanced by the number of bytes read.
    ///
    /// # Examples
    ///
    /// ```
    /// use protowire::{VarIntBufMut, VarIntBuf};
    ///
    /// let to_encode = [1, 2, 400];
    /// let mut buf = vec![];
    /// for v in &to_encode {
    ///    buf.put_varint(*v);
    /// }
    ///
    /// let mut buf = &buf[..];
    /// for v in &to_encode {
    ///   let decoded = buf.get_varint::<u16>().unwrap();
    ///   assert_eq!(decoded, *v);
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `MalformedVarInt` error if the buffer is empty or ends before
    /// the full encoded value.
    ///
    /// Returns a `VarIntOverflow` error if the encoding is longer than 10 bytes
    /// or the value is larger than the `VarInt` type can represent.
    fn get_varint<V: VarInt>(&mut self) -> Result<V, DecodeError>;

    /// Returns an iterator over `VarInt` values in the buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use protowire::{VarIntBufMut, VarIntBuf};
    ///
    /// let to_encode = [1, 2, -30, -24_000];
    /// let mut buf = vec![];
    /// for n in to_encode.iter() {
    ///     buf.put_varint(*n);
    /// }
    /// let mut result = vec![];
    /// let mut decode_data = buf.as_slice();
    /// for decoded in decode_data.iter_varint::<i32>() {
    ///     result.push(decoded.unwrap());
    /// }
    /// assert_eq!(to_encode, result.as_slice());
    /// ```
    fn iter_varint<V: VarInt>(&mut self) -> VarIntIter<'_, Self, V>
    where
        Self: Sized,
    {
        VarIntIter::new(self)
    }
}

impl<Inner: Buf> VarIntBuf for Inner {
    #[inline]
    fn get_varint<V: VarInt>(&mut self) -> Result<V, DecodeError> {
        if !self.has_remaining() {
            return Err(DecodeError::MalformedVarInt);
        }

        let chunk = self.chunk();
        if chunk.len() >= MAX_LEN || chunk.len() == self.remaining() {
            // The whole value is visible in this chunk, or nothing follows it.
            let (raw, len) = raw::decode(chunk)?;
            self.advance(len);
            return V::from_varint_raw(raw).ok_or(DecodeError::VarIntOverflow);
        }

        V::from_varint_raw(get_varint_slow(self)?).ok_or(DecodeError::VarIntOverflow)
    }
}

/// An iterator over `VarInt` values in a `Buf`.
pub struct VarIntIter<'a, B, V> {
    buf: &'a mut B,
    _marker: std::marker::PhantomData<V>,
}

impl<'a, B, V> VarIntIter<'a, B, V> {
    /// Creates a new `VarIntIter`.
    pub fn new(buf: &'a mut B) -> Self {
        Self {
            buf,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<'a, B, V> Iterator for VarIntIter<'a, B, V>
where
    B: Buf,
    V: VarInt,
{
    type Item = Result<V, DecodeError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.buf.has_remaining() {
            Some(self.buf.get_varint())
        } else {
            None
        }
    }
}
