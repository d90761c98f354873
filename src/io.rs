//! Extensions to `std::io` traits to support reading/writing varints and length-delimited
//! records.
use std::io::{BufRead, Error, ErrorKind, Read, Result, Write};

use crate::{DecodeError, Record, VarInt, MAX_LEN};

impl From<DecodeError> for Error {
    fn from(value: DecodeError) -> Self {
        let kind = match value {
            DecodeError::MalformedVarInt | DecodeError::TruncatedPayload { .. } => {
                ErrorKind::UnexpectedEof
            }
            _ => ErrorKind::InvalidData,
        };
        Error::new(kind, value)
    }
}

/// Varint code a value and write it to `w`. Returns the number of bytes written.
#[inline]
pub fn write_varint<V: VarInt>(v: V, w: &mut impl Write) -> Result<usize> {
    let v = v.to_varint_bytes();
    w.write_all(v.as_slice())?;
    Ok(v.len())
}

/// Read and decode a varint value from `r`.
/// Prefer `read_varint_buf()` wherever possible as it should be more efficient.
#[inline]
pub fn read_varint<V: VarInt>(r: &mut impl Read) -> Result<V> {
    let mut buf = [0u8; MAX_LEN];
    for i in 0..MAX_LEN {
        r.read_exact(&mut buf[i..=i])?;
        if buf[i] < 0x80 {
            return V::decode_varint(&buf[..=i])
                .map(|(v, _)| v)
                .map_err(Error::from);
        }
    }
    Err(DecodeError::VarIntOverflow.into())
}

/// Read and decode a varint value from `r`.
#[inline]
pub fn read_varint_buf<V: VarInt>(r: &mut impl BufRead) -> Result<V> {
    let buf = r.fill_buf()?;
    if buf.len() >= MAX_LEN {
        let (v, len) = V::decode_varint(buf).map_err(Error::from)?;
        r.consume(len);
        Ok(v)
    } else {
        read_varint(r)
    }
}

/// Serializes `record` to `w` prefixed with its varint length. Returns the number of bytes
/// written.
pub fn write_delimited<R: Record>(record: &R, w: &mut impl Write) -> Result<usize> {
    let body = crate::serialize(record);
    let prefix = write_varint(body.len() as u64, w)?;
    w.write_all(&body)?;
    Ok(prefix + body.len())
}

/// Reads one record written by `write_delimited()`.
///
/// Returns `Ok(None)` if `r` is at end of stream before the length prefix.
pub fn read_delimited<R: Record>(r: &mut impl BufRead) -> Result<Option<R>> {
    if r.fill_buf()?.is_empty() {
        return Ok(None);
    }
    let len = read_varint_buf::<u64>(r)?;
    let len = usize::try_from(len).map_err(|_| Error::from(DecodeError::VarIntOverflow))?;
    let mut body = Vec::new();
    Read::take(r, len as u64).read_to_end(&mut body)?;
    if body.len() < len {
        return Err(DecodeError::TruncatedPayload {
            needed: len as u64,
            remaining: body.len(),
        }
        .into());
    }
    Ok(Some(crate::deserialize(&body)?))
}
