#![no_main]

use libfuzzer_sys::fuzz_target;
use protowire::{VarIntBuf, VarIntBufMut};

fuzz_target!(|data: &[u8]| {
    // decoding arbitrary data may fail but must not panic
    let mut src = data;
    while !src.is_empty() {
        if src.get_varint::<u32>().is_err() {
            break;
        }
    }

    let mut dst = vec![];
    for chunk in data.chunks_exact(8) {
        let n = i64::from_le_bytes(chunk.try_into().unwrap());
        dst.put_varint(n);
        dst.put_varint(n as u64);
    }

    let mut src = &dst[..];
    for chunk in data.chunks_exact(8) {
        let n = i64::from_le_bytes(chunk.try_into().unwrap());
        assert_eq!(src.get_varint::<i64>().unwrap(), n);
        assert_eq!(src.get_varint::<u64>().unwrap(), n as u64);
    }
    assert!(src.is_empty());
});
