#![no_main]

use libfuzzer_sys::fuzz_target;
use protowire::{read_varint, read_varint_buf};

fuzz_target!(|data: &[u8]| {
    // decoding arbitrary data may fail but must not panic
    let mut src = data;
    while !src.is_empty() {
        if read_varint::<u32>(&mut src).is_err() {
            break;
        }
    }

    // do buffered reader
    let mut src = data;
    let mut src = std::io::BufReader::new(&mut src);
    while read_varint_buf::<u64>(&mut src).is_ok() {}
});
