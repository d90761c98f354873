#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use protowire::{DataType, Options, Schema};

fn schema() -> &'static Schema {
    static INNER: OnceLock<Schema> = OnceLock::new();
    static OUTER: OnceLock<Schema> = OnceLock::new();
    let inner = INNER.get_or_init(|| Schema::sequential([DataType::SInt64, DataType::String]));
    OUTER.get_or_init(|| {
        Schema::sequential([
            DataType::Int32,
            DataType::Bytes,
            DataType::Structure(inner),
            DataType::repeated(DataType::Structure(inner)),
            DataType::Fixed64,
            DataType::Byte,
            DataType::Identifier,
        ])
    })
}

fuzz_target!(|data: &[u8]| {
    // errors are ok, panics are not; anything that decodes must survive a round trip
    let options = Options::default().max_depth(8);
    if let Ok(record) = protowire::deserialize_dynamic(data, schema(), &options) {
        let encoded = protowire::serialize_dynamic(&record);
        let decoded = protowire::deserialize_dynamic(&encoded, schema(), &options).unwrap();
        assert_eq!(decoded, record);
    }
});
