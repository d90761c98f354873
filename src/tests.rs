use rand::distributions::uniform::SampleUniform;
use rand::distributions::Uniform;
use rand::prelude::*;

use crate::MAX_LEN;

/// Returns the inclusive `(min, max)` range of values encoded in each length `1..=MAX_LEN`.
fn varint_bounds() -> Vec<(u64, u64)> {
    (1..=MAX_LEN)
        .map(|len| {
            let min = if len == 1 { 0 } else { 1u64 << ((len - 1) * 7) };
            let max = if len == MAX_LEN {
                u64::MAX
            } else {
                (1u64 << (len * 7)) - 1
            };
            (min, max)
        })
        .collect()
}

fn generate_array<V: SampleUniform + Copy>(len: usize, min: V, max: V) -> Vec<V> {
    let mut rng = StdRng::from_seed([0xabu8; 32]);
    (0..len)
        .map(|_| Uniform::from(min..=max).sample(&mut rng))
        .collect::<Vec<_>>()
}

const RANDOM_TEST_LEN: usize = 4096;

mod raw {
    use super::varint_bounds;
    use crate::raw::{decode, encode, len};
    use crate::{DecodeError, MAX_LEN};

    #[test]
    fn boundary_coding() {
        let mut buf = [0u8; MAX_LEN];
        for (expected_len, (min, max)) in varint_bounds()
            .into_iter()
            .enumerate()
            .map(|(i, x)| (i + 1, x))
        {
            for v in [min, max] {
                assert_eq!(len(v), expected_len, "{}", v);
                assert_eq!(encode(v, &mut buf), expected_len, "{}", v);
                assert_eq!(decode(&buf), Ok((v, expected_len)), "{}", v);
            }
        }
    }

    #[test]
    fn known_values() {
        let cases: [(u64, &[u8]); 6] = [
            (0, &[0x00]),
            (127, &[0x7f]),
            (128, &[0x80, 0x01]),
            (150, &[0x96, 0x01]),
            (1 << 35, &[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]),
            (
                u64::MAX,
                &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01],
            ),
        ];
        let mut buf = [0u8; MAX_LEN];
        for (v, expected) in cases {
            let n = encode(v, &mut buf);
            assert_eq!(&buf[..n], expected, "{}", v);
            assert_eq!(decode(expected), Ok((v, n)));
        }
    }

    #[test]
    fn decode_stops_at_terminator() {
        assert_eq!(decode(&[0x96, 0x01, 0xff, 0xff]), Ok((150, 2)));
    }

    #[test]
    fn decode_empty_fail() {
        assert_eq!(decode(&[]), Err(DecodeError::MalformedVarInt));
    }

    #[test]
    fn decode_unterminated_fail() {
        for n in 1..MAX_LEN {
            let buf = vec![0x80u8; n];
            assert_eq!(decode(&buf), Err(DecodeError::MalformedVarInt), "{}", n);
        }
    }

    #[test]
    fn decode_too_long_fail() {
        assert_eq!(decode(&[0x80; 11]), Err(DecodeError::VarIntOverflow));
        let mut buf = [0xffu8; MAX_LEN];
        buf[MAX_LEN - 1] = 0x02;
        assert_eq!(decode(&buf), Err(DecodeError::VarIntOverflow));
    }
}

mod varint {
    use crate::varint::{zigzag_decode, zigzag_encode};
    use crate::{DecodeError, VarInt, MAX_LEN};

    #[test]
    fn negative_int32_is_sign_extended() {
        let enc = (-1i32).to_varint_bytes();
        assert_eq!(enc.len(), MAX_LEN);
        assert_eq!(i32::decode_varint(enc.as_slice()), Ok((-1, MAX_LEN)));
        assert_eq!(i64::decode_varint(enc.as_slice()), Ok((-1, MAX_LEN)));
    }

    #[test]
    fn decode_overflow() {
        let enc = u64::MAX.to_varint_bytes();
        assert_eq!(
            u32::decode_varint(enc.as_slice()),
            Err(DecodeError::VarIntOverflow)
        );
        let enc = (u64::from(u32::MAX) + 1).to_varint_bytes();
        assert_eq!(
            i32::decode_varint(enc.as_slice()),
            Err(DecodeError::VarIntOverflow)
        );
    }

    #[test]
    fn encode_into_short_slice() {
        let mut buf = [0u8; 2];
        assert_eq!(300u16.encode_varint(&mut buf), 2);
        assert_eq!(buf, [0xac, 0x02]);
    }

    #[test]
    fn zigzag() {
        for (v, z) in [(0i64, 0u64), (-1, 1), (1, 2), (-2, 3), (i64::MAX, u64::MAX - 1)] {
            assert_eq!(zigzag_encode(v), z);
            assert_eq!(zigzag_decode(z), v);
        }
        assert_eq!(zigzag_decode(u64::MAX), i64::MIN);
    }
}

mod buf {
    use super::{generate_array, varint_bounds, RANDOM_TEST_LEN};
    use crate::{DecodeError, VarInt, VarIntBuf, VarIntBufMut};
    use bytes::Buf;

    #[test]
    fn random_u64() {
        for (min, max) in varint_bounds() {
            let input_values = generate_array(RANDOM_TEST_LEN, min, max);
            let mut buf_mut: Vec<u8> = Vec::new();
            for v in input_values.iter() {
                buf_mut.put_varint(*v);
            }

            let mut output_values: Vec<u64> = vec![];
            let mut buf = buf_mut.as_slice();
            for _ in 0..input_values.len() {
                output_values.push(buf.get_varint().unwrap());
            }

            assert_eq!(input_values, output_values, "{}..{}", min, max);
            assert!(!buf.has_remaining());
        }
    }

    #[test]
    fn random_i64() {
        let input_values = generate_array(RANDOM_TEST_LEN, i64::MIN, i64::MAX);
        let mut buf_mut: Vec<u8> = Vec::new();
        for v in input_values.iter() {
            buf_mut.put_varint(*v);
        }
        let mut buf = buf_mut.as_slice();
        let output_values = buf
            .iter_varint::<i64>()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(input_values, output_values);
    }

    #[test]
    fn put_matches_encode() {
        for (min, max) in varint_bounds() {
            for v in [min, max] {
                let mut buf_mut = bytes::BytesMut::new();
                buf_mut.put_varint(v);
                assert_eq!(&buf_mut[..], v.to_varint_bytes().as_slice());
            }
        }
    }

    #[test]
    fn decode_empty_fail() {
        let mut empty: &[u8] = &[];
        assert_eq!(
            empty.get_varint::<u64>(),
            Err(DecodeError::MalformedVarInt)
        );
    }

    #[test]
    fn decode_truncated() {
        for (_, max) in varint_bounds().into_iter().skip(1) {
            let mut buf = Vec::new();
            buf.put_varint(max);
            let mut trunc = &buf[0..(buf.len() - 1)];
            assert_eq!(
                trunc.get_varint::<u64>(),
                Err(DecodeError::MalformedVarInt),
                "{}",
                max
            );
        }
    }

    #[test]
    fn decode_across_chunks() {
        // A chained Buf forces the byte-at-a-time path.
        let enc = (1u64 << 35).to_varint_bytes();
        let (head, tail) = enc.as_slice().split_at(3);
        let mut chained = head.chain(tail);
        assert_eq!(chained.get_varint::<u64>(), Ok(1 << 35));
        assert!(!chained.has_remaining());

        let mut truncated = head.chain(&tail[..1]);
        assert_eq!(
            truncated.get_varint::<u64>(),
            Err(DecodeError::MalformedVarInt)
        );
    }

    #[test]
    fn decode_overflow() {
        let mut buf = Vec::new();
        buf.put_varint(u64::MAX);
        assert_eq!(
            buf.as_slice().get_varint::<u32>(),
            Err(DecodeError::VarIntOverflow)
        );
    }
}

mod io {
    use super::{generate_array, varint_bounds, RANDOM_TEST_LEN};
    use crate::io::{read_varint, read_varint_buf, write_varint};
    use crate::DecodeError;
    use std::io::ErrorKind;

    #[test]
    fn random_write_read() {
        for (min, max) in varint_bounds() {
            let input_values = generate_array(RANDOM_TEST_LEN, min, max);
            let mut writer: Vec<u8> = Vec::new();
            for v in input_values.iter() {
                write_varint(*v, &mut writer).unwrap();
            }

            let mut output_values = Vec::new();
            let mut reader = writer.as_slice();
            while let Ok(v) = read_varint::<u64>(&mut reader) {
                output_values.push(v);
            }
            assert_eq!(input_values, output_values, "{}..{}", min, max);

            let mut reader = std::io::BufReader::with_capacity(16, writer.as_slice());
            for v in input_values.iter() {
                assert_eq!(read_varint_buf::<u64>(&mut reader).unwrap(), *v);
            }
        }
    }

    #[test]
    fn error_kinds() {
        let err = read_varint::<u64>(&mut [0x80u8].as_slice()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);

        let err = std::io::Error::from(DecodeError::VarIntOverflow);
        assert_eq!(err.kind(), ErrorKind::InvalidData);

        let err = read_varint::<u64>(&mut [0xffu8; 12].as_slice()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}

mod wire {
    use crate::wire::{get_tag, put_tag, skip, Tag, WireType};
    use crate::{DecodeError, VarIntBufMut};
    use bytes::Buf;
    use proptest::prelude::*;

    const WIRE_TYPES: [WireType; 5] = [
        WireType::Varint,
        WireType::I64,
        WireType::Len,
        WireType::I32,
        WireType::Byte,
    ];

    proptest! {
        #[test]
        fn tag_round_trip(n in 1u32..=u32::MAX, w in 0usize..WIRE_TYPES.len()) {
            let mut buf = Vec::new();
            put_tag(&mut buf, n, WIRE_TYPES[w]);
            let mut slice = buf.as_slice();
            let tag = get_tag(&mut slice).unwrap();
            prop_assert_eq!(tag, Tag::new(n, WIRE_TYPES[w]));
            prop_assert_eq!(tag.schema_field_number(), Some(n));
            prop_assert!(slice.is_empty());
        }
    }

    #[test]
    fn tag_packing() {
        assert_eq!(Tag::new(1, WireType::Varint).to_raw(), 0x08);
        assert_eq!(Tag::new(2, WireType::Len).to_raw(), 0x12);
        assert_eq!(Tag::new(3, WireType::Varint).to_raw(), 0x18);
        assert_eq!(Tag::new(16, WireType::I32).to_raw(), 0x85);
    }

    #[test]
    fn wire_type_codes() {
        for code in 0..=6 {
            assert_eq!(WireType::from_code(code).unwrap().code(), code);
        }
        assert_eq!(WireType::from_code(7), Err(DecodeError::UnknownWireType(7)));
    }

    #[test]
    fn groups_unsupported() {
        assert_eq!(
            Tag::from_raw(0x0b),
            Err(DecodeError::UnsupportedWireType(WireType::StartGroup))
        );
        assert_eq!(
            Tag::from_raw(0x0c),
            Err(DecodeError::UnsupportedWireType(WireType::EndGroup))
        );
        assert_eq!(Tag::from_raw(0x0f), Err(DecodeError::UnknownWireType(7)));
    }

    #[test]
    fn schema_field_number() {
        assert_eq!(Tag::from_raw(0x00).unwrap().schema_field_number(), None);
        assert_eq!(Tag::from_raw(0x08).unwrap().schema_field_number(), Some(1));
        let huge = Tag::from_raw((u64::from(u32::MAX) + 1) << 3).unwrap();
        assert_eq!(huge.schema_field_number(), None);
    }

    #[test]
    fn skip_each_wire_type() {
        let mut buf = Vec::new();
        buf.put_varint(u64::MAX);
        buf.extend_from_slice(&[0u8; 8]);
        buf.put_varint(3u64);
        buf.extend_from_slice(b"abc");
        buf.extend_from_slice(&[0u8; 4]);
        buf.push(0x2a);
        buf.push(0x7f);

        let mut slice = buf.as_slice();
        for w in WIRE_TYPES {
            skip(&mut slice, w).unwrap();
        }
        assert_eq!(slice, [0x7fu8]);
        assert_eq!(slice.remaining(), 1);
    }

    #[test]
    fn skip_truncated() {
        assert_eq!(
            skip(&mut [0u8; 7].as_slice(), WireType::I64),
            Err(DecodeError::TruncatedPayload {
                needed: 8,
                remaining: 7
            })
        );
        assert_eq!(
            skip(&mut [0x05u8, 1, 2].as_slice(), WireType::Len),
            Err(DecodeError::TruncatedPayload {
                needed: 5,
                remaining: 2
            })
        );
        assert_eq!(
            skip(&mut [0x80u8].as_slice(), WireType::Varint),
            Err(DecodeError::MalformedVarInt)
        );
    }
}

mod schema {
    use crate::{DataType, Field, Reserved, Schema, SchemaError, WireType};

    #[test]
    fn wire_type_mapping() {
        for (data_type, wire_type) in [
            (DataType::Bool, Some(WireType::Varint)),
            (DataType::Int32, Some(WireType::Varint)),
            (DataType::UInt64, Some(WireType::Varint)),
            (DataType::SInt64, Some(WireType::Varint)),
            (DataType::Float, Some(WireType::I32)),
            (DataType::SFixed32, Some(WireType::I32)),
            (DataType::Double, Some(WireType::I64)),
            (DataType::Fixed64, Some(WireType::I64)),
            (DataType::String, Some(WireType::Len)),
            (DataType::Identifier, Some(WireType::Len)),
            (DataType::Url, Some(WireType::Len)),
            (DataType::Byte, Some(WireType::Byte)),
            (DataType::optional(DataType::Bool), None),
            (DataType::repeated(DataType::Bool), None),
            (DataType::map(DataType::String, DataType::Int32), None),
            (DataType::Reserved(Reserved::Index(4)), None),
        ] {
            assert_eq!(data_type.wire_type(), wire_type, "{:?}", data_type);
        }
    }

    #[test]
    fn unwrap_optional_strips_one_level() {
        let nested = DataType::optional(DataType::optional(DataType::Int32));
        assert_eq!(nested.unwrap_optional(), &DataType::optional(DataType::Int32));
        assert_eq!(DataType::String.unwrap_optional(), &DataType::String);
    }

    #[test]
    fn lookup_by_number_not_position() {
        let schema = Schema::new(vec![
            Field::new(7, DataType::String),
            Field::new(2, DataType::Bool),
            Field::new(3, DataType::Reserved(Reserved::Name("old".into()))),
        ])
        .unwrap();
        assert_eq!(schema.field(7).unwrap().data_type, DataType::String);
        assert_eq!(schema.field(2).unwrap().data_type, DataType::Bool);
        assert!(schema.field(1).is_none());
        assert!(schema.field(3).is_none());
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn invalid_numbering() {
        assert_eq!(
            Schema::new(vec![Field::new(0, DataType::Bool)]).unwrap_err(),
            SchemaError::ZeroFieldNumber
        );
        assert_eq!(
            Schema::new(vec![
                Field::new(1, DataType::Bool),
                Field::new(1, DataType::Int32)
            ])
            .unwrap_err(),
            SchemaError::DuplicateFieldNumber(1)
        );
    }

    #[test]
    fn sequential_numbering() {
        let schema = Schema::sequential([DataType::Int32, DataType::String]);
        let numbers: Vec<u32> = schema.fields().iter().map(|f| f.number).collect();
        assert_eq!(numbers, [1, 2]);
        assert_eq!(schema.field(2).unwrap().data_type, DataType::String);
    }
}

mod scalar {
    use std::sync::OnceLock;

    use url::Url;
    use uuid::Uuid;

    use crate::scalar::{accepts, get_value, put_value};
    use crate::{DataType, DecodeError, DynamicRecord, FieldValue, Options, Schema};

    fn round_trip(data_type: DataType, value: FieldValue) -> Vec<u8> {
        let mut buf = Vec::new();
        assert!(accepts(&data_type, &value));
        put_value(&mut buf, &data_type, &value);
        let mut slice = buf.as_slice();
        let decoded = get_value(&mut slice, &data_type, 1, 0, &Options::default()).unwrap();
        assert_eq!(decoded, Some(value), "{:?}", data_type);
        assert!(slice.is_empty());
        buf
    }

    #[test]
    fn layouts() {
        assert_eq!(round_trip(DataType::Bool, true.into()), [0x01]);
        assert_eq!(round_trip(DataType::Bool, false.into()), [0x00]);
        assert_eq!(round_trip(DataType::Int32, 9i32.into()), [0x09]);
        assert_eq!(round_trip(DataType::Int32, (-1i32).into()).len(), 10);
        assert_eq!(round_trip(DataType::SInt32, (-1i32).into()), [0x01]);
        assert_eq!(round_trip(DataType::SInt64, i64::MIN.into()).len(), 10);
        assert_eq!(
            round_trip(DataType::Float, 1.0f32.into()),
            1.0f32.to_le_bytes()
        );
        assert_eq!(
            round_trip(DataType::Double, (-2.5f64).into()),
            (-2.5f64).to_le_bytes()
        );
        assert_eq!(
            round_trip(DataType::Fixed32, 0x01020304u32.into()),
            [4, 3, 2, 1]
        );
        assert_eq!(round_trip(DataType::SFixed64, (-2i64).into()).len(), 8);
        assert_eq!(round_trip(DataType::Byte, 0xfeu8.into()), [0xfe]);
        assert_eq!(
            round_trip(DataType::String, "hi".into()),
            [0x02, b'h', b'i']
        );
        assert_eq!(
            round_trip(DataType::Bytes, vec![0u8, 0xff].into()),
            [0x02, 0x00, 0xff]
        );
        let id = Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff);
        let enc = round_trip(DataType::Identifier, id.into());
        assert_eq!(enc[0], 16);
        assert_eq!(&enc[1..], id.as_bytes());
        let url = Url::parse("https://example.com/a?b=1").unwrap();
        assert_eq!(
            round_trip(DataType::Url, url.into()),
            b"\x19https://example.com/a?b=1"
        );
    }

    #[test]
    fn narrow_varints_truncate() {
        let mut buf = Vec::new();
        put_value(&mut buf, &DataType::UInt64, &FieldValue::UInt64(1 << 32 | 5));
        let decoded = get_value(&mut buf.as_slice(), &DataType::UInt32, 1, 0, &Options::default());
        assert_eq!(decoded, Ok(Some(FieldValue::UInt32(5))));
    }

    #[test]
    fn lossy_string() {
        let data = [0x03u8, b'a', 0xff, b'b'];
        let decoded = get_value(&mut data.as_slice(), &DataType::String, 1, 0, &Options::default());
        assert_eq!(decoded, Ok(Some(FieldValue::String("a\u{fffd}b".into()))));
    }

    #[test]
    fn unusable_payload_is_consumed() {
        let data = [0x02u8, 1, 2, 0x08];
        let mut slice = data.as_slice();
        assert_eq!(
            get_value(&mut slice, &DataType::Identifier, 1, 0, &Options::default()),
            Ok(None)
        );
        assert_eq!(slice, [0x08]);

        let data = [0x03u8, b'a', b'/', b'b', 0x08];
        let mut slice = data.as_slice();
        assert_eq!(
            get_value(&mut slice, &DataType::Url, 1, 0, &Options::default()),
            Ok(None)
        );
        assert_eq!(slice, [0x08]);
    }

    #[test]
    fn truncated_fixed_width() {
        let data = [0u8; 3];
        assert_eq!(
            get_value(&mut data.as_slice(), &DataType::Float, 1, 0, &Options::default()),
            Err(DecodeError::TruncatedPayload {
                needed: 4,
                remaining: 3
            })
        );
        assert_eq!(
            get_value(&mut [].as_slice(), &DataType::Byte, 1, 0, &Options::default()),
            Err(DecodeError::TruncatedPayload {
                needed: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn structure_payload() {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        let schema = SCHEMA.get_or_init(|| Schema::sequential([DataType::Bool]));
        let mut inner = DynamicRecord::new(schema);
        inner.set(1, true.into());
        let enc = round_trip(DataType::Structure(schema), inner.into());
        assert_eq!(enc, [0x02, 0x08, 0x01]);
    }

    #[test]
    fn mismatched_variant_rejected() {
        assert!(!accepts(&DataType::Int32, &FieldValue::UInt32(1)));
        assert!(!accepts(&DataType::String, &FieldValue::Bytes(vec![])));
        assert!(!accepts(
            &DataType::repeated(DataType::Bool),
            &FieldValue::Repeated(vec![])
        ));
    }
}
