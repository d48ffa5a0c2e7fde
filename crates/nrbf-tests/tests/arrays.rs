//! Array records: null-run expansion, element counting and the array
//! shapes that must fail closed.

use nrbf_decoder::{DecodeError, DecoderOptions};
use nrbf_driver::{DecodedStream, DriverError, decode_stream};
use nrbf_tests::{MemberInfo, StreamBuilder};
use nrbf_types::{BinaryArrayType, BinaryType, PrimitiveType, PrimitiveValue, Record};
use serde_json::json;

fn decode(bytes: &[u8]) -> Result<DecodedStream, DriverError> {
    decode_stream(bytes, DecoderOptions::default())
}

// ── Null runs ─────────────────────────────────────────────────────────

#[test]
fn null_multiple_256_counts_as_k_elements() {
    let bytes = StreamBuilder::new()
        .header(1)
        .array_single_string(1, 5)
        .object_string(2, "a")
        .null_multiple_256(3)
        .object_string(3, "b")
        .message_end()
        .build();
    let mut stream = decode(&bytes).unwrap();

    let root = stream.root().unwrap();
    let Record::ArraySingleString(array) = &stream.arena()[root] else {
        panic!("root is not a string array");
    };
    assert_eq!(array.info.length, 5);
    assert_eq!(array.values.len(), 3);

    assert_eq!(
        stream.crunch().unwrap(),
        json!(["a", null, null, null, "b"])
    );
}

#[test]
fn null_multiple_fills_whole_array() {
    let bytes = StreamBuilder::new()
        .header(1)
        .array_single_object(1, 300)
        .null_multiple(300)
        .message_end()
        .build();
    let crunched = decode(&bytes).unwrap().crunch().unwrap();
    let items = crunched.as_array().unwrap();
    assert_eq!(items.len(), 300);
    assert!(items.iter().all(serde_json::Value::is_null));
}

#[test]
fn element_count_is_exact() {
    // The string after the array is a top-level record, not a fourth element.
    let bytes = StreamBuilder::new()
        .header(1)
        .array_single_object(1, 3)
        .object_null()
        .null_multiple_256(2)
        .object_string(9, "after")
        .message_end()
        .build();
    let stream = decode(&bytes).unwrap();
    assert_eq!(stream.records().len(), 4);
    assert_eq!(
        stream.top_level().nth(2),
        Some(&Record::BinaryObjectString {
            object_id: 9,
            value: "after".into()
        })
    );
}

#[test]
fn null_run_past_declared_length_is_fatal() {
    let bytes = StreamBuilder::new()
        .header(1)
        .array_single_object(1, 2)
        .null_multiple_256(3)
        .message_end()
        .build();
    assert!(matches!(
        decode(&bytes),
        Err(DriverError::Decode(DecodeError::NullRunOverflow {
            declared: 2,
            filled: 3,
            ..
        }))
    ));
}

#[test]
fn empty_array() {
    let bytes = StreamBuilder::new()
        .header(1)
        .array_single_object(1, 0)
        .message_end()
        .build();
    assert_eq!(decode(&bytes).unwrap().crunch().unwrap(), json!([]));
}

// ── Primitive arrays ──────────────────────────────────────────────────

#[test]
fn array_single_primitive_values() {
    let bytes = StreamBuilder::new()
        .header(1)
        .array_single_primitive(1, 3, PrimitiveType::Int16)
        .int16(1)
        .int16(-2)
        .int16(300)
        .message_end()
        .build();
    let mut stream = decode(&bytes).unwrap();
    let root = stream.root().unwrap();
    let Record::ArraySinglePrimitive(array) = &stream.arena()[root] else {
        panic!("root is not a primitive array");
    };
    assert_eq!(
        array.values,
        [
            PrimitiveValue::Int16(1),
            PrimitiveValue::Int16(-2),
            PrimitiveValue::Int16(300)
        ]
    );
    assert_eq!(stream.crunch().unwrap(), json!([1, -2, 300]));
}

#[test]
fn binary_array_of_primitives_is_inline() {
    let bytes = StreamBuilder::new()
        .header(1)
        .binary_array(
            1,
            BinaryArrayType::Single,
            &[2],
            &[],
            BinaryType::Primitive,
            &MemberInfo::Primitive(PrimitiveType::Boolean),
        )
        .boolean(true)
        .boolean(false)
        .message_end()
        .build();
    assert_eq!(
        decode(&bytes).unwrap().crunch().unwrap(),
        json!([true, false])
    );
}

#[test]
fn jagged_rank_one_array_of_arrays() {
    let bytes = StreamBuilder::new()
        .header(1)
        .binary_array(
            1,
            BinaryArrayType::Jagged,
            &[2],
            &[],
            BinaryType::PrimitiveArray,
            &MemberInfo::Primitive(PrimitiveType::Byte),
        )
        .array_single_primitive(2, 1, PrimitiveType::Byte)
        .byte(7)
        .object_null()
        .message_end()
        .build();
    assert_eq!(
        decode(&bytes).unwrap().crunch().unwrap(),
        json!([[7], null])
    );
}

// ── Unsupported shapes ────────────────────────────────────────────────

#[test]
fn rank_two_array_fails_closed() {
    let bytes = StreamBuilder::new()
        .header(1)
        .binary_array(
            1,
            BinaryArrayType::Rectangular,
            &[2, 2],
            &[],
            BinaryType::Primitive,
            &MemberInfo::Primitive(PrimitiveType::Int32),
        )
        .int32(1)
        .int32(2)
        .int32(3)
        .int32(4)
        .message_end()
        .build();
    assert!(matches!(
        decode(&bytes),
        Err(DriverError::Decode(DecodeError::UnsupportedArray {
            array_type: BinaryArrayType::Rectangular,
            rank: 2,
            ..
        }))
    ));
}

#[test]
fn offset_array_fails_closed_even_at_rank_one() {
    let bytes = StreamBuilder::new()
        .header(1)
        .binary_array(
            1,
            BinaryArrayType::SingleOffset,
            &[1],
            &[5],
            BinaryType::String,
            &MemberInfo::None,
        )
        .object_string(2, "x")
        .message_end()
        .build();
    assert!(matches!(
        decode(&bytes),
        Err(DriverError::Decode(DecodeError::UnsupportedArray {
            array_type: BinaryArrayType::SingleOffset,
            rank: 1,
            offset: 17,
        }))
    ));
}
