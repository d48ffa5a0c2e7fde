//! Crunched output of realistic object graphs, pinned with inline
//! snapshots, plus the idempotence property.

use nrbf_decoder::DecoderOptions;
use nrbf_driver::{decode_stream, minimize};
use nrbf_tests::{Member, MemberInfo, StreamBuilder};
use nrbf_types::{BinaryArrayType, BinaryType, PrimitiveType};

fn crunch(bytes: &[u8]) -> serde_json::Value {
    decode_stream(bytes, DecoderOptions::default())
        .unwrap()
        .crunch()
        .unwrap()
}

/// A customer with an order list, the shape a .NET `BinaryFormatter`
/// produces for a small domain object.
fn customer() -> Vec<u8> {
    StreamBuilder::new()
        .header(1)
        .library(2, "Shop, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null")
        .class_with_members_and_types(
            1,
            "Shop.Customer",
            &[
                Member::string("<Name>k__BackingField"),
                Member::primitive("<Id>k__BackingField", PrimitiveType::Int32),
                Member::primitive("<Balance>k__BackingField", PrimitiveType::Decimal),
                Member::primitive("<Since>k__BackingField", PrimitiveType::DateTime),
                Member::class("<Orders>k__BackingField", "Shop.Order[]", 2),
                Member::string("<Note>k__BackingField"),
            ],
            2,
        )
        .object_string(3, "Ada")
        .int32(42)
        .decimal("1024.50")
        .datetime(630_822_816_000_000_000, 0b01)
        .member_reference(4)
        .object_null()
        .binary_array(
            4,
            BinaryArrayType::Single,
            &[3],
            &[],
            BinaryType::Class,
            &MemberInfo::Class("Shop.Order".into(), 2),
        )
        .class_with_members_and_types(
            5,
            "Shop.Order",
            &[
                Member::primitive("Quantity", PrimitiveType::Int16),
                Member::string("Sku"),
            ],
            2,
        )
        .int16(2)
        .object_string(6, "A-1")
        .class_with_id(7, 5)
        .int16(1)
        .member_reference(6)
        .object_null()
        .message_end()
        .build()
}

#[test]
fn customer_graph() {
    insta::assert_snapshot!(
        serde_json::to_string(&crunch(&customer())).unwrap(),
        @r#"{"<Name>k__BackingField":"Ada","<Id>k__BackingField":42,"<Balance>k__BackingField":"1024.50","<Since>k__BackingField":{"Kind":"UTC","Ticks":630822816000000000,"Timestamp":"2000-01-01T00:00:00Z"},"<Orders>k__BackingField":[{"Quantity":2,"Sku":"A-1"},{"Quantity":1,"Sku":"A-1"},null]}"#
    );
}

#[test]
fn untyped_system_class() {
    let bytes = StreamBuilder::new()
        .header(1)
        .system_class_with_members(1, "System.Version", &["_Major", "_Minor"])
        .primitive_typed(PrimitiveType::Int32)
        .int32(4)
        .primitive_typed(PrimitiveType::Int32)
        .int32(0)
        .message_end()
        .build();
    insta::assert_snapshot!(
        serde_json::to_string(&crunch(&bytes)).unwrap(),
        @r#"{"_Major":4,"_Minor":0}"#
    );
}

#[test]
fn crunch_is_idempotent() {
    let once = crunch(&customer());
    assert_eq!(minimize(&once), once);
    assert_eq!(minimize(&minimize(&once)), once);
}

#[test]
fn crunching_twice_gives_the_same_value() {
    let mut stream = decode_stream(&customer(), DecoderOptions::default()).unwrap();
    let first = stream.crunch().unwrap();
    let second = stream.crunch().unwrap();
    assert_eq!(first, second);
}
