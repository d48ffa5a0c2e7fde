use nrbf_types::{
    AdditionalInfo, ArrayInfo, ClassInfo, ClassMetadata, MemberReference, MemberTypeInfo, Record,
    RecordIndex, Value,
};
use serde_json::{Map, Value as Json};

use crate::budget::NodeBudget;
use crate::error::DriverError;
use crate::json::primitive_to_json;
use crate::stream::DecodedStream;

/// Renders records as JSON maps that mirror the wire structures field
/// for field.
///
/// Every map carries `RecordTypeEnum` plus the record's own fields under
/// their MS-NRBF names (`ObjectId`, `ClassInfo`, `MemberTypeInfo`,
/// `LibraryId`, `Values`, …). Nested records are rendered in place.
///
/// A `MemberReference` that has been backfilled is rendered as its
/// target's map with the `IdRef` field added. A reference into a record
/// that is already being rendered keeps only its `IdRef`, so cyclic
/// graphs still produce finite output. Shared targets are still expanded
/// at every reference, so output size is held to a [`NodeBudget`].
pub struct LiteralRenderer<'s> {
    stream: &'s DecodedStream,
    active: Vec<RecordIndex>,
    budget: NodeBudget,
}

impl<'s> LiteralRenderer<'s> {
    #[must_use]
    pub fn new(stream: &'s DecodedStream) -> Self {
        Self {
            stream,
            active: Vec::new(),
            budget: NodeBudget::default(),
        }
    }

    #[must_use]
    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.budget = NodeBudget::new(limit);
        self
    }

    /// Render every top-level record of the stream, in wire order.
    ///
    /// # Errors
    ///
    /// [`DriverError::OutputTooLarge`] when the output would pass the
    /// node limit.
    pub fn render_all(&mut self) -> Result<Json, DriverError> {
        let records = self.stream.records();
        let rendered = records
            .iter()
            .map(|&index| self.render(index))
            .collect::<Result<_, _>>()?;
        Ok(Json::Array(rendered))
    }

    /// Render one record and everything nested in it.
    ///
    /// # Errors
    ///
    /// [`DriverError::OutputTooLarge`] when the output would pass the
    /// node limit.
    pub fn render(&mut self, index: RecordIndex) -> Result<Json, DriverError> {
        let Some(record) = self.stream.arena().get(index) else {
            return Ok(Json::Null);
        };
        self.budget.charge(1)?;
        self.active.push(index);
        let mut map = Map::new();
        map.insert(
            "RecordTypeEnum".into(),
            Json::from(record.record_type().name()),
        );

        match record {
            Record::SerializedStreamHeader(header) => {
                map.insert("RootId".into(), header.root_id.into());
                map.insert("HeaderId".into(), header.header_id.into());
                map.insert("MajorVersion".into(), header.major_version.into());
                map.insert("MinorVersion".into(), header.minor_version.into());
            }
            Record::ClassWithId(class) => {
                map.insert("ObjectId".into(), class.object_id.into());
                map.insert("MetadataId".into(), class.metadata_id.into());
                if let Some(metadata) = &class.metadata {
                    insert_metadata(&mut map, metadata);
                }
                let values = self.render_values(&class.values)?;
                map.insert("Values".into(), values);
            }
            Record::SystemClassWithMembers(class)
            | Record::ClassWithMembers(class)
            | Record::SystemClassWithMembersAndTypes(class)
            | Record::ClassWithMembersAndTypes(class) => {
                insert_metadata(&mut map, &class.metadata);
                let values = self.render_values(&class.values)?;
                map.insert("Values".into(), values);
            }
            Record::BinaryObjectString { object_id, value } => {
                map.insert("ObjectId".into(), (*object_id).into());
                map.insert("Value".into(), Json::String(value.clone()));
            }
            Record::BinaryArray(array) => {
                map.insert("ObjectId".into(), array.object_id.into());
                map.insert(
                    "BinaryArrayTypeEnum".into(),
                    Json::from(array.array_type.name()),
                );
                map.insert("rank".into(), array.rank.into());
                map.insert("Lengths".into(), array.lengths.clone().into());
                if !array.lower_bounds.is_empty() {
                    map.insert("LowerBounds".into(), array.lower_bounds.clone().into());
                }
                map.insert("TypeEnum".into(), Json::from(array.element_type.name()));
                map.insert(
                    "AdditionalTypeInfo".into(),
                    additional_info(&array.additional_info),
                );
                let values = self.render_values(&array.values)?;
                map.insert("Values".into(), values);
            }
            Record::MemberPrimitiveTyped(value) => {
                map.insert(
                    "PrimitiveTypeEnum".into(),
                    Json::from(value.primitive_type().name()),
                );
                map.insert("Value".into(), primitive_to_json(value));
            }
            Record::MemberReference(reference) => self.render_reference(&mut map, reference)?,
            Record::ObjectNull | Record::MessageEnd => {}
            Record::BinaryLibrary(library) => {
                map.insert("LibraryId".into(), library.library_id.into());
                map.insert(
                    "LibraryName".into(),
                    Json::String(library.library_name.clone()),
                );
            }
            Record::ObjectNullMultiple256 { null_count }
            | Record::ObjectNullMultiple { null_count } => {
                map.insert("NullCount".into(), (*null_count).into());
            }
            Record::ArraySinglePrimitive(array) => {
                self.budget.charge(array.values.len())?;
                map.insert("ArrayInfo".into(), array_info(&array.info));
                map.insert(
                    "PrimitiveTypeEnum".into(),
                    Json::from(array.primitive_type.name()),
                );
                map.insert(
                    "Values".into(),
                    Json::Array(array.values.iter().map(primitive_to_json).collect()),
                );
            }
            Record::ArraySingleObject(array) | Record::ArraySingleString(array) => {
                map.insert("ArrayInfo".into(), array_info(&array.info));
                let values = self.render_values(&array.values)?;
                map.insert("Values".into(), values);
            }
        }

        self.active.pop();
        Ok(Json::Object(map))
    }

    /// Unresolved, or pointing back into the record stack: `IdRef` only.
    /// Otherwise the target's fields, then `IdRef`.
    fn render_reference(
        &mut self,
        map: &mut Map<String, Json>,
        reference: &MemberReference,
    ) -> Result<(), DriverError> {
        if let Some(target) = reference.resolved
            && !self.active.contains(&target)
            && let Json::Object(fields) = self.render(target)?
        {
            map.extend(fields);
        }
        map.insert("IdRef".into(), reference.id_ref.into());
        Ok(())
    }

    fn render_values(&mut self, values: &[Value]) -> Result<Json, DriverError> {
        let rendered = values
            .iter()
            .map(|value| match value {
                Value::Primitive(p) => {
                    self.budget.charge(1)?;
                    Ok(primitive_to_json(p))
                }
                Value::Record(index) => self.render(*index),
            })
            .collect::<Result<_, _>>()?;
        Ok(Json::Array(rendered))
    }
}

fn insert_metadata(map: &mut Map<String, Json>, metadata: &ClassMetadata) {
    map.insert("ClassInfo".into(), class_info(&metadata.class_info));
    if let Some(types) = &metadata.member_type_info {
        map.insert("MemberTypeInfo".into(), member_type_info(types));
    }
    if let Some(library_id) = metadata.library_id {
        map.insert("LibraryId".into(), library_id.into());
    }
}

fn class_info(info: &ClassInfo) -> Json {
    let mut map = Map::new();
    map.insert("ObjectId".into(), info.object_id.into());
    map.insert("Name".into(), Json::String(info.name.clone()));
    map.insert("MemberCount".into(), info.member_count().into());
    map.insert("MemberNames".into(), info.member_names.clone().into());
    Json::Object(map)
}

fn member_type_info(types: &MemberTypeInfo) -> Json {
    let mut map = Map::new();
    map.insert(
        "BinaryTypeEnums".into(),
        types
            .members
            .iter()
            .map(|m| Json::from(m.binary_type.name()))
            .collect(),
    );
    map.insert(
        "AdditionalInfos".into(),
        types
            .members
            .iter()
            .map(|m| additional_info(&m.additional_info))
            .collect(),
    );
    Json::Object(map)
}

fn additional_info(info: &AdditionalInfo) -> Json {
    match info {
        AdditionalInfo::None => Json::Null,
        AdditionalInfo::Primitive(t) => Json::from(t.name()),
        AdditionalInfo::SystemClass(name) => Json::String(name.clone()),
        AdditionalInfo::Class(class) => {
            let mut map = Map::new();
            map.insert("TypeName".into(), Json::String(class.type_name.clone()));
            map.insert("LibraryId".into(), class.library_id.into());
            Json::Object(map)
        }
    }
}

fn array_info(info: &ArrayInfo) -> Json {
    let mut map = Map::new();
    map.insert("ObjectId".into(), info.object_id.into());
    map.insert("Length".into(), info.length.into());
    Json::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrbf_decoder::DecoderOptions;
    use nrbf_tests::{Member, StreamBuilder};
    use nrbf_types::PrimitiveType;
    use serde_json::json;

    use crate::stream::decode_stream;

    #[test]
    fn header_and_string() {
        let bytes = StreamBuilder::new()
            .header(1)
            .object_string(1, "hello")
            .message_end()
            .build();
        let stream = decode_stream(&bytes, DecoderOptions::default()).unwrap();
        assert_eq!(
            LiteralRenderer::new(&stream).render_all().unwrap(),
            json!([
                {
                    "RecordTypeEnum": "SerializedStreamHeader",
                    "RootId": 1,
                    "HeaderId": -1,
                    "MajorVersion": 1,
                    "MinorVersion": 0
                },
                {"RecordTypeEnum": "BinaryObjectString", "ObjectId": 1, "Value": "hello"},
                {"RecordTypeEnum": "MessageEnd"}
            ])
        );
    }

    #[test]
    fn typed_class_carries_metadata() {
        let bytes = StreamBuilder::new()
            .header(1)
            .class_with_members_and_types(
                1,
                "Pair",
                &[
                    Member::primitive("n", PrimitiveType::Int16),
                    Member::class("other", "Other", 2),
                ],
                2,
            )
            .int16(-4)
            .object_null()
            .message_end()
            .build();
        let stream = decode_stream(&bytes, DecoderOptions::default()).unwrap();
        let root = stream.root().unwrap();
        assert_eq!(
            LiteralRenderer::new(&stream).render(root).unwrap(),
            json!({
                "RecordTypeEnum": "ClassWithMembersAndTypes",
                "ClassInfo": {
                    "ObjectId": 1,
                    "Name": "Pair",
                    "MemberCount": 2,
                    "MemberNames": ["n", "other"]
                },
                "MemberTypeInfo": {
                    "BinaryTypeEnums": ["Primitive", "Class"],
                    "AdditionalInfos": ["Int16", {"TypeName": "Other", "LibraryId": 2}]
                },
                "LibraryId": 2,
                "Values": [-4, {"RecordTypeEnum": "ObjectNull"}]
            })
        );
    }

    #[test]
    fn unresolved_reference_keeps_only_id_ref() {
        let bytes = StreamBuilder::new()
            .header(1)
            .array_single_object(1, 1)
            .member_reference(2)
            .object_string(2, "t")
            .message_end()
            .build();
        let stream = decode_stream(&bytes, DecoderOptions::default()).unwrap();
        let rendered = LiteralRenderer::new(&stream)
            .render(stream.root().unwrap())
            .unwrap();
        assert_eq!(
            rendered["Values"][0],
            json!({"RecordTypeEnum": "MemberReference", "IdRef": 2})
        );
    }

    #[test]
    fn backfilled_reference_takes_target_fields() {
        let bytes = StreamBuilder::new()
            .header(1)
            .array_single_object(1, 2)
            .member_reference(2)
            .member_reference(1)
            .object_string(2, "t")
            .message_end()
            .build();
        let mut stream = decode_stream(&bytes, DecoderOptions::default()).unwrap();
        let root = stream.backfill().unwrap();
        let rendered = LiteralRenderer::new(&stream).render(root).unwrap();
        assert_eq!(
            rendered["Values"][0],
            json!({"RecordTypeEnum": "BinaryObjectString", "ObjectId": 2, "Value": "t", "IdRef": 2})
        );
        assert_eq!(
            rendered["Values"][1],
            json!({"RecordTypeEnum": "MemberReference", "IdRef": 1})
        );
    }

    #[test]
    fn node_limit_covers_backfilled_targets() {
        let bytes = StreamBuilder::new()
            .header(1)
            .array_single_object(1, 2)
            .member_reference(2)
            .member_reference(2)
            .array_single_primitive(2, 40, PrimitiveType::Byte)
            .raw(&[0; 40])
            .message_end()
            .build();
        let mut stream = decode_stream(&bytes, DecoderOptions::default()).unwrap();
        let root = stream.backfill().unwrap();
        assert!(LiteralRenderer::new(&stream).with_node_limit(100).render(root).is_ok());
        assert!(matches!(
            LiteralRenderer::new(&stream).with_node_limit(100).render_all(),
            Err(DriverError::OutputTooLarge { limit: 100 })
        ));
    }
}
