use crate::enums::{BinaryArrayType, BinaryType, PrimitiveType, RecordType};
use crate::structures::{
  AdditionalInfo, ArrayInfo, BinaryLibrary, ClassInfo, MemberTypeInfo, StreamHeader,
};
use crate::value::PrimitiveValue;

/// Position of a record in the decode session's arena.
///
/// Records never own each other. A parent refers to a nested record by
/// index, which lets forward and cyclic references coexist with plain
/// ownership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordIndex(pub usize);

/// One member or element slot.
///
/// Inline primitives (untyped members of binary type `Primitive` and
/// the elements of `ArraySinglePrimitive`) are stored directly. All
/// other slots point at a nested record.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
  Primitive(PrimitiveValue),
  Record(RecordIndex),
}

impl Value {
  #[must_use]
  pub fn as_record(&self) -> Option<RecordIndex> {
    match self {
      Self::Record(index) => Some(*index),
      Self::Primitive(_) => None,
    }
  }
}

/// Everything a class record says about its shape, without values.
///
/// This is what a `ClassWithId` record borrows from the class it reuses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassMetadata {
  pub class_info: ClassInfo,
  /// Absent for the `*WithMembers` records, which carry no types.
  pub member_type_info: Option<MemberTypeInfo>,
  /// Absent for the `SystemClass*` records.
  pub library_id: Option<i32>,
}

/// A class record that carries its own metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassRecord {
  pub metadata: ClassMetadata,
  pub values: Vec<Value>,
}

/// A class instance that reuses the metadata of an earlier class.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassWithId {
  pub object_id: i32,
  pub metadata_id: i32,
  /// Copy of the referenced metadata, present only when the decoder
  /// was asked to expand it.
  pub metadata: Option<ClassMetadata>,
  pub values: Vec<Value>,
}

/// A `BinaryArray` record. Only rank-1 arrays without lower bounds are
/// ever decoded into one.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryArray {
  pub object_id: i32,
  pub array_type: BinaryArrayType,
  pub rank: usize,
  pub lengths: Vec<usize>,
  pub lower_bounds: Vec<i32>,
  pub element_type: BinaryType,
  pub additional_info: AdditionalInfo,
  pub values: Vec<Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArraySinglePrimitive {
  pub info: ArrayInfo,
  pub primitive_type: PrimitiveType,
  pub values: Vec<PrimitiveValue>,
}

/// Body shared by `ArraySingleObject` and `ArraySingleString`.
#[derive(Clone, Debug, PartialEq)]
pub struct ArraySingle {
  pub info: ArrayInfo,
  pub values: Vec<Value>,
}

/// A cross-link to another object. Never an owner.
///
/// `resolved` stays `None` until the backfill pass runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberReference {
  pub id_ref: i32,
  pub resolved: Option<RecordIndex>,
}

/// A decoded record: one variant per record-type tag.
///
/// `MethodCall` and `MethodReturn` have no variant. Their tags are
/// recognized but the decoder refuses them.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
  SerializedStreamHeader(StreamHeader),
  ClassWithId(ClassWithId),
  SystemClassWithMembers(ClassRecord),
  ClassWithMembers(ClassRecord),
  SystemClassWithMembersAndTypes(ClassRecord),
  ClassWithMembersAndTypes(ClassRecord),
  BinaryObjectString { object_id: i32, value: String },
  BinaryArray(BinaryArray),
  MemberPrimitiveTyped(PrimitiveValue),
  MemberReference(MemberReference),
  ObjectNull,
  MessageEnd,
  BinaryLibrary(BinaryLibrary),
  ObjectNullMultiple256 { null_count: usize },
  ObjectNullMultiple { null_count: usize },
  ArraySinglePrimitive(ArraySinglePrimitive),
  ArraySingleObject(ArraySingle),
  ArraySingleString(ArraySingle),
}

impl Record {
  #[must_use]
  pub fn record_type(&self) -> RecordType {
    match self {
      Self::SerializedStreamHeader(_) => RecordType::SerializedStreamHeader,
      Self::ClassWithId(_) => RecordType::ClassWithId,
      Self::SystemClassWithMembers(_) => RecordType::SystemClassWithMembers,
      Self::ClassWithMembers(_) => RecordType::ClassWithMembers,
      Self::SystemClassWithMembersAndTypes(_) => RecordType::SystemClassWithMembersAndTypes,
      Self::ClassWithMembersAndTypes(_) => RecordType::ClassWithMembersAndTypes,
      Self::BinaryObjectString { .. } => RecordType::BinaryObjectString,
      Self::BinaryArray(_) => RecordType::BinaryArray,
      Self::MemberPrimitiveTyped(_) => RecordType::MemberPrimitiveTyped,
      Self::MemberReference(_) => RecordType::MemberReference,
      Self::ObjectNull => RecordType::ObjectNull,
      Self::MessageEnd => RecordType::MessageEnd,
      Self::BinaryLibrary(_) => RecordType::BinaryLibrary,
      Self::ObjectNullMultiple256 { .. } => RecordType::ObjectNullMultiple256,
      Self::ObjectNullMultiple { .. } => RecordType::ObjectNullMultiple,
      Self::ArraySinglePrimitive(_) => RecordType::ArraySinglePrimitive,
      Self::ArraySingleObject(_) => RecordType::ArraySingleObject,
      Self::ArraySingleString(_) => RecordType::ArraySingleString,
    }
  }

  /// The ObjectId this record defines, wherever its shape keeps it:
  /// a plain id field, the class info, or the array info.
  #[must_use]
  pub fn object_id(&self) -> Option<i32> {
    match self {
      Self::ClassWithId(c) => Some(c.object_id),
      Self::SystemClassWithMembers(c)
      | Self::ClassWithMembers(c)
      | Self::SystemClassWithMembersAndTypes(c)
      | Self::ClassWithMembersAndTypes(c) => Some(c.metadata.class_info.object_id),
      Self::BinaryObjectString { object_id, .. } => Some(*object_id),
      Self::BinaryArray(a) => Some(a.object_id),
      Self::ArraySinglePrimitive(a) => Some(a.info.object_id),
      Self::ArraySingleObject(a) | Self::ArraySingleString(a) => Some(a.info.object_id),
      _ => None,
    }
  }

  /// Run length of a null-run marker.
  #[must_use]
  pub fn null_count(&self) -> Option<usize> {
    match self {
      Self::ObjectNullMultiple256 { null_count } | Self::ObjectNullMultiple { null_count } => {
        Some(*null_count)
      }
      _ => None,
    }
  }

  /// Number of logical slots this record fills when it appears as a
  /// member or element value.
  #[must_use]
  pub fn slot_width(&self) -> usize {
    self.null_count().unwrap_or(1)
  }

  /// Own metadata of a class record. `ClassWithId` only has some when
  /// it was expanded.
  #[must_use]
  pub fn class_metadata(&self) -> Option<&ClassMetadata> {
    match self {
      Self::ClassWithId(c) => c.metadata.as_ref(),
      Self::SystemClassWithMembers(c)
      | Self::ClassWithMembers(c)
      | Self::SystemClassWithMembersAndTypes(c)
      | Self::ClassWithMembersAndTypes(c) => Some(&c.metadata),
      _ => None,
    }
  }

  /// Member values of any class-shaped record.
  #[must_use]
  pub fn class_values(&self) -> Option<&[Value]> {
    match self {
      Self::ClassWithId(c) => Some(&c.values),
      Self::SystemClassWithMembers(c)
      | Self::ClassWithMembers(c)
      | Self::SystemClassWithMembersAndTypes(c)
      | Self::ClassWithMembersAndTypes(c) => Some(&c.values),
      _ => None,
    }
  }

  /// Mutable member list, used to attach values after binding.
  pub fn class_values_mut(&mut self) -> Option<&mut Vec<Value>> {
    match self {
      Self::ClassWithId(c) => Some(&mut c.values),
      Self::SystemClassWithMembers(c)
      | Self::ClassWithMembers(c)
      | Self::SystemClassWithMembersAndTypes(c)
      | Self::ClassWithMembersAndTypes(c) => Some(&mut c.values),
      _ => None,
    }
  }

  #[must_use]
  pub fn is_class(&self) -> bool {
    self.class_values().is_some()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn class(object_id: i32) -> ClassRecord {
    ClassRecord {
      metadata: ClassMetadata {
        class_info: ClassInfo {
          object_id,
          name: "C".into(),
          member_names: vec!["a".into()],
        },
        member_type_info: None,
        library_id: Some(2),
      },
      values: Vec::new(),
    }
  }

  #[test]
  fn object_id_across_shapes() {
    assert_eq!(Record::ClassWithMembers(class(4)).object_id(), Some(4));
    assert_eq!(
      Record::BinaryObjectString {
        object_id: 9,
        value: "s".into()
      }
      .object_id(),
      Some(9)
    );
    assert_eq!(
      Record::ArraySingleString(ArraySingle {
        info: ArrayInfo {
          object_id: 11,
          length: 0
        },
        values: vec![]
      })
      .object_id(),
      Some(11)
    );
    assert_eq!(Record::ObjectNull.object_id(), None);
    assert_eq!(
      Record::MemberReference(MemberReference {
        id_ref: 4,
        resolved: None
      })
      .object_id(),
      None
    );
  }

  #[test]
  fn slot_width_of_null_runs() {
    assert_eq!(Record::ObjectNullMultiple256 { null_count: 7 }.slot_width(), 7);
    assert_eq!(Record::ObjectNullMultiple { null_count: 300 }.slot_width(), 300);
    assert_eq!(Record::ObjectNull.slot_width(), 1);
  }

  #[test]
  fn class_values_can_be_attached_after_construction() {
    let mut record = Record::ClassWithMembersAndTypes(class(1));
    assert_eq!(record.class_values().map(<[Value]>::len), Some(0));
    record
      .class_values_mut()
      .unwrap()
      .push(Value::Primitive(PrimitiveValue::Int32(5)));
    assert_eq!(
      record.class_values().unwrap(),
      [Value::Primitive(PrimitiveValue::Int32(5))]
    );
    assert!(record.is_class());
    assert!(!Record::MessageEnd.is_class());
  }

  #[test]
  fn unexpanded_class_with_id_has_no_own_metadata() {
    let record = Record::ClassWithId(ClassWithId {
      object_id: 2,
      metadata_id: 1,
      metadata: None,
      values: vec![],
    });
    assert!(record.class_metadata().is_none());
    assert_eq!(record.record_type(), RecordType::ClassWithId);
  }
}
