#![warn(clippy::pedantic)]

pub mod enums;
pub mod error;
pub mod record;
pub mod structures;
pub mod value;

pub use enums::{BinaryArrayType, BinaryType, PrimitiveType, RecordType};
pub use error::TypeError;
pub use record::{
  ArraySingle, ArraySinglePrimitive, BinaryArray, ClassMetadata, ClassRecord, ClassWithId,
  MemberReference, Record, RecordIndex, Value,
};
pub use structures::{
  AdditionalInfo, ArrayInfo, BinaryLibrary, ClassInfo, ClassTypeInfo, MemberType, MemberTypeInfo,
  StreamHeader,
};
pub use value::PrimitiveValue;
