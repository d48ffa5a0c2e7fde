use nrbf_types::{BinaryArrayType, RecordType, TypeError};
use nrbf_wire::WireError;

/// Errors that abort decoding of an NRBF stream.
///
/// A corrupt stream cannot be resynchronised, so every variant is fatal
/// and carries the byte offset where the problem was detected.
///
/// Error hierarchy:
///
/// ```text
///   DecodeError
///   ├── UnsupportedRecordType  ← MethodCall / MethodReturn
///   ├── UnsupportedArray       ← BinaryArray with rank > 1 or lower bounds
///   ├── DuplicateObjectId      ← an ObjectId bound twice
///   ├── UnknownObjectId        ← ClassWithId names an unbound metadata id
///   ├── NotAClass              ← ClassWithId names a non-class object
///   ├── DanglingReference      ← MemberReference target never defined
///   ├── NullRunOverflow        ← null run past the declared length
///   ├── UnexpectedRecord       ← header or MessageEnd in a value slot
///   ├── NestingTooDeep         ← nested value records past the depth limit
///   ├── ZeroWidthOverrun       ← more Null elements than bytes left
///   ├── Type(TypeError)        ← from nrbf-types tag/structure parsing
///   └── Wire(WireError)        ← from nrbf-wire byte reads
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A recognized record tag whose payload this decoder does not parse.
    #[error("unsupported record type {record_type} at offset {offset}")]
    UnsupportedRecordType {
        record_type: RecordType,
        offset: usize,
    },

    /// A `BinaryArray` shape outside single-dimension, zero-based arrays.
    #[error("unsupported {array_type} array of rank {rank} at offset {offset}")]
    UnsupportedArray {
        array_type: BinaryArrayType,
        rank: usize,
        offset: usize,
    },

    #[error("object id {object_id} bound twice (offset {offset})")]
    DuplicateObjectId { object_id: i32, offset: usize },

    #[error("unknown object id {object_id} at offset {offset}")]
    UnknownObjectId { object_id: i32, offset: usize },

    /// Metadata was requested from an object that is not a class.
    #[error("object id {object_id} at offset {offset} is not a class")]
    NotAClass { object_id: i32, offset: usize },

    /// After the whole stream was read, a reference still points at an
    /// id nothing defined. `offset` is that of the `MemberReference`.
    #[error("reference to undefined object id {object_id} at offset {offset}")]
    DanglingReference { object_id: i32, offset: usize },

    /// A null-run record covered more slots than were left.
    #[error("null run at offset {offset} fills {filled} of {declared} slots")]
    NullRunOverflow {
        declared: usize,
        filled: usize,
        offset: usize,
    },

    /// A record that cannot stand in for a member or element value.
    #[error("unexpected {record_type} record at offset {offset}")]
    UnexpectedRecord {
        record_type: RecordType,
        offset: usize,
    },

    /// Nested member or element records went deeper than the limit.
    #[error("records nested deeper than {limit} levels at offset {offset}")]
    NestingTooDeep { limit: usize, offset: usize },

    /// An array of `Null` primitives declared more elements than there
    /// are bytes left in the input.
    #[error("{length} Null elements at offset {offset} exceed the {remaining} bytes left")]
    ZeroWidthOverrun {
        length: usize,
        remaining: usize,
        offset: usize,
    },

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Non-fatal conditions noticed while decoding.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeWarning {
    /// The stream header declares a version other than 1.0.
    #[error("stream header at offset {offset} declares version {major_version}.{minor_version}, expected 1.0")]
    VersionMismatch {
        major_version: i32,
        minor_version: i32,
        offset: usize,
    },
}
