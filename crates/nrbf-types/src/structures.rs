use nrbf_wire::ByteCursor;

use crate::enums::{BinaryType, PrimitiveType};
use crate::error::TypeError;

/// The stream header record: always the first record of a stream.
///
/// ```text
/// ┌──────────────┬──────────────┬──────────────┬──────────────┐
/// │ RootId i32   │ HeaderId i32 │ Major i32    │ Minor i32    │
/// └──────────────┴──────────────┴──────────────┴──────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamHeader {
    pub root_id: i32,
    pub header_id: i32,
    pub major_version: i32,
    pub minor_version: i32,
}

impl StreamHeader {
    pub const MAJOR_VERSION: i32 = 1;
    pub const MINOR_VERSION: i32 = 0;

    /// # Errors
    ///
    /// [`TypeError::Wire`] if fewer than 16 bytes remain.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError> {
        Ok(Self {
            root_id: cursor.read_i32()?,
            header_id: cursor.read_i32()?,
            major_version: cursor.read_i32()?,
            minor_version: cursor.read_i32()?,
        })
    }

    /// `true` for the only version this decoder knows, 1.0.
    #[must_use]
    pub fn is_supported_version(&self) -> bool {
        self.major_version == Self::MAJOR_VERSION && self.minor_version == Self::MINOR_VERSION
    }
}

/// Name and ordered member list of a class-shaped record.
///
/// ```text
/// ┌──────────────┬────────────┬─────────────────┬──────────────────────┐
/// │ ObjectId i32 │ Name (LPS) │ MemberCount i32 │ MemberCount × (LPS)  │
/// └──────────────┴────────────┴─────────────────┴──────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassInfo {
    pub object_id: i32,
    pub name: String,
    pub member_names: Vec<String>,
}

impl ClassInfo {
    /// # Errors
    ///
    /// Any [`WireError`](nrbf_wire::WireError) from the string or count
    /// readers, including a negative or oversized member count.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError> {
        let object_id = cursor.read_i32()?;
        let name = cursor.read_string()?;
        let member_count = cursor.read_count("MemberCount")?;
        let mut member_names = Vec::with_capacity(member_count.min(cursor.remaining()));
        for _ in 0..member_count {
            member_names.push(cursor.read_string()?);
        }
        Ok(Self {
            object_id,
            name,
            member_names,
        })
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.member_names.len()
    }
}

/// Type name plus the library that defines it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassTypeInfo {
    pub type_name: String,
    pub library_id: i32,
}

/// The per-member data that follows a binary-type tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdditionalInfo {
    None,
    /// For `Primitive` and `PrimitiveArray`.
    Primitive(PrimitiveType),
    /// For `SystemClass`.
    SystemClass(String),
    /// For `Class`.
    Class(ClassTypeInfo),
}

impl AdditionalInfo {
    /// The primitive type carried by a `Primitive` or `PrimitiveArray`
    /// entry.
    #[must_use]
    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        match self {
            Self::Primitive(t) => Some(*t),
            _ => None,
        }
    }
}

impl BinaryType {
    /// Read the additional info this binary type carries in a class or
    /// array header.
    ///
    /// # Errors
    ///
    /// [`TypeError::InvalidEnumValue`] for a bad primitive tag, or a
    /// [`TypeError::Wire`] read failure.
    pub fn read_additional_info(
        self,
        cursor: &mut ByteCursor<'_>,
    ) -> Result<AdditionalInfo, TypeError> {
        let info = match self {
            Self::Primitive | Self::PrimitiveArray => {
                AdditionalInfo::Primitive(PrimitiveType::read(cursor)?)
            }
            Self::SystemClass => AdditionalInfo::SystemClass(cursor.read_string()?),
            Self::Class => AdditionalInfo::Class(ClassTypeInfo {
                type_name: cursor.read_string()?,
                library_id: cursor.read_i32()?,
            }),
            Self::String | Self::Object | Self::ObjectArray | Self::StringArray => {
                AdditionalInfo::None
            }
        };
        Ok(info)
    }
}

/// Binary type and additional info of one class member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberType {
    pub binary_type: BinaryType,
    pub additional_info: AdditionalInfo,
}

/// Per-member type information of a `*WithMembersAndTypes` record.
///
/// On the wire all binary-type tags come first, then all additional
/// infos in the same order:
///
/// ```text
/// ┌─────────┬─────────┬───┬─────────┬────────┬────────┬───┬────────┐
/// │ btype 0 │ btype 1 │ … │ btype n │ info 0 │ info 1 │ … │ info n │
/// └─────────┴─────────┴───┴─────────┴────────┴────────┴───┴────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberTypeInfo {
    pub members: Vec<MemberType>,
}

impl MemberTypeInfo {
    /// Read type info for `count` members.
    ///
    /// # Errors
    ///
    /// [`TypeError`] on a bad tag or truncated input.
    pub fn read(cursor: &mut ByteCursor<'_>, count: usize) -> Result<Self, TypeError> {
        let mut binary_types = Vec::with_capacity(count.min(cursor.remaining()));
        for _ in 0..count {
            binary_types.push(BinaryType::read(cursor)?);
        }
        let members = binary_types
            .into_iter()
            .map(|binary_type| {
                Ok(MemberType {
                    binary_type,
                    additional_info: binary_type.read_additional_info(cursor)?,
                })
            })
            .collect::<Result<_, TypeError>>()?;
        Ok(Self { members })
    }
}

/// Object id and element count of a single-dimension array record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrayInfo {
    pub object_id: i32,
    pub length: usize,
}

impl ArrayInfo {
    /// # Errors
    ///
    /// [`TypeError::Wire`] on truncation or a negative or oversized length.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError> {
        Ok(Self {
            object_id: cursor.read_i32()?,
            length: cursor.read_count("Length")?,
        })
    }
}

/// A `BinaryLibrary` record: one entry of the library table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryLibrary {
    pub library_id: i32,
    pub library_name: String,
}

impl BinaryLibrary {
    /// # Errors
    ///
    /// [`TypeError::Wire`] on truncation or a bad name string.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError> {
        Ok(Self {
            library_id: cursor.read_i32()?,
            library_name: cursor.read_string()?,
        })
    }
}
