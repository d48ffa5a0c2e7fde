use nrbf_types::{BinaryArrayType, BinaryType, PrimitiveType, RecordType};

/// Additional type info for a member or array element, as written.
#[derive(Clone, Debug)]
pub enum MemberInfo {
    None,
    Primitive(PrimitiveType),
    SystemClass(String),
    Class(String, i32),
}

/// One member of a `*WithMembersAndTypes` class.
#[derive(Clone, Debug)]
pub struct Member {
    pub name: String,
    pub binary_type: BinaryType,
    pub info: MemberInfo,
}

impl Member {
    pub fn primitive(name: &str, primitive_type: PrimitiveType) -> Self {
        Self::with(name, BinaryType::Primitive, MemberInfo::Primitive(primitive_type))
    }

    pub fn string(name: &str) -> Self {
        Self::with(name, BinaryType::String, MemberInfo::None)
    }

    pub fn object(name: &str) -> Self {
        Self::with(name, BinaryType::Object, MemberInfo::None)
    }

    pub fn class(name: &str, type_name: &str, library_id: i32) -> Self {
        Self::with(
            name,
            BinaryType::Class,
            MemberInfo::Class(type_name.to_string(), library_id),
        )
    }

    pub fn system_class(name: &str, type_name: &str) -> Self {
        Self::with(
            name,
            BinaryType::SystemClass,
            MemberInfo::SystemClass(type_name.to_string()),
        )
    }

    pub fn primitive_array(name: &str, primitive_type: PrimitiveType) -> Self {
        Self::with(
            name,
            BinaryType::PrimitiveArray,
            MemberInfo::Primitive(primitive_type),
        )
    }

    pub fn object_array(name: &str) -> Self {
        Self::with(name, BinaryType::ObjectArray, MemberInfo::None)
    }

    pub fn string_array(name: &str) -> Self {
        Self::with(name, BinaryType::StringArray, MemberInfo::None)
    }

    fn with(name: &str, binary_type: BinaryType, info: MemberInfo) -> Self {
        Self {
            name: name.to_string(),
            binary_type,
            info,
        }
    }
}

/// Test-only writer for hand-built NRBF streams.
///
/// Each method appends one record (or one inline value) and returns the
/// builder, so a stream reads top to bottom in wire order:
///
/// ```
/// use nrbf_tests::StreamBuilder;
///
/// let bytes = StreamBuilder::new()
///     .header(1)
///     .object_string(1, "hello")
///     .message_end()
///     .build();
/// assert_eq!(bytes[0], 0x00);
/// ```
///
/// The builder does no validation. Tests use it to produce malformed
/// streams just as readily as well-formed ones.
#[derive(Clone, Debug, Default)]
pub struct StreamBuilder {
    buf: Vec<u8>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }

    // ── Raw values ────────────────────────────────────────────────────

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn byte(self, value: u8) -> Self {
        self.raw(&[value])
    }

    pub fn boolean(self, value: bool) -> Self {
        self.byte(u8::from(value))
    }

    pub fn int16(self, value: i16) -> Self {
        self.raw(&value.to_le_bytes())
    }

    pub fn int32(self, value: i32) -> Self {
        self.raw(&value.to_le_bytes())
    }

    pub fn int64(self, value: i64) -> Self {
        self.raw(&value.to_le_bytes())
    }

    pub fn uint64(self, value: u64) -> Self {
        self.raw(&value.to_le_bytes())
    }

    pub fn single(self, value: f32) -> Self {
        self.raw(&value.to_le_bytes())
    }

    pub fn double(self, value: f64) -> Self {
        self.raw(&value.to_le_bytes())
    }

    pub fn char(self, value: char) -> Self {
        let mut utf8 = [0u8; 4];
        self.raw(value.encode_utf8(&mut utf8).as_bytes())
    }

    /// DateTime from ticks and the two kind bits.
    pub fn datetime(self, ticks: i64, kind_bits: i64) -> Self {
        self.int64((ticks & !0b11) | (kind_bits & 0b11))
    }

    /// 7-bit length prefix.
    pub fn length_prefix(mut self, mut length: usize) -> Self {
        loop {
            let group = (length & 0x7F) as u8;
            length >>= 7;
            if length == 0 {
                self.buf.push(group);
                return self;
            }
            self.buf.push(group | 0x80);
        }
    }

    /// LengthPrefixedString.
    pub fn string(self, value: &str) -> Self {
        self.length_prefix(value.len()).raw(value.as_bytes())
    }

    /// Decimal in its string form. The text is written unchecked.
    pub fn decimal(self, text: &str) -> Self {
        self.string(text)
    }

    pub fn tag(self, record_type: RecordType) -> Self {
        self.byte(record_type.to_wire_byte())
    }

    // ── Records ───────────────────────────────────────────────────────

    /// Stream header with version 1.0 and header id -1.
    pub fn header(self, root_id: i32) -> Self {
        self.header_with_version(root_id, 1, 0)
    }

    pub fn header_with_version(self, root_id: i32, major: i32, minor: i32) -> Self {
        self.tag(RecordType::SerializedStreamHeader)
            .int32(root_id)
            .int32(-1)
            .int32(major)
            .int32(minor)
    }

    pub fn message_end(self) -> Self {
        self.tag(RecordType::MessageEnd)
    }

    pub fn library(self, library_id: i32, name: &str) -> Self {
        self.tag(RecordType::BinaryLibrary)
            .int32(library_id)
            .string(name)
    }

    pub fn object_string(self, object_id: i32, value: &str) -> Self {
        self.tag(RecordType::BinaryObjectString)
            .int32(object_id)
            .string(value)
    }

    pub fn object_null(self) -> Self {
        self.tag(RecordType::ObjectNull)
    }

    pub fn null_multiple_256(self, count: u8) -> Self {
        self.tag(RecordType::ObjectNullMultiple256).byte(count)
    }

    pub fn null_multiple(self, count: i32) -> Self {
        self.tag(RecordType::ObjectNullMultiple).int32(count)
    }

    pub fn member_reference(self, id_ref: i32) -> Self {
        self.tag(RecordType::MemberReference).int32(id_ref)
    }

    /// MemberPrimitiveTyped header. The value follows via the raw writers.
    pub fn primitive_typed(self, primitive_type: PrimitiveType) -> Self {
        self.tag(RecordType::MemberPrimitiveTyped)
            .byte(primitive_type.to_wire_byte())
    }

    pub fn class_with_id(self, object_id: i32, metadata_id: i32) -> Self {
        self.tag(RecordType::ClassWithId)
            .int32(object_id)
            .int32(metadata_id)
    }

    pub fn class_with_members(
        self,
        object_id: i32,
        name: &str,
        members: &[&str],
        library_id: i32,
    ) -> Self {
        self.tag(RecordType::ClassWithMembers)
            .class_info(object_id, name, members.iter().copied())
            .int32(library_id)
    }

    pub fn system_class_with_members(self, object_id: i32, name: &str, members: &[&str]) -> Self {
        self.tag(RecordType::SystemClassWithMembers)
            .class_info(object_id, name, members.iter().copied())
    }

    pub fn class_with_members_and_types(
        self,
        object_id: i32,
        name: &str,
        members: &[Member],
        library_id: i32,
    ) -> Self {
        self.tag(RecordType::ClassWithMembersAndTypes)
            .class_info(object_id, name, members.iter().map(|m| m.name.as_str()))
            .member_type_info(members)
            .int32(library_id)
    }

    pub fn system_class_with_members_and_types(
        self,
        object_id: i32,
        name: &str,
        members: &[Member],
    ) -> Self {
        self.tag(RecordType::SystemClassWithMembersAndTypes)
            .class_info(object_id, name, members.iter().map(|m| m.name.as_str()))
            .member_type_info(members)
    }

    /// ArraySinglePrimitive header. `length` values follow.
    pub fn array_single_primitive(
        self,
        object_id: i32,
        length: i32,
        primitive_type: PrimitiveType,
    ) -> Self {
        self.tag(RecordType::ArraySinglePrimitive)
            .int32(object_id)
            .int32(length)
            .byte(primitive_type.to_wire_byte())
    }

    /// ArraySingleObject header. `length` slots of records follow.
    pub fn array_single_object(self, object_id: i32, length: i32) -> Self {
        self.tag(RecordType::ArraySingleObject)
            .int32(object_id)
            .int32(length)
    }

    /// ArraySingleString header. `length` slots of records follow.
    pub fn array_single_string(self, object_id: i32, length: i32) -> Self {
        self.tag(RecordType::ArraySingleString)
            .int32(object_id)
            .int32(length)
    }

    /// BinaryArray header. Lower bounds are written only when given.
    pub fn binary_array(
        self,
        object_id: i32,
        array_type: BinaryArrayType,
        lengths: &[i32],
        lower_bounds: &[i32],
        element_type: BinaryType,
        info: &MemberInfo,
    ) -> Self {
        let rank = i32::try_from(lengths.len()).unwrap_or(i32::MAX);
        let mut this = self
            .tag(RecordType::BinaryArray)
            .int32(object_id)
            .byte(array_type.to_wire_byte())
            .int32(rank);
        for &length in lengths {
            this = this.int32(length);
        }
        for &bound in lower_bounds {
            this = this.int32(bound);
        }
        this.byte(element_type.to_wire_byte()).member_info(info)
    }

    // ── Shared structures ─────────────────────────────────────────────

    fn class_info<'a>(
        self,
        object_id: i32,
        name: &str,
        members: impl ExactSizeIterator<Item = &'a str>,
    ) -> Self {
        let count = i32::try_from(members.len()).unwrap_or(i32::MAX);
        let mut this = self.int32(object_id).string(name).int32(count);
        for member in members {
            this = this.string(member);
        }
        this
    }

    fn member_type_info(self, members: &[Member]) -> Self {
        let mut this = self;
        for member in members {
            this = this.byte(member.binary_type.to_wire_byte());
        }
        for member in members {
            this = this.member_info(&member.info);
        }
        this
    }

    fn member_info(self, info: &MemberInfo) -> Self {
        match info {
            MemberInfo::None => self,
            MemberInfo::Primitive(t) => self.byte(t.to_wire_byte()),
            MemberInfo::SystemClass(name) => self.string(name),
            MemberInfo::Class(name, library_id) => self.string(name).int32(*library_id),
        }
    }
}
