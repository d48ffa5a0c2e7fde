use log::{debug, warn};
use nrbf_types::{
    AdditionalInfo, ArrayInfo, ArraySingle, ArraySinglePrimitive, BinaryArray, BinaryArrayType,
    BinaryLibrary, BinaryType, ClassInfo, ClassMetadata, ClassRecord, ClassWithId,
    MemberReference, MemberTypeInfo, PrimitiveType, Record, RecordIndex, RecordType, StreamHeader,
    Value,
};
use nrbf_wire::ByteCursor;

use crate::arena::RecordArena;
use crate::error::{DecodeError, DecodeWarning};
use crate::object_table::ObjectTable;
use crate::options::DecoderOptions;

/// Deepest chain of nested records accepted in member or element
/// position. Every level recurses, so this bounds stack use on hostile
/// input.
pub const MAX_NESTING_DEPTH: usize = 256;

/// What a decode session leaves behind once the cursor is released.
#[derive(Clone, Debug, Default)]
pub struct DecodeSession {
    pub arena: RecordArena,
    pub objects: ObjectTable,
    pub warnings: Vec<DecodeWarning>,
}

/// Record-at-a-time NRBF decoder.
///
/// Each call to [`decode_one_record`](Self::decode_one_record) reads one
/// tag, dispatches on it, and returns the arena slot of the finished
/// record. Nested member and element records are decoded recursively by
/// the same routine and land in the same arena. The only state carried
/// between calls is the cursor position, the arena and the object table.
///
/// ```text
///   ByteCursor ──▶ RecordType::read ──▶ read_<record> ──▶ RecordArena
///                                            │
///                                       ObjectTable
///                                 (bind / get_meta / pending)
/// ```
///
/// References are never resolved while decoding. Call
/// [`resolve_all`](Self::resolve_all) after the `MessageEnd` record.
pub struct RecordDecoder<'a> {
    cursor: ByteCursor<'a>,
    options: DecoderOptions,
    session: DecodeSession,
    depth: usize,
}

impl<'a> RecordDecoder<'a> {
    /// Start decoding at the beginning of `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8], options: DecoderOptions) -> Self {
        Self::from_cursor(ByteCursor::new(buf), options)
    }

    /// Continue from an existing cursor, e.g. at the start of the next
    /// concatenated stream. The options' length ceiling replaces the
    /// cursor's.
    #[must_use]
    pub fn from_cursor(cursor: ByteCursor<'a>, options: DecoderOptions) -> Self {
        Self {
            cursor: cursor.with_max_length(options.max_length),
            options,
            session: DecodeSession::default(),
            depth: 0,
        }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.cursor.has_remaining()
    }

    #[must_use]
    pub fn arena(&self) -> &RecordArena {
        &self.session.arena
    }

    #[must_use]
    pub fn objects(&self) -> &ObjectTable {
        &self.session.objects
    }

    #[must_use]
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.session.warnings
    }

    /// Backfill every queued reference. See [`ObjectTable::resolve_all`].
    ///
    /// # Errors
    ///
    /// [`DecodeError::DanglingReference`] if a target was never bound.
    pub fn resolve_all(&mut self) -> Result<usize, DecodeError> {
        self.session.objects.resolve_all(&mut self.session.arena)
    }

    /// Release the session and the cursor, positioned after the last
    /// record read.
    #[must_use]
    pub fn into_parts(self) -> (DecodeSession, ByteCursor<'a>) {
        (self.session, self.cursor)
    }

    /// Decode the next record.
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`]. The session is unusable afterwards.
    pub fn decode_one_record(&mut self) -> Result<RecordIndex, DecodeError> {
        let offset = self.cursor.position();
        let record_type = RecordType::read(&mut self.cursor)?;
        debug!("{record_type} at offset {offset}");

        match record_type {
            RecordType::SerializedStreamHeader => self.read_stream_header(offset),
            RecordType::ClassWithId => self.read_class_with_id(offset),
            RecordType::SystemClassWithMembers
            | RecordType::ClassWithMembers
            | RecordType::SystemClassWithMembersAndTypes
            | RecordType::ClassWithMembersAndTypes => self.read_class(record_type, offset),
            RecordType::BinaryObjectString => {
                let object_id = self.cursor.read_i32()?;
                let value = self.cursor.read_string()?;
                self.push_bound(Record::BinaryObjectString { object_id, value }, object_id, offset)
            }
            RecordType::BinaryArray => self.read_binary_array(offset),
            RecordType::MemberPrimitiveTyped => {
                let primitive_type = PrimitiveType::read(&mut self.cursor)?;
                let value = primitive_type.read_value(&mut self.cursor)?;
                Ok(self.push(Record::MemberPrimitiveTyped(value)))
            }
            RecordType::MemberReference => {
                let id_ref = self.cursor.read_i32()?;
                let slot = self.push(Record::MemberReference(MemberReference {
                    id_ref,
                    resolved: None,
                }));
                self.session
                    .objects
                    .add_pending_reference(slot, id_ref, offset);
                Ok(slot)
            }
            RecordType::ObjectNull => Ok(self.push(Record::ObjectNull)),
            RecordType::MessageEnd => Ok(self.push(Record::MessageEnd)),
            RecordType::BinaryLibrary => {
                let library = BinaryLibrary::read(&mut self.cursor)?;
                self.session.objects.add_library(&library);
                Ok(self.push(Record::BinaryLibrary(library)))
            }
            RecordType::ObjectNullMultiple256 => {
                let null_count = usize::from(self.cursor.read_u8()?);
                Ok(self.push(Record::ObjectNullMultiple256 { null_count }))
            }
            RecordType::ObjectNullMultiple => {
                let null_count = self.cursor.read_count("NullCount")?;
                Ok(self.push(Record::ObjectNullMultiple { null_count }))
            }
            RecordType::ArraySinglePrimitive => self.read_array_single_primitive(offset),
            RecordType::ArraySingleObject | RecordType::ArraySingleString => {
                self.read_array_single(record_type, offset)
            }
            RecordType::MethodCall | RecordType::MethodReturn => {
                Err(DecodeError::UnsupportedRecordType {
                    record_type,
                    offset,
                })
            }
        }
    }

    // ── Per-record routines ───────────────────────────────────────────

    fn read_stream_header(&mut self, offset: usize) -> Result<RecordIndex, DecodeError> {
        let header = StreamHeader::read(&mut self.cursor)?;
        if !header.is_supported_version() {
            let warning = DecodeWarning::VersionMismatch {
                major_version: header.major_version,
                minor_version: header.minor_version,
                offset,
            };
            warn!("{warning}");
            self.session.warnings.push(warning);
        }
        Ok(self.push(Record::SerializedStreamHeader(header)))
    }

    /// `ClassWithId`: an instance reusing an earlier class's metadata.
    fn read_class_with_id(&mut self, offset: usize) -> Result<RecordIndex, DecodeError> {
        let object_id = self.cursor.read_i32()?;
        let metadata_id = self.cursor.read_i32()?;
        let metadata = self
            .session
            .objects
            .get_meta(metadata_id, &self.session.arena, offset)?;

        let record = Record::ClassWithId(ClassWithId {
            object_id,
            metadata_id,
            metadata: self.options.expand_metadata.then(|| metadata.clone()),
            values: Vec::new(),
        });
        let index = self.push_bound(record, object_id, offset)?;
        let values = self.read_members(&metadata)?;
        self.attach_values(index, values);
        Ok(index)
    }

    /// The four class records that carry their own `ClassInfo`.
    ///
    /// ```text
    ///   SystemClassWithMembers          ClassInfo
    ///   ClassWithMembers                ClassInfo LibraryId
    ///   SystemClassWithMembersAndTypes  ClassInfo MemberTypeInfo
    ///   ClassWithMembersAndTypes        ClassInfo MemberTypeInfo LibraryId
    /// ```
    ///
    /// The record is bound before its members are read so that nested
    /// `ClassWithId` records can reuse its metadata.
    fn read_class(
        &mut self,
        record_type: RecordType,
        offset: usize,
    ) -> Result<RecordIndex, DecodeError> {
        let typed = matches!(
            record_type,
            RecordType::SystemClassWithMembersAndTypes | RecordType::ClassWithMembersAndTypes
        );
        let system = matches!(
            record_type,
            RecordType::SystemClassWithMembers | RecordType::SystemClassWithMembersAndTypes
        );

        let class_info = ClassInfo::read(&mut self.cursor)?;
        let member_type_info = if typed {
            Some(MemberTypeInfo::read(
                &mut self.cursor,
                class_info.member_count(),
            )?)
        } else {
            None
        };
        let library_id = if system {
            None
        } else {
            Some(self.cursor.read_i32()?)
        };

        let object_id = class_info.object_id;
        let metadata = ClassMetadata {
            class_info,
            member_type_info,
            library_id,
        };
        let class = ClassRecord {
            metadata: metadata.clone(),
            values: Vec::new(),
        };
        let record = match record_type {
            RecordType::SystemClassWithMembers => Record::SystemClassWithMembers(class),
            RecordType::ClassWithMembers => Record::ClassWithMembers(class),
            RecordType::SystemClassWithMembersAndTypes => {
                Record::SystemClassWithMembersAndTypes(class)
            }
            _ => Record::ClassWithMembersAndTypes(class),
        };

        let index = self.push_bound(record, object_id, offset)?;
        let values = self.read_members(&metadata)?;
        self.attach_values(index, values);
        Ok(index)
    }

    fn read_binary_array(&mut self, offset: usize) -> Result<RecordIndex, DecodeError> {
        let object_id = self.cursor.read_i32()?;
        let array_type = BinaryArrayType::read(&mut self.cursor)?;
        let rank = self.cursor.read_count("Rank")?;
        let mut lengths = Vec::with_capacity(rank.min(self.cursor.remaining()));
        for _ in 0..rank {
            lengths.push(self.cursor.read_count("Lengths")?);
        }
        let mut lower_bounds = Vec::new();
        if array_type.has_bounds() {
            for _ in 0..rank {
                lower_bounds.push(self.cursor.read_i32()?);
            }
        }
        let element_type = BinaryType::read(&mut self.cursor)?;
        let additional_info = element_type.read_additional_info(&mut self.cursor)?;

        if array_type.has_bounds() || rank > 1 {
            return Err(DecodeError::UnsupportedArray {
                array_type,
                rank,
                offset,
            });
        }

        let cells = lengths.iter().product();
        if element_type == BinaryType::Primitive {
            self.check_zero_width(additional_info.primitive_type(), cells, offset)?;
        }
        let values = self.read_slots(cells, |decoder, _| {
            decoder.read_value(element_type, &additional_info)
        })?;

        let record = Record::BinaryArray(BinaryArray {
            object_id,
            array_type,
            rank,
            lengths,
            lower_bounds,
            element_type,
            additional_info,
            values,
        });
        self.push_bound(record, object_id, offset)
    }

    fn read_array_single_primitive(&mut self, offset: usize) -> Result<RecordIndex, DecodeError> {
        let info = ArrayInfo::read(&mut self.cursor)?;
        let primitive_type = PrimitiveType::read(&mut self.cursor)?;
        self.check_zero_width(Some(primitive_type), info.length, offset)?;
        let mut values = Vec::with_capacity(info.length.min(self.cursor.remaining()));
        for _ in 0..info.length {
            values.push(primitive_type.read_value(&mut self.cursor)?);
        }
        let record = Record::ArraySinglePrimitive(ArraySinglePrimitive {
            info,
            primitive_type,
            values,
        });
        self.push_bound(record, info.object_id, offset)
    }

    /// `Null` elements read no bytes, so the input length is the only
    /// thing that can bound how many of them an array header declares.
    fn check_zero_width(
        &self,
        primitive_type: Option<PrimitiveType>,
        length: usize,
        offset: usize,
    ) -> Result<(), DecodeError> {
        let remaining = self.cursor.remaining();
        if primitive_type == Some(PrimitiveType::Null) && length > remaining {
            return Err(DecodeError::ZeroWidthOverrun {
                length,
                remaining,
                offset,
            });
        }
        Ok(())
    }

    /// `ArraySingleObject` and `ArraySingleString`: every element is a
    /// full record.
    fn read_array_single(
        &mut self,
        record_type: RecordType,
        offset: usize,
    ) -> Result<RecordIndex, DecodeError> {
        let info = ArrayInfo::read(&mut self.cursor)?;
        let values = self.read_slots(info.length, |decoder, _| decoder.read_nested_value())?;
        let array = ArraySingle { info, values };
        let record = if record_type == RecordType::ArraySingleString {
            Record::ArraySingleString(array)
        } else {
            Record::ArraySingleObject(array)
        };
        self.push_bound(record, info.object_id, offset)
    }

    // ── Values ────────────────────────────────────────────────────────

    /// Member values of a class, typed or not.
    fn read_members(&mut self, metadata: &ClassMetadata) -> Result<Vec<Value>, DecodeError> {
        match &metadata.member_type_info {
            Some(type_info) => {
                let members = &type_info.members;
                self.read_slots(members.len(), |decoder, slot| {
                    let member = &members[slot];
                    decoder.read_value(member.binary_type, &member.additional_info)
                })
            }
            None => self.read_slots(metadata.class_info.member_count(), |decoder, _| {
                decoder.read_nested_value()
            }),
        }
    }

    /// Value dispatch on the binary-type tag: `Primitive` is inline,
    /// everything else is a nested record.
    fn read_value(
        &mut self,
        binary_type: BinaryType,
        info: &AdditionalInfo,
    ) -> Result<Value, DecodeError> {
        match (binary_type, info) {
            (BinaryType::Primitive, AdditionalInfo::Primitive(primitive_type)) => Ok(
                Value::Primitive(primitive_type.read_value(&mut self.cursor)?),
            ),
            _ => self.read_nested_value(),
        }
    }

    /// Decode the record that fills a member or element slot.
    ///
    /// `BinaryLibrary` records may precede the value itself; they are
    /// registered and skipped. A header or `MessageEnd` cannot be a value.
    fn read_nested_value(&mut self) -> Result<Value, DecodeError> {
        loop {
            let offset = self.cursor.position();
            if self.depth >= MAX_NESTING_DEPTH {
                return Err(DecodeError::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH,
                    offset,
                });
            }
            self.depth += 1;
            let decoded = self.decode_one_record();
            self.depth -= 1;
            let index = decoded?;

            match self.session.arena[index].record_type() {
                RecordType::BinaryLibrary => {}
                record_type @ (RecordType::SerializedStreamHeader | RecordType::MessageEnd) => {
                    return Err(DecodeError::UnexpectedRecord {
                        record_type,
                        offset,
                    });
                }
                _ => return Ok(Value::Record(index)),
            }
        }
    }

    /// Fill `declared` slots, letting null-run records cover several at
    /// once. `next` receives the index of the first slot it fills.
    fn read_slots<F>(&mut self, declared: usize, mut next: F) -> Result<Vec<Value>, DecodeError>
    where
        F: FnMut(&mut Self, usize) -> Result<Value, DecodeError>,
    {
        let mut values = Vec::with_capacity(declared.min(self.cursor.remaining()));
        let mut filled = 0;
        while filled < declared {
            let offset = self.cursor.position();
            let value = next(self, filled)?;
            filled += self.slot_width(&value);
            if filled > declared {
                return Err(DecodeError::NullRunOverflow {
                    declared,
                    filled,
                    offset,
                });
            }
            values.push(value);
        }
        Ok(values)
    }

    fn slot_width(&self, value: &Value) -> usize {
        value
            .as_record()
            .and_then(|index| self.session.arena.get(index))
            .map_or(1, Record::slot_width)
    }

    // ── Arena and table plumbing ──────────────────────────────────────

    fn push(&mut self, record: Record) -> RecordIndex {
        self.session.arena.push(record)
    }

    fn push_bound(
        &mut self,
        record: Record,
        object_id: i32,
        offset: usize,
    ) -> Result<RecordIndex, DecodeError> {
        let index = self.push(record);
        self.session.objects.bind(object_id, index, offset)?;
        Ok(index)
    }

    fn attach_values(&mut self, index: RecordIndex, values: Vec<Value>) {
        if let Some(slot) = self
            .session
            .arena
            .get_mut(index)
            .and_then(Record::class_values_mut)
        {
            *slot = values;
        }
    }
}
