use std::collections::BTreeMap;

use log::{debug, info};
use nrbf_decoder::{
    DecodeSession, DecodeWarning, DecoderOptions, ObjectTable, RecordArena, RecordDecoder,
};
use nrbf_types::{Record, RecordIndex, StreamHeader};
use nrbf_wire::ByteCursor;

use crate::error::DriverError;

/// One fully decoded NRBF stream: header to `MessageEnd`.
///
/// Holds the arena every record of the stream lives in, the object
/// table, and the slots of the top-level records in wire order. The
/// `MessageEnd` record is always the last top-level record.
#[derive(Clone, Debug)]
pub struct DecodedStream {
    session: DecodeSession,
    records: Vec<RecordIndex>,
    backfilled: bool,
}

impl DecodedStream {
    /// Slots of the top-level records, header first.
    #[must_use]
    pub fn records(&self) -> &[RecordIndex] {
        &self.records
    }

    /// Top-level records in wire order.
    pub fn top_level(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter_map(|&index| self.session.arena.get(index))
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

    #[must_use]
    pub fn libraries(&self) -> &BTreeMap<i32, String> {
        self.session.objects.libraries()
    }

    #[must_use]
    pub fn object_definitions(&self) -> usize {
        self.session.objects.object_definitions()
    }

    #[must_use]
    pub fn object_references(&self) -> usize {
        self.session.objects.object_references()
    }

    /// `true` once [`backfill`](Self::backfill) has patched every
    /// reference.
    #[must_use]
    pub fn is_backfilled(&self) -> bool {
        self.backfilled
    }

    /// The stream header, if the stream starts with one.
    #[must_use]
    pub fn header(&self) -> Option<&StreamHeader> {
        match self.top_level().next() {
            Some(Record::SerializedStreamHeader(header)) => Some(header),
            _ => None,
        }
    }

    /// Slot of the root object named by the header.
    ///
    /// The first top-level record defining the root id wins. A root that
    /// only occurs nested inside another record is found through the
    /// object table.
    ///
    /// # Errors
    ///
    /// - [`DriverError::MissingHeader`] if the first record is not a header.
    /// - [`DriverError::RootNotFound`] if no record defines the root id.
    pub fn root(&self) -> Result<RecordIndex, DriverError> {
        let root_id = self.header().ok_or(DriverError::MissingHeader)?.root_id;
        self.records
            .iter()
            .copied()
            .find(|&index| self.session.arena[index].object_id() == Some(root_id))
            .or_else(|| self.session.objects.get(root_id, 0).ok())
            .ok_or(DriverError::RootNotFound { root_id })
    }

    /// Resolve every reference, then return the root's slot.
    ///
    /// Resolution runs once. Later calls only look the root up again.
    ///
    /// # Errors
    ///
    /// [`DriverError::Decode`] wrapping a dangling reference, or any
    /// error from [`root`](Self::root).
    pub fn backfill(&mut self) -> Result<RecordIndex, DriverError> {
        if !self.backfilled {
            let DecodeSession { arena, objects, .. } = &mut self.session;
            objects.resolve_all(arena)?;
            self.backfilled = true;
        }
        self.root()
    }

    /// Backfill, then reduce the root to plain JSON values.
    ///
    /// # Errors
    ///
    /// Any error from [`backfill`](Self::backfill), or
    /// [`DriverError::OutputTooLarge`] from the cruncher.
    pub fn crunch(&mut self) -> Result<serde_json::Value, DriverError> {
        let root = self.backfill()?;
        crate::crunch::Cruncher::new(self).crunch(root)
    }
}

/// Decode one stream from the start of `bytes`.
///
/// Trailing bytes after the `MessageEnd` record are ignored. Use
/// [`StreamIter`] to decode every stream of a concatenated buffer.
///
/// # Errors
///
/// [`DriverError::Decode`] for any fatal decode error, including input
/// that ends before `MessageEnd`.
pub fn decode_stream(bytes: &[u8], options: DecoderOptions) -> Result<DecodedStream, DriverError> {
    decode_stream_from(ByteCursor::new(bytes), options).map(|(stream, _)| stream)
}

/// Decode one stream starting at `cursor` and hand the cursor back,
/// positioned just past the stream's `MessageEnd`.
///
/// # Errors
///
/// [`DriverError::Decode`] for any fatal decode error.
pub fn decode_stream_from(
    cursor: ByteCursor<'_>,
    options: DecoderOptions,
) -> Result<(DecodedStream, ByteCursor<'_>), DriverError> {
    let start = cursor.position();
    let mut decoder = RecordDecoder::from_cursor(cursor, options);
    let mut records = Vec::new();
    loop {
        let index = decoder.decode_one_record()?;
        records.push(index);
        if matches!(decoder.arena()[index], Record::MessageEnd) {
            break;
        }
    }
    debug!(
        "stream at offset {start} ends at offset {}",
        decoder.position()
    );

    let (session, cursor) = decoder.into_parts();
    let stream = DecodedStream {
        session,
        records,
        backfilled: false,
    };
    info!(
        "decoded {} top-level records: {} object definitions, {} references",
        stream.records.len(),
        stream.object_definitions(),
        stream.object_references()
    );
    Ok((stream, cursor))
}

/// Iterator over the streams of a buffer holding several NRBF streams
/// back to back.
///
/// Every stream gets a fresh decode session: object ids and libraries
/// never leak from one stream into the next. Iteration stops after the
/// last complete stream or after the first error.
///
/// ```text
/// ┌──────── stream 1 ────────┐┌──────── stream 2 ────────┐
/// │ Header … MessageEnd      ││ Header … MessageEnd      │
/// └──────────────────────────┘└──────────────────────────┘
/// ```
pub struct StreamIter<'a> {
    cursor: Option<ByteCursor<'a>>,
    options: DecoderOptions,
}

impl<'a> StreamIter<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8], options: DecoderOptions) -> Self {
        Self {
            cursor: Some(ByteCursor::new(bytes)),
            options,
        }
    }
}

impl Iterator for StreamIter<'_> {
    type Item = Result<DecodedStream, DriverError>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.take()?;
        if !cursor.has_remaining() {
            return None;
        }
        match decode_stream_from(cursor, self.options) {
            Ok((stream, rest)) => {
                self.cursor = Some(rest);
                Some(Ok(stream))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
