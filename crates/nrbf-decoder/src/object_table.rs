use std::collections::{BTreeMap, HashMap};

use log::{debug, trace};
use nrbf_types::{BinaryLibrary, ClassMetadata, Record, RecordIndex};

use crate::arena::RecordArena;
use crate::error::DecodeError;

/// A reference waiting for the backfill pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingReference {
    /// Arena slot of the `MemberReference` record to patch.
    slot: RecordIndex,
    /// ObjectId it points at.
    target: i32,
    /// Offset of the reference record, for diagnostics.
    offset: usize,
}

/// ObjectId bindings, the library table and the backfill queue of one
/// decode session.
///
/// ```text
///   objects:  ObjectId ──▶ RecordIndex   (bound once, never rebound)
///   libraries: LibraryId ──▶ name        (separate namespace)
///   pending:  [(slot, target id), …]      (resolved after the stream ends)
/// ```
///
/// A table belongs to exactly one stream. Concatenated streams each get
/// a fresh one.
#[derive(Clone, Debug, Default)]
pub struct ObjectTable {
    objects: HashMap<i32, RecordIndex>,
    libraries: BTreeMap<i32, String>,
    pending: Vec<PendingReference>,
}

impl ObjectTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `object_id` to an arena slot.
    ///
    /// # Errors
    ///
    /// [`DecodeError::DuplicateObjectId`] if the id is already bound.
    pub fn bind(
        &mut self,
        object_id: i32,
        index: RecordIndex,
        offset: usize,
    ) -> Result<(), DecodeError> {
        if self.objects.contains_key(&object_id) {
            return Err(DecodeError::DuplicateObjectId { object_id, offset });
        }
        self.objects.insert(object_id, index);
        Ok(())
    }

    /// # Errors
    ///
    /// [`DecodeError::UnknownObjectId`] if nothing is bound to the id.
    pub fn get(&self, object_id: i32, offset: usize) -> Result<RecordIndex, DecodeError> {
        self.objects
            .get(&object_id)
            .copied()
            .ok_or(DecodeError::UnknownObjectId { object_id, offset })
    }

    /// Class metadata of a bound object, without its member values.
    ///
    /// A `ClassWithId` record has no metadata of its own unless it was
    /// expanded, so the lookup follows its metadata id until it reaches
    /// a class that does.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::UnknownObjectId`] if any id on the way is unbound.
    /// - [`DecodeError::NotAClass`] if it lands on a non-class record, or
    ///   the chain of `ClassWithId` records loops.
    pub fn get_meta(
        &self,
        object_id: i32,
        arena: &RecordArena,
        offset: usize,
    ) -> Result<ClassMetadata, DecodeError> {
        let mut id = object_id;
        // A chain can visit each bound object at most once.
        for _ in 0..=self.objects.len() {
            let record = arena.get(self.get(id, offset)?);
            if let Some(meta) = record.and_then(Record::class_metadata) {
                return Ok(meta.clone());
            }
            match record {
                Some(Record::ClassWithId(class)) => id = class.metadata_id,
                _ => return Err(DecodeError::NotAClass { object_id: id, offset }),
            }
        }
        Err(DecodeError::NotAClass { object_id, offset })
    }

    /// Queue a reference for backfill. Never resolves anything here.
    pub fn add_pending_reference(&mut self, slot: RecordIndex, target: i32, offset: usize) {
        trace!("reference to object {target} queued from offset {offset}");
        self.pending.push(PendingReference {
            slot,
            target,
            offset,
        });
    }

    /// Patch every queued reference with the arena slot of its target.
    ///
    /// Only meaningful once the whole stream is decoded: forward
    /// references are legal, so a target may be bound after the
    /// reference that names it. Returns the number of references patched.
    ///
    /// # Errors
    ///
    /// [`DecodeError::DanglingReference`] for the first reference whose
    /// target was never bound.
    pub fn resolve_all(&self, arena: &mut RecordArena) -> Result<usize, DecodeError> {
        for pending in &self.pending {
            let target = self.objects.get(&pending.target).copied().ok_or(
                DecodeError::DanglingReference {
                    object_id: pending.target,
                    offset: pending.offset,
                },
            )?;
            trace!("resolving reference to object {}", pending.target);
            if let Some(Record::MemberReference(reference)) = arena.get_mut(pending.slot) {
                reference.resolved = Some(target);
            }
        }
        debug!("resolved {} references", self.pending.len());
        Ok(self.pending.len())
    }

    /// Record a library. A repeated id keeps the latest name.
    pub fn add_library(&mut self, library: &BinaryLibrary) {
        self.libraries
            .insert(library.library_id, library.library_name.clone());
    }

    #[must_use]
    pub fn library(&self, library_id: i32) -> Option<&str> {
        self.libraries.get(&library_id).map(String::as_str)
    }

    #[must_use]
    pub fn libraries(&self) -> &BTreeMap<i32, String> {
        &self.libraries
    }

    /// Number of bound object ids.
    #[must_use]
    pub fn object_definitions(&self) -> usize {
        self.objects.len()
    }

    /// Number of references registered for backfill.
    #[must_use]
    pub fn object_references(&self) -> usize {
        self.pending.len()
    }
}
