use std::ops::Index;

use nrbf_types::{Record, RecordIndex};

/// Append-only store of every record decoded in one session, nested
/// ones included.
///
/// Records refer to each other through [`RecordIndex`], so the arena is
/// the single owner of the whole object graph.
#[derive(Clone, Debug, Default)]
pub struct RecordArena {
    records: Vec<Record>,
}

impl RecordArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) -> RecordIndex {
        let index = RecordIndex(self.records.len());
        self.records.push(record);
        index
    }

    #[must_use]
    pub fn get(&self, index: RecordIndex) -> Option<&Record> {
        self.records.get(index.0)
    }

    pub fn get_mut(&mut self, index: RecordIndex) -> Option<&mut Record> {
        self.records.get_mut(index.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordIndex, &Record)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (RecordIndex(i), record))
    }
}

impl Index<RecordIndex> for RecordArena {
    type Output = Record;

    fn index(&self, index: RecordIndex) -> &Record {
        &self.records[index.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_hands_out_sequential_indices() {
        let mut arena = RecordArena::new();
        assert!(arena.is_empty());
        let a = arena.push(Record::ObjectNull);
        let b = arena.push(Record::MessageEnd);
        assert_eq!(a, RecordIndex(0));
        assert_eq!(b, RecordIndex(1));
        assert_eq!(arena.len(), 2);
        assert_eq!(arena[b], Record::MessageEnd);
        assert!(arena.get(RecordIndex(2)).is_none());
        let order: Vec<_> = arena.iter().map(|(i, _)| i.0).collect();
        assert_eq!(order, [0, 1]);
    }
}
