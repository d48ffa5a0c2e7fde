use nrbf_types::{ClassMetadata, MemberReference, Record, RecordIndex, Value};
use serde_json::{Map, Value as Json};

use crate::budget::NodeBudget;
use crate::error::DriverError;
use crate::json::primitive_to_json;
use crate::render_literal::LiteralRenderer;
use crate::stream::DecodedStream;

/// Reduces a backfilled object graph to plain JSON values.
///
/// ```text
/// ┌───────────────────────────┬──────────────────────────────────────────┐
/// │ Record                    │ Crunched                                 │
/// ├───────────────────────────┼──────────────────────────────────────────┤
/// │ any class record          │ {member name: crunched value}, no nulls  │
/// │ BinaryObjectString        │ its string                               │
/// │ MemberPrimitiveTyped      │ its primitive                            │
/// │ MemberReference           │ its target, crunched                     │
/// │ ObjectNull                │ null                                     │
/// │ arrays                    │ list, each null run expanded to k nulls  │
/// │ anything else             │ literal rendering, minimized             │
/// └───────────────────────────┴──────────────────────────────────────────┘
/// ```
///
/// A reference back into an object that is still being crunched would
/// recurse forever. It is rendered as `{"$ref": <object id>}` instead.
/// Every emitted node is charged to a [`NodeBudget`].
pub struct Cruncher<'s> {
    stream: &'s DecodedStream,
    active: Vec<RecordIndex>,
    budget: NodeBudget,
}

impl<'s> Cruncher<'s> {
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

    /// Crunch the record at `index` and everything reachable from it.
    ///
    /// # Errors
    ///
    /// [`DriverError::OutputTooLarge`] when the output would pass the
    /// node limit.
    pub fn crunch(&mut self, index: RecordIndex) -> Result<Json, DriverError> {
        let Some(record) = self.stream.arena().get(index) else {
            return Ok(Json::Null);
        };
        self.budget.charge(1)?;
        if self.active.contains(&index) {
            let mut cycle = Map::new();
            cycle.insert("$ref".into(), record.object_id().map_or(Json::Null, Json::from));
            return Ok(Json::Object(cycle));
        }

        self.active.push(index);
        let crunched = match record {
            Record::BinaryObjectString { value, .. } => Json::String(value.clone()),
            Record::MemberPrimitiveTyped(value) => primitive_to_json(value),
            Record::ObjectNull
            | Record::ObjectNullMultiple256 { .. }
            | Record::ObjectNullMultiple { .. } => Json::Null,
            Record::MemberReference(MemberReference {
                resolved: Some(target),
                ..
            }) => self.crunch(*target)?,
            Record::BinaryArray(array) => self.crunch_slots(&array.values)?,
            Record::ArraySingleObject(array) | Record::ArraySingleString(array) => {
                self.crunch_slots(&array.values)?
            }
            Record::ArraySinglePrimitive(array) => {
                self.budget.charge(array.values.len())?;
                Json::Array(array.values.iter().map(primitive_to_json).collect())
            }
            record if record.is_class() => self.crunch_class(record)?,
            _ => minimize(&LiteralRenderer::new(self.stream).render(index)?),
        };
        self.active.pop();
        Ok(crunched)
    }

    fn crunch_value(&mut self, value: &Value) -> Result<Json, DriverError> {
        match value {
            Value::Primitive(p) => {
                self.budget.charge(1)?;
                Ok(primitive_to_json(p))
            }
            Value::Record(index) => self.crunch(*index),
        }
    }

    /// Member names come from the record's own metadata, or from the
    /// class a `ClassWithId` borrows its shape from.
    fn crunch_class(&mut self, record: &Record) -> Result<Json, DriverError> {
        let metadata = self.class_metadata(record);
        let names = metadata
            .as_ref()
            .map_or(&[][..], |m| m.class_info.member_names.as_slice());

        let mut map = Map::new();
        let mut member = 0;
        for value in record.class_values().unwrap_or_default() {
            let width = self.slot_width(value);
            if width == 1 {
                let crunched = self.crunch_value(value)?;
                if !crunched.is_null() {
                    let name = names
                        .get(member)
                        .cloned()
                        .unwrap_or_else(|| member.to_string());
                    map.insert(name, crunched);
                }
            }
            member += width;
        }
        Ok(Json::Object(map))
    }

    fn crunch_slots(&mut self, values: &[Value]) -> Result<Json, DriverError> {
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            match self.slot_width(value) {
                1 => out.push(self.crunch_value(value)?),
                width => {
                    self.budget.charge(width)?;
                    out.extend(std::iter::repeat_n(Json::Null, width));
                }
            }
        }
        Ok(Json::Array(out))
    }

    fn slot_width(&self, value: &Value) -> usize {
        value
            .as_record()
            .and_then(|index| self.stream.arena().get(index))
            .map_or(1, Record::slot_width)
    }

    fn class_metadata(&self, record: &Record) -> Option<ClassMetadata> {
        if let Some(meta) = record.class_metadata() {
            return Some(meta.clone());
        }
        match record {
            Record::ClassWithId(class) => self
                .stream
                .objects()
                .get_meta(class.metadata_id, self.stream.arena(), 0)
                .ok(),
            _ => None,
        }
    }
}

/// Drop every `null` map entry, recursively. List elements are kept so
/// positions stay meaningful.
///
/// Applying it to its own output changes nothing.
#[must_use]
pub fn minimize(value: &Json) -> Json {
    match value {
        Json::Object(map) => Json::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), minimize(v)))
                .collect(),
        ),
        Json::Array(items) => Json::Array(items.iter().map(minimize).collect()),
        other => other.clone(),
    }
}
