//! Implementation of `nrbf inspect`.
//!
//! # Output format
//!
//! ```text
//! Stream 0: NRBF v1.0, root 1, 5 records
//!   #0  SerializedStreamHeader          root=1
//!   #1  BinaryLibrary                   lib=2 "Shop, Version=1.0.0.0"
//!   #2  ClassWithMembersAndTypes        id=1 "Shop.Customer" (6 members)
//!   #3  BinaryArray                     id=4 Single [3] of Class
//!   #4  MessageEnd
//! ```
//!
//! With `--nested`, records decoded inside members and elements follow
//! their parent, indented one level per depth.

use anyhow::{Context, Result};
use nrbf_driver::{DecodedStream, StreamIter};
use nrbf_types::{Record, RecordIndex, Value};

use crate::InspectArgs;

/// Run the `nrbf inspect` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or a stream fails to
/// decode. Streams before the failing one are still printed.
pub fn run(args: &InspectArgs) -> Result<()> {
    let bytes = args.input.read()?;

    for (n, stream) in StreamIter::new(&bytes, args.input.decoder_options()).enumerate() {
        let stream = stream.with_context(|| {
            format!("failed to decode stream {n} of {}", args.input.name())
        })?;

        let header = stream.header().map_or_else(
            || "no header".to_string(),
            |h| {
                format!(
                    "NRBF v{}.{}, root {}",
                    h.major_version, h.minor_version, h.root_id
                )
            },
        );
        let count = stream.records().len();
        println!(
            "Stream {n}: {header}, {count} record{}",
            if count == 1 { "" } else { "s" }
        );
        for warning in stream.warnings() {
            println!("  warning: {warning}");
        }

        for (i, &index) in stream.records().iter().enumerate() {
            print_record(&stream, index, &format!("#{i}"), 1, args.nested);
        }
    }
    Ok(())
}

fn print_record(stream: &DecodedStream, index: RecordIndex, label: &str, depth: usize, nested: bool) {
    let record = &stream.arena()[index];
    let indent = "  ".repeat(depth);
    let detail = describe(record);
    let line = format!("{indent}{label:<4}{:<32}{detail}", record.record_type().name());
    println!("{}", line.trim_end());

    if !nested {
        return;
    }
    let values: &[Value] = match record {
        Record::BinaryArray(a) => &a.values,
        Record::ArraySingleObject(a) | Record::ArraySingleString(a) => &a.values,
        other => other.class_values().unwrap_or_default(),
    };
    for child in values.iter().filter_map(Value::as_record) {
        print_record(stream, child, "-", depth + 1, nested);
    }
}

/// The identifying fields of a record, on one line.
fn describe(record: &Record) -> String {
    match record {
        Record::SerializedStreamHeader(h) => format!("root={}", h.root_id),
        Record::ClassWithId(c) => format!("id={} metadata={}", c.object_id, c.metadata_id),
        Record::SystemClassWithMembers(c)
        | Record::ClassWithMembers(c)
        | Record::SystemClassWithMembersAndTypes(c)
        | Record::ClassWithMembersAndTypes(c) => {
            let info = &c.metadata.class_info;
            let members = info.member_count();
            format!(
                "id={} {:?} ({members} member{})",
                info.object_id,
                info.name,
                if members == 1 { "" } else { "s" }
            )
        }
        Record::BinaryObjectString { object_id, value } => {
            format!("id={object_id} {:?}", truncate(value, 40))
        }
        Record::BinaryArray(a) => format!(
            "id={} {} {:?} of {}",
            a.object_id, a.array_type, a.lengths, a.element_type
        ),
        Record::MemberPrimitiveTyped(v) => format!("{} {v:?}", v.primitive_type()),
        Record::MemberReference(r) => format!("ref={}", r.id_ref),
        Record::BinaryLibrary(l) => format!("lib={} {:?}", l.library_id, l.library_name),
        Record::ObjectNullMultiple256 { null_count } | Record::ObjectNullMultiple { null_count } => {
            format!("count={null_count}")
        }
        Record::ArraySinglePrimitive(a) => format!(
            "id={} {}[{}]",
            a.info.object_id, a.primitive_type, a.info.length
        ),
        Record::ArraySingleObject(a) | Record::ArraySingleString(a) => {
            format!("id={} length={}", a.info.object_id, a.info.length)
        }
        Record::ObjectNull | Record::MessageEnd => String::new(),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &s[..cut]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé…");
        assert_eq!(truncate("short", 40), "short");
    }
}
