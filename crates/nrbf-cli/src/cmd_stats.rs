//! Implementation of `nrbf stats`.
//!
//! Counts every record of every stream, nested ones included, and
//! reports the object table of each stream.
//!
//! # Example output
//!
//! ```text
//! Input:   customer.bin  (412 bytes, 1 stream)
//!
//! Record type                       Count
//! ────────────────────────────────────────
//! SerializedStreamHeader                1
//! BinaryLibrary                         1
//! ClassWithMembersAndTypes              2
//! BinaryObjectString                    2
//! ────────────────────────────────────────
//! Total                                 6
//!
//! Stream 0: 5 objects, 2 references, 1 library
//!   library 2: "Shop, Version=1.0.0.0"
//! ```

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use nrbf_driver::StreamIter;
use nrbf_types::RecordType;
use serde::Serialize;

use crate::StatsArgs;

/// Machine-readable form of the report, printed by `--json`.
#[derive(Debug, Default, Serialize)]
pub struct StatsReport {
    pub input_bytes: usize,
    pub record_types: BTreeMap<String, usize>,
    pub total_records: usize,
    pub streams: Vec<StreamStats>,
}

#[derive(Debug, Serialize)]
pub struct StreamStats {
    pub root_id: Option<i32>,
    pub top_level_records: usize,
    pub object_definitions: usize,
    pub object_references: usize,
    pub libraries: BTreeMap<i32, String>,
    pub warnings: Vec<String>,
}

/// Run the `nrbf stats` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or a stream fails to
/// decode.
pub fn run(args: &StatsArgs) -> Result<()> {
    let bytes = args.input.read()?;
    let report = collect(&bytes, &args.input)?;

    if args.json {
        let text = serde_json::to_string_pretty(&report).context("cannot serialize report")?;
        println!("{text}");
    } else {
        print_report(&args.input.name(), &report);
    }
    Ok(())
}

fn collect(bytes: &[u8], input: &crate::InputArgs) -> Result<StatsReport> {
    let mut report = StatsReport {
        input_bytes: bytes.len(),
        ..StatsReport::default()
    };

    for (n, stream) in StreamIter::new(bytes, input.decoder_options()).enumerate() {
        let stream =
            stream.with_context(|| format!("failed to decode stream {n} of {}", input.name()))?;
        for (_, record) in stream.arena().iter() {
            let name = record.record_type().name().to_string();
            *report.record_types.entry(name).or_default() += 1;
            report.total_records += 1;
        }
        report.streams.push(StreamStats {
            root_id: stream.header().map(|h| h.root_id),
            top_level_records: stream.records().len(),
            object_definitions: stream.object_definitions(),
            object_references: stream.object_references(),
            libraries: stream.libraries().clone(),
            warnings: stream.warnings().iter().map(ToString::to_string).collect(),
        });
    }

    Ok(report)
}

fn print_report(name: &str, report: &StatsReport) {
    let streams = report.streams.len();
    println!(
        "Input:   {name}  ({} bytes, {streams} stream{})",
        report.input_bytes,
        if streams == 1 { "" } else { "s" }
    );
    println!();

    let sep = "─".repeat(40);
    println!("{:<32}{:>8}", "Record type", "Count");
    println!("{sep}");
    for record_type in RecordType::ALL {
        if let Some(count) = report.record_types.get(record_type.name()) {
            println!("{:<32}{count:>8}", record_type.name());
        }
    }
    println!("{sep}");
    println!("{:<32}{:>8}", "Total", report.total_records);

    for (n, stream) in report.streams.iter().enumerate() {
        println!();
        let libraries = stream.libraries.len();
        println!(
            "Stream {n}: {} objects, {} references, {libraries} librar{}",
            stream.object_definitions,
            stream.object_references,
            if libraries == 1 { "y" } else { "ies" }
        );
        for (id, library) in &stream.libraries {
            println!("  library {id}: {library:?}");
        }
        for warning in &stream.warnings {
            println!("  warning: {warning}");
        }
    }
}
