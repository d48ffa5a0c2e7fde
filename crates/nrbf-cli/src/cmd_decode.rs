//! Implementation of `nrbf decode`.
//!
//! Decodes every stream in the input and renders each one through
//! [`DefaultDriver`]. A single stream is written as one JSON document;
//! concatenated streams are written as a JSON array, one element per
//! stream.

use std::fs;
use std::io::{self, Write as _};

use anyhow::{Context, Result};
use nrbf_driver::{DefaultDriver, DriverConfig, NrbfDriver, OutputMode};
use serde_json::Value;

use crate::DecodeArgs;

/// Run the `nrbf decode` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read, any stream fails to
/// decode or render, or the output cannot be written.
pub fn run(args: &DecodeArgs) -> Result<()> {
    let bytes = args.input.read()?;
    let config = DriverConfig {
        options: args
            .input
            .decoder_options()
            .with_expand_metadata(args.expand),
        mode: output_mode(args),
        max_nodes: args.max_nodes,
    };

    let mut rendered = DefaultDriver
        .render_bytes(&bytes, &config)
        .with_context(|| format!("failed to decode {}", args.input.name()))?;
    let document = if rendered.len() == 1 {
        rendered.remove(0)
    } else {
        Value::Array(rendered)
    };

    let mut text = if args.pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    }
    .context("cannot serialize output")?;
    text.push('\n');

    if let Some(path) = &args.output {
        fs::write(path, text.as_bytes())
            .with_context(|| format!("cannot write {}", path.display()))?;
    } else {
        io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .context("cannot write to stdout")?;
    }
    Ok(())
}

/// The strongest requested view wins.
fn output_mode(args: &DecodeArgs) -> OutputMode {
    if args.crunch {
        OutputMode::Crunch
    } else if args.backfill {
        OutputMode::Backfill
    } else if args.root {
        OutputMode::Root
    } else {
        OutputMode::Records
    }
}
