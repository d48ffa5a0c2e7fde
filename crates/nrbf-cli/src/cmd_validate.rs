//! Implementation of `nrbf validate`.
//!
//! Decodes every stream, finds its root and runs the backfill pass, the
//! same work `decode --backfill` does before rendering. Prints `✓` lines
//! for each stream that passes and one `✗` line for the first failure.
//!
//! # Success output
//!
//! ```text
//! ✓ Stream 0: header v1.0, root 1 found
//! ✓ Stream 0: 5 top-level records, 4 objects, 2 references resolved
//! ```
//!
//! # Failure output
//!
//! ```text
//! ✗ Stream 0: reference to undefined object id 9 at offset 212
//! ```

use anyhow::{Result, anyhow};
use nrbf_driver::{DecodedStream, DriverError, StreamIter};

use crate::InputArgs;

/// Run the `nrbf validate` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or any stream fails.
pub fn run(args: &InputArgs) -> Result<()> {
    let bytes = args.read()?;
    if bytes.is_empty() {
        println!("✗ {}: empty input", args.name());
        return Err(anyhow!("validation failed"));
    }

    for (n, stream) in StreamIter::new(&bytes, args.decoder_options()).enumerate() {
        match stream.and_then(|mut stream| check(&mut stream).map(|()| stream)) {
            Ok(stream) => report(n, &stream),
            Err(e) => {
                println!("✗ Stream {n}: {e}");
                return Err(anyhow!("validation failed"));
            }
        }
    }
    Ok(())
}

fn check(stream: &mut DecodedStream) -> Result<(), DriverError> {
    stream.root()?;
    stream.backfill()?;
    Ok(())
}

fn report(n: usize, stream: &DecodedStream) {
    if let Some(header) = stream.header() {
        println!(
            "✓ Stream {n}: header v{}.{}, root {} found",
            header.major_version, header.minor_version, header.root_id
        );
    }
    for warning in stream.warnings() {
        println!("! Stream {n}: {warning}");
    }
    println!(
        "✓ Stream {n}: {} top-level records, {} objects, {} references resolved",
        stream.records().len(),
        stream.object_definitions(),
        stream.object_references()
    );
}
