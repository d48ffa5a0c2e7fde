//! Hand-built NRBF byte fixtures for tests and benchmarks.
//!
//! Nothing here is a supported encoder. [`StreamBuilder`] writes exactly
//! the bytes it is told to, including malformed ones.

pub mod fixture;

pub use fixture::{Member, MemberInfo, StreamBuilder};

use std::path::Path;

/// Load a golden fixture from `tests/golden/`, stored as hex text.
/// Whitespace in the file is ignored.
///
/// # Panics
///
/// If the file is missing or is not valid hex.
#[must_use]
pub fn golden(name: &str) -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/golden")
        .join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read golden fixture {}: {e}", path.display()));
    let digits: String = text.split_whitespace().collect();
    hex::decode(&digits)
        .unwrap_or_else(|e| panic!("golden fixture {} is not hex: {e}", path.display()))
}
