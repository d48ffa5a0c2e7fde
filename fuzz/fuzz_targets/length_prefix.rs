#![no_main]

use libfuzzer_sys::fuzz_target;
use nrbf_wire::ByteCursor;

// Fuzz target: 7-bit length prefix and LengthPrefixedString.
//
// Catches bugs in:
// - Prefixes running past five groups
// - Lengths above the cursor ceiling
// - Truncated payloads and invalid UTF-8
fuzz_target!(|data: &[u8]| {
    let mut cursor = ByteCursor::new(data);
    if let Ok(length) = nrbf_wire::varint::read_length_prefix(&mut cursor) {
        assert!(length <= nrbf_wire::DEFAULT_MAX_LENGTH);
    }
    let _ = ByteCursor::new(data).read_string();
});
