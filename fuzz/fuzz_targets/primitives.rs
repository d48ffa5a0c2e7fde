#![no_main]

use libfuzzer_sys::fuzz_target;
use nrbf_types::PrimitiveType;
use nrbf_wire::ByteCursor;

// Fuzz target: primitive decoder, tag chosen by the first byte.
//
// Catches bugs in:
// - Char lead-byte width handling
// - Decimal text validation
// - DateTime kind bits and calendar conversion
fuzz_target!(|data: &[u8]| {
    let Some((&tag, rest)) = data.split_first() else {
        return;
    };
    let Ok(primitive_type) = PrimitiveType::from_wire_byte(tag, 0) else {
        return;
    };
    let mut cursor = ByteCursor::new(rest);
    if let Ok(nrbf_types::PrimitiveValue::DateTime(dt)) = primitive_type.read_value(&mut cursor) {
        let _ = dt.to_naive();
    }
});
