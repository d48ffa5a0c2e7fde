#![no_main]

use libfuzzer_sys::fuzz_target;
use nrbf_decoder::DecoderOptions;
use nrbf_driver::{LiteralRenderer, StreamIter};

// Fuzz target: every stream in the input, end to end.
//
// Catches bugs in:
// - Record dispatch and nested value recursion
// - Null-run accounting
// - ClassWithId metadata chains
// - Backfill, cycle handling in crunch and literal rendering
fuzz_target!(|data: &[u8]| {
    for stream in StreamIter::new(data, DecoderOptions::default()) {
        let Ok(mut stream) = stream else {
            return;
        };
        let _ = LiteralRenderer::new(&stream).render_all();
        let _ = stream.crunch();
    }
});
