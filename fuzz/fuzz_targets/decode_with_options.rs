#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nrbf_decoder::DecoderOptions;
use nrbf_driver::{DefaultDriver, DriverConfig, NrbfDriver, OutputMode};

#[derive(Arbitrary, Debug)]
enum Mode {
    Records,
    Root,
    Backfill,
    Crunch,
}

#[derive(Arbitrary, Debug)]
struct Input {
    expand_metadata: bool,
    max_length: Option<u16>,
    mode: Mode,
    data: Vec<u8>,
}

// Fuzz target: the driver under every configuration.
//
// Catches bugs in:
// - Metadata expansion on ClassWithId
// - Small length ceilings
// - Each output mode's root lookup and rendering
fuzz_target!(|input: Input| {
    let config = DriverConfig {
        options: DecoderOptions::default()
            .with_expand_metadata(input.expand_metadata)
            .with_max_length(input.max_length.map(usize::from)),
        mode: match input.mode {
            Mode::Records => OutputMode::Records,
            Mode::Root => OutputMode::Root,
            Mode::Backfill => OutputMode::Backfill,
            Mode::Crunch => OutputMode::Crunch,
        },
        max_nodes: 1 << 16,
    };
    let _ = DefaultDriver.render_bytes(&input.data, &config);
});
