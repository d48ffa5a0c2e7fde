use nrbf_decoder::DecoderOptions;

use crate::budget::DEFAULT_MAX_NODES;

/// Configuration for the NRBF driver.
///
/// ```text
/// ┌───────────┬────────────────────────────────────────────────────────┐
/// │ Field     │ Purpose                                                │
/// ├───────────┼────────────────────────────────────────────────────────┤
/// │ options   │ Decoder settings: metadata expansion, length ceiling   │
/// │ mode      │ Which view of each decoded stream to produce           │
/// │ max_nodes │ JSON nodes one stream's rendering may emit             │
/// └───────────┴────────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriverConfig {
    pub options: DecoderOptions,
    pub mode: OutputMode,
    pub max_nodes: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            options: DecoderOptions::default(),
            mode: OutputMode::default(),
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

/// The view a driver produces for each stream.
///
/// Each mode builds on the previous one:
///
/// ```text
/// ┌──────────┬────────────────────────────────────────────────────────┐
/// │ Mode     │ Output                                                 │
/// ├──────────┼────────────────────────────────────────────────────────┤
/// │ Records  │ Every top-level record, literal, in wire order         │
/// │ Root     │ The root object's record, literal                      │
/// │ Backfill │ The root record with references replaced by targets    │
/// │ Crunch   │ The backfilled root minimized to plain values          │
/// └──────────┴────────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Records,
    Root,
    Backfill,
    Crunch,
}

impl OutputMode {
    /// Whether references must be resolved before rendering.
    #[must_use]
    pub fn resolves_references(self) -> bool {
        matches!(self, Self::Backfill | Self::Crunch)
    }
}
