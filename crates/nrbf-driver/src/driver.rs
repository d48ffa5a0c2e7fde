use serde_json::Value as Json;

use crate::config::{DriverConfig, OutputMode};
use crate::crunch::Cruncher;
use crate::error::DriverError;
use crate::render_literal::LiteralRenderer;
use crate::stream::{DecodedStream, StreamIter};

/// Turns NRBF bytes into JSON.
///
/// ```text
/// &[u8] ──▶ StreamIter ──▶ DecodedStream ──▶ NrbfDriver::render() ──▶ JSON
///                                                   │
///                                             DriverConfig
///                                           (options, mode)
/// ```
pub trait NrbfDriver {
    /// Render one decoded stream in the configured mode.
    ///
    /// Takes the stream mutably because the backfill and crunch modes
    /// resolve its references first.
    ///
    /// # Errors
    ///
    /// Any [`DriverError`] the chosen view can raise: a missing header or
    /// root, a dangling reference during backfill, or output past the
    /// node limit.
    fn render(&self, stream: &mut DecodedStream, config: &DriverConfig)
    -> Result<Json, DriverError>;

    /// Decode every stream in `bytes` and render each one.
    ///
    /// # Errors
    ///
    /// The first decode or render error, from whichever stream hit it.
    fn render_bytes(&self, bytes: &[u8], config: &DriverConfig) -> Result<Vec<Json>, DriverError> {
        StreamIter::new(bytes, config.options)
            .map(|stream| self.render(&mut stream?, config))
            .collect()
    }
}

/// Dispatches on [`OutputMode`]:
///
/// ```text
/// ┌──────────┬─────────────────────────────────────────────────────┐
/// │ Records  │ LiteralRenderer::render_all                         │
/// │ Root     │ LiteralRenderer::render(root)                       │
/// │ Backfill │ backfill, then LiteralRenderer::render(root)        │
/// │ Crunch   │ backfill, then Cruncher::crunch(root)               │
/// └──────────┴─────────────────────────────────────────────────────┘
/// ```
pub struct DefaultDriver;

impl NrbfDriver for DefaultDriver {
    fn render(
        &self,
        stream: &mut DecodedStream,
        config: &DriverConfig,
    ) -> Result<Json, DriverError> {
        let root = if config.mode.resolves_references() {
            Some(stream.backfill()?)
        } else if config.mode == OutputMode::Root {
            Some(stream.root()?)
        } else {
            None
        };

        let limit = config.max_nodes;
        match (config.mode, root) {
            (OutputMode::Crunch, Some(root)) => {
                Cruncher::new(stream).with_node_limit(limit).crunch(root)
            }
            (_, Some(root)) => LiteralRenderer::new(stream)
                .with_node_limit(limit)
                .render(root),
            (_, None) => LiteralRenderer::new(stream)
                .with_node_limit(limit)
                .render_all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrbf_tests::{Member, StreamBuilder};
    use serde_json::json;

    fn config(mode: OutputMode) -> DriverConfig {
        DriverConfig {
            mode,
            ..DriverConfig::default()
        }
    }

    fn holder() -> Vec<u8> {
        StreamBuilder::new()
            .header(1)
            .class_with_members_and_types(1, "Holder", &[Member::object("item")], 2)
            .member_reference(3)
            .object_string(3, "x")
            .message_end()
            .build()
    }

    #[test]
    fn records_mode_renders_every_top_level_record() {
        let out = DefaultDriver
            .render_bytes(&holder(), &config(OutputMode::Records))
            .unwrap();
        assert_eq!(out.len(), 1);
        let kinds: Vec<_> = out[0]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["RecordTypeEnum"].clone())
            .collect();
        assert_eq!(
            kinds,
            [
                json!("SerializedStreamHeader"),
                json!("ClassWithMembersAndTypes"),
                json!("BinaryObjectString"),
                json!("MessageEnd")
            ]
        );
    }

    #[test]
    fn root_mode_leaves_references_unresolved() {
        let out = DefaultDriver
            .render_bytes(&holder(), &config(OutputMode::Root))
            .unwrap();
        assert_eq!(
            out[0]["Values"][0],
            json!({"RecordTypeEnum": "MemberReference", "IdRef": 3})
        );
    }

    #[test]
    fn backfill_mode_inlines_targets() {
        let out = DefaultDriver
            .render_bytes(&holder(), &config(OutputMode::Backfill))
            .unwrap();
        assert_eq!(out[0]["Values"][0]["Value"], json!("x"));
        assert_eq!(out[0]["Values"][0]["IdRef"], json!(3));
    }

    #[test]
    fn crunch_mode() {
        let out = DefaultDriver
            .render_bytes(&holder(), &config(OutputMode::Crunch))
            .unwrap();
        assert_eq!(out, [json!({"item": "x"})]);
    }

    #[test]
    fn empty_input_renders_nothing() {
        let out = DefaultDriver
            .render_bytes(&[], &config(OutputMode::Crunch))
            .unwrap();
        assert!(out.is_empty());
    }
}
