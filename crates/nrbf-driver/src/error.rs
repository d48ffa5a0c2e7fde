use nrbf_decoder::DecodeError;

/// Errors raised while assembling or rendering a decoded stream.
///
/// ```text
/// ┌────────────────┬─────────────────────────────────────────────────────┐
/// │ Variant        │ Cause                                               │
/// ├────────────────┼─────────────────────────────────────────────────────┤
/// │ MissingHeader  │ First record is not a SerializedStreamHeader        │
/// │ RootNotFound   │ No record defines the header's root id              │
/// │ OutputTooLarge │ Rendering emitted more JSON nodes than allowed      │
/// │ Decode         │ Any fatal error from the record decoder or backfill │
/// └────────────────┴─────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("stream does not start with a SerializedStreamHeader record")]
    MissingHeader,

    #[error("root object {root_id} not found in stream")]
    RootNotFound { root_id: i32 },

    #[error("rendered output exceeds {limit} JSON nodes")]
    OutputTooLarge { limit: usize },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
