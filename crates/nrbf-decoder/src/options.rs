use nrbf_wire::DEFAULT_MAX_LENGTH;

/// Settings for one decode session.
///
/// ```text
/// ┌─────────────────┬──────────────────────────────────────────────────┐
/// │ Field           │ Purpose                                          │
/// ├─────────────────┼──────────────────────────────────────────────────┤
/// │ expand_metadata │ Copy reused class metadata into ClassWithId      │
/// │ max_length      │ Ceiling on string lengths and wire counts        │
/// └─────────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecoderOptions {
    /// When set, each `ClassWithId` record carries a copy of the class
    /// metadata it reuses. Otherwise consumers look it up by id.
    pub expand_metadata: bool,

    /// Largest string byte length, array length or member count accepted
    /// from the wire. `None` removes the ceiling.
    pub max_length: Option<usize>,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            expand_metadata: false,
            max_length: Some(DEFAULT_MAX_LENGTH),
        }
    }
}

impl DecoderOptions {
    #[must_use]
    pub fn with_expand_metadata(mut self, expand: bool) -> Self {
        self.expand_metadata = expand;
        self
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }
}
