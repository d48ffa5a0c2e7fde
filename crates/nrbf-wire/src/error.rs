/// Errors raised while reading raw bytes off an NRBF stream.
///
/// Every variant carries the byte offset (from the start of the input
/// buffer) at which the problem was detected, because a corrupt NRBF
/// stream cannot be resynchronised and the offset is the only useful
/// clue when diagnosing a bad payload.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Input ended before a fixed-width or length-prefixed read completed.
    #[error("unexpected end of stream at offset {offset}: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A 7-bit length prefix still signalled continuation in its 5th byte.
    #[error("length prefix at offset {offset} exceeds 5 bytes")]
    LengthPrefixTooLong { offset: usize },

    /// A length or count read from the wire exceeded the configured ceiling.
    #[error("length {length} at offset {offset} exceeds limit {limit}")]
    LengthLimitExceeded {
        offset: usize,
        length: usize,
        limit: usize,
    },

    /// A signed length or count field was negative.
    #[error("negative {field} ({value}) at offset {offset}")]
    NegativeLength {
        offset: usize,
        field: &'static str,
        value: i32,
    },

    /// The first byte of a Char is not a valid UTF-8 leading byte.
    #[error("invalid UTF-8 leading byte {byte:#04X} at offset {offset}")]
    InvalidCharLead { offset: usize, byte: u8 },

    /// String or Char payload bytes are not valid UTF-8.
    #[error("invalid UTF-8 sequence at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// Decimal payload does not match `-?[0-9]+(\.[0-9]+)?`.
    #[error("invalid decimal {text:?} at offset {offset}")]
    InvalidDecimal { offset: usize, text: String },
}
