use nrbf_wire::WireError;

/// Errors raised while decoding tags and fixed-shape structures.
///
/// These sit one level above [`WireError`]: the bytes were there, but
/// they did not mean anything the format defines. A `TypeError` wraps a
/// `WireError` when the failure happened while reading the bytes
/// themselves.
///
/// # Error hierarchy
///
/// ```text
/// ┌─────────────────────────────────────────────────────┐
/// │ TypeError (this crate)                              │
/// │   ├── wraps WireError for low-level read failures   │
/// │   └── InvalidEnumValue for out-of-range tag bytes   │
/// └─────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
  /// A tag byte did not match any variant of its enumeration.
  ///
  /// The enum name and raw value are captured together with the offset
  /// of the tag byte. For record tags this includes the reserved values
  /// 18, 19 and 20.
  #[error("invalid {enum_name} value {value} at offset {offset}")]
  InvalidEnumValue {
    enum_name: &'static str,
    value: u8,
    offset: usize,
  },

  #[error(transparent)]
  Wire(#[from] WireError),
}
