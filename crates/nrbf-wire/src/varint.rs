use crate::cursor::ByteCursor;
use crate::error::WireError;

/// Maximum number of 7-bit groups in a length prefix.
/// ceil(31 / 7) = 5 bytes.
const MAX_LENGTH_PREFIX_BYTES: usize = 5;

/// Decode the variable-length byte count that precedes every
/// LengthPrefixedString.
///
/// Each byte contributes its low 7 bits, least significant group first.
/// The top bit signals that another byte follows.
///
/// | Length  | Encoded bytes        |
/// |---------|----------------------|
/// | 0       | `[0x00]`             |
/// | 127     | `[0x7F]`             |
/// | 128     | `[0x80, 0x01]`       |
/// | 300     | `[0xAC, 0x02]`       |
/// | 16384   | `[0x80, 0x80, 0x01]` |
///
/// # Errors
///
/// - [`WireError::LengthPrefixTooLong`] if the 5th byte still has its
///   continuation bit set.
/// - [`WireError::UnexpectedEof`] if input ends mid-prefix.
/// - [`WireError::LengthLimitExceeded`] if the decoded length is above
///   the cursor's ceiling.
pub fn read_length_prefix(cursor: &mut ByteCursor<'_>) -> Result<usize, WireError> {
    let start = cursor.position();
    let mut length: u64 = 0;
    let mut shift: u32 = 0;

    for _ in 0..MAX_LENGTH_PREFIX_BYTES {
        let byte = cursor.read_u8()?;
        length |= u64::from(byte & 0x7F) << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            let length = usize::try_from(length).unwrap_or(usize::MAX);
            return cursor.check_length(length, start);
        }
    }

    Err(WireError::LengthPrefixTooLong { offset: start })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Result<(usize, usize), WireError> {
        let mut cursor = ByteCursor::new(bytes).with_max_length(None);
        let length = read_length_prefix(&mut cursor)?;
        Ok((length, cursor.position()))
    }

    #[test]
    fn single_byte_lengths() {
        assert_eq!(decode(&[0x00]).unwrap(), (0, 1));
        assert_eq!(decode(&[0x01]).unwrap(), (1, 1));
        assert_eq!(decode(&[0x7F]).unwrap(), (127, 1));
    }

    #[test]
    fn multi_byte_lengths() {
        assert_eq!(decode(&[0x80, 0x01]).unwrap(), (128, 2));
        assert_eq!(decode(&[0xAC, 0x02]).unwrap(), (300, 2));
        assert_eq!(decode(&[0xFF, 0x7F]).unwrap(), (16383, 2));
        assert_eq!(decode(&[0x80, 0x80, 0x01]).unwrap(), (16384, 3));
    }

    #[test]
    fn five_byte_length_is_accepted() {
        // 0x7FFFFFFF, the largest Int32 length
        let (length, consumed) = decode(&[0xFF, 0xFF, 0xFF, 0xFF, 0x07]).unwrap();
        assert_eq!(length, 0x7FFF_FFFF);
        assert_eq!(consumed, 5);
    }

    #[test]
    fn trailing_bytes_are_left_alone() {
        assert_eq!(decode(&[0xAC, 0x02, 0xFF, 0xFF]).unwrap(), (300, 2));
    }

    #[test]
    fn continuation_in_fifth_byte_is_rejected() {
        let result = decode(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        assert!(matches!(
            result,
            Err(WireError::LengthPrefixTooLong { offset: 0 })
        ));
    }

    #[test]
    fn truncated_prefix() {
        assert!(matches!(
            decode(&[0x80]),
            Err(WireError::UnexpectedEof { offset: 1, .. })
        ));
        assert!(matches!(decode(&[]), Err(WireError::UnexpectedEof { .. })));
    }

    #[test]
    fn ceiling_applies_to_decoded_length() {
        let mut cursor = ByteCursor::new(&[0xAC, 0x02]).with_max_length(Some(200));
        assert!(matches!(
            read_length_prefix(&mut cursor),
            Err(WireError::LengthLimitExceeded {
                length: 300,
                limit: 200,
                offset: 0
            })
        ));
    }
}
