use crate::error::WireError;

/// Default ceiling applied to every length or count read from the wire.
///
/// A single corrupt length prefix could otherwise request a multi-gigabyte
/// allocation before the truncation check fires.
pub const DEFAULT_MAX_LENGTH: usize = 64 * 1024 * 1024;

/// Sequential reader over an in-memory NRBF byte buffer.
///
/// `ByteCursor` is the leaf of the decoder stack: every other component
/// consumes bytes exclusively through it. It wraps a borrowed slice and a
/// position, so reads never copy more than the caller asks for, and every
/// error can report the exact offset where it happened.
///
/// ```text
///   buf:  [ consumed ........ | remaining ............ ]
///                             ^ pos
/// ```
///
/// The cursor is not rewindable. A decode either consumes a whole stream
/// or fails; there is no recoverable corruption model in NRBF.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    max_length: Option<usize>,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at offset 0 with the default length ceiling.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            max_length: Some(DEFAULT_MAX_LENGTH),
        }
    }

    /// Replace the length ceiling. `None` disables the check entirely.
    #[must_use]
    pub fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }

    /// Byte offset of the next unread byte.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// `true` while at least one byte is left to read.
    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.pos < self.buf.len()
    }

    /// Consume exactly `n` bytes and return them as a borrowed slice.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `n` bytes remain. The
    /// cursor does not advance on failure.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let available = self.remaining();
        if n > available {
            return Err(WireError::UnexpectedEof {
                offset: self.pos,
                needed: n,
                available,
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Consume exactly `N` bytes into a fixed-size array.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `N` bytes remain.
    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Consume a single byte.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] at end of input.
    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take(1)?[0])
    }

    /// Validate a length against the configured ceiling.
    ///
    /// `offset` is where the length field started, for diagnostics.
    ///
    /// # Errors
    ///
    /// [`WireError::LengthLimitExceeded`] if `length` is above the ceiling.
    pub fn check_length(&self, length: usize, offset: usize) -> Result<usize, WireError> {
        match self.max_length {
            Some(limit) if length > limit => Err(WireError::LengthLimitExceeded {
                offset,
                length,
                limit,
            }),
            _ => Ok(length),
        }
    }

    /// Read a little-endian `int32` count (member count, array length,
    /// rank, dimension length) and validate it as a non-negative length.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if fewer than 4 bytes remain.
    /// - [`WireError::NegativeLength`] if the value is below zero.
    /// - [`WireError::LengthLimitExceeded`] if above the ceiling.
    pub fn read_count(&mut self, field: &'static str) -> Result<usize, WireError> {
        let offset = self.pos;
        let value = i32::from_le_bytes(self.take_array()?);
        let length = usize::try_from(value).map_err(|_| WireError::NegativeLength {
            offset,
            field,
            value,
        })?;
        self.check_length(length, offset)
    }
}
