use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use num_bigint::{BigInt, Sign};

use crate::cursor::ByteCursor;
use crate::error::WireError;
use crate::varint::read_length_prefix;

/// Number of 100-nanosecond ticks in one second.
const TICKS_PER_SECOND: i64 = 10_000_000;

/// Arbitrary-precision decimal, kept as an unscaled integer plus a
/// base-10 scale so no digit of the wire text is lost.
///
/// `12.50` is stored as `mantissa = 1250, scale = 2`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    pub mantissa: BigInt,
    pub scale: u32,
}

impl Decimal {
    /// Parse the textual wire form `-?[0-9]+(\.[0-9]+)?`.
    ///
    /// Returns `None` for anything else: exponents, a leading `+`,
    /// whitespace, or a dangling `.` are all rejected.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (body, ""),
        };

        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || (body.contains('.') && !all_digits(frac_part)) {
            return None;
        }

        let digits = format!("{int_part}{frac_part}");
        let mut mantissa: BigInt = digits.parse().ok()?;
        if negative {
            mantissa = -mantissa;
        }
        let scale = u32::try_from(frac_part.len()).ok()?;
        Some(Self { mantissa, scale })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.mantissa.sign() == Sign::Minus { "-" } else { "" };
        let digits = self.mantissa.magnitude().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

/// The `Kind` carried in the two low bits of a serialized DateTime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DateTimeKind {
    Unspecified,
    Utc,
    Local,
}

impl DateTimeKind {
    /// Name used in JSON renderings.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Unspecified => "Unspecified",
            Self::Utc => "UTC",
            Self::Local => "Local",
        }
    }
}

/// A serialized DateTime: tick count plus kind.
///
/// ```text
///  63                                        2   1   0
/// ┌────────────────────────────────────────────┬───────┐
/// │ ticks (kind bits masked to zero)           │ kind  │
/// └────────────────────────────────────────────┴───────┘
///   kind: 00 unspecified, 01 UTC, 10 local, 11 unspecified
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateTime {
    pub ticks: i64,
    pub kind: DateTimeKind,
}

impl DateTime {
    /// Split a raw wire value into ticks and kind.
    #[must_use]
    pub fn from_raw(raw: i64) -> Self {
        let kind = match raw & 0b11 {
            0b01 => DateTimeKind::Utc,
            0b10 => DateTimeKind::Local,
            _ => DateTimeKind::Unspecified,
        };
        Self {
            ticks: raw & !0b11,
            kind,
        }
    }

    /// Calendar view of the tick count: 100 ns ticks since
    /// 0001-01-01T00:00:00. `None` if the value is outside chrono's range.
    #[must_use]
    pub fn to_naive(self) -> Option<NaiveDateTime> {
        let epoch = NaiveDate::from_ymd_opt(1, 1, 1)?.and_hms_opt(0, 0, 0)?;
        let secs = self.ticks.div_euclid(TICKS_PER_SECOND);
        let nanos = u32::try_from(self.ticks.rem_euclid(TICKS_PER_SECOND) * 100).ok()?;
        epoch.checked_add_signed(TimeDelta::new(secs, nanos)?)
    }
}

/// A serialized TimeSpan: signed count of 100 ns ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeSpan(pub i64);

// ── Fixed-width readers ───────────────────────────────────────────────
//
// Every multi-byte scalar in NRBF is little-endian. Each reader consumes
// exactly its width or fails without advancing.

impl ByteCursor<'_> {
    /// Read a Boolean (1 byte, any non-zero value is `true`).
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] at end of input.
    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        Ok(self.read_u8()? != 0)
    }

    /// Read an SByte.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] at end of input.
    pub fn read_i8(&mut self) -> Result<i8, WireError> {
        Ok(i8::from_le_bytes(self.take_array()?))
    }

    /// Read an Int16.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 2 bytes remain.
    pub fn read_i16(&mut self) -> Result<i16, WireError> {
        Ok(i16::from_le_bytes(self.take_array()?))
    }

    /// Read a UInt16.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 2 bytes remain.
    pub fn read_u16(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    /// Read an Int32.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 4 bytes remain.
    pub fn read_i32(&mut self) -> Result<i32, WireError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    /// Read a UInt32.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 4 bytes remain.
    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Read an Int64.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 8 bytes remain.
    pub fn read_i64(&mut self) -> Result<i64, WireError> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    /// Read a UInt64.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 8 bytes remain.
    pub fn read_u64(&mut self) -> Result<u64, WireError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// Read a Single (IEEE-754 binary32).
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 4 bytes remain.
    pub fn read_f32(&mut self) -> Result<f32, WireError> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    /// Read a Double (IEEE-754 binary64).
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 8 bytes remain.
    pub fn read_f64(&mut self) -> Result<f64, WireError> {
        Ok(f64::from_le_bytes(self.take_array()?))
    }

    /// Read a TimeSpan.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 8 bytes remain.
    pub fn read_timespan(&mut self) -> Result<TimeSpan, WireError> {
        Ok(TimeSpan(self.read_i64()?))
    }

    /// Read a DateTime.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 8 bytes remain.
    pub fn read_datetime(&mut self) -> Result<DateTime, WireError> {
        Ok(DateTime::from_raw(self.read_i64()?))
    }

    // ── Variable-width readers ────────────────────────────────────────

    /// Read a Char: one UTF-8 encoded code point, 1 to 4 bytes long.
    ///
    /// The width comes from the leading byte, following UTF-8's own
    /// rules:
    ///
    /// ```text
    ///   0xxx xxxx → 1 byte
    ///   110x xxxx → 2 bytes
    ///   1110 xxxx → 3 bytes
    ///   1111 0xxx → 4 bytes
    /// ```
    ///
    /// # Errors
    ///
    /// - [`WireError::InvalidCharLead`] for a continuation byte or
    ///   `0xF8..=0xFF` in leading position.
    /// - [`WireError::InvalidUtf8`] if the continuation bytes are bad.
    /// - [`WireError::UnexpectedEof`] if the sequence is truncated.
    pub fn read_char(&mut self) -> Result<char, WireError> {
        let offset = self.position();
        let lead = self.read_u8()?;
        let width = match lead {
            b if b & 0x80 == 0x00 => 1,
            b if b & 0xE0 == 0xC0 => 2,
            b if b & 0xF0 == 0xE0 => 3,
            b if b & 0xF8 == 0xF0 => 4,
            byte => return Err(WireError::InvalidCharLead { offset, byte }),
        };

        let mut bytes = [lead, 0, 0, 0];
        bytes[1..width].copy_from_slice(self.take(width - 1)?);
        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or(WireError::InvalidUtf8 { offset })
    }

    /// Read a LengthPrefixedString.
    ///
    /// # Errors
    ///
    /// - Any error from [`read_length_prefix`].
    /// - [`WireError::UnexpectedEof`] if the payload is truncated.
    /// - [`WireError::InvalidUtf8`] if the payload is not UTF-8.
    pub fn read_string(&mut self) -> Result<String, WireError> {
        let length = read_length_prefix(self)?;
        let offset = self.position();
        let raw = self.take(length)?;
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|_| WireError::InvalidUtf8 { offset })
    }

    /// Read a Decimal: a LengthPrefixedString in `-?[0-9]+(\.[0-9]+)?`
    /// form.
    ///
    /// # Errors
    ///
    /// - Any error from [`read_string`](Self::read_string).
    /// - [`WireError::InvalidDecimal`] if the text does not match.
    pub fn read_decimal(&mut self) -> Result<Decimal, WireError> {
        let offset = self.position();
        let text = self.read_string()?;
        Decimal::parse(&text).ok_or(WireError::InvalidDecimal { offset, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(bytes: &[u8]) -> ByteCursor<'_> {
        ByteCursor::new(bytes)
    }

    #[test]
    fn fixed_width_integers_are_little_endian() {
        assert!(cursor(&[0x01]).read_bool().unwrap());
        assert!(!cursor(&[0x00]).read_bool().unwrap());
        assert_eq!(cursor(&[0xFF]).read_i8().unwrap(), -1);
        assert_eq!(cursor(&[0x34, 0x12]).read_i16().unwrap(), 0x1234);
        assert_eq!(cursor(&[0xFF, 0xFF]).read_u16().unwrap(), u16::MAX);
        assert_eq!(cursor(&[0xFE, 0xFF, 0xFF, 0xFF]).read_i32().unwrap(), -2);
        assert_eq!(
            cursor(&[0x78, 0x56, 0x34, 0x12]).read_u32().unwrap(),
            0x1234_5678
        );
        assert_eq!(cursor(&i64::MIN.to_le_bytes()).read_i64().unwrap(), i64::MIN);
        assert_eq!(cursor(&u64::MAX.to_le_bytes()).read_u64().unwrap(), u64::MAX);
    }

    #[test]
    fn floats_keep_exact_bits() {
        let single = 1.5f32.to_le_bytes();
        assert_eq!(cursor(&single).read_f32().unwrap().to_bits(), 1.5f32.to_bits());
        let double = (-0.1f64).to_le_bytes();
        assert_eq!(
            cursor(&double).read_f64().unwrap().to_bits(),
            (-0.1f64).to_bits()
        );
    }

    #[test]
    fn short_int_read_fails() {
        assert!(matches!(
            cursor(&[0x01, 0x02, 0x03]).read_i32(),
            Err(WireError::UnexpectedEof {
                needed: 4,
                available: 3,
                ..
            })
        ));
    }

    #[test]
    fn char_widths() {
        assert_eq!(cursor(b"A").read_char().unwrap(), 'A');
        assert_eq!(cursor("é".as_bytes()).read_char().unwrap(), 'é');
        assert_eq!(cursor("€".as_bytes()).read_char().unwrap(), '€');
        assert_eq!(cursor("𝄞".as_bytes()).read_char().unwrap(), '𝄞');
    }

    #[test]
    fn char_consumes_only_its_width() {
        let mut c = cursor("éx".as_bytes());
        c.read_char().unwrap();
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn char_rejects_continuation_lead() {
        assert!(matches!(
            cursor(&[0x80]).read_char(),
            Err(WireError::InvalidCharLead { byte: 0x80, .. })
        ));
        assert!(matches!(
            cursor(&[0xF8, 0x80, 0x80, 0x80]).read_char(),
            Err(WireError::InvalidCharLead { byte: 0xF8, .. })
        ));
    }

    #[test]
    fn char_rejects_bad_continuation() {
        assert!(matches!(
            cursor(&[0xC3, 0x41]).read_char(),
            Err(WireError::InvalidUtf8 { offset: 0 })
        ));
    }

    #[test]
    fn string_reads_prefix_and_payload() {
        let mut c = cursor(&[0x05, b'h', b'e', b'l', b'l', b'o', 0xAA]);
        assert_eq!(c.read_string().unwrap(), "hello");
        assert_eq!(c.position(), 6);
    }

    #[test]
    fn empty_string() {
        assert_eq!(cursor(&[0x00]).read_string().unwrap(), "");
    }

    #[test]
    fn truncated_string_payload() {
        assert!(matches!(
            cursor(&[0x05, b'h', b'i']).read_string(),
            Err(WireError::UnexpectedEof {
                offset: 1,
                needed: 5,
                available: 2
            })
        ));
    }

    #[test]
    fn string_rejects_invalid_utf8() {
        assert!(matches!(
            cursor(&[0x02, 0xFF, 0xFE]).read_string(),
            Err(WireError::InvalidUtf8 { offset: 1 })
        ));
    }

    #[test]
    fn decimal_accepts_wire_pattern() {
        let d = Decimal::parse("-12.50").unwrap();
        assert_eq!(d.mantissa, BigInt::from(-1250));
        assert_eq!(d.scale, 2);
        assert_eq!(d.to_string(), "-12.50");

        assert_eq!(Decimal::parse("0.001").unwrap().to_string(), "0.001");
        assert_eq!(Decimal::parse("42").unwrap().to_string(), "42");
        let big = "79228162514264337593543950335";
        assert_eq!(Decimal::parse(big).unwrap().to_string(), big);
    }

    #[test]
    fn decimal_rejects_other_text() {
        for bad in ["", "-", "1.", ".5", "+1", "1e5", " 1", "1.2.3", "abc"] {
            assert!(Decimal::parse(bad).is_none(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn decimal_from_wire() {
        let mut bytes = vec![0x04];
        bytes.extend_from_slice(b"3.14");
        assert_eq!(cursor(&bytes).read_decimal().unwrap().to_string(), "3.14");

        let mut bad = vec![0x03];
        bad.extend_from_slice(b"NaN");
        assert!(matches!(
            cursor(&bad).read_decimal(),
            Err(WireError::InvalidDecimal { offset: 0, .. })
        ));
    }

    #[test]
    fn datetime_kind_bits() {
        let ticks: i64 = 636_000_000_000_000_000;
        let cases = [
            (0b00, DateTimeKind::Unspecified),
            (0b01, DateTimeKind::Utc),
            (0b10, DateTimeKind::Local),
            (0b11, DateTimeKind::Unspecified),
        ];
        for (bits, kind) in cases {
            let raw = (ticks | bits).to_le_bytes();
            let dt = cursor(&raw).read_datetime().unwrap();
            assert_eq!(dt.kind, kind, "kind bits {bits:#b}");
            assert_eq!(dt.ticks, ticks);
        }
    }

    #[test]
    fn datetime_calendar_view() {
        // 2000-01-01T00:00:00 is 630_822_816_000_000_000 ticks after 0001-01-01.
        let dt = DateTime::from_raw(630_822_816_000_000_000 | 0b01);
        let naive = dt.to_naive().unwrap();
        assert_eq!(naive.to_string(), "2000-01-01 00:00:00");
    }

    #[test]
    fn timespan_is_raw_ticks() {
        let raw = (-10_000_000i64).to_le_bytes();
        assert_eq!(cursor(&raw).read_timespan().unwrap(), TimeSpan(-10_000_000));
    }
}
