use nrbf_wire::{ByteCursor, DateTime, Decimal, TimeSpan};

use crate::enums::PrimitiveType;
use crate::error::TypeError;

/// A decoded scalar, one variant per [`PrimitiveType`].
///
/// `Null` is the value of the `Null` primitive type and consumes no
/// bytes.
#[derive(Clone, Debug, PartialEq)]
pub enum PrimitiveValue {
  Boolean(bool),
  Byte(u8),
  Char(char),
  Decimal(Decimal),
  Double(f64),
  Int16(i16),
  Int32(i32),
  Int64(i64),
  SByte(i8),
  Single(f32),
  TimeSpan(TimeSpan),
  DateTime(DateTime),
  UInt16(u16),
  UInt32(u32),
  UInt64(u64),
  Null,
  String(String),
}

impl PrimitiveValue {
  /// The tag this value was decoded under.
  #[must_use]
  pub fn primitive_type(&self) -> PrimitiveType {
    match self {
      Self::Boolean(_) => PrimitiveType::Boolean,
      Self::Byte(_) => PrimitiveType::Byte,
      Self::Char(_) => PrimitiveType::Char,
      Self::Decimal(_) => PrimitiveType::Decimal,
      Self::Double(_) => PrimitiveType::Double,
      Self::Int16(_) => PrimitiveType::Int16,
      Self::Int32(_) => PrimitiveType::Int32,
      Self::Int64(_) => PrimitiveType::Int64,
      Self::SByte(_) => PrimitiveType::SByte,
      Self::Single(_) => PrimitiveType::Single,
      Self::TimeSpan(_) => PrimitiveType::TimeSpan,
      Self::DateTime(_) => PrimitiveType::DateTime,
      Self::UInt16(_) => PrimitiveType::UInt16,
      Self::UInt32(_) => PrimitiveType::UInt32,
      Self::UInt64(_) => PrimitiveType::UInt64,
      Self::Null => PrimitiveType::Null,
      Self::String(_) => PrimitiveType::String,
    }
  }
}

impl PrimitiveType {
  /// Decode one value of this type from the cursor.
  ///
  /// This is the primitive dispatch table: every tag maps to exactly
  /// one reader, and `Null` reads nothing.
  ///
  /// # Errors
  ///
  /// Propagates the underlying reader's [`WireError`](nrbf_wire::WireError).
  pub fn read_value(self, cursor: &mut ByteCursor<'_>) -> Result<PrimitiveValue, TypeError> {
    let value = match self {
      Self::Boolean => PrimitiveValue::Boolean(cursor.read_bool()?),
      Self::Byte => PrimitiveValue::Byte(cursor.read_u8()?),
      Self::Char => PrimitiveValue::Char(cursor.read_char()?),
      Self::Decimal => PrimitiveValue::Decimal(cursor.read_decimal()?),
      Self::Double => PrimitiveValue::Double(cursor.read_f64()?),
      Self::Int16 => PrimitiveValue::Int16(cursor.read_i16()?),
      Self::Int32 => PrimitiveValue::Int32(cursor.read_i32()?),
      Self::Int64 => PrimitiveValue::Int64(cursor.read_i64()?),
      Self::SByte => PrimitiveValue::SByte(cursor.read_i8()?),
      Self::Single => PrimitiveValue::Single(cursor.read_f32()?),
      Self::TimeSpan => PrimitiveValue::TimeSpan(cursor.read_timespan()?),
      Self::DateTime => PrimitiveValue::DateTime(cursor.read_datetime()?),
      Self::UInt16 => PrimitiveValue::UInt16(cursor.read_u16()?),
      Self::UInt32 => PrimitiveValue::UInt32(cursor.read_u32()?),
      Self::UInt64 => PrimitiveValue::UInt64(cursor.read_u64()?),
      Self::Null => PrimitiveValue::Null,
      Self::String => PrimitiveValue::String(cursor.read_string()?),
    };
    Ok(value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use nrbf_wire::DateTimeKind;

  fn read(t: PrimitiveType, bytes: &[u8]) -> (PrimitiveValue, usize) {
    let mut cursor = ByteCursor::new(bytes);
    let value = t.read_value(&mut cursor).unwrap();
    (value, cursor.position())
  }

  #[test]
  fn each_tag_consumes_its_width() {
    let cases: Vec<(PrimitiveType, Vec<u8>, PrimitiveValue)> = vec![
      (PrimitiveType::Boolean, vec![1], PrimitiveValue::Boolean(true)),
      (PrimitiveType::Byte, vec![0xAB], PrimitiveValue::Byte(0xAB)),
      (PrimitiveType::SByte, vec![0x80], PrimitiveValue::SByte(-128)),
      (PrimitiveType::Int16, (-3i16).to_le_bytes().to_vec(), PrimitiveValue::Int16(-3)),
      (PrimitiveType::UInt16, 65_000u16.to_le_bytes().to_vec(), PrimitiveValue::UInt16(65_000)),
      (PrimitiveType::Int32, 7i32.to_le_bytes().to_vec(), PrimitiveValue::Int32(7)),
      (PrimitiveType::UInt32, u32::MAX.to_le_bytes().to_vec(), PrimitiveValue::UInt32(u32::MAX)),
      (PrimitiveType::Int64, (-9i64).to_le_bytes().to_vec(), PrimitiveValue::Int64(-9)),
      (PrimitiveType::UInt64, 9u64.to_le_bytes().to_vec(), PrimitiveValue::UInt64(9)),
      (PrimitiveType::Single, 0.5f32.to_le_bytes().to_vec(), PrimitiveValue::Single(0.5)),
      (PrimitiveType::Double, 2.25f64.to_le_bytes().to_vec(), PrimitiveValue::Double(2.25)),
      (PrimitiveType::Char, "ß".as_bytes().to_vec(), PrimitiveValue::Char('ß')),
      (
        PrimitiveType::TimeSpan,
        600_000_000i64.to_le_bytes().to_vec(),
        PrimitiveValue::TimeSpan(TimeSpan(600_000_000)),
      ),
      (PrimitiveType::String, b"\x02ok".to_vec(), PrimitiveValue::String("ok".into())),
    ];
    for (t, bytes, expected) in cases {
      let (value, consumed) = read(t, &bytes);
      assert_eq!(value, expected, "{t}");
      assert_eq!(value.primitive_type(), t);
      assert_eq!(consumed, bytes.len(), "{t} consumed wrong width");
    }
  }

  #[test]
  fn null_reads_nothing() {
    let (value, consumed) = read(PrimitiveType::Null, &[0xFF]);
    assert_eq!(value, PrimitiveValue::Null);
    assert_eq!(consumed, 0);
  }

  #[test]
  fn decimal_and_datetime_dispatch() {
    let (value, _) = read(PrimitiveType::Decimal, b"\x05-1.25");
    let PrimitiveValue::Decimal(d) = value else {
      panic!("expected decimal");
    };
    assert_eq!(d.to_string(), "-1.25");

    let raw = ((1_000i64 << 2) | 0b10).to_le_bytes();
    let (value, _) = read(PrimitiveType::DateTime, &raw);
    assert_eq!(
      value,
      PrimitiveValue::DateTime(DateTime {
        ticks: 4_000,
        kind: DateTimeKind::Local
      })
    );
  }

  #[test]
  fn truncated_value_propagates_wire_error() {
    let mut cursor = ByteCursor::new(&[0x01, 0x02]);
    assert!(matches!(
      PrimitiveType::Int32.read_value(&mut cursor),
      Err(TypeError::Wire(_))
    ));
  }
}
