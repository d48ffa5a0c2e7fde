use nrbf_wire::ByteCursor;

use crate::error::TypeError;

// ── Macro for wire-byte enum boilerplate ──────────────────────────────
//
// Every tag set in NRBF is a closed enumeration carried in a single
// byte. The macro generates the byte conversion pair, a cursor reader
// that records the tag's offset on failure, and the variant name used
// in diagnostics and JSON output.

macro_rules! wire_enum {
  (
    $(#[$meta:meta])*
    pub enum $name:ident {
      $( $(#[$vmeta:meta])* $variant:ident = $wire:expr ),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    pub enum $name {
      $( $(#[$vmeta])* $variant ),+
    }

    impl $name {
      /// Every variant, in wire order.
      pub const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];

      /// Encode this variant as a single wire byte.
      #[must_use]
      pub fn to_wire_byte(self) -> u8 {
        match self {
          $( Self::$variant => $wire ),+
        }
      }

      /// Decode a wire byte into this enum.
      ///
      /// `offset` is where the byte was read from, for diagnostics.
      ///
      /// # Errors
      ///
      /// [`TypeError::InvalidEnumValue`] if the byte does not match
      /// any variant.
      pub fn from_wire_byte(value: u8, offset: usize) -> Result<Self, TypeError> {
        match value {
          $( $wire => Ok(Self::$variant), )+
          other => Err(TypeError::InvalidEnumValue {
            enum_name: stringify!($name),
            value: other,
            offset,
          }),
        }
      }

      /// Read one tag byte from the cursor.
      ///
      /// # Errors
      ///
      /// [`TypeError::Wire`] at end of input, or
      /// [`TypeError::InvalidEnumValue`] for an unknown byte.
      pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError> {
        let offset = cursor.position();
        let value = cursor.read_u8()?;
        Self::from_wire_byte(value, offset)
      }

      /// The variant name as spelled by the format.
      #[must_use]
      pub fn name(self) -> &'static str {
        match self {
          $( Self::$variant => stringify!($variant) ),+
        }
      }
    }

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
      }
    }
  };
}

// ── PrimitiveType ─────────────────────────────────────────────────────

wire_enum! {
  /// Primitive-type tag. Each value selects exactly one scalar reader
  /// through `PrimitiveType::read_value`.
  ///
  /// ```text
  /// ┌──────┬──────────┐   ┌──────┬──────────┐
  /// │ Wire │ Type     │   │ Wire │ Type     │
  /// ├──────┼──────────┤   ├──────┼──────────┤
  /// │ 1    │ Boolean  │   │ 10   │ SByte    │
  /// │ 2    │ Byte     │   │ 11   │ Single   │
  /// │ 3    │ Char     │   │ 12   │ TimeSpan │
  /// │ 5    │ Decimal  │   │ 13   │ DateTime │
  /// │ 6    │ Double   │   │ 14   │ UInt16   │
  /// │ 7    │ Int16    │   │ 15   │ UInt32   │
  /// │ 8    │ Int32    │   │ 16   │ UInt64   │
  /// │ 9    │ Int64    │   │ 17   │ Null     │
  /// │      │          │   │ 18   │ String   │
  /// └──────┴──────────┘   └──────┴──────────┘
  /// ```
  ///
  /// Value 4 is unused by the format.
  #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
  pub enum PrimitiveType {
    Boolean = 1,
    Byte = 2,
    Char = 3,
    Decimal = 5,
    Double = 6,
    Int16 = 7,
    Int32 = 8,
    Int64 = 9,
    SByte = 10,
    Single = 11,
    TimeSpan = 12,
    DateTime = 13,
    UInt16 = 14,
    UInt32 = 15,
    UInt64 = 16,
    Null = 17,
    String = 18,
  }
}

// ── BinaryType ────────────────────────────────────────────────────────

wire_enum! {
  /// Binary-type tag: how a class member or array element is encoded.
  ///
  /// Only `Primitive` values are stored inline. Every other kind is a
  /// full nested record in the stream.
  ///
  /// ```text
  /// ┌──────┬────────────────┬─────────────────────────┐
  /// │ Wire │ Type           │ Additional info         │
  /// ├──────┼────────────────┼─────────────────────────┤
  /// │ 0    │ Primitive      │ primitive-type tag      │
  /// │ 1    │ String         │ none                    │
  /// │ 2    │ Object         │ none                    │
  /// │ 3    │ SystemClass    │ type name               │
  /// │ 4    │ Class          │ type name + library id  │
  /// │ 5    │ ObjectArray    │ none                    │
  /// │ 6    │ StringArray    │ none                    │
  /// │ 7    │ PrimitiveArray │ primitive-type tag      │
  /// └──────┴────────────────┴─────────────────────────┘
  /// ```
  #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
  pub enum BinaryType {
    Primitive = 0,
    String = 1,
    Object = 2,
    SystemClass = 3,
    Class = 4,
    ObjectArray = 5,
    StringArray = 6,
    PrimitiveArray = 7,
  }
}

// ── BinaryArrayType ───────────────────────────────────────────────────

wire_enum! {
  /// Shape of a `BinaryArray` record.
  ///
  /// ```text
  /// ┌──────┬───────────────────┐
  /// │ Wire │ Shape             │
  /// ├──────┼───────────────────┤
  /// │ 0    │ Single            │
  /// │ 1    │ Jagged            │
  /// │ 2    │ Rectangular       │
  /// │ 3    │ SingleOffset      │
  /// │ 4    │ JaggedOffset      │
  /// │ 5    │ RectangularOffset │
  /// └──────┴───────────────────┘
  /// ```
  #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
  pub enum BinaryArrayType {
    Single = 0,
    Jagged = 1,
    Rectangular = 2,
    SingleOffset = 3,
    JaggedOffset = 4,
    RectangularOffset = 5,
  }
}

impl BinaryArrayType {
  /// Whether per-dimension lower bounds follow the lengths on the wire.
  #[must_use]
  pub fn has_bounds(self) -> bool {
    matches!(
      self,
      Self::SingleOffset | Self::JaggedOffset | Self::RectangularOffset
    )
  }
}

// ── RecordType ────────────────────────────────────────────────────────

wire_enum! {
  /// Record-type tag: the first byte of every record.
  ///
  /// ```text
  /// ┌──────┬────────────────────────────────┐
  /// │ Wire │ Record                         │
  /// ├──────┼────────────────────────────────┤
  /// │ 0    │ SerializedStreamHeader         │
  /// │ 1    │ ClassWithId                    │
  /// │ 2    │ SystemClassWithMembers         │
  /// │ 3    │ ClassWithMembers               │
  /// │ 4    │ SystemClassWithMembersAndTypes │
  /// │ 5    │ ClassWithMembersAndTypes       │
  /// │ 6    │ BinaryObjectString             │
  /// │ 7    │ BinaryArray                    │
  /// │ 8    │ MemberPrimitiveTyped           │
  /// │ 9    │ MemberReference                │
  /// │ 10   │ ObjectNull                     │
  /// │ 11   │ MessageEnd                     │
  /// │ 12   │ BinaryLibrary                  │
  /// │ 13   │ ObjectNullMultiple256          │
  /// │ 14   │ ObjectNullMultiple             │
  /// │ 15   │ ArraySinglePrimitive           │
  /// │ 16   │ ArraySingleObject              │
  /// │ 17   │ ArraySingleString              │
  /// │ 21   │ MethodCall                     │
  /// │ 22   │ MethodReturn                   │
  /// └──────┴────────────────────────────────┘
  /// ```
  ///
  /// 18 to 20 are reserved and rejected like any other unknown byte.
  #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
  pub enum RecordType {
    SerializedStreamHeader = 0,
    ClassWithId = 1,
    SystemClassWithMembers = 2,
    ClassWithMembers = 3,
    SystemClassWithMembersAndTypes = 4,
    ClassWithMembersAndTypes = 5,
    BinaryObjectString = 6,
    BinaryArray = 7,
    MemberPrimitiveTyped = 8,
    MemberReference = 9,
    ObjectNull = 10,
    MessageEnd = 11,
    BinaryLibrary = 12,
    ObjectNullMultiple256 = 13,
    ObjectNullMultiple = 14,
    ArraySinglePrimitive = 15,
    ArraySingleObject = 16,
    ArraySingleString = 17,
    MethodCall = 21,
    MethodReturn = 22,
  }
}
