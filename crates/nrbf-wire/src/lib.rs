#![warn(clippy::pedantic)]

pub mod cursor;
pub mod error;
pub mod primitives;
pub mod varint;

pub use cursor::{ByteCursor, DEFAULT_MAX_LENGTH};
pub use error::WireError;
pub use primitives::{DateTime, DateTimeKind, Decimal, TimeSpan};
