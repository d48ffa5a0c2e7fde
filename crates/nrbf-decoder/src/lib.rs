#![warn(clippy::pedantic)]

pub mod arena;
pub mod decoder;
pub mod error;
pub mod object_table;
pub mod options;

pub use arena::RecordArena;
pub use decoder::{DecodeSession, MAX_NESTING_DEPTH, RecordDecoder};
pub use error::{DecodeError, DecodeWarning};
pub use object_table::ObjectTable;
pub use options::DecoderOptions;
