#![warn(clippy::pedantic)]

pub mod budget;
pub mod config;
pub mod crunch;
pub mod driver;
pub mod error;
pub mod json;
pub mod render_literal;
pub mod stream;

pub use budget::{DEFAULT_MAX_NODES, NodeBudget};
pub use config::{DriverConfig, OutputMode};
pub use crunch::{Cruncher, minimize};
pub use driver::{DefaultDriver, NrbfDriver};
pub use error::DriverError;
pub use json::primitive_to_json;
pub use render_literal::LiteralRenderer;
pub use stream::{DecodedStream, StreamIter, decode_stream, decode_stream_from};
