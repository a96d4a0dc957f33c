//! Value types exchanged with the engine.
//!
//! - `value` - bound parameters and fetched cells, with SQL literal encoding
//! - `decode` - native column payloads to [`Value`]

mod decode;
mod value;

pub use decode::{decode_row, decode_timestamp, ColumnType, NativeColumn};
pub use value::Value;
