//! Transport layer between this crate and the native engine library.
//!
//! # Architecture
//!
//! - `protocol` - [`Connector`] and [`SqlExecutor`] trait definitions
//!
//! Implementations wrap the vendor client library. Tests use in-memory
//! doubles that record the SQL they receive.

pub mod protocol;

pub use protocol::{Connector, SqlExecutor};
