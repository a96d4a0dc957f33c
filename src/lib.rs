//! # frontbase-rs
//!
//! SQL statement templates and a session client for the FrontBase database.
//!
//! Templates use `?` for positional and `@name` for named placeholders.
//! A template is parsed once into an immutable [`Statement`] and bound many
//! times; binding replaces every placeholder with the SQL literal of its
//! value. Placeholders inside string constants and quoted identifiers are
//! left alone.
//!
//! Execution goes through the [`transport::SqlExecutor`] trait, implemented
//! on top of the native client library. The [`client`] module adds session
//! setup, transactions and prepared statements around it.
//!
//! ## Example
//!
//! ```
//! use frontbase_rs::{parse, NamedValue, Value};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let stmt = parse("insert into movie (title, year, poster) values (@title, @year, ?)")?;
//!
//! let sql = stmt.bind_named(&[
//!     NamedValue::named("title", "Mon Oncle"),
//!     NamedValue::named("year", 1958),
//!     NamedValue::positional(vec![0xCAu8, 0xFE]),
//! ])?;
//!
//! assert_eq!(
//!     sql,
//!     "insert into movie (title, year, poster) values ('Mon Oncle', 1958, x'cafe')"
//! );
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod connection;
pub mod error;
pub mod query;
pub mod transport;
pub mod types;

// Re-export public API
pub use client::{Connection, Database, Driver, PreparedStatement};
pub use error::{BindError, ConnectionError, FrontbaseError, ParseError, QueryError, TransportError};
pub use query::{parse, NamedValue, QueryResult, ResultSet, Row, Statement, StatementNode};
pub use types::Value;
