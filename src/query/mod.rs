//! Statement templates, binding and results.
//!
//! # Overview
//!
//! The query module is organized into:
//! - `parse` - tokenizes a template into text and placeholder nodes
//! - `statement` - the immutable parsed statement
//! - `bind` - substitutes value literals for placeholders
//! - `results` - rows and row counts returned by the executor
//!
//! # Example
//!
//! ```
//! use frontbase_rs::query::{parse, NamedValue};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let stmt = parse("select * from movie where year = @year and title <> ?")?;
//!
//! let sql = stmt.bind_named(&[
//!     NamedValue::named("year", 1977),
//!     NamedValue::positional("Star Wars"),
//! ])?;
//! assert_eq!(sql, "select * from movie where year = 1977 and title <> 'Star Wars'");
//! # Ok(())
//! # }
//! ```

pub mod bind;
pub mod parse;
pub mod results;
pub mod statement;

pub use bind::NamedValue;
pub use parse::parse;
pub use results::{QueryResult, ResultSet, Row};
pub use statement::{Statement, StatementNode};
