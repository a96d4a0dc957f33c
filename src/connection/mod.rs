//! Connection configuration and session state.
//!
//! # Example
//!
//! ```
//! # use frontbase_rs::connection::{ConnectionBuilder, ConnectionParams};
//! # use std::str::FromStr;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Using ConnectionBuilder
//! let params = ConnectionBuilder::new()
//!     .host("localhost")
//!     .database("Movies")
//!     .username("_system")
//!     .connection_timeout(std::time::Duration::from_secs(10))
//!     .build()?;
//!
//! // Or parse from connection string
//! let params = ConnectionParams::from_str("frontbase://localhost/Movies?timeout=10")?;
//! # Ok(())
//! # }
//! ```

pub mod params;
pub mod session;

pub use params::{ConnectionBuilder, ConnectionParams};
pub use session::{IsolationLevel, Session, SessionState, TransactionOptions};
