//! High-level client API.
//!
//! The client is organized into four components:
//! - `Driver` - driver metadata and the native connector
//! - `Database` - connection factory for one database
//! - `Connection` - an open session with transaction control
//! - `PreparedStatement` - a parsed template bound per call
//!
//! # Example
//!
//! ```no_run
//! use frontbase_rs::client::Driver;
//! use frontbase_rs::connection::{IsolationLevel, TransactionOptions};
//! use frontbase_rs::transport::Connector;
//! use frontbase_rs::Value;
//! use std::sync::Arc;
//!
//! # async fn example(connector: Arc<dyn Connector>) -> Result<(), Box<dyn std::error::Error>> {
//! let driver = Driver::new(connector);
//! let database = driver.open("frontbase://localhost/Movies")?;
//! let connection = database.connect().await?;
//!
//! connection
//!     .begin_transaction(TransactionOptions::new(IsolationLevel::Serializable))
//!     .await?;
//! connection
//!     .execute("delete from movie where year < ?", &[Value::from(1950)])
//!     .await?;
//! connection.commit().await?;
//!
//! connection.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod database;
pub mod driver;
pub mod statement;

pub use connection::Connection;
pub use database::Database;
pub use driver::Driver;
pub use statement::PreparedStatement;
