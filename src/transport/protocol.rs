//! Executor abstraction.
//!
//! The native engine library is reached through two narrow traits. A
//! [`Connector`] opens native connections; a [`SqlExecutor`] runs one fully
//! bound SQL string at a time and hands back decoded rows. Everything in this
//! crate above these traits is engine-agnostic orchestration.

use crate::connection::params::ConnectionParams;
use crate::error::TransportError;
use crate::query::results::QueryResult;
use async_trait::async_trait;

/// One native connection able to execute SQL text.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Execute a SQL string.
    ///
    /// # Arguments
    ///
    /// * `sql` - Fully bound SQL text, no placeholders left
    /// * `autocommit` - Commit immediately after execution
    ///
    /// # Errors
    ///
    /// Returns `TransportError::NotConnected` if the native connection
    /// dropped, or `ExecutionFailed` with the engine's messages.
    async fn execute(&mut self, sql: &str, autocommit: bool)
        -> Result<QueryResult, TransportError>;

    /// Check whether the native connection is still alive.
    async fn ping(&mut self) -> bool;

    /// Close the native connection.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if disconnect fails.
    async fn close(&mut self) -> Result<(), TransportError>;
}

/// Factory for native connections.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a native connection to the database described by `params`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the engine refuses the connection.
    async fn connect(
        &self,
        params: &ConnectionParams,
    ) -> Result<Box<dyn SqlExecutor>, TransportError>;
}
