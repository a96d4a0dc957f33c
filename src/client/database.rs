//! Database handle.
//!
//! A `Database` pairs connection parameters with the connector that opens
//! native connections, and produces `Connection`s on demand.

use crate::client::Connection;
use crate::connection::params::{ConnectionParams, SCHEME};
use crate::error::{ConnectionError, FrontbaseError};
use crate::transport::Connector;
use std::sync::Arc;

/// Connection factory for one database.
#[derive(Clone)]
pub struct Database {
    /// Connection parameters
    params: ConnectionParams,
    connector: Arc<dyn Connector>,
}

impl Database {
    pub fn new(params: ConnectionParams, connector: Arc<dyn Connector>) -> Self {
        Self { params, connector }
    }

    /// Get the connection parameters.
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Connection string without credentials.
    pub fn connection_string(&self) -> String {
        let url = self.params.database_url();
        let rest = url.strip_prefix(SCHEME).unwrap_or(&url);
        format!("{}{}@{}", SCHEME, self.params.username, rest)
    }

    /// Establish a connection to the database.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the connection or session setup fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use frontbase_rs::client::Database;
    /// # async fn example(database: &Database) -> Result<(), Box<dyn std::error::Error>> {
    /// let connection = database.connect().await?;
    ///
    /// // Use the connection...
    ///
    /// connection.close().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(&self) -> Result<Connection, ConnectionError> {
        Connection::open(self.connector.as_ref(), self.params.clone()).await
    }

    /// Connect, ping and close again.
    ///
    /// # Errors
    ///
    /// Returns the first failure from connecting, pinging or closing.
    pub async fn test_connection(&self) -> Result<(), FrontbaseError> {
        let connection = self.connect().await?;
        connection.ping().await?;
        connection.close().await?;
        Ok(())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("params", &self.params)
            .finish()
    }
}
