//! Driver entry point.
//!
//! The `Driver` carries driver metadata and the native connector, and opens
//! `Database` handles from connection strings.

use crate::client::Database;
use crate::connection::params::ConnectionParams;
use crate::error::ConnectionError;
use crate::transport::Connector;
use std::str::FromStr;
use std::sync::Arc;

/// FrontBase driver.
///
/// # Example
///
/// ```no_run
/// use frontbase_rs::client::Driver;
/// # use frontbase_rs::transport::Connector;
/// # use std::sync::Arc;
///
/// # fn example(connector: Arc<dyn Connector>) -> Result<(), Box<dyn std::error::Error>> {
/// let driver = Driver::new(connector);
/// println!("Driver: {} v{}", driver.name(), driver.version());
///
/// let database = driver.open("frontbase://localhost/Movies")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Driver {
    /// Driver name
    name: String,
    /// Driver version
    version: String,
    connector: Arc<dyn Connector>,
}

impl Driver {
    /// Create a driver that opens native connections through `connector`.
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            connector,
        }
    }

    /// Get the driver name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the driver version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Open a database handle.
    ///
    /// `connection_string` has the form
    /// `frontbase://[user[:password]@]host[:port]/database[?param=value&...]`.
    /// No connection is made until `Database::connect`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the connection string is invalid.
    pub fn open(&self, connection_string: &str) -> Result<Database, ConnectionError> {
        let params = ConnectionParams::from_str(connection_string)?;
        Ok(self.open_with(params))
    }

    /// Open a database handle from parsed parameters.
    pub fn open_with(&self, params: ConnectionParams) -> Database {
        Database::new(params, Arc::clone(&self.connector))
    }

    /// Check if a connection string is valid.
    pub fn validate_connection_string(&self, connection_string: &str) -> bool {
        ConnectionParams::from_str(connection_string).is_ok()
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("name", &self.name)
            .field("version", &self.version)
            .finish()
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}
