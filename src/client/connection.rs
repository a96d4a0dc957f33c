//! Connection to a FrontBase database.
//!
//! The `Connection` type owns one native executor, runs session setup on
//! open, tracks transaction state and hands out prepared statements.

use crate::client::statement::PreparedStatement;
use crate::connection::params::ConnectionParams;
use crate::connection::session::{
    Session, SessionState, TransactionOptions, COMMIT_SQL, ROLLBACK_SQL, SET_UTC_SQL,
};
use crate::error::{ConnectionError, QueryError, TransportError};
use crate::query::parse::parse;
use crate::query::results::{QueryResult, ResultSet};
use crate::transport::{Connector, SqlExecutor};
use crate::types::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

/// Shared access to the executor and the session it belongs to.
///
/// Session checks and transaction flag changes happen while the executor
/// lock is held, so they are ordered with the SQL they guard.
#[derive(Clone)]
pub(crate) struct ExecutorHandle {
    executor: Arc<Mutex<Box<dyn SqlExecutor>>>,
    session: Arc<Session>,
}

impl ExecutorHandle {
    fn new(executor: Box<dyn SqlExecutor>) -> Self {
        Self {
            executor: Arc::new(Mutex::new(executor)),
            session: Arc::new(Session::new()),
        }
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    /// Run SQL, committing unless a transaction is open.
    pub(crate) async fn run(&self, sql: &str) -> Result<QueryResult, QueryError> {
        let mut executor = self.executor.lock().await;
        self.session.validate_ready()?;
        let autocommit = self.session.autocommit();
        self.execute_locked(&mut executor, sql, autocommit).await
    }

    /// Run a transaction control statement with autocommit and set the
    /// transaction flag once it succeeds.
    async fn transition(
        &self,
        sql: &str,
        validate: fn(&Session) -> Result<(), QueryError>,
        in_transaction: bool,
    ) -> Result<(), QueryError> {
        let mut executor = self.executor.lock().await;
        validate(&self.session)?;
        self.execute_locked(&mut executor, sql, true).await?;
        self.session.set_in_transaction(in_transaction);
        Ok(())
    }

    async fn execute_locked(
        &self,
        executor: &mut Box<dyn SqlExecutor>,
        sql: &str,
        autocommit: bool,
    ) -> Result<QueryResult, QueryError> {
        let count = self.session.increment_query_count();
        trace!(query = count, autocommit, sql, "executing");

        match executor.execute(sql, autocommit).await {
            Ok(result) => Ok(result),
            Err(TransportError::NotConnected) => {
                warn!("native connection dropped, closing session");
                self.release(executor).await;
                Err(TransportError::NotConnected.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn ping(&self) -> Result<(), QueryError> {
        let mut executor = self.executor.lock().await;
        self.session.validate_ready()?;

        if !executor.ping().await {
            warn!("ping failed, closing session");
            self.release(&mut executor).await;
            return Err(QueryError::ConnectionClosed);
        }
        Ok(())
    }

    /// Close the session and the native connection. No-op once closed.
    async fn close(&self) -> Result<(), QueryError> {
        let mut executor = self.executor.lock().await;
        if self.session.is_closed() {
            return Ok(());
        }

        if self.session.in_transaction() {
            warn!("closing connection with an open transaction");
        }

        self.session.close();
        executor.close().await?;
        Ok(())
    }

    /// Close after the engine went away. A close failure is only logged.
    async fn release(&self, executor: &mut Box<dyn SqlExecutor>) {
        self.session.close();
        if let Err(e) = executor.close().await {
            warn!(error = %e, "releasing dropped connection failed");
        }
    }
}

/// Connection to a FrontBase database.
///
/// # Example
///
/// ```no_run
/// # use frontbase_rs::client::Connection;
/// # use frontbase_rs::transport::Connector;
/// # use frontbase_rs::Value;
/// # async fn example(connector: &dyn Connector) -> Result<(), Box<dyn std::error::Error>> {
/// let params = "frontbase://localhost/Movies".parse()?;
/// let connection = Connection::open(connector, params).await?;
///
/// let stmt = connection.prepare("select title from movie where year = ?").await?;
/// let rows = stmt.query(&[Value::from(1977)]).await?;
///
/// connection.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct Connection {
    handle: ExecutorHandle,
    /// Connection parameters
    params: ConnectionParams,
}

impl Connection {
    /// Open a native connection and prepare the session for use.
    ///
    /// The session time zone is set to UTC before the connection is
    /// returned. If that fails the native connection is closed.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if connecting times out, the engine refuses
    /// the connection, or session setup fails.
    pub async fn open(
        connector: &dyn Connector,
        params: ConnectionParams,
    ) -> Result<Self, ConnectionError> {
        let url = params.database_url();
        debug!(url = %url, user = %params.username, "opening connection");

        let timeout_ms = millis(params.connection_timeout);
        let executor = timeout(params.connection_timeout, connector.connect(&params))
            .await
            .map_err(|_| ConnectionError::Timeout { timeout_ms })?
            .map_err(|e| ConnectionError::ConnectionFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        Self::from_executor(executor, params).await
    }

    /// Wrap an already open executor and run session setup on it.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::SessionSetupFailed` if the engine rejects
    /// the setup statement; the executor is closed in that case.
    pub async fn from_executor(
        executor: Box<dyn SqlExecutor>,
        params: ConnectionParams,
    ) -> Result<Self, ConnectionError> {
        let handle = ExecutorHandle::new(executor);

        let setup = {
            let mut executor = handle.executor.lock().await;
            handle.execute_locked(&mut executor, SET_UTC_SQL, true).await
        };

        if let Err(e) = setup {
            warn!(error = %e, "session setup failed");
            if let Err(close_err) = handle.close().await {
                warn!(error = %close_err, "close after failed setup");
            }
            return Err(ConnectionError::SessionSetupFailed(e.to_string()));
        }

        debug!(url = %params.database_url(), "connection ready");
        Ok(Self { handle, params })
    }

    /// Get the connection parameters.
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Get current session state.
    pub fn state(&self) -> SessionState {
        self.handle.session().state()
    }

    /// Number of SQL strings sent on this connection, session setup included.
    pub fn query_count(&self) -> u64 {
        self.handle.session().query_count()
    }

    /// Parse a template once for repeated execution.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Parse` for a malformed template, or
    /// `ConnectionClosed` if the connection was closed.
    pub async fn prepare(&self, template: &str) -> Result<PreparedStatement, QueryError> {
        self.handle.session().validate_ready()?;
        let statement = parse(template)?;
        Ok(PreparedStatement::new(
            self.handle.clone(),
            Arc::new(statement),
        ))
    }

    /// Execute SQL text as is, without placeholder processing.
    pub async fn execute_raw(&self, sql: &str) -> Result<QueryResult, QueryError> {
        self.handle.run(sql).await
    }

    /// Prepare, bind positionally and run a query in one call.
    pub async fn query(&self, template: &str, values: &[Value]) -> Result<ResultSet, QueryError> {
        self.prepare(template).await?.query(values).await
    }

    /// Prepare, bind positionally and run a statement in one call.
    ///
    /// Returns the affected row count.
    pub async fn execute(&self, template: &str, values: &[Value]) -> Result<i64, QueryError> {
        self.prepare(template).await?.execute(values).await
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if a transaction is already active, the isolation
    /// level is unsupported, or the engine rejects the statement.
    pub async fn begin_transaction(&self, options: TransactionOptions) -> Result<(), QueryError> {
        let sql = options.to_sql()?;
        self.handle
            .transition(&sql, Session::validate_begin, true)
            .await?;

        debug!(isolation = %options.isolation, read_only = options.read_only, "transaction started");
        Ok(())
    }

    /// Commit the current transaction.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if no transaction is active or the commit fails.
    pub async fn commit(&self) -> Result<(), QueryError> {
        self.end_transaction(COMMIT_SQL).await
    }

    /// Rollback the current transaction.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if no transaction is active or the rollback fails.
    pub async fn rollback(&self) -> Result<(), QueryError> {
        self.end_transaction(ROLLBACK_SQL).await
    }

    async fn end_transaction(&self, sql: &str) -> Result<(), QueryError> {
        self.handle
            .transition(sql, Session::validate_end, false)
            .await?;

        debug!(sql, "transaction ended");
        Ok(())
    }

    /// Check if a transaction is currently active.
    pub fn in_transaction(&self) -> bool {
        self.handle.session().in_transaction()
    }

    /// Check that the native connection is still alive.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::ConnectionClosed` if the connection was closed or
    /// the engine no longer answers. In the latter case the native
    /// connection is released.
    pub async fn ping(&self) -> Result<(), QueryError> {
        self.handle.ping().await
    }

    /// Close the connection.
    ///
    /// Closing twice is a no-op. An open transaction is abandoned; the
    /// engine rolls it back.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Transport` if the native close fails.
    pub async fn close(&self) -> Result<(), QueryError> {
        self.handle.close().await?;
        debug!(queries = self.query_count(), "connection closed");
        Ok(())
    }

    /// Check if the connection is closed.
    pub fn is_closed(&self) -> bool {
        self.handle.session().is_closed()
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("params", &self.params)
            .field("state", &self.state())
            .finish()
    }
}
