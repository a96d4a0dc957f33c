//! Prepared statement handling.
//!
//! A `PreparedStatement` holds a parsed template. Binding happens on every
//! call so one statement serves many value sets.

use crate::client::connection::ExecutorHandle;
use crate::error::QueryError;
use crate::query::bind::NamedValue;
use crate::query::results::{QueryResult, ResultSet};
use crate::query::statement::Statement;
use crate::types::Value;
use std::sync::Arc;
use tracing::trace;

/// A parsed statement bound to a connection.
///
/// # Example
///
/// ```no_run
/// # use frontbase_rs::client::Connection;
/// # use frontbase_rs::query::NamedValue;
/// # async fn example(connection: &Connection) -> Result<(), Box<dyn std::error::Error>> {
/// let insert = connection
///     .prepare("insert into movie (title, year) values (@title, @year)")
///     .await?;
///
/// for (title, year) in [("Alien", 1979), ("Heat", 1995)] {
///     insert
///         .execute_named(&[
///             NamedValue::named("title", title),
///             NamedValue::named("year", year),
///         ])
///         .await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct PreparedStatement {
    handle: ExecutorHandle,
    statement: Arc<Statement>,
    /// Whether this prepared statement has been closed
    closed: bool,
}

impl PreparedStatement {
    pub(crate) fn new(handle: ExecutorHandle, statement: Arc<Statement>) -> Self {
        Self {
            handle,
            statement,
            closed: false,
        }
    }

    /// The parsed template.
    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// Get the number of placeholders in this prepared statement.
    pub fn parameter_count(&self) -> usize {
        self.statement.placeholder_count()
    }

    /// Bind positionally and run, returning the rows.
    ///
    /// A statement that reports a row count yields an empty result set.
    pub async fn query(&self, values: &[Value]) -> Result<ResultSet, QueryError> {
        self.check_open()?;
        let sql = self.statement.bind(values)?;
        Ok(self.run(&sql).await?.into_result_set())
    }

    /// Bind by name and run, returning the rows.
    pub async fn query_named(&self, values: &[NamedValue]) -> Result<ResultSet, QueryError> {
        self.check_open()?;
        let sql = self.statement.bind_named(values)?;
        Ok(self.run(&sql).await?.into_result_set())
    }

    /// Bind positionally and run, returning the affected row count.
    ///
    /// A statement that returns rows reports a count of 0.
    pub async fn execute(&self, values: &[Value]) -> Result<i64, QueryError> {
        self.check_open()?;
        let sql = self.statement.bind(values)?;
        Ok(self.run(&sql).await?.get_row_count().unwrap_or(0))
    }

    /// Bind by name and run, returning the affected row count.
    pub async fn execute_named(&self, values: &[NamedValue]) -> Result<i64, QueryError> {
        self.check_open()?;
        let sql = self.statement.bind_named(values)?;
        Ok(self.run(&sql).await?.get_row_count().unwrap_or(0))
    }

    async fn run(&self, sql: &str) -> Result<QueryResult, QueryError> {
        trace!(placeholders = self.parameter_count(), "running prepared statement");
        self.handle.run(sql).await
    }

    /// Close the prepared statement. Further use fails with `StatementClosed`.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Check if the prepared statement is closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn check_open(&self) -> Result<(), QueryError> {
        if self.closed {
            return Err(QueryError::StatementClosed);
        }
        Ok(())
    }
}

impl std::fmt::Debug for PreparedStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedStatement")
            .field("statement", &self.statement.template())
            .field("closed", &self.closed)
            .finish()
    }
}
