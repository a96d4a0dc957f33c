//! Session setup and transaction state.
//!
//! Every new native connection is switched to UTC before use. The value
//! encoder renders timestamps in UTC without a zone suffix, so a session in
//! any other zone would shift every bound timestamp.

use crate::error::QueryError;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Statement run once on every new connection.
pub const SET_UTC_SQL: &str = "SET TIME ZONE 'UTC';";

pub const COMMIT_SQL: &str = "commit;";

pub const ROLLBACK_SQL: &str = "rollback;";

/// Requested transaction isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    /// The engine default, repeatable read
    #[default]
    Default,
    ReadUncommitted,
    ReadCommitted,
    WriteCommitted,
    RepeatableRead,
    Snapshot,
    Serializable,
    Linearizable,
}

impl IsolationLevel {
    /// Isolation and locking clause for `set transaction`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnsupportedIsolationLevel` for `Snapshot` and
    /// `Linearizable`, which the engine has no equivalent for.
    pub fn to_sql(&self) -> Result<&'static str, QueryError> {
        match self {
            IsolationLevel::ReadUncommitted => Ok("read uncommitted, locking optimistic"),
            IsolationLevel::ReadCommitted => Ok("read committed, locking optimistic"),
            IsolationLevel::WriteCommitted => Ok("write committed, locking optimistic"),
            IsolationLevel::Serializable => Ok("serializable, locking pessimistic"),
            IsolationLevel::RepeatableRead | IsolationLevel::Default => {
                Ok("repeatable read, locking optimistic")
            }
            IsolationLevel::Snapshot | IsolationLevel::Linearizable => {
                Err(QueryError::UnsupportedIsolationLevel(self.to_string()))
            }
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IsolationLevel::Default => "Default",
            IsolationLevel::ReadUncommitted => "ReadUncommitted",
            IsolationLevel::ReadCommitted => "ReadCommitted",
            IsolationLevel::WriteCommitted => "WriteCommitted",
            IsolationLevel::RepeatableRead => "RepeatableRead",
            IsolationLevel::Snapshot => "Snapshot",
            IsolationLevel::Serializable => "Serializable",
            IsolationLevel::Linearizable => "Linearizable",
        };
        f.write_str(name)
    }
}

/// Options for starting a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionOptions {
    pub isolation: IsolationLevel,
    pub read_only: bool,
}

impl TransactionOptions {
    pub fn new(isolation: IsolationLevel) -> Self {
        Self {
            isolation,
            read_only: false,
        }
    }

    /// Mark the transaction read only.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// The `set transaction` statement that opens this transaction.
    pub fn to_sql(&self) -> Result<String, QueryError> {
        let isolation = self.isolation.to_sql()?;
        let access = if self.read_only {
            "read only"
        } else {
            "read write"
        };
        Ok(format!(
            "set transaction isolation level {}, {};",
            isolation, access
        ))
    }
}

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Session is connected and in autocommit mode
    Ready,

    /// Session is in a transaction
    InTransaction,

    /// Session is closed
    Closed,
}

/// Per-connection state tracking.
#[derive(Debug)]
pub struct Session {
    /// Transaction active flag
    in_transaction: AtomicBool,

    closed: AtomicBool,

    /// Query execution counter
    query_count: AtomicU64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            in_transaction: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            query_count: AtomicU64::new(0),
        }
    }

    /// Get current session state.
    pub fn state(&self) -> SessionState {
        if self.is_closed() {
            SessionState::Closed
        } else if self.in_transaction() {
            SessionState::InTransaction
        } else {
            SessionState::Ready
        }
    }

    /// Check if in transaction.
    pub fn in_transaction(&self) -> bool {
        self.in_transaction.load(Ordering::SeqCst)
    }

    /// Statements outside a transaction commit immediately.
    pub fn autocommit(&self) -> bool {
        !self.in_transaction()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Increment query counter.
    pub fn increment_query_count(&self) -> u64 {
        self.query_count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Get total query count.
    pub fn query_count(&self) -> u64 {
        self.query_count.load(Ordering::SeqCst)
    }

    /// Validate session is ready for operations.
    pub fn validate_ready(&self) -> Result<(), QueryError> {
        if self.is_closed() {
            return Err(QueryError::ConnectionClosed);
        }
        Ok(())
    }

    /// Check that a transaction can start.
    pub fn validate_begin(&self) -> Result<(), QueryError> {
        self.validate_ready()?;
        if self.in_transaction() {
            return Err(QueryError::InvalidState(
                "Transaction already active".to_string(),
            ));
        }
        Ok(())
    }

    /// Check that a transaction is open to commit or roll back.
    pub fn validate_end(&self) -> Result<(), QueryError> {
        self.validate_ready()?;
        if !self.in_transaction() {
            return Err(QueryError::InvalidState("No active transaction".to_string()));
        }
        Ok(())
    }

    pub fn set_in_transaction(&self, active: bool) {
        self.in_transaction.store(active, Ordering::SeqCst);
    }

    /// Mark the session closed. An open transaction is abandoned.
    pub fn close(&self) {
        self.in_transaction.store(false, Ordering::SeqCst);
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolation_mapping() {
        let cases = [
            (
                IsolationLevel::ReadUncommitted,
                "read uncommitted, locking optimistic",
            ),
            (
                IsolationLevel::ReadCommitted,
                "read committed, locking optimistic",
            ),
            (
                IsolationLevel::WriteCommitted,
                "write committed, locking optimistic",
            ),
            (
                IsolationLevel::Serializable,
                "serializable, locking pessimistic",
            ),
            (
                IsolationLevel::RepeatableRead,
                "repeatable read, locking optimistic",
            ),
            (IsolationLevel::Default, "repeatable read, locking optimistic"),
        ];

        for (level, expected) in cases {
            assert_eq!(level.to_sql().unwrap(), expected, "{}", level);
        }
    }

    #[test]
    fn test_unsupported_isolation_levels() {
        for level in [IsolationLevel::Snapshot, IsolationLevel::Linearizable] {
            let err = level.to_sql().unwrap_err();
            assert!(matches!(err, QueryError::UnsupportedIsolationLevel(_)));
            assert!(err.to_string().contains(&level.to_string()));
        }
    }

    #[test]
    fn test_transaction_sql() {
        assert_eq!(
            TransactionOptions::default().to_sql().unwrap(),
            "set transaction isolation level repeatable read, locking optimistic, read write;"
        );
        assert_eq!(
            TransactionOptions::new(IsolationLevel::Serializable)
                .read_only()
                .to_sql()
                .unwrap(),
            "set transaction isolation level serializable, locking pessimistic, read only;"
        );
        assert!(TransactionOptions::new(IsolationLevel::Snapshot)
            .to_sql()
            .is_err());
    }

    #[test]
    fn test_session_transaction_flags() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.autocommit());
        assert!(session.validate_end().is_err());

        session.validate_begin().unwrap();
        session.set_in_transaction(true);
        assert_eq!(session.state(), SessionState::InTransaction);
        assert!(!session.autocommit());
        assert!(matches!(
            session.validate_begin(),
            Err(QueryError::InvalidState(_))
        ));
        session.validate_end().unwrap();

        session.set_in_transaction(false);
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn test_session_close() {
        let session = Session::new();
        session.set_in_transaction(true);
        session.close();

        assert_eq!(session.state(), SessionState::Closed);
        assert!(!session.in_transaction());
        assert!(matches!(
            session.validate_ready(),
            Err(QueryError::ConnectionClosed)
        ));
    }

    #[test]
    fn test_query_count() {
        let session = Session::new();
        assert_eq!(session.increment_query_count(), 1);
        assert_eq!(session.increment_query_count(), 2);
        assert_eq!(session.query_count(), 2);
    }
}
