//! Error types for frontbase-rs.
//!
//! Parse and bind failures are plain values returned to the caller. Errors
//! raised by the execution collaborators are grouped by functional area.

use thiserror::Error;

/// Top-level error type encompassing all possible errors.
#[derive(Error, Debug)]
pub enum FrontbaseError {
    /// Template parsing errors
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Value binding errors
    #[error(transparent)]
    Bind(#[from] BindError),

    /// Connection-related errors
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Query execution errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Transport errors reported by the executor
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl FrontbaseError {
    /// Whether the underlying connection is gone and a new one is needed.
    ///
    /// Nothing in this crate retries; callers holding a pool use this to
    /// decide whether to discard the connection.
    pub fn is_connection_lost(&self) -> bool {
        match self {
            FrontbaseError::Connection(ConnectionError::ConnectionClosed)
            | FrontbaseError::Query(QueryError::ConnectionClosed) => true,
            FrontbaseError::Transport(e) => e.is_connection_lost(),
            FrontbaseError::Query(QueryError::Transport(e)) => e.is_connection_lost(),
            _ => false,
        }
    }
}

/// Errors produced while scanning a statement template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `@` not followed by at least one ASCII letter or digit
    #[error("empty named placeholder at position {position}")]
    EmptyNamedPlaceholder { position: usize },

    /// Template ended inside a `'...'` string constant
    #[error("string constant not closed")]
    UnterminatedStringConstant,

    /// Template ended inside a `"..."` quoted identifier
    #[error("quoted identifier not closed")]
    UnterminatedQuotedIdentifier,
}

/// Errors produced while matching values to placeholders.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("can't bind named value {name}, statement has no named placeholders")]
    NoNamedPlaceholdersInStatement { name: String },

    #[error("can't bind ordinal value when statement has no ordinal placeholders")]
    NoPositionalPlaceholdersInStatement,

    #[error("can't bind, expected {expected} ordinal args, got {got}")]
    PositionalArgCountMismatch { expected: usize, got: usize },

    #[error("can't bind, missing named arg {name}")]
    MissingNamedArg { name: String },

    #[error("can't bind named value {name}, no matching named placeholder")]
    UnusedNamedArg { name: String },
}

/// Errors related to database connections.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Failed to establish connection to the database
    #[error("Failed to connect to {url}: {message}")]
    ConnectionFailed { url: String, message: String },

    /// Session setup statement was rejected
    #[error("Session setup failed: {0}")]
    SessionSetupFailed(String),

    /// Invalid connection parameters
    #[error("Invalid connection parameter '{parameter}': {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Connection string parsing error
    #[error("Failed to parse connection string: {0}")]
    ParseError(String),

    /// Connection timeout
    #[error("Connection timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Connection is closed
    #[error("Connection is closed")]
    ConnectionClosed,
}

/// Errors related to query execution and transactions.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Template could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Values could not be bound
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The executor failed to run the SQL
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Invalid connection or transaction state
    #[error("Invalid query state: {0}")]
    InvalidState(String),

    /// Isolation level the engine has no equivalent for
    #[error("unsupported isolation level {0}")]
    UnsupportedIsolationLevel(String),

    /// Prepared statement has been closed
    #[error("Prepared statement has been closed")]
    StatementClosed,

    /// Connection is closed
    #[error("Connection is closed")]
    ConnectionClosed,
}

/// Errors reported by an executor implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The native connection dropped
    #[error("no database connection")]
    NotConnected,

    /// The engine reported errors for the statement
    #[error("execute SQL failed:\n{0}")]
    ExecutionFailed(String),

    /// The engine returned a column type the executor cannot decode
    #[error("unsupported column type {0}")]
    UnsupportedColumnType(String),

    /// A fetched cell could not be decoded
    #[error("invalid column value: {0}")]
    InvalidColumnValue(String),

    /// Closing the native connection failed
    #[error("close failed: {0}")]
    CloseFailed(String),
}

impl TransportError {
    /// Whether the error means the native connection is gone.
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, TransportError::NotConnected)
    }
}
