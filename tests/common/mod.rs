//! Common test utilities for frontbase-rs integration tests.
//!
//! No database is needed: `RecordingConnector` hands out executors that
//! record every SQL string with its autocommit flag and answer from a
//! queue of canned results.

#![allow(dead_code)]

use async_trait::async_trait;
use frontbase_rs::connection::ConnectionParams;
use frontbase_rs::transport::{Connector, SqlExecutor};
use frontbase_rs::{Connection, QueryResult, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One SQL string as seen by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executed {
    pub sql: String,
    pub autocommit: bool,
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub executed: Vec<Executed>,
    pub responses: VecDeque<Result<QueryResult, TransportError>>,
    pub closed: bool,
}

/// Shared view of everything the executor saw.
#[derive(Debug, Clone, Default)]
pub struct Recording(Arc<Mutex<Recorder>>);

impl Recording {
    /// Queue the answer for the next SQL string. Unanswered SQL gets a row
    /// count of 0.
    pub fn respond(&self, response: Result<QueryResult, TransportError>) {
        self.0.lock().unwrap().responses.push_back(response);
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.0.lock().unwrap().executed.clone()
    }

    pub fn sql(&self) -> Vec<String> {
        self.executed().into_iter().map(|e| e.sql).collect()
    }

    pub fn last(&self) -> Option<Executed> {
        self.0.lock().unwrap().executed.last().cloned()
    }

    pub fn is_closed(&self) -> bool {
        self.0.lock().unwrap().closed
    }
}

pub struct RecordingExecutor {
    recording: Recording,
}

#[async_trait]
impl SqlExecutor for RecordingExecutor {
    async fn execute(&mut self, sql: &str, autocommit: bool) -> Result<QueryResult, TransportError> {
        let mut recorder = self.recording.0.lock().unwrap();
        if recorder.closed {
            return Err(TransportError::NotConnected);
        }
        recorder.executed.push(Executed {
            sql: sql.to_string(),
            autocommit,
        });
        recorder
            .responses
            .pop_front()
            .unwrap_or(Ok(QueryResult::row_count(0)))
    }

    async fn ping(&mut self) -> bool {
        !self.recording.is_closed()
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.recording.0.lock().unwrap().closed = true;
        Ok(())
    }
}

/// Connector whose executors all share one recording.
#[derive(Clone, Default)]
pub struct RecordingConnector {
    pub recording: Recording,
}

#[async_trait]
impl Connector for RecordingConnector {
    async fn connect(&self, _params: &ConnectionParams) -> Result<Box<dyn SqlExecutor>, TransportError> {
        Ok(Box::new(RecordingExecutor {
            recording: self.recording.clone(),
        }))
    }
}

pub const TEST_URL: &str = "frontbase://tester:pw@localhost/Test";

/// Open a connection on a fresh recording.
pub async fn connect() -> (Connection, Recording) {
    let connector = RecordingConnector::default();
    let recording = connector.recording.clone();
    let params = TEST_URL.parse().expect("valid test url");
    let connection = Connection::open(&connector, params)
        .await
        .expect("connection opens");
    (connection, recording)
}
