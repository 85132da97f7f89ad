use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::drivers::StandardEscaper;
use crate::error::{Result, ZoneDbError};
use crate::traits::{Connection, DatabaseDriver, Escaper};
use crate::types::RawRow;

/// A statement executed through the driver, for verification.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStatement {
    pub host: String,
    pub connection: u64,
    pub sql: String,
}

struct ResponseRule {
    needle: String,
    rows: Vec<RawRow>,
}

#[derive(Default)]
struct DriverState {
    responses: Vec<ResponseRule>,
    failures: Vec<String>,
    unreachable: HashSet<String>,
    killed: HashSet<u64>,
    open: HashSet<u64>,
    connect_attempts: Vec<String>,
    recorded: Vec<RecordedStatement>,
    next_id: u64,
    strict_cursors: bool,
}

/// An in-memory database driver for testing.
///
/// Responses are matched by substring against the executed statement; each
/// configured response is used once, in the order it was added. Statements
/// without a matching response return no rows.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use zonedb::drivers::{InMemoryTestDriver, InMemoryTestResponseBuilder};
/// use zonedb::traits::DatabaseDriver;
///
/// let driver = Arc::new(
///     InMemoryTestDriver::new()
///         .with_unreachable_host("db-down")
///         .with_response(
///             "FROM \"records\"",
///             InMemoryTestResponseBuilder::new()
///                 .row(&["1", "example.com", "SOA", "3600", "0", "ns1 host 1"])
///                 .build(),
///         ),
/// );
/// let _as_driver: Arc<dyn DatabaseDriver> = driver;
/// ```
#[derive(Clone, Default)]
pub struct InMemoryTestDriver {
    state: Arc<Mutex<DriverState>>,
}

impl InMemoryTestDriver {
    /// Create a new in-memory test driver where every host is reachable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `rows` for the next statement containing `needle`.
    pub fn with_response(self, needle: &str, rows: Vec<RawRow>) -> Self {
        self.add_response(needle, rows);
        self
    }

    /// Fail every statement containing `needle`.
    pub fn with_failure(self, needle: &str) -> Self {
        self.state.lock().unwrap().failures.push(needle.to_string());
        self
    }

    /// Refuse connections to `host`.
    pub fn with_unreachable_host(self, host: &str) -> Self {
        self.set_unreachable(host);
        self
    }

    /// Reject a statement while the previous result set on the same
    /// connection still has unfetched rows.
    pub fn strict_cursors(self) -> Self {
        self.state.lock().unwrap().strict_cursors = true;
        self
    }

    pub fn add_response(&self, needle: &str, rows: Vec<RawRow>) {
        self.state.lock().unwrap().responses.push(ResponseRule {
            needle: needle.to_string(),
            rows,
        });
    }

    pub fn set_unreachable(&self, host: &str) {
        self.state.lock().unwrap().unreachable.insert(host.to_string());
    }

    pub fn set_reachable(&self, host: &str) {
        self.state.lock().unwrap().unreachable.remove(host);
    }

    /// Mark every open connection as dead, as if the server went away.
    pub fn kill_connections(&self) {
        let mut state = self.state.lock().unwrap();
        let open: Vec<u64> = state.open.iter().copied().collect();
        state.killed.extend(open);
    }

    /// Hosts passed to `connect`, successful or not, in call order.
    pub fn connect_attempts(&self) -> Vec<String> {
        self.state.lock().unwrap().connect_attempts.clone()
    }

    /// Number of sessions opened and not yet closed or dropped.
    pub fn open_connections(&self) -> usize {
        self.state.lock().unwrap().open.len()
    }

    /// Get all recorded statements, including the ones that failed.
    pub fn recorded_statements(&self) -> Vec<RecordedStatement> {
        self.state.lock().unwrap().recorded.clone()
    }

    /// Statement texts only, in execution order.
    pub fn statements(&self) -> Vec<String> {
        self.recorded_statements()
            .into_iter()
            .map(|r| r.sql)
            .collect()
    }

    /// Get the last recorded statement, if any.
    pub fn last_statement(&self) -> Option<RecordedStatement> {
        self.state.lock().unwrap().recorded.last().cloned()
    }

    /// Clear recorded statements and connect attempts.
    pub fn clear_recorded(&self) {
        let mut state = self.state.lock().unwrap();
        state.recorded.clear();
        state.connect_attempts.clear();
    }

    /// Assert that the last statement matches the expected SQL.
    pub fn assert_last_statement(&self, expected_sql: &str) {
        let last = self.last_statement().expect("No statements were recorded");
        assert_eq!(
            last.sql, expected_sql,
            "SQL mismatch.\nExpected: {}\nActual: {}",
            expected_sql, last.sql
        );
    }

    /// Assert that exactly n statements were executed.
    pub fn assert_statement_count(&self, expected: usize) {
        let actual = self.state.lock().unwrap().recorded.len();
        assert_eq!(
            actual, expected,
            "Statement count mismatch. Expected: {}, Actual: {}",
            expected, actual
        );
    }
}

#[async_trait]
impl DatabaseDriver for InMemoryTestDriver {
    async fn connect(&self, host: &str) -> Result<Box<dyn Connection>> {
        let mut state = self.state.lock().unwrap();
        state.connect_attempts.push(host.to_string());

        if state.unreachable.contains(host) {
            return Err(ZoneDbError::ConnectionFailed(format!(
                "{}: connection refused",
                host
            )));
        }

        state.next_id += 1;
        let id = state.next_id;
        state.open.insert(id);

        Ok(Box::new(InMemoryConnection {
            id,
            host: host.to_string(),
            state: Arc::clone(&self.state),
            pending: VecDeque::new(),
            closed: false,
        }))
    }
}

struct InMemoryConnection {
    id: u64,
    host: String,
    state: Arc<Mutex<DriverState>>,
    pending: VecDeque<RawRow>,
    closed: bool,
}

impl Escaper for InMemoryConnection {
    fn escape(&self, raw: &str) -> Result<String> {
        StandardEscaper.escape(raw)
    }
}

#[async_trait]
impl Connection for InMemoryConnection {
    fn host(&self) -> &str {
        &self.host
    }

    fn is_closed(&self) -> bool {
        self.closed || self.state.lock().unwrap().killed.contains(&self.id)
    }

    async fn execute(&mut self, sql: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();

        if self.closed || state.killed.contains(&self.id) {
            return Err(ZoneDbError::ConnectionLost(format!(
                "{}: server closed the connection",
                self.host
            )));
        }

        state.recorded.push(RecordedStatement {
            host: self.host.clone(),
            connection: self.id,
            sql: sql.to_string(),
        });

        if state.strict_cursors && !self.pending.is_empty() {
            return Err(ZoneDbError::QueryFailed(format!(
                "connection busy: {} row(s) of the previous result set not fetched",
                self.pending.len()
            )));
        }
        self.pending.clear();

        if state.failures.iter().any(|needle| sql.contains(needle.as_str())) {
            return Err(ZoneDbError::QueryFailed(format!(
                "statement rejected: {}",
                sql
            )));
        }

        if let Some(idx) = state
            .responses
            .iter()
            .position(|rule| sql.contains(rule.needle.as_str()))
        {
            let rule = state.responses.remove(idx);
            self.pending.extend(rule.rows);
        }

        Ok(())
    }

    async fn fetch_row(&mut self) -> Result<Option<RawRow>> {
        if self.state.lock().unwrap().killed.contains(&self.id) {
            return Err(ZoneDbError::FetchFailed(format!(
                "{}: server closed the connection",
                self.host
            )));
        }
        Ok(self.pending.pop_front())
    }

    async fn close(&mut self) {
        self.closed = true;
        self.pending.clear();
        self.state.lock().unwrap().open.remove(&self.id);
    }
}

impl Drop for InMemoryConnection {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.open.remove(&self.id);
        }
    }
}

/// Builder for creating test responses easily.
pub struct InMemoryTestResponseBuilder {
    rows: Vec<RawRow>,
}

impl InMemoryTestResponseBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Add a row of non-NULL string values.
    pub fn row(mut self, values: &[&str]) -> Self {
        let values: Vec<Option<&str>> = values.iter().copied().map(Some).collect();
        self.rows.push(RawRow::from_text(&values));
        self
    }

    /// Add a row where `None` stands for NULL.
    pub fn nullable_row(mut self, values: &[Option<&str>]) -> Self {
        self.rows.push(RawRow::from_text(values));
        self
    }

    /// Build the rows of the response.
    pub fn build(self) -> Vec<RawRow> {
        self.rows
    }
}

impl Default for InMemoryTestResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_responses_are_matched_once() {
        let driver = InMemoryTestDriver::new().with_response(
            "FROM zones",
            InMemoryTestResponseBuilder::new().row(&["1"]).build(),
        );
        let mut conn = driver.connect("db1").await.unwrap();

        conn.execute("SELECT id FROM zones").await.unwrap();
        assert_eq!(
            conn.fetch_row().await.unwrap(),
            Some(RawRow::from_text(&[Some("1")]))
        );
        assert_eq!(conn.fetch_row().await.unwrap(), None);

        conn.execute("SELECT id FROM zones").await.unwrap();
        assert_eq!(conn.fetch_row().await.unwrap(), None);
        driver.assert_statement_count(2);
    }

    #[tokio::test]
    async fn test_strict_cursors_reject_busy_connection() {
        let driver = InMemoryTestDriver::new().strict_cursors().with_response(
            "SELECT",
            InMemoryTestResponseBuilder::new()
                .row(&["1"])
                .row(&["2"])
                .build(),
        );
        let mut conn = driver.connect("db1").await.unwrap();

        conn.execute("SELECT 1").await.unwrap();
        conn.fetch_row().await.unwrap();
        let err = conn.execute("SELECT 2").await.unwrap_err();
        assert!(matches!(err, ZoneDbError::QueryFailed(_)));
    }

    #[tokio::test]
    async fn test_killed_connection_reports_closed() {
        let driver = InMemoryTestDriver::new();
        let mut conn = driver.connect("db1").await.unwrap();
        assert_eq!(driver.open_connections(), 1);

        driver.kill_connections();
        assert!(conn.is_closed());
        let err = conn.execute("SELECT 1").await.unwrap_err();
        assert!(err.is_connection_error());

        drop(conn);
        assert_eq!(driver.open_connections(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let driver = InMemoryTestDriver::new().with_unreachable_host("db1");
        assert!(driver.connect("db1").await.is_err());
        assert!(driver.connect("db2").await.is_ok());
        assert_eq!(driver.connect_attempts(), vec!["db1", "db2"]);
    }
}
