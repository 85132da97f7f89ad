use thiserror::Error;

use crate::types::Role;

/// Error type for zonedb operations
#[derive(Debug, Error)]
pub enum ZoneDbError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Server unreachable: no {0} endpoint accepted a connection")]
    ServerUnreachable(Role),

    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Fetching next row failed: {0}")]
    FetchFailed(String),

    #[error("Escaping value failed: {0}")]
    EscapeFailed(String),

    #[error("Statement format error: {0}")]
    StatementFormat(String),

    #[error("Statement is {len} bytes, limit is {max}")]
    StatementTooLong { len: usize, max: usize },

    #[error("Layout {layout} expects at least {expected} column(s), row has {actual}")]
    ColumnCount {
        layout: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ZoneDbError {
    /// True when the failure means the session behind a handle is gone.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            ZoneDbError::ConnectionFailed(_)
                | ZoneDbError::ConnectionLost(_)
                | ZoneDbError::ServerUnreachable(_)
        )
    }
}

/// Result type alias for zonedb operations
pub type Result<T> = std::result::Result<T, ZoneDbError>;
