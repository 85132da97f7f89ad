use async_trait::async_trait;

use crate::error::Result;
use crate::types::RawRow;

/// Escapes free text for embedding in a statement literal.
/// Rules may differ per driver and per session.
pub trait Escaper {
    fn escape(&self, raw: &str) -> Result<String>;
}

/// Trait for database driver implementations.
/// Drivers are responsible for:
/// - Opening sessions to a single host descriptor
/// - Escaping text the way their server expects
/// - Executing rendered statements and streaming rows back
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Open a session to `host`.
    async fn connect(&self, host: &str) -> Result<Box<dyn Connection>>;
}

/// A live database session.
///
/// A connection holds at most one active result set. Executing a statement
/// discards whatever rows the previous one left behind.
#[async_trait]
pub trait Connection: Escaper + Send + Sync {
    /// The host descriptor this session was opened to.
    fn host(&self) -> &str;

    /// True once the driver knows the session is gone.
    fn is_closed(&self) -> bool;

    /// Execute a fully rendered statement, making its rows the active
    /// result set.
    async fn execute(&mut self, sql: &str) -> Result<()>;

    /// Pull the next row of the active result set, `None` once exhausted.
    async fn fetch_row(&mut self) -> Result<Option<RawRow>>;

    /// Release the session. Must not fail.
    async fn close(&mut self);
}
