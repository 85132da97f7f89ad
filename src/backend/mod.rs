//! The adapter: one read and one write session plus the operations the
//! name server calls.
//!
//! An adapter serves one operation at a time; every operation takes
//! `&mut self`. Statements on a role's session run in submission order and
//! starting one discards whatever rows the previous one left unread, so a
//! lookup's records must be drained with [`ZoneDbBackend::next_record`]
//! before the next read operation.

mod lookup;
mod transaction;
mod update;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, error, info, warn};

use crate::builders::StatementBuilder;
use crate::config::BackendConfig;
use crate::drivers::{PostgresOptions, TokioPostgresDriver};
use crate::error::{Result, ZoneDbError};
use crate::traits::{Connection, DatabaseDriver, Layout};
use crate::types::{Role, Row};

/// Scratch state of a lookup or list, read by [`ZoneDbBackend::next_record`].
#[derive(Debug, Default)]
struct PendingQuery {
    /// Name that was looked up, empty for a zone listing.
    qname: String,
}

/// Zone and record data source backed by a relational database.
pub struct ZoneDbBackend {
    driver: Arc<dyn DatabaseDriver>,
    config: BackendConfig,
    hosts: [Vec<String>; 2],
    handles: [Option<Box<dyn Connection>>; 2],
    pending: PendingQuery,
}

impl ZoneDbBackend {
    /// Connect to PostgreSQL servers described by `config`.
    ///
    /// # Example
    /// ```ignore
    /// let config = BackendConfig::from_toml_str(&std::fs::read_to_string("zonedb.toml")?)?;
    /// let mut backend = ZoneDbBackend::connect(config).await?;
    /// ```
    pub async fn connect(config: BackendConfig) -> Result<Self> {
        let driver = TokioPostgresDriver::new(PostgresOptions::from(&config));
        Self::with_driver(Arc::new(driver), config).await
    }

    /// Create an adapter on top of a custom driver.
    ///
    /// Both sessions are opened eagerly; if either role has no reachable
    /// endpoint the adapter is not created.
    pub async fn with_driver(driver: Arc<dyn DatabaseDriver>, config: BackendConfig) -> Result<Self> {
        if config.uses_shared_host() {
            warn!("Deprecated 'host' setting used for both read and write connections");
        }
        let hosts = [config.hosts(Role::Read), config.hosts(Role::Write)];
        let mut backend = Self {
            driver,
            config,
            hosts,
            handles: [None, None],
            pending: PendingQuery::default(),
        };

        for role in Role::ALL {
            if !backend.connect_to(role).await {
                error!(role = %role, "Fatal: connecting to server for {} failed", role);
                backend.close_handles().await;
                return Err(ZoneDbError::ServerUnreachable(role));
            }
        }

        Ok(backend)
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// True when `role` holds a session not known to be dead.
    pub fn is_connected(&self, role: Role) -> bool {
        matches!(&self.handles[role.index()], Some(conn) if !conn.is_closed())
    }

    /// Host the `role` session is bound to.
    pub fn connected_host(&self, role: Role) -> Option<&str> {
        self.handles[role.index()].as_deref().map(|conn| conn.host())
    }

    /// Release both sessions, whatever state they are in.
    pub async fn close(mut self) {
        self.close_handles().await;
    }

    async fn close_handles(&mut self) {
        for slot in self.handles.iter_mut() {
            if let Some(mut conn) = slot.take() {
                conn.close().await;
            }
        }
    }

    /// Tries every endpoint of `role` in order and keeps the first session
    /// that opens. Any previous session of the role is closed first; on
    /// failure the role is left without a session.
    async fn connect_to(&mut self, role: Role) -> bool {
        let idx = role.index();

        if let Some(mut old) = self.handles[idx].take() {
            old.close().await;
        }

        for host in &self.hosts[idx] {
            match self.driver.connect(host).await {
                Ok(conn) => {
                    info!(role = %role, host = %host, "Database connection succeeded");
                    self.handles[idx] = Some(conn);
                    return true;
                }
                Err(e) => {
                    warn!(role = %role, host = %host, error = %e, "Unable to connect to database host");
                }
            }
        }

        false
    }

    /// Makes sure `role` has a live session, reconnecting once through its
    /// endpoint list when the handle is absent or known dead.
    async fn ensure_connected(&mut self, role: Role) -> Result<()> {
        if self.is_connected(role) {
            return Ok(());
        }

        if self.connect_to(role).await {
            Ok(())
        } else {
            Err(ZoneDbError::ServerUnreachable(role))
        }
    }

    /// Renders `builder` with the escaper of the `role` session.
    fn render(&self, builder: StatementBuilder<'_>, role: Role) -> Result<String> {
        let conn = self.handles[role.index()]
            .as_deref()
            .ok_or(ZoneDbError::ServerUnreachable(role))?;

        builder.max_len(self.config.max_statement_len).build(conn)
    }

    /// Sends `sql` on the `role` session.
    ///
    /// A statement that fails is not replayed. When the failure shows the
    /// session is gone the handle is dropped, so the next operation's
    /// pre-flight check reconnects. Rows returned to a write statement are
    /// discarded straight away.
    async fn execute(&mut self, sql: &str, role: Role) -> Result<()> {
        self.ensure_connected(role).await?;

        if self.config.query_logging {
            info!(role = %role, statement = %sql, "Query");
        }

        let idx = role.index();
        let conn = self.handles[idx]
            .as_mut()
            .ok_or(ZoneDbError::ServerUnreachable(role))?;

        if let Err(e) = conn.execute(sql).await {
            debug!(role = %role, error = %e, "Unable to execute statement");
            if e.is_connection_error() || conn.is_closed() {
                warn!(role = %role, "Dropping dead database session");
                if let Some(mut dead) = self.handles[idx].take() {
                    dead.close().await;
                }
            }
            return Err(e);
        }

        if role == Role::Write {
            self.drain(role).await;
        }

        Ok(())
    }

    /// Pulls the next row of the active result set on `role` and checks it
    /// against layout `L`. Exhaustion and failure both end iteration.
    async fn advance<L: Layout>(&mut self, role: Role) -> Option<Row> {
        let conn = self.handles[role.index()].as_mut()?;

        match conn.fetch_row().await {
            Ok(Some(raw)) => match Row::checked::<L>(raw) {
                Ok(row) => Some(row),
                Err(e) => {
                    error!(role = %role, error = %e, "Result row does not fit template layout");
                    self.drain(role).await;
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!(role = %role, error = %e, "Unable to get next row");
                None
            }
        }
    }

    /// Reads and discards the rest of the active result set on `role`.
    async fn drain(&mut self, role: Role) {
        let Some(conn) = self.handles[role.index()].as_mut() else {
            return;
        };

        loop {
            match conn.fetch_row().await {
                Ok(Some(_)) => continue,
                Ok(None) => break,
                Err(e) => {
                    error!(role = %role, error = %e, "Unable to drain result set");
                    break;
                }
            }
        }
    }
}

/// Logs a failed operation once, at its public boundary.
fn logged<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        error!(operation, error = %e, "Operation failed");
    }
    result
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
