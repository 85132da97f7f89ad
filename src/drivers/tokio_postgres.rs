use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};
use tracing::error;

use crate::drivers::StandardEscaper;
use crate::error::{Result, ZoneDbError};
use crate::traits::{Connection, DatabaseDriver, Escaper};
use crate::types::RawRow;
use crate::BackendConfig;

/// Session settings shared by every host in an endpoint list.
#[derive(Debug, Clone)]
pub struct PostgresOptions {
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl From<&BackendConfig> for PostgresOptions {
    fn from(config: &BackendConfig) -> Self {
        Self {
            port: config.port,
            database: config.database.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

/// PostgreSQL driver implementation using tokio-postgres.
///
/// Statements are sent with the simple query protocol since they arrive
/// fully rendered. Rows come back as text.
pub struct TokioPostgresDriver {
    options: PostgresOptions,
}

impl TokioPostgresDriver {
    pub fn new(options: PostgresOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl DatabaseDriver for TokioPostgresDriver {
    async fn connect(&self, host: &str) -> Result<Box<dyn Connection>> {
        let mut config = tokio_postgres::Config::new();
        config
            .host(host)
            .port(self.options.port)
            .dbname(&self.options.database)
            .user(&self.options.username);
        if !self.options.password.is_empty() {
            config.password(&self.options.password);
        }

        let (client, connection) = config
            .connect(NoTls)
            .await
            .map_err(|e| ZoneDbError::ConnectionFailed(format!("{}: {}", host, e)))?;

        // Spawn the connection handler
        let owner = host.to_string();
        let task = tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(host = %owner, error = %e, "PostgreSQL connection error");
            }
        });

        Ok(Box::new(TokioPostgresConnection {
            host: host.to_string(),
            client,
            task,
            pending: VecDeque::new(),
        }))
    }
}

struct TokioPostgresConnection {
    host: String,
    client: Client,
    task: JoinHandle<()>,
    pending: VecDeque<RawRow>,
}

impl Escaper for TokioPostgresConnection {
    fn escape(&self, raw: &str) -> Result<String> {
        StandardEscaper.escape(raw)
    }
}

#[async_trait]
impl Connection for TokioPostgresConnection {
    fn host(&self) -> &str {
        &self.host
    }

    fn is_closed(&self) -> bool {
        self.client.is_closed()
    }

    async fn execute(&mut self, sql: &str) -> Result<()> {
        self.pending.clear();

        let messages = self.client.simple_query(sql).await.map_err(|e| {
            if e.is_closed() {
                ZoneDbError::ConnectionLost(format!("{}: {}", self.host, e))
            } else {
                ZoneDbError::QueryFailed(e.to_string())
            }
        })?;

        for message in messages {
            if let SimpleQueryMessage::Row(row) = message {
                let values = (0..row.len())
                    .map(|i| row.get(i).map(|v| v.as_bytes().to_vec()))
                    .collect();
                self.pending.push_back(RawRow::new(values));
            }
        }

        Ok(())
    }

    async fn fetch_row(&mut self) -> Result<Option<RawRow>> {
        Ok(self.pending.pop_front())
    }

    async fn close(&mut self) {
        self.pending.clear();
        self.task.abort();
    }
}
