use serde::{Deserialize, Serialize};

use crate::builders::DEFAULT_MAX_STATEMENT_LEN;
use crate::error::{Result, ZoneDbError};
use crate::types::Role;

/// Settings of one adapter instance.
///
/// Every field has a default, so an empty document is a valid config
/// pointing at a local server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Deprecated: one host list for both roles. Overrides `host_read` and
    /// `host_write` when set.
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_host")]
    pub host_read: String,

    #[serde(default = "default_host")]
    pub host_write: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// TTL given to records whose ttl column is NULL.
    #[serde(default = "default_ttl")]
    pub default_ttl: u32,

    /// Log every statement before it is sent.
    #[serde(default)]
    pub query_logging: bool,

    #[serde(default = "default_max_statement_len")]
    pub max_statement_len: usize,

    #[serde(default)]
    pub statements: Statements,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: None,
            host_read: default_host(),
            host_write: default_host(),
            port: default_port(),
            database: default_database(),
            username: default_username(),
            password: String::new(),
            default_ttl: default_ttl(),
            query_logging: false,
            max_statement_len: default_max_statement_len(),
            statements: Statements::default(),
        }
    }
}

impl BackendConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ZoneDbError::Config(e.to_string()))
    }

    /// True when the deprecated shared `host` list is set.
    pub fn uses_shared_host(&self) -> bool {
        self.shared_host().is_some()
    }

    /// Ordered endpoint list for `role`.
    pub fn hosts(&self, role: Role) -> Vec<String> {
        if let Some(shared) = self.shared_host() {
            return parse_host_list(shared);
        }

        match role {
            Role::Read => parse_host_list(&self.host_read),
            Role::Write => parse_host_list(&self.host_write),
        }
    }

    fn shared_host(&self) -> Option<&str> {
        self.host.as_deref().filter(|h| !h.trim().is_empty())
    }
}

/// Splits a host list on commas, spaces and tabs.
pub fn parse_host_list(list: &str) -> Vec<String> {
    list.split([',', ' ', '\t'])
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}

/// Statement templates, one per query kind.
///
/// Named templates use `:name`, `:id`, `:type`, `:ip` and `:ns`. The four
/// write templates marked "positional" are filled in order through
/// printf-style slots instead. See [`crate::layouts`] for the columns the
/// read templates must return.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Statements {
    /// Must return id, name, type, master, last_check, notified_serial and
    /// SOA content in that order; `last_check` is column 4, not 5.
    pub zone_info: String,
    pub list: String,
    pub lookup: String,
    pub lookup_id: String,
    pub lookup_type: String,
    pub lookup_type_id: String,
    pub zone_delete: String,
    /// Positional: domain_id, name, type, ttl, prio, content.
    pub insert_record: String,
    /// Positional: name, primary ip, account.
    pub insert_secondary: String,
    /// Positional: last_check, id.
    pub update_last_check: String,
    /// Positional: notified_serial, id.
    pub update_serial: String,
    pub primary_check: String,
    pub super_primary: String,
    pub info_secondaries: String,
    pub info_primaries: String,
    pub transaction_begin: String,
    pub transaction_commit: String,
    pub transaction_abort: String,
}

const RECORD_COLUMNS: &str =
    r#"SELECT r."domain_id", r."name", r."type", r."ttl", r."prio", r."content" FROM "records" r"#;

const ZONE_LIST_COLUMNS: &str = r#"SELECT d."id", d."name", d."master", d."last_check", d."notified_serial", d."auto_serial", r."content" FROM "domains" d LEFT JOIN "records" r ON ( d."id"=r."domain_id" AND r."type"='SOA' )"#;

impl Default for Statements {
    fn default() -> Self {
        Self {
            zone_info: concat!(
                r#"SELECT d."id", d."name", d."type", d."master", d."last_check", d."notified_serial", r."content" "#,
                r#"FROM "domains" d LEFT JOIN "records" r ON ( d."id"=r."domain_id" AND r."type"='SOA' ) "#,
                r#"WHERE d."name"=':name' AND d."status"='A'"#
            )
            .to_string(),
            list: format!(r#"{} WHERE r."domain_id"=:id"#, RECORD_COLUMNS),
            lookup: format!(r#"{} WHERE r."name"=':name'"#, RECORD_COLUMNS),
            lookup_id: format!(
                r#"{} WHERE r."domain_id"=:id AND r."name"=':name'"#,
                RECORD_COLUMNS
            ),
            lookup_type: format!(
                r#"{} WHERE r."name"=':name' AND r."type"=':type'"#,
                RECORD_COLUMNS
            ),
            lookup_type_id: format!(
                r#"{} WHERE r."domain_id"=:id AND r."name"=':name' AND r."type"=':type'"#,
                RECORD_COLUMNS
            ),
            zone_delete: r#"DELETE FROM "records" WHERE "domain_id"=:id"#.to_string(),
            insert_record: concat!(
                r#"INSERT INTO "records" ( "domain_id", "name", "type", "ttl", "prio", "content" ) "#,
                r#"VALUES ( %d, '%s', '%s', %d, %d, '%s' )"#
            )
            .to_string(),
            insert_secondary: concat!(
                r#"INSERT INTO "domains" ( "name", "type", "master", "account" ) "#,
                r#"VALUES ( '%s', 'SLAVE', '%s', '%s' )"#
            )
            .to_string(),
            update_last_check: r#"UPDATE "domains" SET "last_check"=%d WHERE "id"=%d"#
                .to_string(),
            update_serial: r#"UPDATE "domains" SET "notified_serial"=%d WHERE "id"=%d"#
                .to_string(),
            primary_check: concat!(
                r#"SELECT d."master" FROM "domains" d "#,
                r#"WHERE d."name"=':name' AND d."status"='A' AND d."type"='SLAVE'"#
            )
            .to_string(),
            super_primary: concat!(
                r#"SELECT "account" FROM "supermasters" "#,
                r#"WHERE "ip"=':ip' AND "nameserver"=':ns'"#
            )
            .to_string(),
            info_secondaries: format!(
                r#"{} WHERE d."status"='A' AND d."type"='SLAVE'"#,
                ZONE_LIST_COLUMNS
            ),
            info_primaries: format!(
                r#"{} WHERE d."status"='A' AND d."type"='MASTER'"#,
                ZONE_LIST_COLUMNS
            ),
            transaction_begin: "BEGIN".to_string(),
            transaction_commit: "COMMIT".to_string(),
            transaction_abort: "ROLLBACK".to_string(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_database() -> String {
    "zonedb".to_string()
}

fn default_username() -> String {
    "zonedb".to_string()
}

fn default_ttl() -> u32 {
    3600
}

fn default_max_statement_len() -> usize {
    DEFAULT_MAX_STATEMENT_LEN
}
