use tracing::instrument;

use super::{logged, unix_now, ZoneDbBackend};
use crate::builders::StatementBuilder;
use crate::error::Result;
use crate::mapper::{lower_name, record_insert};
use crate::types::{ResourceRecord, Role};

impl ZoneDbBackend {
    /// Record that secondary zone `zone_id` was checked just now.
    #[instrument(skip(self), level = "debug")]
    pub async fn set_fresh(&mut self, zone_id: u32) -> Result<()> {
        let result = self.write_last_check(zone_id, unix_now()).await;
        logged("set_fresh", result)
    }

    async fn write_last_check(&mut self, zone_id: u32, now: i64) -> Result<()> {
        self.ensure_connected(Role::Write).await?;
        let sql = self.render(
            StatementBuilder::new(&self.config.statements.update_last_check)
                .arg(now)
                .arg(zone_id),
            Role::Write,
        )?;
        self.execute(&sql, Role::Write).await
    }

    /// Record the serial secondaries of primary zone `zone_id` were
    /// notified about.
    #[instrument(skip(self), level = "debug")]
    pub async fn set_notified(&mut self, zone_id: u32, serial: u32) -> Result<()> {
        let result = self.write_notified(zone_id, serial).await;
        logged("set_notified", result)
    }

    async fn write_notified(&mut self, zone_id: u32, serial: u32) -> Result<()> {
        self.ensure_connected(Role::Write).await?;
        let sql = self.render(
            StatementBuilder::new(&self.config.statements.update_serial)
                .arg(serial)
                .arg(zone_id),
            Role::Write,
        )?;
        self.execute(&sql, Role::Write).await
    }

    /// Add `domain` as a secondary zone transferred from `ip`, owned by
    /// `account`.
    #[instrument(skip(self), level = "debug")]
    pub async fn create_secondary_zone(&mut self, ip: &str, domain: &str, account: &str) -> Result<()> {
        let result = self.insert_secondary(ip, domain, account).await;
        logged("create_secondary_zone", result)
    }

    async fn insert_secondary(&mut self, ip: &str, domain: &str, account: &str) -> Result<()> {
        self.ensure_connected(Role::Write).await?;
        let sql = self.render(
            StatementBuilder::new(&self.config.statements.insert_secondary)
                .arg(lower_name(domain))
                .arg(ip)
                .arg(account),
            Role::Write,
        )?;
        self.execute(&sql, Role::Write).await
    }

    /// Append one record, typically inside a transaction started with
    /// [`start_transaction`](Self::start_transaction).
    #[instrument(skip(self), level = "debug")]
    pub async fn feed_record(&mut self, rr: &ResourceRecord) -> Result<()> {
        let result = self.insert_record(rr).await;
        logged("feed_record", result)
    }

    async fn insert_record(&mut self, rr: &ResourceRecord) -> Result<()> {
        self.ensure_connected(Role::Write).await?;
        let sql = self.render(
            record_insert(&self.config.statements.insert_record, rr),
            Role::Write,
        )?;
        self.execute(&sql, Role::Write).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::drivers::InMemoryTestDriver;
    use crate::traits::DatabaseDriver;
    use crate::BackendConfig;

    #[tokio::test]
    async fn test_last_check_uses_given_time() {
        let driver = Arc::new(InMemoryTestDriver::new());
        let mut backend = ZoneDbBackend::with_driver(
            Arc::clone(&driver) as Arc<dyn DatabaseDriver>,
            BackendConfig::default(),
        )
        .await
        .unwrap();

        backend.write_last_check(17, 1_700_000_000).await.unwrap();

        driver.assert_last_statement(
            r#"UPDATE "domains" SET "last_check"=1700000000 WHERE "id"=17"#,
        );
    }
}
