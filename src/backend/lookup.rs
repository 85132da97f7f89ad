use tracing::instrument;

use super::{logged, unix_now, ZoneDbBackend};
use crate::builders::StatementBuilder;
use crate::error::Result;
use crate::layouts::{
    PrimaryCheckLayout, RecordLayout, SuperPrimaryLayout, ZoneInfoLayout, ZoneListLayout,
};
use crate::mapper::{
    account_from_row, lower_name, matches_primary, needs_refresh, record_from_row,
    serial_changed, zone_info_from_row, zone_list_entry, Freshness,
};
use crate::types::{RecordType, ResourceRecord, Role, ZoneInfo, ZoneKind};

impl ZoneDbBackend {
    /// Zone metadata by zone name. `None` when the zone is unknown.
    #[instrument(skip(self), level = "debug")]
    pub async fn zone_info(&mut self, domain: &str) -> Result<Option<ZoneInfo>> {
        let result = self.fetch_zone_info(domain).await;
        logged("zone_info", result)
    }

    async fn fetch_zone_info(&mut self, domain: &str) -> Result<Option<ZoneInfo>> {
        self.ensure_connected(Role::Read).await?;
        let sql = self.render(
            StatementBuilder::new(&self.config.statements.zone_info)
                .bind(":name", lower_name(domain)),
            Role::Read,
        )?;
        self.execute(&sql, Role::Read).await?;

        // Rows are read to the end; the last one describes the zone.
        let mut found = None;
        while let Some(row) = self.advance::<ZoneInfoLayout>(Role::Read).await {
            found = Some(zone_info_from_row(&row));
        }
        Ok(found)
    }

    /// Start listing every record of a zone. Fetch them with
    /// [`next_record`](Self::next_record).
    #[instrument(skip(self), level = "debug")]
    pub async fn list(&mut self, zone_id: u32) -> Result<()> {
        let result = self.start_list(zone_id).await;
        logged("list", result)
    }

    async fn start_list(&mut self, zone_id: u32) -> Result<()> {
        self.pending.qname.clear();

        self.ensure_connected(Role::Read).await?;
        let sql = self.render(
            StatementBuilder::new(&self.config.statements.list).bind(":id", zone_id),
            Role::Read,
        )?;
        self.execute(&sql, Role::Read).await
    }

    /// Start a record lookup by name, optionally narrowed to a type (any
    /// type but `ANY`) and to a zone. Fetch the records with
    /// [`next_record`](Self::next_record).
    #[instrument(skip(self), level = "debug")]
    pub async fn lookup(&mut self, qtype: RecordType, qname: &str, zone_id: Option<u32>) -> Result<()> {
        let result = self.start_lookup(qtype, qname, zone_id).await;
        logged("lookup", result)
    }

    async fn start_lookup(&mut self, qtype: RecordType, qname: &str, zone_id: Option<u32>) -> Result<()> {
        self.pending.qname = qname.to_string();

        self.ensure_connected(Role::Read).await?;

        let statements = &self.config.statements;
        let template = match (zone_id.is_some(), qtype.is_any()) {
            (false, true) => &statements.lookup,
            (false, false) => &statements.lookup_type,
            (true, true) => &statements.lookup_id,
            (true, false) => &statements.lookup_type_id,
        };

        let mut builder = StatementBuilder::new(template).bind(":name", lower_name(qname));
        if !qtype.is_any() {
            builder = builder.bind(":type", qtype.to_string());
        }
        if let Some(id) = zone_id {
            builder = builder.bind(":id", id);
        }

        let sql = self.render(builder, Role::Read)?;
        self.execute(&sql, Role::Read).await
    }

    /// Next record of the current lookup or listing, `None` once the
    /// result set is exhausted or a row could not be fetched.
    pub async fn next_record(&mut self) -> Option<ResourceRecord> {
        let row = self.advance::<RecordLayout>(Role::Read).await?;
        Some(record_from_row(
            &row,
            &self.pending.qname,
            self.config.default_ttl,
        ))
    }

    /// Whether `ip` is one of the primaries of secondary zone `domain`.
    ///
    /// The result set is always read to the end, so the read session is
    /// free for the next statement.
    #[instrument(skip(self), level = "debug")]
    pub async fn is_primary(&mut self, domain: &str, ip: &str) -> Result<bool> {
        let result = self.check_primary(domain, ip).await;
        logged("is_primary", result)
    }

    async fn check_primary(&mut self, domain: &str, ip: &str) -> Result<bool> {
        self.ensure_connected(Role::Read).await?;
        let sql = self.render(
            StatementBuilder::new(&self.config.statements.primary_check)
                .bind(":name", lower_name(domain)),
            Role::Read,
        )?;
        self.execute(&sql, Role::Read).await?;

        while let Some(row) = self.advance::<PrimaryCheckLayout>(Role::Read).await {
            if matches_primary(&row, ip) {
                self.drain(Role::Read).await;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Secondary zones whose refresh interval has passed since the last
    /// check.
    #[instrument(skip(self), level = "debug")]
    pub async fn unfresh_secondaries(&mut self) -> Result<Vec<ZoneInfo>> {
        let now = unix_now();
        let result = self
            .collect_zones(Query::Secondaries, |info, fresh| {
                if needs_refresh(fresh, now) {
                    info.kind = ZoneKind::Secondary;
                    true
                } else {
                    false
                }
            })
            .await;
        logged("unfresh_secondaries", result)
    }

    /// Primary zones whose serial differs from the last notified one.
    #[instrument(skip(self), level = "debug")]
    pub async fn updated_primaries(&mut self) -> Result<Vec<ZoneInfo>> {
        let result = self
            .collect_zones(Query::Primaries, |info, fresh| {
                if serial_changed(fresh) {
                    info.notified_serial = fresh.notified_serial;
                    info.serial = fresh.serial;
                    info.kind = ZoneKind::Primary;
                    true
                } else {
                    false
                }
            })
            .await;
        logged("updated_primaries", result)
    }

    async fn collect_zones<F>(&mut self, query: Query, mut accept: F) -> Result<Vec<ZoneInfo>>
    where
        F: FnMut(&mut ZoneInfo, &Freshness) -> bool,
    {
        self.ensure_connected(Role::Read).await?;
        let template = match query {
            Query::Secondaries => &self.config.statements.info_secondaries,
            Query::Primaries => &self.config.statements.info_primaries,
        };
        let sql = self.render(StatementBuilder::new(template), Role::Read)?;
        self.execute(&sql, Role::Read).await?;

        let mut zones = Vec::new();
        while let Some(row) = self.advance::<ZoneListLayout>(Role::Read).await {
            let (mut info, fresh) = zone_list_entry(&row);
            if accept(&mut info, &fresh) {
                zones.push(info);
            }
        }
        Ok(zones)
    }

    /// Looks up the account under which a zone offered by `ip` may be
    /// created as a secondary. The nameservers of the offered zone are
    /// tried in order; the first one registered as a super-primary
    /// together with `ip` decides. A NULL account reads as empty.
    #[instrument(skip(self, nameservers), level = "debug")]
    pub async fn super_primary_account(
        &mut self,
        ip: &str,
        domain: &str,
        nameservers: &[ResourceRecord],
    ) -> Result<Option<String>> {
        let result = self.find_super_primary(ip, nameservers).await;
        logged("super_primary_account", result)
    }

    async fn find_super_primary(&mut self, ip: &str, nameservers: &[ResourceRecord]) -> Result<Option<String>> {
        for ns in nameservers {
            self.ensure_connected(Role::Read).await?;
            let sql = self.render(
                StatementBuilder::new(&self.config.statements.super_primary)
                    .bind(":ip", ip)
                    .bind(":ns", ns.content.as_str()),
                Role::Read,
            )?;
            self.execute(&sql, Role::Read).await?;

            if let Some(row) = self.advance::<SuperPrimaryLayout>(Role::Read).await {
                let account = account_from_row(&row);
                self.drain(Role::Read).await;
                return Ok(Some(account));
            }
        }
        Ok(None)
    }
}

#[derive(Debug, Clone, Copy)]
enum Query {
    Secondaries,
    Primaries,
}
