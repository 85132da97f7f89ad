use crate::layouts::{PrimaryCheckLayout, SuperPrimaryLayout, ZoneInfoLayout, ZoneListLayout};
use crate::mapper::number_or_default;
use crate::traits::Layout;
use crate::types::{Row, SoaData, ZoneInfo, ZoneKind};

/// Splits a primaries column on commas, spaces and tabs.
pub(crate) fn split_masters(raw: &str) -> Vec<String> {
    raw.split([',', ' ', '\t'])
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

/// Maps a row of the zone-info layout.
pub(crate) fn zone_info_from_row(row: &Row) -> ZoneInfo {
    let cols = ZoneInfoLayout::columns();
    let mut info = ZoneInfo {
        id: number_or_default(row.get(&cols.id)),
        last_check: number_or_default(row.get(&cols.last_check)),
        notified_serial: number_or_default(row.get(&cols.notified_serial)),
        ..ZoneInfo::default()
    };

    if let Some(zone) = row.text(&cols.name) {
        info.zone = zone;
    }
    if let Some(kind) = row.get(&cols.kind) {
        info.kind = ZoneKind::classify(kind);
    }
    if let Some(masters) = row.text(&cols.masters) {
        info.masters = split_masters(&masters);
    }
    if let Some(soa) = row.text(&cols.soa) {
        info.serial = SoaData::parse(&soa).serial;
    }

    info
}

/// Values the freshness checks of the zone-list queries look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Freshness {
    pub last_check: i64,
    pub notified_serial: u32,
    pub serial: u32,
    /// 0 when the zone has no SOA record.
    pub refresh: u32,
}

/// Maps a row of the zone-list layout. The returned zone is still
/// `Native`; the caller's check decides the kind.
pub(crate) fn zone_list_entry(row: &Row) -> (ZoneInfo, Freshness) {
    let cols = ZoneListLayout::columns();

    let mut fresh = Freshness {
        last_check: number_or_default(row.get(&cols.last_check)),
        notified_serial: number_or_default(row.get(&cols.notified_serial)),
        ..Freshness::default()
    };
    if let Some(soa) = row.text(&cols.soa) {
        let soa = SoaData::parse(&soa);
        fresh.serial = soa.serial;
        fresh.refresh = soa.refresh;
    }
    if fresh.serial == 0 {
        fresh.serial = number_or_default(row.get(&cols.auto_serial));
    }

    let mut info = ZoneInfo {
        id: number_or_default(row.get(&cols.id)),
        last_check: fresh.last_check,
        ..ZoneInfo::default()
    };
    if let Some(zone) = row.text(&cols.name) {
        info.zone = zone;
    }
    if let Some(masters) = row.text(&cols.masters) {
        info.masters = split_masters(&masters);
    }

    (info, fresh)
}

/// A secondary is due for a check once its refresh interval has passed.
pub(crate) fn needs_refresh(fresh: &Freshness, now: i64) -> bool {
    fresh.last_check.saturating_add(i64::from(fresh.refresh)) < now
}

/// A primary has to notify when its serial moved past the notified one.
pub(crate) fn serial_changed(fresh: &Freshness) -> bool {
    fresh.notified_serial != fresh.serial
}

/// Byte-for-byte comparison of the primary column with `ip`.
pub(crate) fn matches_primary(row: &Row, ip: &str) -> bool {
    let cols = PrimaryCheckLayout::columns();
    row.get(&cols.master) == Some(ip.as_bytes())
}

/// Account column of a super-primary row, empty when NULL.
pub(crate) fn account_from_row(row: &Row) -> String {
    let cols = SuperPrimaryLayout::columns();
    row.text(&cols.account).unwrap_or_default()
}
