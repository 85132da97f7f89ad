use crate::types::RecordType;

/// Replication role of a zone relative to this service instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoneKind {
    /// Neither primary nor secondary; records live only in the store.
    #[default]
    Native,
    /// Primary (master): notifies secondaries about serial changes.
    Primary,
    /// Secondary (slave): transferred from the listed primaries.
    Secondary,
}

impl ZoneKind {
    /// Classifies the textual `type` column by its `SLAVE` / `MASTER`
    /// prefix. Case matters: `slave` is native.
    pub fn classify(raw: &[u8]) -> Self {
        if raw.starts_with(b"SLAVE") {
            ZoneKind::Secondary
        } else if raw.starts_with(b"MASTER") {
            ZoneKind::Primary
        } else {
            ZoneKind::Native
        }
    }
}

/// Zone metadata as stored in the domains table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ZoneInfo {
    pub id: u32,
    pub zone: String,
    pub kind: ZoneKind,
    pub masters: Vec<String>,
    /// Unix timestamp of the last freshness check.
    pub last_check: i64,
    pub notified_serial: u32,
    pub serial: u32,
}

/// A single resource record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub domain_id: u32,
    pub qname: String,
    pub qtype: RecordType,
    pub ttl: u32,
    pub priority: u16,
    pub content: String,
}

impl ResourceRecord {
    /// A record with neutral field values, used as the starting point
    /// for every mapped row.
    pub fn empty(qname: impl Into<String>, ttl: u32) -> Self {
        Self {
            domain_id: 0,
            qname: qname.into(),
            qtype: RecordType::Unknown(0),
            ttl,
            priority: 0,
            content: String::new(),
        }
    }
}
