//! Column contracts of the statement templates.
//!
//! Templates are written by the operator, so the only thing tying a result
//! column to a field is its position. Each layout below names those
//! positions once; the mapper reads rows exclusively through them.

use crate::traits::{ColumnRef, Layout};

/// Rows of `list`, `lookup`, `lookup_id`, `lookup_type` and
/// `lookup_type_id`:
///
/// | pos | column    | meaning                                  |
/// |-----|-----------|------------------------------------------|
/// | 0   | domain_id | zone id, base 10                         |
/// | 1   | name      | owner name                               |
/// | 2   | type      | record type in text form (`A`, `MX`, ..) |
/// | 3   | ttl       | seconds, NULL means the configured default |
/// | 4   | prio      | priority, unsigned 16 bit                |
/// | 5   | content   | record data                              |
pub struct RecordLayout;

pub struct RecordColumns {
    pub domain_id: ColumnRef,
    pub name: ColumnRef,
    pub rtype: ColumnRef,
    pub ttl: ColumnRef,
    pub priority: ColumnRef,
    pub content: ColumnRef,
}

impl Layout for RecordLayout {
    type Columns = RecordColumns;

    fn layout_name() -> &'static str {
        "record"
    }

    fn width() -> usize {
        6
    }

    fn columns() -> Self::Columns {
        RecordColumns {
            domain_id: ColumnRef::new("record", "domain_id", 0),
            name: ColumnRef::new("record", "name", 1),
            rtype: ColumnRef::new("record", "type", 2),
            ttl: ColumnRef::new("record", "ttl", 3),
            priority: ColumnRef::new("record", "prio", 4),
            content: ColumnRef::new("record", "content", 5),
        }
    }
}

/// Rows of `zone_info`:
///
/// | pos | column          | meaning                                   |
/// |-----|-----------------|-------------------------------------------|
/// | 0   | id              | zone id                                   |
/// | 1   | name            | zone name                                 |
/// | 2   | type            | `MASTER`, `SLAVE` or anything else        |
/// | 3   | master          | primaries, comma/space/tab separated      |
/// | 4   | last_check      | unix time of the last freshness check     |
/// | 5   | notified_serial | serial last announced to secondaries      |
/// | 6   | soa             | content of the zone's SOA record          |
pub struct ZoneInfoLayout;

pub struct ZoneInfoColumns {
    pub id: ColumnRef,
    pub name: ColumnRef,
    pub kind: ColumnRef,
    pub masters: ColumnRef,
    pub last_check: ColumnRef,
    pub notified_serial: ColumnRef,
    pub soa: ColumnRef,
}

impl Layout for ZoneInfoLayout {
    type Columns = ZoneInfoColumns;

    fn layout_name() -> &'static str {
        "zone_info"
    }

    fn width() -> usize {
        7
    }

    fn columns() -> Self::Columns {
        ZoneInfoColumns {
            id: ColumnRef::new("zone_info", "id", 0),
            name: ColumnRef::new("zone_info", "name", 1),
            kind: ColumnRef::new("zone_info", "type", 2),
            masters: ColumnRef::new("zone_info", "master", 3),
            last_check: ColumnRef::new("zone_info", "last_check", 4),
            notified_serial: ColumnRef::new("zone_info", "notified_serial", 5),
            soa: ColumnRef::new("zone_info", "soa", 6),
        }
    }
}

/// Rows of `info_secondaries` and `info_primaries`:
///
/// | pos | column          | meaning                                   |
/// |-----|-----------------|-------------------------------------------|
/// | 0   | id              | zone id                                   |
/// | 1   | name            | zone name                                 |
/// | 2   | master          | primaries, comma/space/tab separated      |
/// | 3   | last_check      | unix time of the last freshness check     |
/// | 4   | notified_serial | serial last announced to secondaries      |
/// | 5   | auto_serial     | serial used when the SOA carries 0        |
/// | 6   | soa             | content of the zone's SOA record          |
pub struct ZoneListLayout;

pub struct ZoneListColumns {
    pub id: ColumnRef,
    pub name: ColumnRef,
    pub masters: ColumnRef,
    pub last_check: ColumnRef,
    pub notified_serial: ColumnRef,
    pub auto_serial: ColumnRef,
    pub soa: ColumnRef,
}

impl Layout for ZoneListLayout {
    type Columns = ZoneListColumns;

    fn layout_name() -> &'static str {
        "zone_list"
    }

    fn width() -> usize {
        7
    }

    fn columns() -> Self::Columns {
        ZoneListColumns {
            id: ColumnRef::new("zone_list", "id", 0),
            name: ColumnRef::new("zone_list", "name", 1),
            masters: ColumnRef::new("zone_list", "master", 2),
            last_check: ColumnRef::new("zone_list", "last_check", 3),
            notified_serial: ColumnRef::new("zone_list", "notified_serial", 4),
            auto_serial: ColumnRef::new("zone_list", "auto_serial", 5),
            soa: ColumnRef::new("zone_list", "soa", 6),
        }
    }
}

/// Rows of `primary_check`: column 0 holds one primary address.
pub struct PrimaryCheckLayout;

pub struct PrimaryCheckColumns {
    pub master: ColumnRef,
}

impl Layout for PrimaryCheckLayout {
    type Columns = PrimaryCheckColumns;

    fn layout_name() -> &'static str {
        "primary_check"
    }

    fn width() -> usize {
        1
    }

    fn columns() -> Self::Columns {
        PrimaryCheckColumns {
            master: ColumnRef::new("primary_check", "master", 0),
        }
    }
}

/// Rows of `super_primary`: column 0 holds the account new zones get.
pub struct SuperPrimaryLayout;

pub struct SuperPrimaryColumns {
    pub account: ColumnRef,
}

impl Layout for SuperPrimaryLayout {
    type Columns = SuperPrimaryColumns;

    fn layout_name() -> &'static str {
        "super_primary"
    }

    fn width() -> usize {
        1
    }

    fn columns() -> Self::Columns {
        SuperPrimaryColumns {
            account: ColumnRef::new("super_primary", "account", 0),
        }
    }
}
