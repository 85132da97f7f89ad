use tracing::warn;

use crate::builders::StatementBuilder;
use crate::layouts::RecordLayout;
use crate::mapper::number_or_default;
use crate::traits::{Column, Layout};
use crate::types::{RecordType, ResourceRecord, Row};

/// Names are stored lower-cased; every name embedded in a statement goes
/// through here.
pub(crate) fn lower_name(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Maps a row of the record layout.
///
/// The owner name comes from the row; `fallback_name` (the name that was
/// looked up) is used when that column is NULL or empty. A NULL ttl takes
/// `default_ttl`.
pub(crate) fn record_from_row(row: &Row, fallback_name: &str, default_ttl: u32) -> ResourceRecord {
    let cols = RecordLayout::columns();
    let mut rr = ResourceRecord::empty(fallback_name, default_ttl);

    rr.domain_id = number_or_default(row.get(&cols.domain_id));

    if let Some(name) = row.text(&cols.name).filter(|n| !n.is_empty()) {
        rr.qname = name;
    }

    if let Some(rtype) = row.text(&cols.rtype) {
        rr.qtype = rtype.parse().unwrap_or_else(|e| {
            warn!(
                column = %cols.rtype.qualified_name(),
                error = %e,
                name = %rr.qname,
                "Unrecognised record type in row"
            );
            RecordType::Unknown(0)
        });
    }

    if let Some(ttl) = row.get(&cols.ttl) {
        rr.ttl = number_or_default(Some(ttl));
    }

    rr.priority = number_or_default(row.get(&cols.priority));

    if let Some(content) = row.text(&cols.content) {
        rr.content = content;
    }

    rr
}

/// Binds `rr` to the positional insert template: domain_id, name, type,
/// ttl, prio, content.
pub(crate) fn record_insert<'t>(template: &'t str, rr: &ResourceRecord) -> StatementBuilder<'t> {
    StatementBuilder::new(template)
        .arg(rr.domain_id)
        .arg(lower_name(&rr.qname))
        .arg(rr.qtype.to_string())
        .arg(rr.ttl)
        .arg(rr.priority)
        .arg(rr.content.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::StandardEscaper;
    use crate::types::RawRow;

    fn record_row(values: &[Option<&str>]) -> Row {
        Row::checked::<RecordLayout>(RawRow::from_text(values)).unwrap()
    }

    #[test]
    fn test_full_row() {
        let row = record_row(&[
            Some("3"),
            Some("mail.example.com"),
            Some("MX"),
            Some("600"),
            Some("10"),
            Some("mx1.example.com"),
        ]);
        let rr = record_from_row(&row, "Mail.Example.com", 3600);

        assert_eq!(rr.domain_id, 3);
        assert_eq!(rr.qname, "mail.example.com");
        assert_eq!(rr.qtype, RecordType::MX);
        assert_eq!(rr.ttl, 600);
        assert_eq!(rr.priority, 10);
        assert_eq!(rr.content, "mx1.example.com");
    }

    #[test]
    fn test_null_columns_take_defaults() {
        let row = record_row(&[None, None, Some("A"), None, None, None]);
        let rr = record_from_row(&row, "www.example.com", 86400);

        assert_eq!(rr.domain_id, 0);
        assert_eq!(rr.qname, "www.example.com");
        assert_eq!(rr.ttl, 86400);
        assert_eq!(rr.priority, 0);
        assert_eq!(rr.content, "");
    }

    #[test]
    fn test_empty_name_falls_back() {
        let row = record_row(&[Some("1"), Some(""), Some("A"), None, None, Some("192.0.2.1")]);
        let rr = record_from_row(&row, "caller.example", 60);
        assert_eq!(rr.qname, "caller.example");
    }

    #[test]
    fn test_unknown_type_text() {
        let row = record_row(&[Some("1"), Some("x"), Some("WEIRD"), None, None, None]);
        let rr = record_from_row(&row, "", 60);
        assert_eq!(rr.qtype, RecordType::Unknown(0));
    }

    #[test]
    fn test_record_insert_lowercases_and_escapes() {
        let rr = ResourceRecord {
            domain_id: 9,
            qname: "WWW.Example.COM".to_string(),
            qtype: RecordType::TXT,
            ttl: 120,
            priority: 0,
            content: "\"it's\"".to_string(),
        };
        let sql = record_insert("(%d,'%s','%s',%d,%d,'%s')", &rr)
            .build(&StandardEscaper)
            .unwrap();
        assert_eq!(sql, "(9,'www.example.com','TXT',120,0,'\"it''s\"')");
    }
}
