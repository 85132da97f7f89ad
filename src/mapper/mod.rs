//! Translation between typed rows and domain records.
//!
//! Every mapped value starts from its neutral default and is only
//! overwritten by a non-NULL column, so nothing leaks from one row into
//! the next.

mod record;
mod zone;

pub(crate) use self::record::{lower_name, record_from_row, record_insert};
pub(crate) use self::zone::{
    account_from_row, matches_primary, needs_refresh, serial_changed,
    zone_info_from_row, zone_list_entry, Freshness,
};

/// Reads a base 10 integer the way `strtol` does: leading whitespace and a
/// sign are accepted, parsing stops at the first non-digit. `None` when no
/// digit was found or the value overflows.
pub(crate) fn leading_int(raw: &[u8]) -> Option<i64> {
    let text = std::str::from_utf8(raw).ok()?.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parses a numeric column into `T`, falling back to `T::default()` when
/// the column is NULL, not numeric or out of range for `T`.
pub(crate) fn number_or_default<T>(raw: Option<&[u8]>) -> T
where
    T: TryFrom<i64> + Default,
{
    raw.and_then(leading_int)
        .and_then(|n| T::try_from(n).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int(b"42"), Some(42));
        assert_eq!(leading_int(b"  -7"), Some(-7));
        assert_eq!(leading_int(b"15abc"), Some(15));
        assert_eq!(leading_int(b"abc"), None);
        assert_eq!(leading_int(b""), None);
        assert_eq!(leading_int(b"99999999999999999999"), None);
    }

    #[test]
    fn test_number_or_default() {
        assert_eq!(number_or_default::<u32>(Some(b"300")), 300);
        assert_eq!(number_or_default::<u32>(None), 0);
        assert_eq!(number_or_default::<u32>(Some(b"-1")), 0);
        assert_eq!(number_or_default::<u16>(Some(b"70000")), 0);
        assert_eq!(number_or_default::<i64>(Some(b"1700000000")), 1_700_000_000);
    }
}
