mod record_type;
mod role;
mod row;
mod soa;
mod sql_value;
mod zone;

pub use self::record_type::RecordType;
pub use self::role::Role;
pub use self::row::{RawRow, Row};
pub use self::soa::SoaData;
pub use self::sql_value::SqlValue;
pub use self::zone::{ResourceRecord, ZoneInfo, ZoneKind};
