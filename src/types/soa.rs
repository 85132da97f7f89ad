/// Fields of a start-of-authority record content string:
/// `primary hostmaster serial refresh retry expire minimum`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaData {
    pub primary: String,
    pub hostmaster: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

pub const DEFAULT_REFRESH: u32 = 10800;
pub const DEFAULT_RETRY: u32 = 3600;
pub const DEFAULT_EXPIRE: u32 = 604800;
pub const DEFAULT_MINIMUM: u32 = 3600;

impl Default for SoaData {
    fn default() -> Self {
        Self {
            primary: String::new(),
            hostmaster: String::new(),
            serial: 0,
            refresh: DEFAULT_REFRESH,
            retry: DEFAULT_RETRY,
            expire: DEFAULT_EXPIRE,
            minimum: DEFAULT_MINIMUM,
        }
    }
}

impl SoaData {
    /// Parses SOA content. Missing trailing fields keep their defaults and
    /// numbers that do not parse read as 0.
    pub fn parse(content: &str) -> Self {
        let mut soa = SoaData::default();
        let mut parts = content.split_whitespace();

        if let Some(primary) = parts.next() {
            soa.primary = primary.to_string();
        }
        if let Some(hostmaster) = parts.next() {
            soa.hostmaster = hostmaster.to_string();
        }

        let numbers = [
            &mut soa.serial,
            &mut soa.refresh,
            &mut soa.retry,
            &mut soa.expire,
            &mut soa.minimum,
        ];
        for (slot, part) in numbers.into_iter().zip(parts) {
            *slot = part.parse().unwrap_or(0);
        }

        soa
    }
}
