mod in_memory_test;
mod tokio_postgres;

pub use self::in_memory_test::{
    InMemoryTestDriver, InMemoryTestResponseBuilder, RecordedStatement,
};
pub use self::tokio_postgres::{PostgresOptions, TokioPostgresDriver};

use crate::error::{Result, ZoneDbError};
use crate::traits::Escaper;

/// Escaping for standard SQL string literals: quotes are doubled and NUL
/// bytes are refused. Backslashes are left alone, which is correct for
/// servers with `standard_conforming_strings` enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEscaper;

impl Escaper for StandardEscaper {
    fn escape(&self, raw: &str) -> Result<String> {
        if raw.contains('\0') {
            return Err(ZoneDbError::EscapeFailed(
                "value contains a NUL byte".to_string(),
            ));
        }
        Ok(raw.replace('\'', "''"))
    }
}
