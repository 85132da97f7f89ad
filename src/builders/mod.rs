mod statement;

pub use self::statement::{StatementBuilder, DEFAULT_MAX_STATEMENT_LEN};
