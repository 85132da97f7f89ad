//! zonedb - serve DNS zones and records out of a relational database
//!
//! The adapter keeps one read and one write session, renders operator
//! supplied statement templates and maps the rows back into zones and
//! resource records.
//!
//! # Example
//! ```ignore
//! use zonedb::{BackendConfig, RecordType, ZoneDbBackend};
//!
//! let config = BackendConfig::from_toml_str(r#"host_read = "db1,db2""#)?;
//! let mut backend = ZoneDbBackend::connect(config).await?;
//!
//! backend.lookup(RecordType::ANY, "www.example.com", None).await?;
//! while let Some(record) = backend.next_record().await {
//!     println!("{} {} {} {}", record.qname, record.ttl, record.qtype, record.content);
//! }
//! ```

pub mod builders;
pub mod config;
pub mod drivers;
pub mod error;
pub mod layouts;
pub mod traits;
pub mod types;

mod backend;
mod mapper;

// Re-export main types for convenient access
pub use backend::ZoneDbBackend;
pub use builders::StatementBuilder;
pub use config::{BackendConfig, Statements};
pub use error::{Result, ZoneDbError};
pub use traits::{Column, ColumnRef, Connection, DatabaseDriver, Escaper, Layout};
pub use types::{
    RawRow, RecordType, ResourceRecord, Role, Row, SoaData, SqlValue, ZoneInfo, ZoneKind,
};
