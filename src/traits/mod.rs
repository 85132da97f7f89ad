mod column;
mod driver;
mod layout;

pub use column::{Column, ColumnRef};
pub use driver::{Connection, DatabaseDriver, Escaper};
pub use layout::Layout;
