use crate::{
    error::{Result, ZoneDbError},
    Column, Layout,
};

/// Driver-agnostic row as fetched from the active result set.
/// Each field is the raw byte value of the column, or `None` for SQL NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub values: Vec<Option<Vec<u8>>>,
}

impl RawRow {
    pub fn new(values: Vec<Option<Vec<u8>>>) -> Self {
        Self { values }
    }

    /// Builds a row from textual values, `None` being NULL.
    pub fn from_text(values: &[Option<&str>]) -> Self {
        Self {
            values: values
                .iter()
                .map(|v| v.map(|s| s.as_bytes().to_vec()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A row that has been checked against the column layout of the template
/// that produced it. Fields are read through that layout's columns.
#[derive(Debug, Clone)]
pub struct Row {
    layout: &'static str,
    values: Vec<Option<Vec<u8>>>,
}

impl Row {
    /// Checks the row width against `L` once; later reads rely on it.
    pub fn checked<L: Layout>(raw: RawRow) -> Result<Self> {
        if raw.len() < L::width() {
            return Err(ZoneDbError::ColumnCount {
                layout: L::layout_name(),
                expected: L::width(),
                actual: raw.len(),
            });
        }
        Ok(Self {
            layout: L::layout_name(),
            values: raw.values,
        })
    }

    /// Raw bytes of a column, `None` if it is NULL.
    pub fn get<C: Column + ?Sized>(&self, column: &C) -> Option<&[u8]> {
        debug_assert_eq!(column.layout_name(), self.layout);
        self.values
            .get(column.position())
            .and_then(|v| v.as_deref())
    }

    /// Column value as text. Invalid UTF-8 is replaced rather than rejected.
    pub fn text<C: Column + ?Sized>(&self, column: &C) -> Option<String> {
        self.get(column)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Byte length of a column value, 0 for NULL.
    pub fn field_len<C: Column + ?Sized>(&self, column: &C) -> usize {
        self.get(column).map_or(0, <[u8]>::len)
    }

    /// Returns the number of columns in this row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
