/// Trait representing one column of a statement template's result set.
/// The position is the contract with whoever wrote the template.
pub trait Column {
    /// Returns the logical column name.
    fn column_name(&self) -> &'static str;

    /// Returns the layout this column belongs to.
    fn layout_name(&self) -> &'static str;

    /// Returns the zero-based position of the column in a result row.
    fn position(&self) -> usize;

    /// Returns the fully qualified column name (layout.column).
    fn qualified_name(&self) -> String {
        format!("{}.{}", self.layout_name(), self.column_name())
    }
}

/// A column description, used by layouts to declare their columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef {
    pub layout: &'static str,
    pub column: &'static str,
    pub position: usize,
}

impl ColumnRef {
    pub const fn new(layout: &'static str, column: &'static str, position: usize) -> Self {
        Self {
            layout,
            column,
            position,
        }
    }
}

impl Column for ColumnRef {
    fn column_name(&self) -> &'static str {
        self.column
    }

    fn layout_name(&self) -> &'static str {
        self.layout
    }

    fn position(&self) -> usize {
        self.position
    }
}
