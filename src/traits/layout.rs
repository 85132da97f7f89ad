/// Trait representing the result-set shape of a family of statement
/// templates.
pub trait Layout {
    /// The type containing all column accessors for this layout.
    type Columns;

    /// Returns the layout name used in diagnostics.
    fn layout_name() -> &'static str;

    /// Returns the minimum number of columns a row must carry.
    fn width() -> usize;

    /// Returns an instance of the columns accessor for this layout.
    fn columns() -> Self::Columns;
}
