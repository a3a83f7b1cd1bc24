//! Grid to element tree conversion.
//!
//! Produces `root` → `row` → `column<N>` with positional column names.

use crate::model::{Element, Grid, GridRow};
use crate::progress::{Progress, Stage};

/// Name of the document root element.
pub const ROOT_ELEMENT: &str = "root";
/// Name of each row element.
pub const ROW_ELEMENT: &str = "row";
/// Prefix of leaf element names; the zero-based column index follows.
pub const COLUMN_PREFIX: &str = "column";

/// Convert a grid into an element tree.
///
/// ```
/// use xlsx2xml::{transform::grid_to_element, Grid};
///
/// let grid = Grid::from_text_rows(&[&["a", "b"], &["c"]]);
/// let root = grid_to_element(&grid);
///
/// assert_eq!(root.children.len(), 2);
/// assert_eq!(root.children[0].children[1].name, "column1");
/// assert_eq!(root.children[1].children[0].text(), Some("c"));
/// ```
pub fn grid_to_element(grid: &Grid) -> Element {
    grid_to_element_with_progress(grid, &mut |_| {})
}

/// Convert a grid into an element tree, reporting each finished row.
pub fn grid_to_element_with_progress(
    grid: &Grid,
    progress: &mut dyn FnMut(Progress),
) -> Element {
    let total = grid.row_count();
    let mut root = Element::container(ROOT_ELEMENT);
    root.children.reserve(total);

    for (index, row) in grid.rows.iter().enumerate() {
        root.push(row_element(row));
        progress(Progress {
            stage: Stage::Transforming,
            completed: index + 1,
            total,
        });
    }

    root
}

fn row_element(row: &GridRow) -> Element {
    let mut element = Element::container(ROW_ELEMENT);
    element.children = row
        .cells
        .iter()
        .enumerate()
        .map(|(col, value)| Element::leaf(column_name(col), value.display_string()))
        .collect();
    element
}

/// Leaf name for a zero-based column index.
pub fn column_name(index: usize) -> String {
    format!("{}{}", COLUMN_PREFIX, index)
}
