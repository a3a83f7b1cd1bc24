//! Cell grid model structures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar value read from a worksheet cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    /// No value
    #[default]
    Empty,
    /// Text (shared, inline, or formula string)
    Text(String),
    /// Numeric value, including date serials
    Number(f64),
    /// Boolean value
    Bool(bool),
}

impl CellValue {
    /// Create a text value.
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Check if this cell holds no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The string written into the markup for this value.
    pub fn display_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            // -0 prints as "0"
            CellValue::Number(n) if *n == 0.0 => f.write_str("0"),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// One worksheet row: cells in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridRow {
    pub cells: Vec<CellValue>,
}

impl GridRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cells in this row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Set the cell at `col`, filling any gap before it with empty cells.
    pub fn set(&mut self, col: usize, value: CellValue) {
        if col >= self.cells.len() {
            self.cells.resize(col + 1, CellValue::Empty);
        }
        self.cells[col] = value;
    }
}

impl<V: Into<CellValue>> FromIterator<V> for GridRow {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Row-major cell values of a worksheet. Rows may differ in length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    pub rows: Vec<GridRow>,
}

impl Grid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid of text cells, mostly for tests and examples.
    ///
    /// ```
    /// use xlsx2xml::Grid;
    ///
    /// let grid = Grid::from_text_rows(&[&["a", "b"], &["c"]]);
    /// assert_eq!(grid.row_count(), 2);
    /// assert_eq!(grid.rows[1].len(), 1);
    /// ```
    pub fn from_text_rows(rows: &[&[&str]]) -> Self {
        Self {
            rows: rows.iter().map(|r| r.iter().copied().collect()).collect(),
        }
    }

    /// Append a row.
    pub fn add_row(&mut self, row: GridRow) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn max_columns(&self) -> usize {
        self.rows.iter().map(GridRow::len).max().unwrap_or(0)
    }

    /// Total number of cells across all rows.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(GridRow::len).sum()
    }

    /// Check if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize the grid as JSON.
    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| crate::Error::Serialization(format!("JSON serialization error: {}", e)))
    }
}
