//! XLSX (Excel) workbook loader.
//!
//! Reads the first worksheet of an Office Open XML workbook into a
//! [`Grid`](crate::model::Grid).
//!
//! # Example
//!
//! ```no_run
//! use xlsx2xml::xlsx::Workbook;
//!
//! let workbook = Workbook::open("spreadsheet.xlsx")?;
//! println!("Converting sheet: {:?}", workbook.first_sheet_name());
//!
//! let grid = workbook.first_sheet()?;
//! println!("{} rows", grid.row_count());
//! # Ok::<(), xlsx2xml::Error>(())
//! ```

mod reference;
mod shared_strings;
mod sheet;
mod workbook;

pub use reference::{parse_cell_ref, CellRef, MAX_COLUMNS, MAX_ROWS};
pub use workbook::Workbook;

use crate::detect::detect_format_from_bytes;
use crate::error::Result;
use crate::model::Grid;

/// Load the first worksheet of a workbook held in memory.
///
/// Fails with a parse-kind error when `data` is not a workbook package.
/// An empty first sheet yields an empty grid.
pub fn load_grid(data: &[u8]) -> Result<Grid> {
    let format = detect_format_from_bytes(data)?;
    tracing::debug!(%format, bytes = data.len(), "loading workbook");

    Workbook::from_bytes(data.to_vec())?.first_sheet()
}
