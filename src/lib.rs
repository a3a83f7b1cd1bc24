//! # xlsx2xml
//!
//! Convert the first worksheet of an Excel workbook into a flat XML document.
//!
//! The pipeline has three stages: the workbook is loaded into a [`Grid`],
//! the grid becomes an [`Element`] tree (`root` → `row` → `column0`,
//! `column1`, …), and the tree is written as indented XML.
//!
//! ## Quick Start
//!
//! ```no_run
//! // One call from file to XML text
//! let xml = xlsx2xml::convert_file("data.xlsx")?;
//! std::fs::write(xlsx2xml::OUTPUT_FILE_NAME, xml)?;
//!
//! // Or from bytes already in memory
//! let data = std::fs::read("data.xlsx")?;
//! let xml = xlsx2xml::convert_bytes(&data)?;
//! # Ok::<(), xlsx2xml::Error>(())
//! ```
//!
//! ## Step by step
//!
//! ```no_run
//! use xlsx2xml::{load_grid, render, transform};
//!
//! let data = std::fs::read("data.xlsx")?;
//! let grid = load_grid(&data)?;
//! let tree = transform::grid_to_element(&grid);
//! let xml = render::to_xml(&tree, &render::XmlOptions::default())?;
//! # Ok::<(), xlsx2xml::Error>(())
//! ```
//!
//! ## Features
//!
//! - `ffi`: C-ABI bindings for foreign language integration

pub mod container;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod progress;
pub mod render;
pub mod transform;
pub mod xlsx;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-exports
pub use convert::{Conversion, Converter, OUTPUT_FILE_NAME};
pub use detect::{detect_format_from_bytes, detect_format_from_path, FormatType};
pub use error::{Error, ErrorKind, Result};
pub use model::{CellValue, Element, Grid, GridRow};
pub use progress::{Progress, Stage};
pub use render::XmlOptions;
pub use xlsx::load_grid;

use std::path::Path;

/// Convert workbook bytes into an XML document with default options.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("data.xlsx")?;
/// let xml = xlsx2xml::convert_bytes(&data)?;
/// println!("{}", xml);
/// # Ok::<(), xlsx2xml::Error>(())
/// ```
pub fn convert_bytes(data: &[u8]) -> Result<String> {
    Converter::new().convert(data).map(|c| c.xml)
}

/// Convert a workbook file into an XML document with default options.
pub fn convert_file(path: impl AsRef<Path>) -> Result<String> {
    Converter::new().convert_file(path).map(|c| c.xml)
}
