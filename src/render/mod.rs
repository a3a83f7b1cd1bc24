//! XML rendering for element trees.
//!
//! # Example
//!
//! ```
//! use xlsx2xml::{transform::grid_to_element, Grid};
//! use xlsx2xml::render::{parse_xml, to_xml, XmlOptions};
//!
//! let tree = grid_to_element(&Grid::from_text_rows(&[&["a", "b"], &["c"]]));
//! let xml = to_xml(&tree, &XmlOptions::default())?;
//!
//! assert_eq!(parse_xml(&xml)?, tree);
//! # Ok::<(), xlsx2xml::Error>(())
//! ```

mod options;
mod parse;
mod xml;

pub use options::XmlOptions;
pub use parse::parse_xml;
pub use xml::{to_xml, write_xml};
