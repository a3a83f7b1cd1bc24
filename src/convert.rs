//! End-to-end conversion: workbook bytes to an XML document.

use crate::error::Result;
use crate::model::Grid;
use crate::progress::{Progress, Stage};
use crate::render::{to_xml, XmlOptions};
use crate::transform::grid_to_element_with_progress;
use crate::xlsx::load_grid;
use std::path::Path;

/// File name the converted document is delivered under.
pub const OUTPUT_FILE_NAME: &str = "converted.xml";

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// The XML document
    pub xml: String,
    /// Number of `row` elements written
    pub rows: usize,
    /// Suggested file name for delivery
    pub file_name: &'static str,
}

impl Conversion {
    /// The document as bytes, ready to be written or downloaded.
    pub fn into_bytes(self) -> Vec<u8> {
        self.xml.into_bytes()
    }
}

/// Runs the load → transform → serialize pipeline.
///
/// A converter holds no state between conversions other than its options and
/// progress callback; after a failure it can be used again for new input.
///
/// # Example
///
/// ```no_run
/// use xlsx2xml::{Converter, XmlOptions};
///
/// let data = std::fs::read("data.xlsx")?;
/// let conversion = Converter::new()
///     .with_options(XmlOptions::compact())
///     .with_progress(|p| eprintln!("{}: {}/{}", p.stage.label(), p.completed, p.total))
///     .convert(&data)?;
///
/// std::fs::write(conversion.file_name, conversion.xml)?;
/// # Ok::<(), xlsx2xml::Error>(())
/// ```
#[derive(Default)]
pub struct Converter<'a> {
    options: XmlOptions,
    progress: Option<Box<dyn FnMut(Progress) + 'a>>,
}

impl<'a> Converter<'a> {
    /// Create a converter with default XML options and no progress callback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the XML output options.
    pub fn with_options(mut self, options: XmlOptions) -> Self {
        self.options = options;
        self
    }

    /// Receive progress events during each conversion.
    pub fn with_progress(mut self, callback: impl FnMut(Progress) + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Convert workbook bytes.
    pub fn convert(&mut self, data: &[u8]) -> Result<Conversion> {
        self.notify(Progress::stage(Stage::Loading));
        let grid = load_grid(data)?;
        self.convert_grid(&grid)
    }

    /// Read a workbook file to completion and convert it.
    pub fn convert_file(&mut self, path: impl AsRef<Path>) -> Result<Conversion> {
        let data = std::fs::read(path.as_ref())?;
        self.convert(&data)
    }

    /// Convert an already loaded grid.
    pub fn convert_grid(&mut self, grid: &Grid) -> Result<Conversion> {
        let progress = &mut self.progress;
        let tree = grid_to_element_with_progress(grid, &mut |p| {
            if let Some(callback) = progress.as_mut() {
                callback(p);
            }
        });

        self.notify(Progress::stage(Stage::Serializing));
        let xml = to_xml(&tree, &self.options)?;

        self.notify(Progress {
            stage: Stage::Done,
            completed: xml.len(),
            total: xml.len(),
        });
        tracing::debug!(rows = grid.row_count(), bytes = xml.len(), "conversion finished");

        Ok(Conversion {
            xml,
            rows: grid.row_count(),
            file_name: OUTPUT_FILE_NAME,
        })
    }

    fn notify(&mut self, event: Progress) {
        if let Some(callback) = self.progress.as_mut() {
            callback(event);
        }
    }
}

impl std::fmt::Debug for Converter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("options", &self.options)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_convert_grid() {
        let grid = Grid::from_text_rows(&[&["a", "b"], &["c"]]);
        let conversion = Converter::new()
            .with_options(XmlOptions::compact().with_declaration(false))
            .convert_grid(&grid)
            .unwrap();

        assert_eq!(conversion.rows, 2);
        assert_eq!(conversion.file_name, "converted.xml");
        assert_eq!(
            conversion.xml,
            "<root><row><column0>a</column0><column1>b</column1></row><row><column0>c</column0></row></root>"
        );
    }

    #[test]
    fn test_progress_sequence() {
        let mut stages = Vec::new();
        let grid = Grid::from_text_rows(&[&["a"], &["b"]]);
        let xml_len = {
            let mut converter = Converter::new().with_progress(|p| stages.push(p));
            converter.convert_grid(&grid).unwrap().xml.len()
        };

        let kinds: Vec<Stage> = stages.iter().map(|p| p.stage).collect();
        assert_eq!(
            kinds,
            vec![Stage::Transforming, Stage::Transforming, Stage::Serializing, Stage::Done]
        );
        assert_eq!(stages[1].completed, 2);
        assert_eq!(stages[3].completed, xml_len);
    }

    #[test]
    fn test_failed_conversion_reports_loading_only() {
        let mut stages = Vec::new();
        {
            let mut converter = Converter::new().with_progress(|p| stages.push(p.stage));
            let err = converter.convert(b"not a workbook").unwrap_err();
            assert!(matches!(err, Error::UnknownFormat));

            // Still usable for a new, independent conversion
            let ok = converter.convert_grid(&Grid::new()).unwrap();
            assert_eq!(ok.rows, 0);
        }
        assert_eq!(stages[0], Stage::Loading);
        assert_eq!(stages[1], Stage::Serializing);
    }

    #[test]
    fn test_missing_file() {
        let err = Converter::new()
            .convert_file("does/not/exist.xlsx")
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
