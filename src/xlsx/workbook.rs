//! Workbook loading: sheet list, relationships and shared strings.

use crate::container::{Package, Relationships};
use crate::error::{Error, Result};
use crate::model::Grid;
use quick_xml::events::Event;
use std::path::Path;

use super::shared_strings::SharedStrings;
use super::sheet::parse_sheet;

const DEFAULT_WORKBOOK_PATH: &str = "xl/workbook.xml";
const DEFAULT_SHARED_STRINGS_PATH: &str = "xl/sharedStrings.xml";

const OFFICE_DOCUMENT_REL: &str = "/officeDocument";
const SHARED_STRINGS_REL: &str = "/sharedStrings";

/// Sheet entry from workbook.xml.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// An opened XLSX workbook.
pub struct Workbook {
    package: Package,
    workbook_path: String,
    sheets: Vec<SheetInfo>,
    relationships: Relationships,
    shared_strings: SharedStrings,
}

impl Workbook {
    /// Open a workbook file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Open a workbook from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    fn from_package(package: Package) -> Result<Self> {
        let workbook_path = Self::find_workbook_part(&package)?;
        let relationships = package.read_relationships(&workbook_path)?;

        let xml = package.read_xml(&workbook_path)?;
        let sheets = Self::parse_sheet_list(&xml)?;

        let shared_path = relationships
            .iter()
            .find(|r| r.rel_type.ends_with(SHARED_STRINGS_REL))
            .map(|r| Package::resolve_path(&workbook_path, &r.target))
            .unwrap_or_else(|| DEFAULT_SHARED_STRINGS_PATH.to_string());
        let shared_strings = match package.read_xml(&shared_path) {
            Ok(xml) => SharedStrings::parse(&xml)?,
            Err(Error::MissingComponent(_)) => SharedStrings::default(),
            Err(e) => return Err(e),
        };

        tracing::debug!(
            workbook = %workbook_path,
            sheets = sheets.len(),
            shared_strings = shared_strings.len(),
            "opened workbook"
        );

        Ok(Self {
            package,
            workbook_path,
            sheets,
            relationships,
            shared_strings,
        })
    }

    /// Locate the main workbook part through the package relationships.
    fn find_workbook_part(package: &Package) -> Result<String> {
        let rels = package.read_relationships("")?;
        let path = rels
            .iter()
            .find(|r| r.rel_type.ends_with(OFFICE_DOCUMENT_REL))
            .map(|r| r.target.trim_start_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_WORKBOOK_PATH.to_string());

        if package.exists(&path) {
            Ok(path)
        } else {
            Err(Error::MissingComponent(path))
        }
    }

    /// Parse the `<sheets>` list of workbook.xml, in workbook order.
    fn parse_sheet_list(xml: &str) -> Result<Vec<SheetInfo>> {
        let mut sheets = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sheet" => {
                    let mut name = String::new();
                    let mut rel_id = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => {
                                name = attr
                                    .unescape_value()
                                    .map(|v| v.to_string())
                                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).to_string());
                            }
                            key if key.ends_with(b":id") => {
                                rel_id = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            _ => {}
                        }
                    }

                    sheets.push(SheetInfo { name, rel_id });
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Get the number of sheets.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Get sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Name of the first sheet, if any.
    pub fn first_sheet_name(&self) -> Option<&str> {
        self.sheets.first().map(|s| s.name.as_str())
    }

    /// Get a reference to the package.
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Parse the first sheet (by position) into a grid.
    pub fn first_sheet(&self) -> Result<Grid> {
        let sheet = self.sheets.first().ok_or(Error::MissingSheet)?;
        let path = self.sheet_part_path(sheet);

        tracing::debug!(sheet = %sheet.name, part = %path, "reading first sheet");

        let xml = self.package.read_xml(&path)?;
        let grid = parse_sheet(&xml, &self.shared_strings)?;

        tracing::debug!(
            rows = grid.row_count(),
            columns = grid.max_columns(),
            "loaded grid"
        );
        Ok(grid)
    }

    fn sheet_part_path(&self, sheet: &SheetInfo) -> String {
        match self.relationships.get(&sheet.rel_id) {
            Some(rel) => Package::resolve_path(&self.workbook_path, &rel.target),
            None => {
                tracing::warn!(rel_id = %sheet.rel_id, "sheet relationship missing, assuming sheet1.xml");
                Package::resolve_path(&self.workbook_path, "worksheets/sheet1.xml")
            }
        }
    }
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("workbook_path", &self.workbook_path)
            .field("sheets", &self.sheet_names())
            .finish()
    }
}
