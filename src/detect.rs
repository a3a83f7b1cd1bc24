//! Format detection for spreadsheet workbooks.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE compound file magic used by legacy binary workbooks (.xls).
const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Content type for the main part of a regular workbook.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Content type for the main part of a macro-enabled workbook.
const XLSM_CONTENT_TYPE: &str = "application/vnd.ms-excel.sheet.macroEnabled.main+xml";

/// Content type for the main part of a workbook template.
const XLTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.template.main+xml";

/// Detected spreadsheet format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Excel workbook (.xlsx)
    Xlsx,
    /// Macro-enabled Excel workbook (.xlsm)
    Xlsm,
    /// Excel template (.xltx)
    Xltx,
}

impl FormatType {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Xlsx => "xlsx",
            FormatType::Xlsm => "xlsm",
            FormatType::Xltx => "xltx",
        }
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Xlsx => "Excel Workbook",
            FormatType::Xlsm => "Excel Macro-Enabled Workbook",
            FormatType::Xltx => "Excel Template",
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the format type from a file path.
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let mut file = File::open(path.as_ref())?;
    let mut magic = [0u8; 8];
    let read = file.read(&mut magic)?;
    check_magic(&magic[..read])?;
    file.rewind()?;
    detect_format_from_reader(BufReader::new(file))
}

/// Detect the format type from a byte slice.
///
/// # Example
///
/// ```no_run
/// use xlsx2xml::detect::detect_format_from_bytes;
///
/// let data = std::fs::read("data.xlsx")?;
/// let format = detect_format_from_bytes(&data)?;
/// println!("Detected format: {}", format);
/// # Ok::<(), xlsx2xml::Error>(())
/// ```
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    check_magic(data)?;
    detect_format_from_reader(std::io::Cursor::new(data))
}

fn check_magic(data: &[u8]) -> Result<()> {
    if data.starts_with(&CFB_MAGIC) {
        return Err(Error::UnsupportedFormat(
            "legacy binary workbook (.xls)".to_string(),
        ));
    }
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }
    Ok(())
}

/// Detect the format type from a reader over a ZIP package.
pub fn detect_format_from_reader<R: Read + Seek>(reader: R) -> Result<FormatType> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            decode_xml_bytes(&bytes)?
        }
        Err(_) => {
            return Err(Error::MissingComponent("[Content_Types].xml".to_string()));
        }
    };

    if content_types.contains(XLSX_CONTENT_TYPE) {
        Ok(FormatType::Xlsx)
    } else if content_types.contains(XLSM_CONTENT_TYPE) {
        Ok(FormatType::Xlsm)
    } else if content_types.contains(XLTX_CONTENT_TYPE) {
        Ok(FormatType::Xltx)
    } else {
        detect_by_folder_structure(&archive)
    }
}

/// Fallback detection for packages with an incomplete content types part.
fn detect_by_folder_structure<R: Read + Seek>(archive: &zip::ZipArchive<R>) -> Result<FormatType> {
    let mut names = archive.file_names();
    if names.any(|n| n.starts_with("xl/")) {
        Ok(FormatType::Xlsx)
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.starts_with(&ZIP_MAGIC)
}
