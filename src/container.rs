//! ZIP package abstraction for spreadsheet workbooks.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// A relationship entry from a .rels part.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
}

/// Relationships of a single part, keyed by ID.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    by_id: HashMap<String, Relationship>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Add a relationship, replacing any previous one with the same ID.
    pub fn add(&mut self, rel: Relationship) {
        self.by_id.insert(rel.id.clone(), rel);
    }

    /// Iterate over all relationships, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.by_id.values()
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Rewrite a UTF-16 encoding declaration once the content is already UTF-8.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if let Some(end_decl) = content.strip_prefix("<?xml").and(content.find("?>")) {
        let (decl, rest) = content.split_at(end_decl + 2);
        let fixed_decl = decl
            .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
            .replace("encoding='UTF-16'", "encoding='UTF-8'")
            .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
            .replace("encoding='utf-16'", "encoding='UTF-8'");
        return format!("{}{}", fixed_decl, rest);
    }
    content.to_string()
}

/// Decode XML bytes handling UTF-8 (with or without BOM) and UTF-16 LE/BE.
///
/// Workbooks written by Excel are UTF-8, but some third-party producers emit
/// UTF-16 parts.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec()).map_err(|e| Error::Encoding(e.to_string()));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let content = decode_utf16(rest, u16::from_le_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let content = decode_utf16(rest, u16::from_be_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // ASCII markup in UTF-16 leaves a zero in every other byte
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16(bytes, u16::from_le_bytes)
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16(bytes, u16::from_be_bytes)
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Encoding(e.to_string()))
}

/// A workbook package over an in-memory ZIP archive.
pub struct Package {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl Package {
    /// Open a package from a file path, reading it fully into memory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create a package from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML part from the archive as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        decode_xml_bytes(&bytes)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.borrow().file_names().any(|n| n == path)
    }

    /// List all parts in the archive.
    pub fn list_files(&self) -> Vec<String> {
        self.archive
            .borrow()
            .file_names()
            .map(String::from)
            .collect()
    }

    /// Read the relationships of a part (e.g. `xl/workbook.xml`).
    ///
    /// A part without a .rels file has no relationships.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        let path = Path::new(part_path);
        let parent = path.parent().unwrap_or(Path::new(""));
        let filename = path.file_name().unwrap_or_default().to_string_lossy();
        let rels_path = if parent.as_os_str().is_empty() {
            format!("_rels/{}.rels", filename)
        } else {
            format!("{}/_rels/{}.rels", parent.display(), filename)
        };

        match self.read_xml(&rels_path) {
            Ok(xml) => parse_relationships(&xml),
            Err(Error::MissingComponent(_)) => Ok(Relationships::new()),
            Err(e) => Err(e),
        }
    }

    /// Resolve a relationship target against the part that owns it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_dir = Path::new(base).parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("files", &self.list_files().len())
            .finish()
    }
}

/// Parse the content of a .rels part.
fn parse_relationships(content: &str) -> Result<Relationships> {
    let mut rels = Relationships::new();
    if content.trim().is_empty() {
        return Ok(rels);
    }

    let mut reader = quick_xml::Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e))
                if e.name().local_name().as_ref() == b"Relationship" =>
            {
                let mut id = String::new();
                let mut rel_type = String::new();
                let mut target = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Type" => rel_type = String::from_utf8_lossy(&attr.value).to_string(),
                        b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                        _ => {}
                    }
                }

                if !id.is_empty() {
                    rels.add(Relationship {
                        id,
                        rel_type,
                        target,
                    });
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}
