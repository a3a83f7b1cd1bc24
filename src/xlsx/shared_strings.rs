//! XLSX shared strings parsing.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use std::borrow::Cow;

/// Shared strings table.
#[derive(Debug, Clone, Default)]
pub struct SharedStrings {
    /// All strings in order
    strings: Vec<String>,
}

impl SharedStrings {
    /// Parse shared strings from XML content.
    ///
    /// Rich text runs are concatenated; phonetic hints (`rPh`) are skipped.
    /// Whitespace inside `<t>` is kept as written and `_xHHHH_` escapes are
    /// decoded.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut strings = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut buf = Vec::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;
        let mut current_text = String::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_text.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => {
                    // <si/> and <si><t/></si> are empty strings
                    if e.local_name().as_ref() == b"si" {
                        strings.push(String::new());
                    }
                }
                Ok(Event::Text(e)) if in_t => {
                    let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                    current_text.push_str(&text);
                }
                Ok(Event::CData(e)) if in_t => {
                    current_text.push_str(&String::from_utf8_lossy(&e));
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(decode_ooxml_escapes(&current_text).into_owned());
                        current_text.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { strings })
    }

    /// Get a string by index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Get the count of shared strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Decode `_xHHHH_` character escapes used in SpreadsheetML string content.
///
/// `_x000D_` becomes a carriage return and `_x005F_` a literal underscore.
/// Sequences that are not four hex digits between `_x` and `_` are kept.
pub(crate) fn decode_ooxml_escapes(text: &str) -> Cow<'_, str> {
    if !text.contains("_x") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match escaped_char(tail) {
            Some(c) => {
                out.push(c);
                rest = &tail[7..];
            }
            None => {
                out.push_str("_x");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn escaped_char(s: &str) -> Option<char> {
    if s.as_bytes().get(6) != Some(&b'_') {
        return None;
    }
    let hex = s.get(2..6)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    char::from_u32(u32::from_str_radix(hex, 16).ok()?)
}
