//! XML writer for element trees.

use crate::error::{Error, Result};
use crate::model::Element;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::Write;

use super::options::XmlOptions;

/// Render an element tree as XML text.
///
/// # Example
///
/// ```
/// use xlsx2xml::model::Element;
/// use xlsx2xml::render::{to_xml, XmlOptions};
///
/// let mut row = Element::container("row");
/// row.push(Element::leaf("column0", "a < b"));
/// let mut root = Element::container("root");
/// root.push(row);
///
/// let xml = to_xml(&root, &XmlOptions::compact().with_declaration(false))?;
/// assert_eq!(xml, "<root><row><column0>a &lt; b</column0></row></root>");
/// # Ok::<(), xlsx2xml::Error>(())
/// ```
pub fn to_xml(root: &Element, options: &XmlOptions) -> Result<String> {
    let mut out = Vec::new();
    write_xml(root, options, &mut out)?;
    String::from_utf8(out).map_err(|e| Error::Serialization(e.to_string()))
}

/// Write an element tree as XML into `out`.
///
/// The tree is checked before anything is written, so a rejected tree
/// leaves `out` untouched.
pub fn write_xml<W: Write>(root: &Element, options: &XmlOptions, out: W) -> Result<()> {
    validate(root, &root.name)?;

    let mut writer = Writer::new(out);
    if options.declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
            .map_err(serialization_error)?;
        if options.pretty {
            line_break(&mut writer, 0, options)?;
        }
    }

    write_element(&mut writer, root, 0, options)?;

    if options.pretty {
        writer.get_mut().write_all(b"\n")?;
    }
    Ok(())
}

/// Check the container/leaf invariant, element names and leaf text over the
/// whole tree.
fn validate(element: &Element, path: &str) -> Result<()> {
    if !is_valid_name(&element.name) {
        return Err(Error::Serialization(format!(
            "invalid element name {:?} at {}",
            element.name, path
        )));
    }
    if element.is_malformed() {
        return Err(Error::Serialization(format!(
            "element {} has both children and text",
            path
        )));
    }
    let forbidden = element
        .text
        .as_deref()
        .and_then(|t| t.chars().find(|c| is_forbidden_char(*c)));
    if let Some(c) = forbidden {
        return Err(Error::Serialization(format!(
            "text of {} contains control character U+{:04X}",
            path, c as u32
        )));
    }

    for (index, child) in element.children.iter().enumerate() {
        validate(child, &format!("{}/{}[{}]", path, child.name, index))?;
    }
    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}

/// C0 controls other than tab, line feed and carriage return are not allowed
/// in XML 1.0, not even as character references.
fn is_forbidden_char(c: char) -> bool {
    c < ' ' && !matches!(c, '\t' | '\n' | '\r')
}

/// Escape leaf text; carriage returns become `&#13;` so parsers keep them.
fn escape_text(text: &str) -> Cow<'_, str> {
    let escaped = escape(text);
    if escaped.contains('\r') {
        Cow::Owned(escaped.replace('\r', "&#13;"))
    } else {
        escaped
    }
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    element: &Element,
    depth: usize,
    options: &XmlOptions,
) -> Result<()> {
    let name = element.name.as_str();

    match &element.text {
        Some(text) => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(serialization_error)?;
            if !text.is_empty() {
                writer
                    .write_event(Event::Text(BytesText::from_escaped(escape_text(text))))
                    .map_err(serialization_error)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(serialization_error)?;
        }
        None if element.children.is_empty() => {
            writer
                .write_event(Event::Empty(BytesStart::new(name)))
                .map_err(serialization_error)?;
        }
        None => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(serialization_error)?;
            for child in &element.children {
                line_break(writer, depth + 1, options)?;
                write_element(writer, child, depth + 1, options)?;
            }
            line_break(writer, depth, options)?;
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(serialization_error)?;
        }
    }

    Ok(())
}

fn line_break<W: Write>(writer: &mut Writer<W>, depth: usize, options: &XmlOptions) -> Result<()> {
    if options.pretty {
        let out = writer.get_mut();
        out.write_all(b"\n")?;
        for _ in 0..depth * options.indent {
            out.write_all(b" ")?;
        }
    }
    Ok(())
}

fn serialization_error(err: impl std::fmt::Display) -> Error {
    Error::Serialization(err.to_string())
}
