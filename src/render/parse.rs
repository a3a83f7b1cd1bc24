//! Reading XML text back into an element tree.

use crate::error::{Error, Result};
use crate::model::Element;
use quick_xml::events::Event;

/// Parse XML text into an element tree.
///
/// Mirrors the forms [`to_xml`](super::to_xml) writes: an element with child
/// elements is a container (whitespace between children is dropped), an
/// element with start and end tags but no child elements is a leaf holding its
/// unescaped text, and a self-closing element is an empty container.
pub fn parse_xml(xml: &str) -> Result<Element> {
    let mut reader = quick_xml::Reader::from_str(xml);

    // Open elements with the text collected so far
    let mut stack: Vec<(Element, String)> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                stack.push((Element::container(name), String::new()));
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                attach(&mut stack, &mut root, Element::container(name))?;
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                match stack.last_mut() {
                    Some((_, pending)) => pending.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(Error::XmlParse("text outside the root element".into()));
                    }
                }
            }
            Event::CData(e) => {
                if let Some((_, pending)) = stack.last_mut() {
                    pending.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(_) => {
                let (mut element, text) = stack
                    .pop()
                    .ok_or_else(|| Error::XmlParse("unmatched end tag".into()))?;
                if element.children.is_empty() {
                    element.text = Some(text);
                }
                attach(&mut stack, &mut root, element)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some((element, _)) = stack.last() {
        return Err(Error::XmlParse(format!("unclosed element <{}>", element.name)));
    }
    root.ok_or_else(|| Error::XmlParse("document has no root element".into()))
}

fn attach(
    stack: &mut [(Element, String)],
    root: &mut Option<Element>,
    element: Element,
) -> Result<()> {
    if let Some((parent, _)) = stack.last_mut() {
        parent.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::XmlParse("more than one root element".into()));
    }
    *root = Some(element);
    Ok(())
}
