//! Markup element tree.

use serde::{Deserialize, Serialize};

/// A named markup node without attributes.
///
/// A well-formed element is either a container (`children`, no `text`) or a
/// leaf (`text`, no children). The fields are public, so a node carrying both
/// can be built; the serializer rejects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name
    pub name: String,

    /// Ordered child elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,

    /// Text content of a leaf
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Element {
    /// Create a container element with no children yet.
    pub fn container(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Create a leaf element holding `text`.
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            text: Some(text.into()),
        }
    }

    /// Append a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Whether this element holds text.
    pub fn is_leaf(&self) -> bool {
        self.text.is_some()
    }

    /// Whether this element carries both children and text.
    pub fn is_malformed(&self) -> bool {
        self.text.is_some() && !self.children.is_empty()
    }

    /// Find the first direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of a leaf, or `None` for a container.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Total number of elements in this subtree, including itself.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Element::count).sum::<usize>()
    }
}
