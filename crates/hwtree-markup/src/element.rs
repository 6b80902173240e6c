//! Markup element tree
//!
//! Provides [`Element`], one named value with ordered children, and
//! [`Document`], the unnamed root holding top-level elements.

use crate::error::MarkupError;
use crate::writer::Writer;

/// A named markup element with an optional value and ordered children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    value: String,
    children: Vec<Element>,
}

impl Element {
    /// Create element without value
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            children: Vec::new(),
        }
    }

    /// Create element with value
    #[inline]
    #[must_use]
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            children: Vec::new(),
        }
    }

    /// Element name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element value (empty when absent)
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value
    #[inline]
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Child elements in document order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Append a child element
    #[inline]
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// All children named `name`, in document order
    pub fn find<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// First child named `name`
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Value of the first child named `name`, or `""`
    #[inline]
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.get(name).map_or("", Element::value)
    }

    pub(crate) fn append_continuation(&mut self, text: &str, first: bool) {
        if first {
            self.value.clear();
        } else {
            self.value.push('\n');
        }
        self.value.push_str(text);
    }

    fn write(&self, writer: &mut Writer, depth: usize) {
        if self.value.is_empty() {
            writer.open(depth, &self.name);
        } else {
            writer.line(depth, &self.name, &self.value);
        }
        for child in &self.children {
            child.write(writer, depth + 1);
        }
    }
}

/// Parsed markup document
///
/// The document root has no name or value; its children are the top-level
/// elements of the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse markup text
    ///
    /// # Errors
    /// Returns [`MarkupError`] with the offending line number on malformed input
    pub fn parse(text: &str) -> Result<Self, MarkupError> {
        crate::parse::parse(text).map(|root| Self { root })
    }

    /// Wrap already-built top-level elements
    #[must_use]
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let mut root = Element::default();
        for element in elements {
            root.push(element);
        }
        Self { root }
    }

    /// Top-level elements
    #[inline]
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        self.root.children()
    }

    /// True if the document holds no elements
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// First top-level element named `name`
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Element> {
        self.root.get(name)
    }

    /// Render back to markup text
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut writer = Writer::new();
        for element in self.root.children() {
            element.write(&mut writer, 0);
        }
        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_lookup_by_name() {
        let mut node = Element::with_value("node", "system");
        node.push(Element::with_value("name", "console"));
        node.push(Element::with_value("attribute", ""));
        node.push(Element::with_value("attribute", ""));

        assert_eq!(node.text("name"), "console");
        assert_eq!(node.text("missing"), "");
        assert_eq!(node.find("attribute").count(), 2);
        assert!(node.get("node").is_none());
    }

    #[test]
    fn continuation_joins_lines() {
        let mut element = Element::with_value("value", "stale");
        element.append_continuation("first", true);
        element.append_continuation("second", false);
        assert_eq!(element.value(), "first\nsecond");
    }

    #[test]
    fn document_to_text_nests_children() {
        let mut node = Element::with_value("node", "port");
        node.push(Element::with_value("name", "controller"));
        let document = Document::from_elements(vec![node]);

        assert_eq!(document.to_text(), "node: port\n  name: controller\n");
    }

    #[test]
    fn empty_document() {
        let document = Document::default();
        assert!(document.is_empty());
        assert_eq!(document.to_text(), "");
    }
}
