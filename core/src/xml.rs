use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::error::{Error, Result};

/// One element of a parsed configuration document: a name, its attributes,
/// its own text content, and its child elements.
///
/// Strategy implementations receive the node declaring them and read their
/// nested settings from it; the node does not interpret those settings itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigNode {
    name: String,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<ConfigNode>,
}

impl ConfigNode {
    /// Parse an XML document into a node tree rooted at the document element.
    pub fn parse(input: &str) -> Result<ConfigNode> {
        let document = roxmltree::Document::parse(input)
            .map_err(|e| Error::MalformedDocument(e.to_string()))?;
        Ok(Self::from_element(document.root_element()))
    }

    fn from_element(element: roxmltree::Node<'_, '_>) -> ConfigNode {
        let mut node = ConfigNode {
            name: element.tag_name().name().to_string(),
            ..ConfigNode::default()
        };
        for attribute in element.attributes() {
            node.attributes
                .insert(attribute.name().to_string(), attribute.value().to_string());
        }
        let mut text = String::new();
        for child in element.children() {
            if child.is_element() {
                node.children.push(Self::from_element(child));
            } else if child.is_text() {
                if let Some(chunk) = child.text() {
                    text.push_str(chunk);
                }
            }
        }
        node.text = text.trim().to_string();
        node
    }

    /// Element name of this node
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed text content, or `None` when the element has no text
    pub fn text(&self) -> Option<&str> {
        if self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }

    /// Attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&ConfigNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All child elements with the given name, in document order
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ConfigNode> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text content of the first child with the given name
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(ConfigNode::text)
    }

    /// Integer content of the first child with the given name
    pub fn child_i32(&self, name: &str) -> Result<Option<i32>> {
        match self.child_text(name) {
            None => Ok(None),
            Some(text) => text.parse().map(Some).map_err(|_| {
                Error::MalformedDocument(format!("invalid integer for '{}': {}", name, text))
            }),
        }
    }

    /// Unsigned integer content of the first child with the given name
    pub fn child_u64(&self, name: &str) -> Result<Option<u64>> {
        match self.child_text(name) {
            None => Ok(None),
            Some(text) => text.parse().map(Some).map_err(|_| {
                Error::MalformedDocument(format!("invalid integer for '{}': {}", name, text))
            }),
        }
    }

    /// Boolean content of the first child with the given name
    pub fn child_bool(&self, name: &str) -> Result<Option<bool>> {
        match self.child_text(name) {
            None => Ok(None),
            Some(text) => parse_bool(text).map(Some).ok_or_else(|| {
                Error::MalformedDocument(format!("invalid boolean for '{}': {}", name, text))
            }),
        }
    }

    /// Boolean attribute by name
    pub fn attr_bool(&self, name: &str) -> Result<Option<bool>> {
        match self.attr(name) {
            None => Ok(None),
            Some(value) => parse_bool(value).map(Some).ok_or_else(|| {
                Error::MalformedDocument(format!(
                    "invalid boolean for attribute '{}': {}",
                    name, value
                ))
            }),
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Minimal indenting XML element writer over any `io::Write`.
///
/// Covers exactly what configuration serialization needs: nested elements,
/// attributes, and escaped text content.
pub struct XmlWriter<'a> {
    out: &'a mut dyn Write,
    depth: usize,
}

impl<'a> XmlWriter<'a> {
    /// Create a writer over the given output
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out, depth: 0 }
    }

    /// Open an element with no attributes
    pub fn start(&mut self, name: &str) -> io::Result<()> {
        self.start_with_attrs(name, &[])
    }

    /// Open an element carrying the given attributes
    pub fn start_with_attrs(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        self.indent()?;
        write!(self.out, "<{}", name)?;
        for (key, value) in attrs {
            write!(self.out, " {}=\"{}\"", key, escape(value))?;
        }
        writeln!(self.out, ">")?;
        self.depth += 1;
        Ok(())
    }

    /// Close the element opened by the matching `start` call
    pub fn end(&mut self, name: &str) -> io::Result<()> {
        self.depth -= 1;
        self.indent()?;
        writeln!(self.out, "</{}>", name)
    }

    /// Write a self-closing element carrying only attributes
    pub fn empty_with_attrs(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        self.indent()?;
        write!(self.out, "<{}", name)?;
        for (key, value) in attrs {
            write!(self.out, " {}=\"{}\"", key, escape(value))?;
        }
        writeln!(self.out, "/>")
    }

    /// Write an element holding escaped text content
    pub fn text_element(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.indent()?;
        writeln!(self.out, "<{}>{}</{}>", name, escape(value), name)
    }

    /// Write an element holding an integer
    pub fn i64_element(&mut self, name: &str, value: i64) -> io::Result<()> {
        self.text_element(name, &value.to_string())
    }

    /// Write an element holding an unsigned integer
    pub fn u64_element(&mut self, name: &str, value: u64) -> io::Result<()> {
        self.text_element(name, &value.to_string())
    }

    /// Write an element holding a boolean
    pub fn bool_element(&mut self, name: &str, value: bool) -> io::Result<()> {
        self.text_element(name, if value { "true" } else { "false" })
    }

    fn indent(&mut self) -> io::Result<()> {
        for _ in 0..self.depth {
            self.out.write_all(b"  ")?;
        }
        Ok(())
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
