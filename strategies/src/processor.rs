use std::io;

use regex::Regex;
use trawl_rs_core::document::CrawlDocument;
use trawl_rs_core::error::{Error, Result};
use trawl_rs_core::strategy::{DocumentProcessor, XmlConfigurable};
use trawl_rs_core::xml::{ConfigNode, XmlWriter};

/// Stamps constant metadata fields onto every document.
#[derive(Debug, Clone, Default)]
pub struct MetadataTagger {
    /// Field/value pairs added to each document, in order
    pub tags: Vec<(String, String)>,
}

impl MetadataTagger {
    pub fn from_xml(node: &ConfigNode) -> Result<Self> {
        let mut tags = Vec::new();
        for tag in node.children("tag") {
            let field = tag.attr("field").ok_or_else(|| {
                Error::MalformedDocument("tag entry is missing its field attribute".to_string())
            })?;
            let value = tag.attr("value").ok_or_else(|| {
                Error::MalformedDocument("tag entry is missing its value attribute".to_string())
            })?;
            tags.push((field.to_string(), value.to_string()));
        }
        Ok(Self { tags })
    }
}

impl XmlConfigurable for MetadataTagger {
    fn class_name(&self) -> &'static str {
        "MetadataTagger"
    }

    fn save_xml(&self, writer: &mut XmlWriter<'_>) -> io::Result<()> {
        for (field, value) in &self.tags {
            writer.empty_with_attrs("tag", &[("field", field), ("value", value)])?;
        }
        Ok(())
    }
}

impl DocumentProcessor for MetadataTagger {
    fn process(&self, document: &mut CrawlDocument) -> Result<()> {
        for (field, value) in &self.tags {
            document.metadata.add(field.clone(), value.clone());
        }
        Ok(())
    }
}

/// Replaces markup in the document content with spaces, leaving plain text.
#[derive(Debug, Clone)]
pub struct HtmlStripper {
    pattern: Regex,
}

impl Default for HtmlStripper {
    fn default() -> Self {
        Self {
            pattern: Regex::new("<[^>]*>").expect("static pattern compiles"),
        }
    }
}

impl HtmlStripper {
    pub fn from_xml(_node: &ConfigNode) -> Result<Self> {
        Ok(Self::default())
    }
}

impl XmlConfigurable for HtmlStripper {
    fn class_name(&self) -> &'static str {
        "HtmlStripper"
    }
}

impl DocumentProcessor for HtmlStripper {
    fn process(&self, document: &mut CrawlDocument) -> Result<()> {
        document.content = self
            .pattern
            .replace_all(&document.content, " ")
            .into_owned();
        Ok(())
    }
}
