use std::collections::HashSet;
use std::io;

use regex::Regex;
use trawl_rs_core::error::{Error, Result};
use trawl_rs_core::strategy::{UrlExtractor, XmlConfigurable};
use trawl_rs_core::xml::{ConfigNode, XmlWriter};
use url::Url;

const DEFAULT_PATTERN: &str = r#"(?i)(?:href|src)\s*=\s*["']([^"'#\s]+)"#;

/// Extracts candidate URLs from href/src attributes, resolved against the
/// document URL. Duplicates are dropped, order is preserved.
#[derive(Debug, Clone)]
pub struct GenericUrlExtractor {
    /// Stop after this many URLs
    pub max_urls: Option<usize>,

    pattern: Regex,
}

impl Default for GenericUrlExtractor {
    fn default() -> Self {
        Self {
            max_urls: None,
            pattern: Regex::new(DEFAULT_PATTERN).expect("default pattern compiles"),
        }
    }
}

impl GenericUrlExtractor {
    pub fn from_xml(node: &ConfigNode) -> Result<Self> {
        let pattern = match node.child_text("pattern") {
            None => Self::default().pattern,
            Some(text) => Regex::new(text).map_err(|e| {
                Error::MalformedDocument(format!("invalid extraction pattern: {}", e))
            })?,
        };
        Ok(Self {
            max_urls: node.child_u64("maxUrls")?.map(|value| value as usize),
            pattern,
        })
    }
}

impl XmlConfigurable for GenericUrlExtractor {
    fn class_name(&self) -> &'static str {
        "GenericUrlExtractor"
    }

    fn save_xml(&self, writer: &mut XmlWriter<'_>) -> io::Result<()> {
        if let Some(max) = self.max_urls {
            writer.u64_element("maxUrls", max as u64)?;
        }
        writer.text_element("pattern", self.pattern.as_str())
    }
}

impl UrlExtractor for GenericUrlExtractor {
    fn extract_urls(&self, content: &str, base: &Url) -> Vec<Url> {
        let mut seen = HashSet::new();
        let mut urls = Vec::new();
        for captures in self.pattern.captures_iter(content) {
            let candidate = match captures.get(1) {
                Some(group) => group.as_str(),
                None => continue,
            };
            if candidate.starts_with("javascript:")
                || candidate.starts_with("mailto:")
                || candidate.starts_with("data:")
            {
                continue;
            }
            let resolved = match base.join(candidate) {
                Ok(url) => url,
                Err(_) => continue,
            };
            if resolved.scheme() != "http" && resolved.scheme() != "https" {
                continue;
            }
            if seen.insert(resolved.to_string()) {
                urls.push(resolved);
                if let Some(max) = self.max_urls {
                    if urls.len() >= max {
                        break;
                    }
                }
            }
        }
        urls
    }
}
