use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// Multi-valued document metadata, usually HTTP headers.
///
/// Keys are stored lower-cased and sorted so checksummers see a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    values: BTreeMap<String, Vec<String>>,
}

impl Metadata {
    /// Create an empty metadata set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under the given key
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .entry(key.into().to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    /// Replace all values under the given key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .insert(key.into().to_ascii_lowercase(), vec![value.into()]);
    }

    /// First value under the given key
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values under the given key
    pub fn all(&self, key: &str) -> &[String] {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate over all keys and their values in sorted key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Whether any values are present
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// A document flowing through the crawler: its URL, fetched metadata, and
/// content. Document processors mutate this in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlDocument {
    /// Source URL
    pub url: Url,

    /// Content type, when the fetcher could determine one
    pub content_type: Option<String>,

    /// Fetched metadata (HTTP headers and processor-added fields)
    pub metadata: Metadata,

    /// Document body
    pub content: String,
}

impl CrawlDocument {
    /// Create an empty document for the given URL
    pub fn new(url: Url) -> Self {
        Self {
            url,
            content_type: None,
            metadata: Metadata::new(),
            content: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_keys_are_case_insensitive() {
        let mut metadata = Metadata::new();
        metadata.add("Content-Type", "text/html");
        metadata.add("content-type", "charset=utf-8");

        assert_eq!(metadata.first("CONTENT-TYPE"), Some("text/html"));
        assert_eq!(metadata.all("content-type").len(), 2);
        assert_eq!(metadata.len(), 1);
    }

    #[test]
    fn test_metadata_set_replaces() {
        let mut metadata = Metadata::new();
        metadata.add("etag", "a");
        metadata.add("etag", "b");
        metadata.set("etag", "c");
        assert_eq!(metadata.all("etag"), ["c".to_string()]);
    }
}
