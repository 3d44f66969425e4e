use std::fmt::Write as _;
use std::io;

use sha2::{Digest, Sha256};
use trawl_rs_core::document::Metadata;
use trawl_rs_core::error::Result;
use trawl_rs_core::strategy::{MetadataChecksummer, XmlConfigurable};
use trawl_rs_core::xml::{ConfigNode, XmlWriter};

/// Uses one metadata field verbatim as the checksum, by default the HTTP
/// `Last-Modified` header.
#[derive(Debug, Clone)]
pub struct HttpMetadataChecksummer {
    /// Metadata field supplying the checksum value
    pub source_field: String,
}

impl Default for HttpMetadataChecksummer {
    fn default() -> Self {
        Self {
            source_field: "last-modified".to_string(),
        }
    }
}

impl HttpMetadataChecksummer {
    pub fn from_xml(node: &ConfigNode) -> Result<Self> {
        Ok(Self {
            source_field: node
                .child_text("sourceField")
                .map(str::to_string)
                .unwrap_or_else(|| Self::default().source_field),
        })
    }
}

impl XmlConfigurable for HttpMetadataChecksummer {
    fn class_name(&self) -> &'static str {
        "HttpMetadataChecksummer"
    }

    fn save_xml(&self, writer: &mut XmlWriter<'_>) -> io::Result<()> {
        writer.text_element("sourceField", &self.source_field)
    }
}

impl MetadataChecksummer for HttpMetadataChecksummer {
    fn checksum(&self, metadata: &Metadata) -> Option<String> {
        metadata.first(&self.source_field).map(str::to_string)
    }
}

/// SHA-256 digest over metadata fields, all of them by default.
#[derive(Debug, Clone, Default)]
pub struct Sha256MetadataChecksummer {
    /// Restrict the digest to these fields; empty means every field
    pub source_fields: Vec<String>,
}

impl Sha256MetadataChecksummer {
    pub fn from_xml(node: &ConfigNode) -> Result<Self> {
        let source_fields = node
            .child_text("sourceFields")
            .map(|text| {
                text.split(',')
                    .map(str::trim)
                    .filter(|chunk| !chunk.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self { source_fields })
    }

    fn includes(&self, key: &str) -> bool {
        self.source_fields.is_empty()
            || self
                .source_fields
                .iter()
                .any(|field| field.eq_ignore_ascii_case(key))
    }
}

impl XmlConfigurable for Sha256MetadataChecksummer {
    fn class_name(&self) -> &'static str {
        "Sha256MetadataChecksummer"
    }

    fn save_xml(&self, writer: &mut XmlWriter<'_>) -> io::Result<()> {
        if !self.source_fields.is_empty() {
            writer.text_element("sourceFields", &self.source_fields.join(","))?;
        }
        Ok(())
    }
}

impl MetadataChecksummer for Sha256MetadataChecksummer {
    fn checksum(&self, metadata: &Metadata) -> Option<String> {
        let mut hasher = Sha256::new();
        let mut hashed_any = false;
        // Metadata iterates in sorted key order, so equal sets hash equal
        for (key, values) in metadata.iter() {
            if !self.includes(key) {
                continue;
            }
            for value in values {
                hasher.update(key.as_bytes());
                hasher.update(b"=");
                hasher.update(value.as_bytes());
                hasher.update(b"\n");
                hashed_any = true;
            }
        }
        if !hashed_any {
            return None;
        }
        let digest = hasher.finalize();
        let digest: &[u8] = &digest;
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(hex, "{:02x}", byte);
        }
        Some(hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(pairs: &[(&str, &str)]) -> Metadata {
        let mut metadata = Metadata::new();
        for (key, value) in pairs {
            metadata.add(*key, *value);
        }
        metadata
    }

    #[test]
    fn test_http_checksummer_uses_source_field() {
        let checksummer = HttpMetadataChecksummer::default();
        let metadata = metadata(&[("Last-Modified", "Tue, 01 Jan 2030 00:00:00 GMT")]);
        assert_eq!(
            checksummer.checksum(&metadata),
            Some("Tue, 01 Jan 2030 00:00:00 GMT".to_string())
        );
        assert_eq!(checksummer.checksum(&Metadata::new()), None);
    }

    #[test]
    fn test_sha256_is_stable_and_sensitive() {
        let checksummer = Sha256MetadataChecksummer::default();
        let a = checksummer.checksum(&metadata(&[("etag", "1"), ("size", "10")]));
        let b = checksummer.checksum(&metadata(&[("size", "10"), ("etag", "1")]));
        let c = checksummer.checksum(&metadata(&[("etag", "2"), ("size", "10")]));

        assert!(a.is_some());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(checksummer.checksum(&Metadata::new()), None);
    }

    #[test]
    fn test_sha256_restricted_fields() {
        let checksummer = Sha256MetadataChecksummer {
            source_fields: vec!["etag".to_string()],
        };
        let a = checksummer.checksum(&metadata(&[("etag", "1"), ("date", "x")]));
        let b = checksummer.checksum(&metadata(&[("etag", "1"), ("date", "y")]));
        assert_eq!(a, b);

        let none = checksummer.checksum(&metadata(&[("date", "x")]));
        assert_eq!(none, None);
    }
}
