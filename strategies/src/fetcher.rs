use std::io;

use log::debug;
use reqwest::Client;
use trawl_rs_core::async_trait;
use trawl_rs_core::document::{CrawlDocument, Metadata};
use trawl_rs_core::error::{Error, Result};
use trawl_rs_core::strategy::{DocumentFetcher, MetadataFetcher, XmlConfigurable};
use trawl_rs_core::xml::{ConfigNode, XmlWriter};
use url::Url;

/// Fetches documents with a plain GET through the shared client.
#[derive(Debug, Clone)]
pub struct GenericDocumentFetcher {
    /// HTTP statuses accepted as a successful fetch
    pub valid_statuses: Vec<u16>,
}

impl Default for GenericDocumentFetcher {
    fn default() -> Self {
        Self {
            valid_statuses: vec![200],
        }
    }
}

impl GenericDocumentFetcher {
    pub fn from_xml(node: &ConfigNode) -> Result<Self> {
        let valid_statuses = match node.child_text("validStatuses") {
            None => Self::default().valid_statuses,
            Some(text) => parse_status_list(text)?,
        };
        Ok(Self { valid_statuses })
    }
}

fn parse_status_list(text: &str) -> Result<Vec<u16>> {
    text.split(',')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            chunk.parse().map_err(|_| {
                Error::MalformedDocument(format!("invalid HTTP status: {}", chunk))
            })
        })
        .collect()
}

impl XmlConfigurable for GenericDocumentFetcher {
    fn class_name(&self) -> &'static str {
        "GenericDocumentFetcher"
    }

    fn save_xml(&self, writer: &mut XmlWriter<'_>) -> io::Result<()> {
        let statuses: Vec<String> = self.valid_statuses.iter().map(u16::to_string).collect();
        writer.text_element("validStatuses", &statuses.join(","))
    }
}

#[async_trait]
impl DocumentFetcher for GenericDocumentFetcher {
    async fn fetch(&self, client: &Client, url: &Url) -> Result<CrawlDocument> {
        debug!("fetching document: {}", url);
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::fetch(url, e.to_string()))?;

        let status = response.status().as_u16();
        if !self.valid_statuses.contains(&status) {
            return Err(Error::fetch(url, format!("unexpected status {}", status)));
        }

        let mut document = CrawlDocument::new(url.clone());
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                document.metadata.add(name.as_str(), value);
            }
        }
        document.content_type = document
            .metadata
            .first("content-type")
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string());
        document.content = response
            .text()
            .await
            .map_err(|e| Error::fetch(url, e.to_string()))?;
        Ok(document)
    }
}

/// Fetches only metadata, using a HEAD request.
#[derive(Debug, Clone, Default)]
pub struct GenericMetadataFetcher;

impl GenericMetadataFetcher {
    pub fn from_xml(_node: &ConfigNode) -> Result<Self> {
        Ok(Self)
    }
}

impl XmlConfigurable for GenericMetadataFetcher {
    fn class_name(&self) -> &'static str {
        "GenericMetadataFetcher"
    }
}

#[async_trait]
impl MetadataFetcher for GenericMetadataFetcher {
    async fn fetch_metadata(&self, client: &Client, url: &Url) -> Result<Metadata> {
        debug!("fetching metadata: {}", url);
        let response = client
            .head(url.clone())
            .send()
            .await
            .map_err(|e| Error::fetch(url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::fetch(
                url,
                format!("unexpected status {}", response.status().as_u16()),
            ));
        }

        let mut metadata = Metadata::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                metadata.add(name.as_str(), value);
            }
        }
        Ok(metadata)
    }
}
