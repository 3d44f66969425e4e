//! Capability interfaces for the crawler's strategy slots.
//!
//! Each named slot of the configuration holds exactly one implementation of
//! one of these traits. The configuration core only constructs strategies
//! from document nodes and serializes them back; what they do internally is
//! their own business.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::document::{CrawlDocument, Metadata};
use crate::error::Result;
use crate::robots::{RobotsMeta, RobotsTxt};
use crate::xml::XmlWriter;

/// Common contract for every pluggable strategy: it names its own type and
/// writes its nested settings back into a configuration document.
pub trait XmlConfigurable: Send + Sync {
    /// Type identifier used as the `class` attribute in documents
    fn class_name(&self) -> &'static str;

    /// Serialize this strategy's own settings as nested elements
    fn save_xml(&self, writer: &mut XmlWriter<'_>) -> io::Result<()> {
        let _ = writer;
        Ok(())
    }
}

/// Builds the HTTP client shared by fetch-facing strategies
pub trait HttpClientFactory: XmlConfigurable {
    /// Create a client, applying the crawl's user agent when one is set
    fn create_client(&self, user_agent: Option<&str>) -> Result<Client>;
}

/// Rewrites URLs into their canonical form before scheduling
pub trait UrlNormalizer: XmlConfigurable {
    fn normalize(&self, url: &Url) -> Url;
}

/// Computes the politeness delay before hitting a URL
pub trait DelayResolver: XmlConfigurable {
    /// Resolve the delay, given the crawl delay advertised by robots.txt
    fn resolve_delay(&self, url: &Url, robots_delay: Option<Duration>) -> Duration;
}

/// Fetches a full document
#[async_trait]
pub trait DocumentFetcher: XmlConfigurable {
    async fn fetch(&self, client: &Client, url: &Url) -> Result<CrawlDocument>;
}

/// Fetches document metadata without the body
#[async_trait]
pub trait MetadataFetcher: XmlConfigurable {
    async fn fetch_metadata(&self, client: &Client, url: &Url) -> Result<Metadata>;
}

/// Extracts candidate URLs from document content
pub trait UrlExtractor: XmlConfigurable {
    fn extract_urls(&self, content: &str, base: &Url) -> Vec<Url>;
}

/// Obtains the robots.txt rules governing a site
#[async_trait]
pub trait RobotsTxtProvider: XmlConfigurable {
    async fn robots_txt(&self, client: &Client, base: &Url, user_agent: &str)
        -> Result<RobotsTxt>;
}

/// Reads robots directives embedded in document content
pub trait RobotsMetaProvider: XmlConfigurable {
    fn robots_meta(&self, content: &str) -> RobotsMeta;
}

/// Creates sitemap resolvers, one per site being crawled
pub trait SitemapResolverFactory: XmlConfigurable {
    fn create_resolver(&self) -> Box<dyn SitemapResolver>;
}

/// Resolves the sitemap URLs of one site
#[async_trait]
pub trait SitemapResolver: Send + Sync {
    async fn resolve(&self, client: &Client, base: &Url) -> Result<Vec<Url>>;
}

/// Computes a checksum over document metadata, used to detect unmodified
/// documents without fetching their content
pub trait MetadataChecksummer: XmlConfigurable {
    /// Returns `None` when no checksum can be derived
    fn checksum(&self, metadata: &Metadata) -> Option<String>;
}

/// Transforms a document before or after import
pub trait DocumentProcessor: XmlConfigurable {
    fn process(&self, document: &mut CrawlDocument) -> Result<()>;
}
