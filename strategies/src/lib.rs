//! Pluggable strategy implementations for the trawl-rs crawler.
//!
//! Every type here satisfies one of the capability traits in
//! `trawl_rs_core::strategy`, can be constructed from a configuration node
//! via its `from_xml` function, and serializes its own settings back through
//! `XmlConfigurable::save_xml`.

pub mod checksum;
pub mod delay;
pub mod extractor;
pub mod fetcher;
pub mod http_client;
pub mod normalizer;
pub mod processor;
pub mod robots;
pub mod sitemap;

pub use checksum::{HttpMetadataChecksummer, Sha256MetadataChecksummer};
pub use delay::{GenericDelayResolver, RandomDelayResolver};
pub use extractor::GenericUrlExtractor;
pub use fetcher::{GenericDocumentFetcher, GenericMetadataFetcher};
pub use http_client::GenericHttpClientFactory;
pub use normalizer::GenericUrlNormalizer;
pub use processor::{HtmlStripper, MetadataTagger};
pub use robots::{StandardRobotsMetaProvider, StandardRobotsTxtProvider};
pub use sitemap::{StandardSitemapResolver, StandardSitemapResolverFactory};
