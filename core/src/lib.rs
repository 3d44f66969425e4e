pub mod document;
pub mod error;
pub mod robots;
pub mod strategy;
pub mod xml;

pub use document::{CrawlDocument, Metadata};
pub use error::{Error, Result};
pub use robots::{RobotsMeta, RobotsTxt};
pub use strategy::{
    DelayResolver, DocumentFetcher, DocumentProcessor, HttpClientFactory, MetadataChecksummer,
    MetadataFetcher, RobotsMetaProvider, RobotsTxtProvider, SitemapResolver,
    SitemapResolverFactory, UrlExtractor, UrlNormalizer, XmlConfigurable,
};
pub use xml::{ConfigNode, XmlWriter};

/// Re-export commonly used crates
pub use async_trait::async_trait;
pub use reqwest;
pub use serde;
pub use url;
