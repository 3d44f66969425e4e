//! # Trawl-RS
//!
//! Trawl-RS is the configuration backbone of a web crawler: a declarative,
//! XML-backed model of which pluggable strategies a crawl run uses.
//!
//! ## Components
//!
//! - **Core**: capability traits, shared value types, and the XML
//!   node/writer primitives.
//! - **Strategies**: the bundled strategy implementations, each
//!   constructible from a configuration node.
//! - **Config**: the `CrawlerConfig` aggregate, its builder/loader, the
//!   document writer, and the class-name constructor registry.
//!
//! ## Example
//!
//! ```rust
//! use trawl_rs::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let registry = StrategyRegistry::with_builtins();
//! let mut builder = CrawlerConfigBuilder::new();
//! builder.load(
//!     "<crawler><maxDepth>2</maxDepth></crawler>",
//!     &registry,
//! )?;
//! let config = builder.build();
//! assert_eq!(config.max_depth(), 2);
//!
//! let mut out = Vec::new();
//! config.save(&mut out)?;
//! # Ok(())
//! # }
//! ```

pub use trawl_rs_config as config;
pub use trawl_rs_core as core;
pub use trawl_rs_strategies as strategies;

/// Prelude module that re-exports commonly used types
pub mod prelude {
    pub use trawl_rs_config::{
        BaseSettings, CrawlerConfig, CrawlerConfigBuilder, LoadReporter, LogReporter,
        ProcessorStage, StrategyRegistry,
    };
    pub use trawl_rs_core::document::{CrawlDocument, Metadata};
    pub use trawl_rs_core::error::{Error, Result};
    pub use trawl_rs_core::robots::{RobotsMeta, RobotsTxt};
    pub use trawl_rs_core::strategy::{
        DelayResolver, DocumentFetcher, DocumentProcessor, HttpClientFactory,
        MetadataChecksummer, MetadataFetcher, RobotsMetaProvider, RobotsTxtProvider,
        SitemapResolver, SitemapResolverFactory, UrlExtractor, UrlNormalizer, XmlConfigurable,
    };
    pub use trawl_rs_core::xml::{ConfigNode, XmlWriter};
    pub use trawl_rs_strategies::{
        GenericDelayResolver, GenericDocumentFetcher, GenericHttpClientFactory,
        GenericMetadataFetcher, GenericUrlExtractor, GenericUrlNormalizer, HtmlStripper,
        HttpMetadataChecksummer, MetadataTagger, RandomDelayResolver, Sha256MetadataChecksummer,
        StandardRobotsMetaProvider, StandardRobotsTxtProvider, StandardSitemapResolverFactory,
    };
}
