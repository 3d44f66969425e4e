use std::io;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use trawl_rs_core::error::{Error, Result};
use trawl_rs_core::strategy::{
    DelayResolver, DocumentFetcher, DocumentProcessor, HttpClientFactory, MetadataChecksummer,
    MetadataFetcher, RobotsMetaProvider, RobotsTxtProvider, SitemapResolverFactory, UrlExtractor,
    UrlNormalizer, XmlConfigurable,
};
use trawl_rs_core::xml::XmlWriter;

use crate::builder::CrawlerConfigBuilder;

/// Settings shared by every crawler flavor, embedded by composition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseSettings {
    /// Identifier naming this configuration instance in diagnostics
    pub id: String,
}

/// Assembled configuration for one crawl run.
///
/// Produced by [`CrawlerConfigBuilder`], which pre-populates every defaulted
/// slot and overlays an XML declaration; the built value is read-only.
/// List-valued accessors return independent copies, so no caller can reach
/// the internal state through a returned reference.
#[derive(Clone)]
pub struct CrawlerConfig {
    pub(crate) base: BaseSettings,
    pub(crate) user_agent: Option<String>,
    pub(crate) max_depth: i32,
    pub(crate) keep_downloads: bool,
    pub(crate) start_urls: Vec<String>,
    pub(crate) urls_files: Vec<String>,
    pub(crate) url_normalizer: Option<Arc<dyn UrlNormalizer>>,
    pub(crate) delay_resolver: Arc<dyn DelayResolver>,
    pub(crate) http_client_factory: Arc<dyn HttpClientFactory>,
    pub(crate) robots_txt_provider: Arc<dyn RobotsTxtProvider>,
    pub(crate) ignore_robots_txt: bool,
    pub(crate) sitemap_resolver_factory: Arc<dyn SitemapResolverFactory>,
    pub(crate) ignore_sitemap: bool,
    pub(crate) metadata_fetcher: Option<Arc<dyn MetadataFetcher>>,
    pub(crate) metadata_checksummer: Arc<dyn MetadataChecksummer>,
    pub(crate) document_fetcher: Arc<dyn DocumentFetcher>,
    pub(crate) robots_meta_provider: Arc<dyn RobotsMetaProvider>,
    pub(crate) ignore_robots_meta: bool,
    pub(crate) url_extractor: Arc<dyn UrlExtractor>,
    pub(crate) pre_import_processors: Vec<Arc<dyn DocumentProcessor>>,
    pub(crate) post_import_processors: Vec<Arc<dyn DocumentProcessor>>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        CrawlerConfigBuilder::new().build()
    }
}

impl CrawlerConfig {
    /// Start building a configuration with all defaults pre-populated
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Maximum crawl depth; -1 means unlimited
    pub fn max_depth(&self) -> i32 {
        self.max_depth
    }

    pub fn keep_downloads(&self) -> bool {
        self.keep_downloads
    }

    /// Seed URLs, returned as an independent copy
    pub fn start_urls(&self) -> Vec<String> {
        self.start_urls.clone()
    }

    /// Paths of files listing further seed URLs, returned as an independent copy
    pub fn urls_files(&self) -> Vec<String> {
        self.urls_files.clone()
    }

    pub fn url_normalizer(&self) -> Option<Arc<dyn UrlNormalizer>> {
        self.url_normalizer.clone()
    }

    pub fn delay_resolver(&self) -> Arc<dyn DelayResolver> {
        Arc::clone(&self.delay_resolver)
    }

    pub fn http_client_factory(&self) -> Arc<dyn HttpClientFactory> {
        Arc::clone(&self.http_client_factory)
    }

    pub fn robots_txt_provider(&self) -> Arc<dyn RobotsTxtProvider> {
        Arc::clone(&self.robots_txt_provider)
    }

    /// Whether the robots.txt capability is configured but disabled
    pub fn ignore_robots_txt(&self) -> bool {
        self.ignore_robots_txt
    }

    pub fn sitemap_resolver_factory(&self) -> Arc<dyn SitemapResolverFactory> {
        Arc::clone(&self.sitemap_resolver_factory)
    }

    pub fn ignore_sitemap(&self) -> bool {
        self.ignore_sitemap
    }

    pub fn metadata_fetcher(&self) -> Option<Arc<dyn MetadataFetcher>> {
        self.metadata_fetcher.clone()
    }

    pub fn metadata_checksummer(&self) -> Arc<dyn MetadataChecksummer> {
        Arc::clone(&self.metadata_checksummer)
    }

    pub fn document_fetcher(&self) -> Arc<dyn DocumentFetcher> {
        Arc::clone(&self.document_fetcher)
    }

    pub fn robots_meta_provider(&self) -> Arc<dyn RobotsMetaProvider> {
        Arc::clone(&self.robots_meta_provider)
    }

    pub fn ignore_robots_meta(&self) -> bool {
        self.ignore_robots_meta
    }

    pub fn url_extractor(&self) -> Arc<dyn UrlExtractor> {
        Arc::clone(&self.url_extractor)
    }

    /// Pre-import processors in execution order, returned as an independent copy
    pub fn pre_import_processors(&self) -> Vec<Arc<dyn DocumentProcessor>> {
        self.pre_import_processors.clone()
    }

    /// Post-import processors in execution order, returned as an independent copy
    pub fn post_import_processors(&self) -> Vec<Arc<dyn DocumentProcessor>> {
        self.post_import_processors.clone()
    }

    /// Serialize this configuration as XML in a fixed element order.
    ///
    /// Unset optional slots and empty lists are omitted rather than written
    /// empty. Output failures are wrapped into one error naming this
    /// configuration instance.
    pub fn save<W: io::Write>(&self, out: &mut W) -> Result<()> {
        self.write_xml(out).map_err(|source| Error::Write {
            id: self.base.id.clone(),
            source,
        })
    }

    fn write_xml(&self, out: &mut dyn io::Write) -> io::Result<()> {
        let mut writer = XmlWriter::new(out);
        if self.base.id.is_empty() {
            writer.start("crawler")?;
        } else {
            writer.start_with_attrs("crawler", &[("id", &self.base.id)])?;
        }

        if let Some(agent) = &self.user_agent {
            writer.text_element("userAgent", agent)?;
        }
        writer.i64_element("maxDepth", i64::from(self.max_depth))?;
        writer.bool_element("keepDownloads", self.keep_downloads)?;

        if !self.start_urls.is_empty() || !self.urls_files.is_empty() {
            writer.start("startURLs")?;
            for url in &self.start_urls {
                writer.text_element("url", url)?;
            }
            for path in &self.urls_files {
                writer.text_element("urlsFile", path)?;
            }
            writer.end("startURLs")?;
        }

        if let Some(normalizer) = &self.url_normalizer {
            write_strategy(&mut writer, "urlNormalizer", normalizer.as_ref(), None)?;
        }
        write_strategy(&mut writer, "delay", self.delay_resolver.as_ref(), None)?;
        write_strategy(
            &mut writer,
            "httpClientFactory",
            self.http_client_factory.as_ref(),
            None,
        )?;
        write_strategy(
            &mut writer,
            "robotsTxt",
            self.robots_txt_provider.as_ref(),
            Some(self.ignore_robots_txt),
        )?;
        write_strategy(
            &mut writer,
            "sitemap",
            self.sitemap_resolver_factory.as_ref(),
            Some(self.ignore_sitemap),
        )?;
        if let Some(fetcher) = &self.metadata_fetcher {
            write_strategy(&mut writer, "metadataFetcher", fetcher.as_ref(), None)?;
        }
        write_strategy(
            &mut writer,
            "metadataChecksummer",
            self.metadata_checksummer.as_ref(),
            None,
        )?;
        write_strategy(
            &mut writer,
            "documentFetcher",
            self.document_fetcher.as_ref(),
            None,
        )?;
        write_strategy(
            &mut writer,
            "robotsMeta",
            self.robots_meta_provider.as_ref(),
            Some(self.ignore_robots_meta),
        )?;
        write_strategy(&mut writer, "urlExtractor", self.url_extractor.as_ref(), None)?;

        write_processors(&mut writer, "preImportProcessors", &self.pre_import_processors)?;
        write_processors(
            &mut writer,
            "postImportProcessors",
            &self.post_import_processors,
        )?;

        writer.end("crawler")
    }
}

fn write_strategy<T: XmlConfigurable + ?Sized>(
    writer: &mut XmlWriter<'_>,
    name: &str,
    strategy: &T,
    ignore: Option<bool>,
) -> io::Result<()> {
    let class = strategy.class_name();
    match ignore {
        Some(flag) => writer.start_with_attrs(
            name,
            &[("class", class), ("ignore", if flag { "true" } else { "false" })],
        )?,
        None => writer.start_with_attrs(name, &[("class", class)])?,
    }
    strategy.save_xml(writer)?;
    writer.end(name)
}

fn write_processors(
    writer: &mut XmlWriter<'_>,
    name: &str,
    processors: &[Arc<dyn DocumentProcessor>],
) -> io::Result<()> {
    if processors.is_empty() {
        return Ok(());
    }
    writer.start(name)?;
    for processor in processors {
        write_strategy(writer, "processor", processor.as_ref(), None)?;
    }
    writer.end(name)
}
