use std::collections::HashMap;
use std::sync::Arc;

use trawl_rs_core::error::{Error, Result};
use trawl_rs_core::strategy::{
    DelayResolver, DocumentFetcher, DocumentProcessor, HttpClientFactory, MetadataChecksummer,
    MetadataFetcher, RobotsMetaProvider, RobotsTxtProvider, SitemapResolverFactory, UrlExtractor,
    UrlNormalizer,
};
use trawl_rs_core::xml::ConfigNode;
use trawl_rs_strategies::{
    GenericDelayResolver, GenericDocumentFetcher, GenericHttpClientFactory, GenericUrlExtractor,
    HttpMetadataChecksummer, StandardRobotsMetaProvider, StandardRobotsTxtProvider,
    StandardSitemapResolverFactory,
};

use crate::crawler_config::{BaseSettings, CrawlerConfig};
use crate::registry::StrategyRegistry;
use crate::reporter::{LoadReporter, LogReporter, ProcessorStage};

/// Builds a [`CrawlerConfig`], either programmatically through setters or by
/// overlaying an XML declaration onto the pre-populated defaults.
///
/// Every slot with a default starts resolved; `load` replaces only what the
/// document declares. List-valued setters store copies and list-valued
/// getters return copies. `load` is meant to run at most once per builder,
/// before the built value is shared.
pub struct CrawlerConfigBuilder {
    base: BaseSettings,
    user_agent: Option<String>,
    max_depth: i32,
    keep_downloads: bool,
    start_urls: Vec<String>,
    urls_files: Vec<String>,
    url_normalizer: Option<Arc<dyn UrlNormalizer>>,
    delay_resolver: Arc<dyn DelayResolver>,
    http_client_factory: Arc<dyn HttpClientFactory>,
    robots_txt_provider: Arc<dyn RobotsTxtProvider>,
    ignore_robots_txt: bool,
    sitemap_resolver_factory: Arc<dyn SitemapResolverFactory>,
    ignore_sitemap: bool,
    metadata_fetcher: Option<Arc<dyn MetadataFetcher>>,
    metadata_checksummer: Arc<dyn MetadataChecksummer>,
    document_fetcher: Arc<dyn DocumentFetcher>,
    robots_meta_provider: Arc<dyn RobotsMetaProvider>,
    ignore_robots_meta: bool,
    url_extractor: Arc<dyn UrlExtractor>,
    pre_import_processors: Vec<Arc<dyn DocumentProcessor>>,
    post_import_processors: Vec<Arc<dyn DocumentProcessor>>,
}

impl Default for CrawlerConfigBuilder {
    fn default() -> Self {
        Self {
            base: BaseSettings::default(),
            user_agent: None,
            max_depth: -1,
            keep_downloads: false,
            start_urls: Vec::new(),
            urls_files: Vec::new(),
            url_normalizer: None,
            delay_resolver: Arc::new(GenericDelayResolver::default()),
            http_client_factory: Arc::new(GenericHttpClientFactory::default()),
            robots_txt_provider: Arc::new(StandardRobotsTxtProvider),
            ignore_robots_txt: false,
            sitemap_resolver_factory: Arc::new(StandardSitemapResolverFactory::default()),
            ignore_sitemap: false,
            metadata_fetcher: None,
            metadata_checksummer: Arc::new(HttpMetadataChecksummer::default()),
            document_fetcher: Arc::new(GenericDocumentFetcher::default()),
            robots_meta_provider: Arc::new(StandardRobotsMetaProvider::default()),
            ignore_robots_meta: false,
            url_extractor: Arc::new(GenericUrlExtractor::default()),
            pre_import_processors: Vec::new(),
            post_import_processors: Vec::new(),
        }
    }
}

impl CrawlerConfigBuilder {
    /// Create a builder with every defaulted slot resolved
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.base.id = id.into();
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = Some(user_agent.into());
    }

    pub fn set_max_depth(&mut self, max_depth: i32) {
        self.max_depth = max_depth;
    }

    pub fn set_keep_downloads(&mut self, keep_downloads: bool) {
        self.keep_downloads = keep_downloads;
    }

    /// Store an independent copy of the given seed URLs
    pub fn set_start_urls(&mut self, start_urls: &[String]) {
        self.start_urls = start_urls.to_vec();
    }

    /// Store an independent copy of the given URL-file paths
    pub fn set_urls_files(&mut self, urls_files: &[String]) {
        self.urls_files = urls_files.to_vec();
    }

    pub fn set_url_normalizer(&mut self, normalizer: Option<Arc<dyn UrlNormalizer>>) {
        self.url_normalizer = normalizer;
    }

    pub fn set_delay_resolver(&mut self, resolver: Arc<dyn DelayResolver>) {
        self.delay_resolver = resolver;
    }

    pub fn set_http_client_factory(&mut self, factory: Arc<dyn HttpClientFactory>) {
        self.http_client_factory = factory;
    }

    pub fn set_robots_txt_provider(&mut self, provider: Arc<dyn RobotsTxtProvider>) {
        self.robots_txt_provider = provider;
    }

    pub fn set_ignore_robots_txt(&mut self, ignore: bool) {
        self.ignore_robots_txt = ignore;
    }

    pub fn set_sitemap_resolver_factory(&mut self, factory: Arc<dyn SitemapResolverFactory>) {
        self.sitemap_resolver_factory = factory;
    }

    pub fn set_ignore_sitemap(&mut self, ignore: bool) {
        self.ignore_sitemap = ignore;
    }

    pub fn set_metadata_fetcher(&mut self, fetcher: Option<Arc<dyn MetadataFetcher>>) {
        self.metadata_fetcher = fetcher;
    }

    pub fn set_metadata_checksummer(&mut self, checksummer: Arc<dyn MetadataChecksummer>) {
        self.metadata_checksummer = checksummer;
    }

    pub fn set_document_fetcher(&mut self, fetcher: Arc<dyn DocumentFetcher>) {
        self.document_fetcher = fetcher;
    }

    pub fn set_robots_meta_provider(&mut self, provider: Arc<dyn RobotsMetaProvider>) {
        self.robots_meta_provider = provider;
    }

    pub fn set_ignore_robots_meta(&mut self, ignore: bool) {
        self.ignore_robots_meta = ignore;
    }

    pub fn set_url_extractor(&mut self, extractor: Arc<dyn UrlExtractor>) {
        self.url_extractor = extractor;
    }

    /// Store an independent copy of the given processor list
    pub fn set_pre_import_processors(&mut self, processors: &[Arc<dyn DocumentProcessor>]) {
        self.pre_import_processors = processors.to_vec();
    }

    /// Store an independent copy of the given processor list
    pub fn set_post_import_processors(&mut self, processors: &[Arc<dyn DocumentProcessor>]) {
        self.post_import_processors = processors.to_vec();
    }

    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

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

    /// URL-file paths, returned as an independent copy
    pub fn urls_files(&self) -> Vec<String> {
        self.urls_files.clone()
    }

    pub fn url_normalizer(&self) -> Option<Arc<dyn UrlNormalizer>> {
        self.url_normalizer.clone()
    }

    pub fn delay_resolver(&self) -> Arc<dyn DelayResolver> {
        Arc::clone(&self.delay_resolver)
    }

    pub fn ignore_robots_txt(&self) -> bool {
        self.ignore_robots_txt
    }

    pub fn ignore_sitemap(&self) -> bool {
        self.ignore_sitemap
    }

    pub fn ignore_robots_meta(&self) -> bool {
        self.ignore_robots_meta
    }

    /// Pre-import processors, returned as an independent copy
    pub fn pre_import_processors(&self) -> Vec<Arc<dyn DocumentProcessor>> {
        self.pre_import_processors.clone()
    }

    /// Post-import processors, returned as an independent copy
    pub fn post_import_processors(&self) -> Vec<Arc<dyn DocumentProcessor>> {
        self.post_import_processors.clone()
    }

    /// Overlay an XML declaration, logging diagnostics through the `log` crate
    pub fn load(&mut self, document: &str, registry: &StrategyRegistry) -> Result<()> {
        let mut reporter = LogReporter;
        self.load_with(document, registry, &mut reporter)
    }

    /// Overlay an XML declaration onto the current values.
    ///
    /// Input order does not matter; slots are resolved by element name. A
    /// document that fails to parse changes nothing. A slot that fails to
    /// resolve aborts the load at that slot: slots resolved before it keep
    /// their new values, later ones keep their prior values.
    pub fn load_with(
        &mut self,
        document: &str,
        registry: &StrategyRegistry,
        reporter: &mut dyn LoadReporter,
    ) -> Result<()> {
        let root = ConfigNode::parse(document)?;

        if let Some(id) = root.attr("id") {
            self.base.id = id.to_string();
        }

        // simple settings, keeping the current value when absent
        if let Some(agent) = root.child_text("userAgent") {
            self.user_agent = Some(agent.to_string());
        }
        if let Some(depth) = root.child_i32("maxDepth")? {
            self.max_depth = depth;
        }
        if let Some(keep) = root.child_bool("keepDownloads")? {
            self.keep_downloads = keep;
        }

        self.url_normalizer = resolve_optional(
            &registry.url_normalizers,
            root.child("urlNormalizer"),
            "urlNormalizer",
            self.url_normalizer.clone(),
            reporter,
        )?;
        self.delay_resolver = resolve_required(
            &registry.delay_resolvers,
            root.child("delay"),
            "delay",
            Arc::clone(&self.delay_resolver),
            reporter,
        )?;

        // a present-but-empty list is treated like an absent one
        if let Some(container) = root.child("startURLs") {
            let urls: Vec<String> = container
                .children("url")
                .filter_map(ConfigNode::text)
                .map(str::to_string)
                .collect();
            if !urls.is_empty() {
                self.start_urls = urls;
            }
            let files: Vec<String> = container
                .children("urlsFile")
                .filter_map(ConfigNode::text)
                .map(str::to_string)
                .collect();
            if !files.is_empty() {
                self.urls_files = files;
            }
        }

        self.http_client_factory = resolve_required(
            &registry.http_client_factories,
            root.child("httpClientFactory"),
            "httpClientFactory",
            Arc::clone(&self.http_client_factory),
            reporter,
        )?;

        self.robots_txt_provider = resolve_required(
            &registry.robots_txt_providers,
            root.child("robotsTxt"),
            "robotsTxt",
            Arc::clone(&self.robots_txt_provider),
            reporter,
        )?;
        if let Some(node) = root.child("robotsTxt") {
            if let Some(flag) = node.attr_bool("ignore")? {
                self.ignore_robots_txt = flag;
            }
        }

        self.sitemap_resolver_factory = resolve_required(
            &registry.sitemap_resolver_factories,
            root.child("sitemap"),
            "sitemap",
            Arc::clone(&self.sitemap_resolver_factory),
            reporter,
        )?;
        if let Some(node) = root.child("sitemap") {
            if let Some(flag) = node.attr_bool("ignore")? {
                self.ignore_sitemap = flag;
            }
        }

        self.metadata_fetcher = resolve_optional(
            &registry.metadata_fetchers,
            root.child("metadataFetcher"),
            "metadataFetcher",
            self.metadata_fetcher.clone(),
            reporter,
        )?;

        self.metadata_checksummer = resolve_required(
            &registry.metadata_checksummers,
            root.child("metadataChecksummer"),
            "metadataChecksummer",
            Arc::clone(&self.metadata_checksummer),
            reporter,
        )?;

        self.document_fetcher = resolve_required(
            &registry.document_fetchers,
            root.child("documentFetcher"),
            "documentFetcher",
            Arc::clone(&self.document_fetcher),
            reporter,
        )?;

        self.robots_meta_provider = resolve_required(
            &registry.robots_meta_providers,
            root.child("robotsMeta"),
            "robotsMeta",
            Arc::clone(&self.robots_meta_provider),
            reporter,
        )?;
        if let Some(node) = root.child("robotsMeta") {
            if let Some(flag) = node.attr_bool("ignore")? {
                self.ignore_robots_meta = flag;
            }
        }

        self.url_extractor = resolve_required(
            &registry.url_extractors,
            root.child("urlExtractor"),
            "urlExtractor",
            Arc::clone(&self.url_extractor),
            reporter,
        )?;

        let pre = load_processors(
            &registry.document_processors,
            root.child("preImportProcessors"),
            ProcessorStage::PreImport,
            reporter,
        )?;
        if !pre.is_empty() {
            self.pre_import_processors = pre;
        }
        let post = load_processors(
            &registry.document_processors,
            root.child("postImportProcessors"),
            ProcessorStage::PostImport,
            reporter,
        )?;
        if !post.is_empty() {
            self.post_import_processors = post;
        }

        Ok(())
    }

    /// Finish building; the result is read-only
    pub fn build(self) -> CrawlerConfig {
        CrawlerConfig {
            base: self.base,
            user_agent: self.user_agent,
            max_depth: self.max_depth,
            keep_downloads: self.keep_downloads,
            start_urls: self.start_urls,
            urls_files: self.urls_files,
            url_normalizer: self.url_normalizer,
            delay_resolver: self.delay_resolver,
            http_client_factory: self.http_client_factory,
            robots_txt_provider: self.robots_txt_provider,
            ignore_robots_txt: self.ignore_robots_txt,
            sitemap_resolver_factory: self.sitemap_resolver_factory,
            ignore_sitemap: self.ignore_sitemap,
            metadata_fetcher: self.metadata_fetcher,
            metadata_checksummer: self.metadata_checksummer,
            document_fetcher: self.document_fetcher,
            robots_meta_provider: self.robots_meta_provider,
            ignore_robots_meta: self.ignore_robots_meta,
            url_extractor: self.url_extractor,
            pre_import_processors: self.pre_import_processors,
            post_import_processors: self.post_import_processors,
        }
    }
}

fn instantiate<T: ?Sized>(
    map: &HashMap<String, fn(&ConfigNode) -> Result<Arc<T>>>,
    node: &ConfigNode,
    slot: &str,
    class: &str,
    reporter: &mut dyn LoadReporter,
) -> Result<Arc<T>> {
    let ctor = map
        .get(class)
        .ok_or_else(|| Error::strategy(slot, class, "no constructor registered for this type"))?;
    let strategy = ctor(node).map_err(|e| Error::strategy(slot, class, e.to_string()))?;
    reporter.strategy_resolved(slot, class);
    Ok(strategy)
}

fn resolve_required<T: ?Sized>(
    map: &HashMap<String, fn(&ConfigNode) -> Result<Arc<T>>>,
    node: Option<&ConfigNode>,
    slot: &str,
    current: Arc<T>,
    reporter: &mut dyn LoadReporter,
) -> Result<Arc<T>> {
    let node = match node {
        Some(node) => node,
        None => return Ok(current),
    };
    let class = match node.attr("class") {
        Some(class) => class,
        None => return Ok(current),
    };
    instantiate(map, node, slot, class, reporter)
}

fn resolve_optional<T: ?Sized>(
    map: &HashMap<String, fn(&ConfigNode) -> Result<Arc<T>>>,
    node: Option<&ConfigNode>,
    slot: &str,
    current: Option<Arc<T>>,
    reporter: &mut dyn LoadReporter,
) -> Result<Option<Arc<T>>> {
    let node = match node {
        Some(node) => node,
        None => return Ok(current),
    };
    let class = match node.attr("class") {
        Some(class) => class,
        None => return Ok(current),
    };
    instantiate(map, node, slot, class, reporter).map(Some)
}

fn load_processors(
    map: &HashMap<String, fn(&ConfigNode) -> Result<Arc<dyn DocumentProcessor>>>,
    container: Option<&ConfigNode>,
    stage: ProcessorStage,
    reporter: &mut dyn LoadReporter,
) -> Result<Vec<Arc<dyn DocumentProcessor>>> {
    let container = match container {
        Some(container) => container,
        None => return Ok(Vec::new()),
    };
    let slot = match stage {
        ProcessorStage::PreImport => "preImportProcessors",
        ProcessorStage::PostImport => "postImportProcessors",
    };
    let mut processors = Vec::new();
    for node in container.children("processor") {
        let class = node.attr("class").ok_or_else(|| {
            Error::MalformedDocument(format!(
                "{} processor entry is missing its class attribute",
                slot
            ))
        })?;
        let processor = instantiate(map, node, slot, class, reporter)?;
        reporter.processor_loaded(stage, class);
        processors.push(processor);
    }
    Ok(processors)
}
