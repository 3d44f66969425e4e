use std::collections::HashMap;
use std::sync::Arc;

use trawl_rs_core::error::Result;
use trawl_rs_core::strategy::{
    DelayResolver, DocumentFetcher, DocumentProcessor, HttpClientFactory, MetadataChecksummer,
    MetadataFetcher, RobotsMetaProvider, RobotsTxtProvider, SitemapResolverFactory, UrlExtractor,
    UrlNormalizer,
};
use trawl_rs_core::xml::ConfigNode;
use trawl_rs_strategies::{
    GenericDelayResolver, GenericDocumentFetcher, GenericHttpClientFactory,
    GenericMetadataFetcher, GenericUrlExtractor, GenericUrlNormalizer, HtmlStripper,
    HttpMetadataChecksummer, MetadataTagger, RandomDelayResolver, Sha256MetadataChecksummer,
    StandardRobotsMetaProvider, StandardRobotsTxtProvider, StandardSitemapResolverFactory,
};

/// Constructor signature for one strategy capability
pub type HttpClientFactoryCtor = fn(&ConfigNode) -> Result<Arc<dyn HttpClientFactory>>;
pub type UrlNormalizerCtor = fn(&ConfigNode) -> Result<Arc<dyn UrlNormalizer>>;
pub type DelayResolverCtor = fn(&ConfigNode) -> Result<Arc<dyn DelayResolver>>;
pub type DocumentFetcherCtor = fn(&ConfigNode) -> Result<Arc<dyn DocumentFetcher>>;
pub type MetadataFetcherCtor = fn(&ConfigNode) -> Result<Arc<dyn MetadataFetcher>>;
pub type UrlExtractorCtor = fn(&ConfigNode) -> Result<Arc<dyn UrlExtractor>>;
pub type RobotsTxtProviderCtor = fn(&ConfigNode) -> Result<Arc<dyn RobotsTxtProvider>>;
pub type RobotsMetaProviderCtor = fn(&ConfigNode) -> Result<Arc<dyn RobotsMetaProvider>>;
pub type SitemapResolverFactoryCtor = fn(&ConfigNode) -> Result<Arc<dyn SitemapResolverFactory>>;
pub type MetadataChecksummerCtor = fn(&ConfigNode) -> Result<Arc<dyn MetadataChecksummer>>;
pub type DocumentProcessorCtor = fn(&ConfigNode) -> Result<Arc<dyn DocumentProcessor>>;

/// Table of strategy constructors, keyed by the class name a configuration
/// document declares.
///
/// Each capability has its own table, so a class name selects a constructor
/// already known to satisfy the slot being resolved. User crates register
/// additional types through the `register_*` methods.
#[derive(Default)]
pub struct StrategyRegistry {
    pub(crate) http_client_factories: HashMap<String, HttpClientFactoryCtor>,
    pub(crate) url_normalizers: HashMap<String, UrlNormalizerCtor>,
    pub(crate) delay_resolvers: HashMap<String, DelayResolverCtor>,
    pub(crate) document_fetchers: HashMap<String, DocumentFetcherCtor>,
    pub(crate) metadata_fetchers: HashMap<String, MetadataFetcherCtor>,
    pub(crate) url_extractors: HashMap<String, UrlExtractorCtor>,
    pub(crate) robots_txt_providers: HashMap<String, RobotsTxtProviderCtor>,
    pub(crate) robots_meta_providers: HashMap<String, RobotsMetaProviderCtor>,
    pub(crate) sitemap_resolver_factories: HashMap<String, SitemapResolverFactoryCtor>,
    pub(crate) metadata_checksummers: HashMap<String, MetadataChecksummerCtor>,
    pub(crate) document_processors: HashMap<String, DocumentProcessorCtor>,
}

impl StrategyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every bundled strategy type registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_http_client_factory("GenericHttpClientFactory", new_http_client_factory);
        registry.register_url_normalizer("GenericUrlNormalizer", new_url_normalizer);
        registry.register_delay_resolver("GenericDelayResolver", new_generic_delay_resolver);
        registry.register_delay_resolver("RandomDelayResolver", new_random_delay_resolver);
        registry.register_document_fetcher("GenericDocumentFetcher", new_document_fetcher);
        registry.register_metadata_fetcher("GenericMetadataFetcher", new_metadata_fetcher);
        registry.register_url_extractor("GenericUrlExtractor", new_url_extractor);
        registry.register_robots_txt_provider("StandardRobotsTxtProvider", new_robots_txt_provider);
        registry
            .register_robots_meta_provider("StandardRobotsMetaProvider", new_robots_meta_provider);
        registry.register_sitemap_resolver_factory(
            "StandardSitemapResolverFactory",
            new_sitemap_resolver_factory,
        );
        registry
            .register_metadata_checksummer("HttpMetadataChecksummer", new_http_checksummer);
        registry
            .register_metadata_checksummer("Sha256MetadataChecksummer", new_sha256_checksummer);
        registry.register_document_processor("MetadataTagger", new_metadata_tagger);
        registry.register_document_processor("HtmlStripper", new_html_stripper);
        registry
    }

    pub fn register_http_client_factory(
        &mut self,
        class: impl Into<String>,
        ctor: HttpClientFactoryCtor,
    ) {
        self.http_client_factories.insert(class.into(), ctor);
    }

    pub fn register_url_normalizer(&mut self, class: impl Into<String>, ctor: UrlNormalizerCtor) {
        self.url_normalizers.insert(class.into(), ctor);
    }

    pub fn register_delay_resolver(&mut self, class: impl Into<String>, ctor: DelayResolverCtor) {
        self.delay_resolvers.insert(class.into(), ctor);
    }

    pub fn register_document_fetcher(
        &mut self,
        class: impl Into<String>,
        ctor: DocumentFetcherCtor,
    ) {
        self.document_fetchers.insert(class.into(), ctor);
    }

    pub fn register_metadata_fetcher(
        &mut self,
        class: impl Into<String>,
        ctor: MetadataFetcherCtor,
    ) {
        self.metadata_fetchers.insert(class.into(), ctor);
    }

    pub fn register_url_extractor(&mut self, class: impl Into<String>, ctor: UrlExtractorCtor) {
        self.url_extractors.insert(class.into(), ctor);
    }

    pub fn register_robots_txt_provider(
        &mut self,
        class: impl Into<String>,
        ctor: RobotsTxtProviderCtor,
    ) {
        self.robots_txt_providers.insert(class.into(), ctor);
    }

    pub fn register_robots_meta_provider(
        &mut self,
        class: impl Into<String>,
        ctor: RobotsMetaProviderCtor,
    ) {
        self.robots_meta_providers.insert(class.into(), ctor);
    }

    pub fn register_sitemap_resolver_factory(
        &mut self,
        class: impl Into<String>,
        ctor: SitemapResolverFactoryCtor,
    ) {
        self.sitemap_resolver_factories.insert(class.into(), ctor);
    }

    pub fn register_metadata_checksummer(
        &mut self,
        class: impl Into<String>,
        ctor: MetadataChecksummerCtor,
    ) {
        self.metadata_checksummers.insert(class.into(), ctor);
    }

    pub fn register_document_processor(
        &mut self,
        class: impl Into<String>,
        ctor: DocumentProcessorCtor,
    ) {
        self.document_processors.insert(class.into(), ctor);
    }
}

fn new_http_client_factory(node: &ConfigNode) -> Result<Arc<dyn HttpClientFactory>> {
    Ok(Arc::new(GenericHttpClientFactory::from_xml(node)?))
}

fn new_url_normalizer(node: &ConfigNode) -> Result<Arc<dyn UrlNormalizer>> {
    Ok(Arc::new(GenericUrlNormalizer::from_xml(node)?))
}

fn new_generic_delay_resolver(node: &ConfigNode) -> Result<Arc<dyn DelayResolver>> {
    Ok(Arc::new(GenericDelayResolver::from_xml(node)?))
}

fn new_random_delay_resolver(node: &ConfigNode) -> Result<Arc<dyn DelayResolver>> {
    Ok(Arc::new(RandomDelayResolver::from_xml(node)?))
}

fn new_document_fetcher(node: &ConfigNode) -> Result<Arc<dyn DocumentFetcher>> {
    Ok(Arc::new(GenericDocumentFetcher::from_xml(node)?))
}

fn new_metadata_fetcher(node: &ConfigNode) -> Result<Arc<dyn MetadataFetcher>> {
    Ok(Arc::new(GenericMetadataFetcher::from_xml(node)?))
}

fn new_url_extractor(node: &ConfigNode) -> Result<Arc<dyn UrlExtractor>> {
    Ok(Arc::new(GenericUrlExtractor::from_xml(node)?))
}

fn new_robots_txt_provider(node: &ConfigNode) -> Result<Arc<dyn RobotsTxtProvider>> {
    Ok(Arc::new(StandardRobotsTxtProvider::from_xml(node)?))
}

fn new_robots_meta_provider(node: &ConfigNode) -> Result<Arc<dyn RobotsMetaProvider>> {
    Ok(Arc::new(StandardRobotsMetaProvider::from_xml(node)?))
}

fn new_sitemap_resolver_factory(node: &ConfigNode) -> Result<Arc<dyn SitemapResolverFactory>> {
    Ok(Arc::new(StandardSitemapResolverFactory::from_xml(node)?))
}

fn new_http_checksummer(node: &ConfigNode) -> Result<Arc<dyn MetadataChecksummer>> {
    Ok(Arc::new(HttpMetadataChecksummer::from_xml(node)?))
}

fn new_sha256_checksummer(node: &ConfigNode) -> Result<Arc<dyn MetadataChecksummer>> {
    Ok(Arc::new(Sha256MetadataChecksummer::from_xml(node)?))
}

fn new_metadata_tagger(node: &ConfigNode) -> Result<Arc<dyn DocumentProcessor>> {
    Ok(Arc::new(MetadataTagger::from_xml(node)?))
}

fn new_html_stripper(node: &ConfigNode) -> Result<Arc<dyn DocumentProcessor>> {
    Ok(Arc::new(HtmlStripper::from_xml(node)?))
}
