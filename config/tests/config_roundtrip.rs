use std::sync::Arc;

use trawl_rs_config::{
    CrawlerConfig, CrawlerConfigBuilder, LoadReporter, ProcessorStage, StrategyRegistry,
};
use trawl_rs_core::error::Error;
use trawl_rs_core::strategy::{DocumentProcessor, XmlConfigurable};
use trawl_rs_strategies::{
    GenericMetadataFetcher, GenericUrlNormalizer, HtmlStripper, MetadataTagger,
    RandomDelayResolver, Sha256MetadataChecksummer,
};

fn registry() -> StrategyRegistry {
    StrategyRegistry::with_builtins()
}

fn load(document: &str) -> CrawlerConfig {
    let mut builder = CrawlerConfigBuilder::new();
    builder.load(document, &registry()).unwrap();
    builder.build()
}

fn save(config: &CrawlerConfig) -> String {
    let mut out = Vec::new();
    config.save(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_defaults() {
    let config = CrawlerConfigBuilder::new().build();

    assert_eq!(config.id(), "");
    assert_eq!(config.user_agent(), None);
    assert_eq!(config.max_depth(), -1);
    assert!(!config.keep_downloads());
    assert!(config.start_urls().is_empty());
    assert!(config.urls_files().is_empty());
    assert!(config.url_normalizer().is_none());
    assert!(config.metadata_fetcher().is_none());
    assert_eq!(config.delay_resolver().class_name(), "GenericDelayResolver");
    assert_eq!(
        config.http_client_factory().class_name(),
        "GenericHttpClientFactory"
    );
    assert_eq!(
        config.robots_txt_provider().class_name(),
        "StandardRobotsTxtProvider"
    );
    assert_eq!(
        config.metadata_checksummer().class_name(),
        "HttpMetadataChecksummer"
    );
    assert!(!config.ignore_robots_txt());
    assert!(!config.ignore_sitemap());
    assert!(!config.ignore_robots_meta());
    assert!(config.pre_import_processors().is_empty());
    assert!(config.post_import_processors().is_empty());
}

#[test]
fn test_defensive_copy_of_lists() {
    let mut builder = CrawlerConfigBuilder::new();
    let mut urls = vec!["http://a.example".to_string()];
    builder.set_start_urls(&urls);

    // mutating the caller's list must not reach the builder
    urls.push("http://rogue.example".to_string());
    assert_eq!(builder.start_urls().len(), 1);

    // mutating a returned list must not reach the builder either
    let mut returned = builder.start_urls();
    returned.push("http://rogue.example".to_string());
    assert_eq!(builder.start_urls().len(), 1);

    let config = builder.build();
    let mut returned = config.start_urls();
    returned.clear();
    assert_eq!(config.start_urls(), vec!["http://a.example".to_string()]);

    let mut processors = config.pre_import_processors();
    processors.push(Arc::new(HtmlStripper::default()) as Arc<dyn DocumentProcessor>);
    assert!(config.pre_import_processors().is_empty());
}

#[test]
fn test_empty_start_urls_preserve_prior_value() {
    let mut builder = CrawlerConfigBuilder::new();
    builder.set_start_urls(&["http://seed.example".to_string()]);
    builder
        .load("<crawler><startURLs></startURLs></crawler>", &registry())
        .unwrap();
    assert_eq!(
        builder.start_urls(),
        vec!["http://seed.example".to_string()]
    );
}

#[test]
fn test_non_empty_start_urls_overwrite_in_order() {
    let mut builder = CrawlerConfigBuilder::new();
    builder.set_start_urls(&["http://old.example".to_string()]);
    builder
        .load(
            "<crawler><startURLs>
                <url>http://a.example</url>
                <url>http://b.example</url>
            </startURLs></crawler>",
            &registry(),
        )
        .unwrap();
    assert_eq!(
        builder.start_urls(),
        vec!["http://a.example".to_string(), "http://b.example".to_string()]
    );
}

#[test]
fn test_urls_files_merge_independently_of_urls() {
    let mut builder = CrawlerConfigBuilder::new();
    builder.set_urls_files(&["seeds.txt".to_string()]);
    builder
        .load(
            "<crawler><startURLs><url>http://a.example</url></startURLs></crawler>",
            &registry(),
        )
        .unwrap();
    assert_eq!(builder.start_urls(), vec!["http://a.example".to_string()]);
    assert_eq!(builder.urls_files(), vec!["seeds.txt".to_string()]);
}

#[test]
fn test_omitted_normalizer_slot_is_retained() {
    // unset stays unset
    let config = load("<crawler/>");
    assert!(config.url_normalizer().is_none());

    // a previously set value also survives an omitting document
    let mut builder = CrawlerConfigBuilder::new();
    builder.set_url_normalizer(Some(Arc::new(GenericUrlNormalizer::default())));
    builder.load("<crawler><maxDepth>4</maxDepth></crawler>", &registry()).unwrap();
    let config = builder.build();
    assert_eq!(
        config.url_normalizer().map(|n| n.class_name()),
        Some("GenericUrlNormalizer")
    );
}

#[test]
fn test_node_without_class_keeps_current_strategy() {
    let mut builder = CrawlerConfigBuilder::new();
    builder.set_delay_resolver(Arc::new(RandomDelayResolver::default()));
    builder
        .load("<crawler><delay/></crawler>", &registry())
        .unwrap();
    assert_eq!(
        builder.delay_resolver().class_name(),
        "RandomDelayResolver"
    );
}

#[test]
fn test_ignore_flag_is_independent_of_implementation() {
    let config = load(
        r#"<crawler><robotsTxt class="StandardRobotsTxtProvider" ignore="true"/></crawler>"#,
    );
    assert_eq!(
        config.robots_txt_provider().class_name(),
        "StandardRobotsTxtProvider"
    );
    assert!(config.ignore_robots_txt());
}

#[test]
fn test_absent_ignore_attribute_preserves_prior_intent() {
    let mut builder = CrawlerConfigBuilder::new();
    builder.set_ignore_sitemap(true);
    builder
        .load(
            r#"<crawler><sitemap class="StandardSitemapResolverFactory"/></crawler>"#,
            &registry(),
        )
        .unwrap();
    assert!(builder.ignore_sitemap());
}

#[test]
fn test_scenario_document() {
    struct Recording {
        loaded: Vec<(ProcessorStage, String)>,
    }
    impl LoadReporter for Recording {
        fn processor_loaded(&mut self, stage: ProcessorStage, class: &str) {
            self.loaded.push((stage, class.to_string()));
        }
    }

    let document = r#"<crawler>
        <maxDepth>3</maxDepth>
        <startURLs>
            <url>http://a.example</url>
            <url>http://b.example</url>
        </startURLs>
        <robotsTxt class="StandardRobotsTxtProvider" ignore="true"/>
        <preImportProcessors>
            <processor class="MetadataTagger">
                <tag field="collection" value="docs"/>
            </processor>
            <processor class="HtmlStripper"/>
        </preImportProcessors>
    </crawler>"#;

    let mut reporter = Recording { loaded: Vec::new() };
    let mut builder = CrawlerConfigBuilder::new();
    builder
        .load_with(document, &registry(), &mut reporter)
        .unwrap();
    let config = builder.build();

    assert_eq!(config.max_depth(), 3);
    assert_eq!(
        config.start_urls(),
        vec!["http://a.example".to_string(), "http://b.example".to_string()]
    );
    assert!(config.ignore_robots_txt());

    let pre = config.pre_import_processors();
    assert_eq!(pre.len(), 2);
    assert_eq!(pre[0].class_name(), "MetadataTagger");
    assert_eq!(pre[1].class_name(), "HtmlStripper");

    assert_eq!(
        reporter.loaded,
        vec![
            (ProcessorStage::PreImport, "MetadataTagger".to_string()),
            (ProcessorStage::PreImport, "HtmlStripper".to_string()),
        ]
    );
}

#[test]
fn test_scenario_omitted_max_depth_keeps_default() {
    let config = load("<crawler><keepDownloads>true</keepDownloads></crawler>");
    assert_eq!(config.max_depth(), -1);
    assert!(config.keep_downloads());
}

#[test]
fn test_round_trip_reproduces_scalars_and_slot_types() {
    let mut builder = CrawlerConfigBuilder::new();
    builder.set_id("news-crawl");
    builder.set_user_agent("trawl-rs/0.1 <experimental> & \"quoted\"");
    builder.set_max_depth(7);
    builder.set_keep_downloads(true);
    builder.set_start_urls(&[
        "http://a.example/".to_string(),
        "http://b.example/".to_string(),
    ]);
    builder.set_urls_files(&["seeds.txt".to_string()]);
    builder.set_url_normalizer(Some(Arc::new(GenericUrlNormalizer::default())));
    builder.set_delay_resolver(Arc::new(RandomDelayResolver::default()));
    builder.set_metadata_fetcher(Some(Arc::new(GenericMetadataFetcher)));
    builder.set_metadata_checksummer(Arc::new(Sha256MetadataChecksummer::default()));
    builder.set_ignore_robots_txt(true);
    builder.set_ignore_sitemap(true);
    builder.set_pre_import_processors(&[
        Arc::new(MetadataTagger {
            tags: vec![("collection".to_string(), "docs".to_string())],
        }) as Arc<dyn DocumentProcessor>,
        Arc::new(HtmlStripper::default()) as Arc<dyn DocumentProcessor>,
    ]);
    builder.set_post_import_processors(&[
        Arc::new(HtmlStripper::default()) as Arc<dyn DocumentProcessor>
    ]);
    let config = builder.build();

    let reloaded = load(&save(&config));

    assert_eq!(reloaded.id(), "news-crawl");
    assert_eq!(
        reloaded.user_agent(),
        Some("trawl-rs/0.1 <experimental> & \"quoted\"")
    );
    assert_eq!(reloaded.max_depth(), 7);
    assert!(reloaded.keep_downloads());
    assert_eq!(reloaded.start_urls(), config.start_urls());
    assert_eq!(reloaded.urls_files(), config.urls_files());
    assert_eq!(
        reloaded.url_normalizer().map(|n| n.class_name()),
        Some("GenericUrlNormalizer")
    );
    assert_eq!(reloaded.delay_resolver().class_name(), "RandomDelayResolver");
    assert_eq!(
        reloaded.metadata_fetcher().map(|f| f.class_name()),
        Some("GenericMetadataFetcher")
    );
    assert_eq!(
        reloaded.metadata_checksummer().class_name(),
        "Sha256MetadataChecksummer"
    );
    assert!(reloaded.ignore_robots_txt());
    assert!(reloaded.ignore_sitemap());
    assert!(!reloaded.ignore_robots_meta());

    let pre: Vec<&str> = reloaded
        .pre_import_processors()
        .iter()
        .map(|p| p.class_name())
        .collect();
    assert_eq!(pre, vec!["MetadataTagger", "HtmlStripper"]);
    let post: Vec<&str> = reloaded
        .post_import_processors()
        .iter()
        .map(|p| p.class_name())
        .collect();
    assert_eq!(post, vec!["HtmlStripper"]);

    // saving again produces the same document
    assert_eq!(save(&config), save(&reloaded));
}

#[test]
fn test_save_uses_fixed_element_order() {
    let config = load(
        r#"<crawler>
            <startURLs><url>http://a.example</url></startURLs>
            <userAgent>bot</userAgent>
        </crawler>"#,
    );
    let text = save(&config);

    let order = [
        "<userAgent>",
        "<maxDepth>",
        "<keepDownloads>",
        "<startURLs>",
        "<delay ",
        "<httpClientFactory ",
        "<robotsTxt ",
        "<sitemap ",
        "<metadataChecksummer ",
        "<documentFetcher ",
        "<robotsMeta ",
        "<urlExtractor ",
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {}", needle)))
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn test_unknown_class_fails_with_slot_and_class() {
    let mut builder = CrawlerConfigBuilder::new();
    let error = builder
        .load(
            r#"<crawler><robotsTxt class="NoSuchProvider"/></crawler>"#,
            &registry(),
        )
        .unwrap_err();
    match error {
        Error::StrategyInstantiation { slot, class, .. } => {
            assert_eq!(slot, "robotsTxt");
            assert_eq!(class, "NoSuchProvider");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_malformed_document_changes_nothing() {
    let mut builder = CrawlerConfigBuilder::new();
    builder.set_max_depth(5);
    let error = builder.load("<crawler><maxDepth>", &registry()).unwrap_err();
    assert!(matches!(error, Error::MalformedDocument(_)));
    assert_eq!(builder.max_depth(), 5);
}

#[test]
fn test_failed_slot_keeps_earlier_resolutions() {
    let mut builder = CrawlerConfigBuilder::new();
    let error = builder
        .load(
            r#"<crawler>
                <maxDepth>9</maxDepth>
                <delay class="RandomDelayResolver"/>
                <documentFetcher class="NoSuchFetcher"/>
            </crawler>"#,
            &registry(),
        )
        .unwrap_err();
    assert!(matches!(error, Error::StrategyInstantiation { .. }));

    // steps before the failing slot keep their new values
    assert_eq!(builder.max_depth(), 9);
    assert_eq!(builder.delay_resolver().class_name(), "RandomDelayResolver");
}

#[test]
fn test_strategy_nested_config_reaches_constructor() {
    let config = load(
        r#"<crawler>
            <delay class="GenericDelayResolver">
                <defaultDelayMillis>1234</defaultDelayMillis>
            </delay>
        </crawler>"#,
    );
    let text = save(&config);
    assert!(text.contains("<defaultDelayMillis>1234</defaultDelayMillis>"));
}
