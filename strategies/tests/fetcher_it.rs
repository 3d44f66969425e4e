use reqwest::Client;
use trawl_rs_core::strategy::{
    DocumentFetcher, MetadataFetcher, RobotsTxtProvider, SitemapResolver, SitemapResolverFactory,
};
use trawl_rs_strategies::{
    GenericDocumentFetcher, GenericMetadataFetcher, StandardRobotsTxtProvider,
    StandardSitemapResolverFactory,
};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_document_fetcher_collects_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html>hello</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = GenericDocumentFetcher::default();
    let client = Client::new();
    let url = Url::parse(&format!("{}/page", server.uri())).unwrap();

    let document = fetcher.fetch(&client, &url).await.unwrap();
    assert_eq!(document.content, "<html>hello</html>");
    assert_eq!(document.content_type.as_deref(), Some("text/html"));
    assert_eq!(
        document.metadata.first("content-type"),
        Some("text/html; charset=utf-8")
    );
    assert_eq!(document.url, url);
}

#[tokio::test]
async fn test_document_fetcher_rejects_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = GenericDocumentFetcher::default();
    let client = Client::new();
    let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();

    assert!(fetcher.fetch(&client, &url).await.is_err());
}

#[tokio::test]
async fn test_metadata_fetcher_uses_head() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/doc"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("last-modified", "Tue, 01 Jan 2030 00:00:00 GMT"),
        )
        .mount(&server)
        .await;

    let fetcher = GenericMetadataFetcher::default();
    let client = Client::new();
    let url = Url::parse(&format!("{}/doc", server.uri())).unwrap();

    let metadata = fetcher.fetch_metadata(&client, &url).await.unwrap();
    assert_eq!(
        metadata.first("last-modified"),
        Some("Tue, 01 Jan 2030 00:00:00 GMT")
    );
}

#[tokio::test]
async fn test_robots_provider_fetches_and_parses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"),
        )
        .mount(&server)
        .await;

    let provider = StandardRobotsTxtProvider::default();
    let client = Client::new();
    let base = Url::parse(&format!("{}/deep/page", server.uri())).unwrap();

    let rules = provider.robots_txt(&client, &base, "trawl").await.unwrap();
    assert!(!rules.is_allowed("/private/x"));
    assert!(rules.is_allowed("/public"));
}

#[tokio::test]
async fn test_robots_provider_permissive_without_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = StandardRobotsTxtProvider::default();
    let client = Client::new();
    let base = Url::parse(&server.uri()).unwrap();

    let rules = provider.robots_txt(&client, &base, "trawl").await.unwrap();
    assert!(rules.is_allowed("/anything"));
}

#[tokio::test]
async fn test_sitemap_resolver_collects_locations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<urlset>
                <url><loc>http://example.com/a</loc></url>
                <url><loc>http://example.com/b</loc></url>
            </urlset>"#,
        ))
        .mount(&server)
        .await;

    let factory = StandardSitemapResolverFactory::default();
    let resolver = factory.create_resolver();
    let client = Client::new();
    let base = Url::parse(&server.uri()).unwrap();

    let urls: Vec<String> = resolver
        .resolve(&client, &base)
        .await
        .unwrap()
        .into_iter()
        .map(|url| url.to_string())
        .collect();
    assert_eq!(urls, vec!["http://example.com/a", "http://example.com/b"]);
}
