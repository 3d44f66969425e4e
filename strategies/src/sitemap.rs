use std::collections::HashSet;
use std::io;

use futures::future::join_all;
use log::{debug, warn};
use reqwest::Client;
use trawl_rs_core::async_trait;
use trawl_rs_core::error::Result;
use trawl_rs_core::strategy::{SitemapResolver, SitemapResolverFactory, XmlConfigurable};
use trawl_rs_core::xml::{ConfigNode, XmlWriter};
use url::Url;

/// Creates resolvers that probe a configurable set of sitemap locations.
#[derive(Debug, Clone)]
pub struct StandardSitemapResolverFactory {
    /// Site-relative paths probed for sitemaps
    pub sitemap_paths: Vec<String>,
}

impl Default for StandardSitemapResolverFactory {
    fn default() -> Self {
        Self {
            sitemap_paths: vec!["/sitemap.xml".to_string()],
        }
    }
}

impl StandardSitemapResolverFactory {
    pub fn from_xml(node: &ConfigNode) -> Result<Self> {
        let paths: Vec<String> = node
            .children("path")
            .filter_map(ConfigNode::text)
            .map(str::to_string)
            .collect();
        Ok(Self {
            sitemap_paths: if paths.is_empty() {
                Self::default().sitemap_paths
            } else {
                paths
            },
        })
    }
}

impl XmlConfigurable for StandardSitemapResolverFactory {
    fn class_name(&self) -> &'static str {
        "StandardSitemapResolverFactory"
    }

    fn save_xml(&self, writer: &mut XmlWriter<'_>) -> io::Result<()> {
        for path in &self.sitemap_paths {
            writer.text_element("path", path)?;
        }
        Ok(())
    }
}

impl SitemapResolverFactory for StandardSitemapResolverFactory {
    fn create_resolver(&self) -> Box<dyn SitemapResolver> {
        Box::new(StandardSitemapResolver {
            sitemap_paths: self.sitemap_paths.clone(),
        })
    }
}

/// Fetches the configured sitemap locations concurrently and collects every
/// `<loc>` entry. Unreachable or invalid sitemaps contribute nothing.
pub struct StandardSitemapResolver {
    sitemap_paths: Vec<String>,
}

#[async_trait]
impl SitemapResolver for StandardSitemapResolver {
    async fn resolve(&self, client: &Client, base: &Url) -> Result<Vec<Url>> {
        let fetches = self
            .sitemap_paths
            .iter()
            .filter_map(|path| base.join(path).ok())
            .map(|url| fetch_locations(client, url));
        let results = join_all(fetches).await;

        let mut seen = HashSet::new();
        let mut urls = Vec::new();
        for batch in results {
            for url in batch {
                if seen.insert(url.to_string()) {
                    urls.push(url);
                }
            }
        }
        Ok(urls)
    }
}

async fn fetch_locations(client: &Client, url: Url) -> Vec<Url> {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!("sitemap unreachable at {}: {}", url, e);
            return Vec::new();
        }
    };
    if response.status().as_u16() != 200 {
        debug!("no sitemap at {} (status {})", url, response.status());
        return Vec::new();
    }
    match response.text().await {
        Ok(body) => parse_locations(&body),
        Err(e) => {
            debug!("sitemap body unreadable at {}: {}", url, e);
            Vec::new()
        }
    }
}

pub(crate) fn parse_locations(content: &str) -> Vec<Url> {
    let document = match roxmltree::Document::parse(content) {
        Ok(document) => document,
        Err(e) => {
            warn!("invalid sitemap XML: {}", e);
            return Vec::new();
        }
    };
    document
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "loc")
        .filter_map(|node| node.text())
        .filter_map(|text| Url::parse(text.trim()).ok())
        .collect()
}
