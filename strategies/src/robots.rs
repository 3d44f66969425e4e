use std::time::Duration;

use log::debug;
use regex::Regex;
use reqwest::Client;
use trawl_rs_core::async_trait;
use trawl_rs_core::error::{Error, Result};
use trawl_rs_core::robots::{RobotsMeta, RobotsTxt};
use trawl_rs_core::strategy::{RobotsMetaProvider, RobotsTxtProvider, XmlConfigurable};
use trawl_rs_core::xml::ConfigNode;
use url::Url;

/// Fetches `/robots.txt` from the site root and parses the groups applying
/// to the crawl's user agent. Sites without a readable robots.txt are
/// treated as allowing everything.
#[derive(Debug, Clone, Default)]
pub struct StandardRobotsTxtProvider;

impl StandardRobotsTxtProvider {
    pub fn from_xml(_node: &ConfigNode) -> Result<Self> {
        Ok(Self)
    }

    /// Parse robots.txt content for the given user agent.
    ///
    /// Rules from every group whose user-agent line matches (or is `*`) are
    /// collected; sitemap lines apply regardless of group.
    pub fn parse(content: &str, user_agent: &str) -> RobotsTxt {
        let agent = user_agent.to_ascii_lowercase();
        let mut rules = RobotsTxt::default();
        let mut group_applies = false;
        let mut in_group_header = false;

        for line in content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let (field, value) = match line.split_once(':') {
                Some(parts) => parts,
                None => continue,
            };
            let field = field.trim().to_ascii_lowercase();
            let value = value.trim();

            match field.as_str() {
                "user-agent" => {
                    let pattern = value.to_ascii_lowercase();
                    let applies = pattern == "*" || agent.contains(&pattern);
                    // consecutive user-agent lines introduce one shared group
                    if in_group_header {
                        group_applies = group_applies || applies;
                    } else {
                        group_applies = applies;
                    }
                    in_group_header = true;
                }
                "allow" => {
                    in_group_header = false;
                    if group_applies && !value.is_empty() {
                        rules.allow_patterns.push(value.to_string());
                    }
                }
                "disallow" => {
                    in_group_header = false;
                    if group_applies && !value.is_empty() {
                        rules.disallow_patterns.push(value.to_string());
                    }
                }
                "crawl-delay" => {
                    in_group_header = false;
                    if group_applies {
                        if let Ok(seconds) = value.parse::<f64>() {
                            if seconds.is_finite() && seconds >= 0.0 {
                                rules.crawl_delay = Some(Duration::from_secs_f64(seconds));
                            }
                        }
                    }
                }
                "sitemap" => {
                    rules.sitemap_urls.push(value.to_string());
                }
                _ => {
                    in_group_header = false;
                }
            }
        }
        rules
    }
}

impl XmlConfigurable for StandardRobotsTxtProvider {
    fn class_name(&self) -> &'static str {
        "StandardRobotsTxtProvider"
    }
}

#[async_trait]
impl RobotsTxtProvider for StandardRobotsTxtProvider {
    async fn robots_txt(
        &self,
        client: &Client,
        base: &Url,
        user_agent: &str,
    ) -> Result<RobotsTxt> {
        let mut robots_url = base.clone();
        robots_url.set_path("/robots.txt");
        robots_url.set_query(None);
        robots_url.set_fragment(None);

        let response = match client.get(robots_url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("robots.txt unreachable at {}: {}", robots_url, e);
                return Ok(RobotsTxt::default());
            }
        };
        if response.status().as_u16() != 200 {
            debug!(
                "no robots.txt at {} (status {})",
                robots_url,
                response.status()
            );
            return Ok(RobotsTxt::default());
        }
        let body = response
            .text()
            .await
            .map_err(|e| Error::fetch(&robots_url, e.to_string()))?;
        Ok(Self::parse(&body, user_agent))
    }
}

/// Scans document content for `<meta name="robots">` directives.
#[derive(Debug, Clone)]
pub struct StandardRobotsMetaProvider {
    tag_pattern: Regex,
    content_pattern: Regex,
}

impl Default for StandardRobotsMetaProvider {
    fn default() -> Self {
        Self {
            tag_pattern: Regex::new(r#"(?is)<meta\s+[^>]*name\s*=\s*["']robots["'][^>]*>"#)
                .expect("static pattern compiles"),
            content_pattern: Regex::new(r#"(?is)content\s*=\s*["']([^"']*)["']"#)
                .expect("static pattern compiles"),
        }
    }
}

impl StandardRobotsMetaProvider {
    pub fn from_xml(_node: &ConfigNode) -> Result<Self> {
        Ok(Self::default())
    }
}

impl XmlConfigurable for StandardRobotsMetaProvider {
    fn class_name(&self) -> &'static str {
        "StandardRobotsMetaProvider"
    }
}

impl RobotsMetaProvider for StandardRobotsMetaProvider {
    fn robots_meta(&self, content: &str) -> RobotsMeta {
        let mut meta = RobotsMeta::default();
        for tag in self.tag_pattern.find_iter(content) {
            if let Some(captures) = self.content_pattern.captures(tag.as_str()) {
                for directive in captures[1].split(',') {
                    match directive.trim().to_ascii_lowercase().as_str() {
                        "noindex" => meta.noindex = true,
                        "nofollow" => meta.nofollow = true,
                        "none" => {
                            meta.noindex = true;
                            meta.nofollow = true;
                        }
                        _ => {}
                    }
                }
            }
        }
        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collects_matching_groups() {
        let content = "\
            User-agent: *\n\
            Disallow: /private\n\
            Crawl-delay: 2.5\n\
            \n\
            User-agent: trawl\n\
            Allow: /private/reports\n\
            \n\
            User-agent: other\n\
            Disallow: /\n\
            \n\
            Sitemap: http://example.com/sitemap.xml\n";
        let rules = StandardRobotsTxtProvider::parse(content, "trawl-rs/0.1");

        assert_eq!(rules.disallow_patterns, vec!["/private"]);
        assert_eq!(rules.allow_patterns, vec!["/private/reports"]);
        assert_eq!(rules.crawl_delay, Some(Duration::from_secs_f64(2.5)));
        assert_eq!(rules.sitemap_urls, vec!["http://example.com/sitemap.xml"]);
        assert!(!rules.is_allowed("/private/x"));
        assert!(rules.is_allowed("/private/reports/2024"));
    }

    #[test]
    fn test_parse_empty_disallow_allows_all() {
        let rules = StandardRobotsTxtProvider::parse("User-agent: *\nDisallow:\n", "trawl");
        assert!(rules.disallow_patterns.is_empty());
        assert!(rules.is_allowed("/anything"));
    }

    #[test]
    fn test_parse_shared_group_header() {
        let content = "User-agent: other\nUser-agent: trawl\nDisallow: /x\n";
        let rules = StandardRobotsTxtProvider::parse(content, "trawl");
        assert_eq!(rules.disallow_patterns, vec!["/x"]);
    }

    #[test]
    fn test_meta_directives() {
        let provider = StandardRobotsMetaProvider::default();

        let meta = provider.robots_meta(r#"<meta name="robots" content="noindex, nofollow">"#);
        assert!(meta.noindex);
        assert!(meta.nofollow);

        let meta = provider.robots_meta(r#"<meta content="NOFOLLOW" name='robots'/>"#);
        assert!(!meta.noindex);
        assert!(meta.nofollow);

        let meta = provider.robots_meta(r#"<meta name="robots" content="none">"#);
        assert!(meta.noindex);
        assert!(meta.nofollow);

        let meta = provider.robots_meta("<html><body>no directives</body></html>");
        assert_eq!(meta, RobotsMeta::default());
    }
}
