use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Parsed robots.txt rules applying to one user agent.
///
/// Patterns are path prefixes. An empty rule set allows everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotsTxt {
    /// Path prefixes explicitly allowed
    pub allow_patterns: Vec<String>,

    /// Path prefixes explicitly disallowed
    pub disallow_patterns: Vec<String>,

    /// Crawl delay requested by the site
    pub crawl_delay: Option<Duration>,

    /// Sitemap URLs advertised by the site
    pub sitemap_urls: Vec<String>,
}

impl RobotsTxt {
    /// Whether the given path may be crawled.
    ///
    /// The longest matching pattern wins; allow wins ties.
    pub fn is_allowed(&self, path: &str) -> bool {
        let allow = longest_match(&self.allow_patterns, path);
        let disallow = longest_match(&self.disallow_patterns, path);
        match (allow, disallow) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(allow), Some(disallow)) => allow >= disallow,
        }
    }
}

fn longest_match(patterns: &[String], path: &str) -> Option<usize> {
    patterns
        .iter()
        .filter(|pattern| !pattern.is_empty() && path.starts_with(pattern.as_str()))
        .map(|pattern| pattern.len())
        .max()
}

/// Directives read from a robots meta tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsMeta {
    /// The page must not be indexed
    pub noindex: bool,

    /// Links on the page must not be followed
    pub nofollow: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_rules_allows_everything() {
        assert!(RobotsTxt::default().is_allowed("/anything"));
    }

    #[test]
    fn test_longest_match_wins() {
        let robots = RobotsTxt {
            allow_patterns: vec!["/docs/public".to_string()],
            disallow_patterns: vec!["/docs".to_string()],
            ..RobotsTxt::default()
        };
        assert!(!robots.is_allowed("/docs/private"));
        assert!(robots.is_allowed("/docs/public/index.html"));
        assert!(robots.is_allowed("/other"));
    }

    #[test]
    fn test_allow_wins_ties() {
        let robots = RobotsTxt {
            allow_patterns: vec!["/page".to_string()],
            disallow_patterns: vec!["/page".to_string()],
            ..RobotsTxt::default()
        };
        assert!(robots.is_allowed("/page"));
    }
}
