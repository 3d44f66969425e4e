use std::io;

use trawl_rs_core::error::Result;
use trawl_rs_core::strategy::{UrlNormalizer, XmlConfigurable};
use trawl_rs_core::xml::{ConfigNode, XmlWriter};
use url::Url;

/// Canonicalizes URLs with a small set of toggleable rules.
#[derive(Debug, Clone)]
pub struct GenericUrlNormalizer {
    /// Drop the fragment component
    pub strip_fragment: bool,

    /// Drop a leading `www.` from the host
    pub strip_www: bool,

    /// Drop a trailing slash from non-root paths
    pub strip_trailing_slash: bool,
}

impl Default for GenericUrlNormalizer {
    fn default() -> Self {
        Self {
            strip_fragment: true,
            strip_www: false,
            strip_trailing_slash: false,
        }
    }
}

impl GenericUrlNormalizer {
    pub fn from_xml(node: &ConfigNode) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            strip_fragment: node
                .child_bool("stripFragment")?
                .unwrap_or(defaults.strip_fragment),
            strip_www: node.child_bool("stripWww")?.unwrap_or(defaults.strip_www),
            strip_trailing_slash: node
                .child_bool("stripTrailingSlash")?
                .unwrap_or(defaults.strip_trailing_slash),
        })
    }
}

impl XmlConfigurable for GenericUrlNormalizer {
    fn class_name(&self) -> &'static str {
        "GenericUrlNormalizer"
    }

    fn save_xml(&self, writer: &mut XmlWriter<'_>) -> io::Result<()> {
        writer.bool_element("stripFragment", self.strip_fragment)?;
        writer.bool_element("stripWww", self.strip_www)?;
        writer.bool_element("stripTrailingSlash", self.strip_trailing_slash)
    }
}

impl UrlNormalizer for GenericUrlNormalizer {
    fn normalize(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if self.strip_fragment {
            url.set_fragment(None);
        }
        if self.strip_www {
            if let Some(host) = url.host_str() {
                if let Some(stripped) = host.strip_prefix("www.") {
                    if !stripped.is_empty() {
                        let stripped = stripped.to_string();
                        url.set_host(Some(&stripped)).ok();
                    }
                }
            }
        }
        if self.strip_trailing_slash && url.path().len() > 1 && url.path().ends_with('/') {
            let trimmed = url.path().trim_end_matches('/').to_string();
            url.set_path(&trimmed);
        }
        url
    }
}
