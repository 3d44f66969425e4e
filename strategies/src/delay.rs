use std::io;
use std::time::Duration;

use rand::Rng;
use trawl_rs_core::error::Result;
use trawl_rs_core::strategy::{DelayResolver, XmlConfigurable};
use trawl_rs_core::xml::{ConfigNode, XmlWriter};
use url::Url;

/// Fixed politeness delay; a crawl delay advertised by robots.txt wins when
/// one is present.
#[derive(Debug, Clone)]
pub struct GenericDelayResolver {
    /// Delay in milliseconds used when robots.txt requests none
    pub default_delay_ms: u64,
}

impl Default for GenericDelayResolver {
    fn default() -> Self {
        Self {
            default_delay_ms: 3000,
        }
    }
}

impl GenericDelayResolver {
    pub fn from_xml(node: &ConfigNode) -> Result<Self> {
        Ok(Self {
            default_delay_ms: node
                .child_u64("defaultDelayMillis")?
                .unwrap_or(Self::default().default_delay_ms),
        })
    }
}

impl XmlConfigurable for GenericDelayResolver {
    fn class_name(&self) -> &'static str {
        "GenericDelayResolver"
    }

    fn save_xml(&self, writer: &mut XmlWriter<'_>) -> io::Result<()> {
        writer.u64_element("defaultDelayMillis", self.default_delay_ms)
    }
}

impl DelayResolver for GenericDelayResolver {
    fn resolve_delay(&self, _url: &Url, robots_delay: Option<Duration>) -> Duration {
        robots_delay.unwrap_or_else(|| Duration::from_millis(self.default_delay_ms))
    }
}

/// Uniformly random delay within a range, floored by the robots.txt crawl
/// delay so the site's own request is never undercut.
#[derive(Debug, Clone)]
pub struct RandomDelayResolver {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RandomDelayResolver {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 5000,
        }
    }
}

impl RandomDelayResolver {
    pub fn from_xml(node: &ConfigNode) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            min_delay_ms: node
                .child_u64("minDelayMillis")?
                .unwrap_or(defaults.min_delay_ms),
            max_delay_ms: node
                .child_u64("maxDelayMillis")?
                .unwrap_or(defaults.max_delay_ms),
        })
    }
}

impl XmlConfigurable for RandomDelayResolver {
    fn class_name(&self) -> &'static str {
        "RandomDelayResolver"
    }

    fn save_xml(&self, writer: &mut XmlWriter<'_>) -> io::Result<()> {
        writer.u64_element("minDelayMillis", self.min_delay_ms)?;
        writer.u64_element("maxDelayMillis", self.max_delay_ms)
    }
}

impl DelayResolver for RandomDelayResolver {
    fn resolve_delay(&self, _url: &Url, robots_delay: Option<Duration>) -> Duration {
        let sampled = if self.max_delay_ms > self.min_delay_ms {
            rand::thread_rng().gen_range(self.min_delay_ms..=self.max_delay_ms)
        } else {
            self.min_delay_ms
        };
        let sampled = Duration::from_millis(sampled);
        match robots_delay {
            Some(delay) => sampled.max(delay),
            None => sampled,
        }
    }
}
