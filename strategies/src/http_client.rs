use std::io;
use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;
use trawl_rs_core::error::{Error, Result};
use trawl_rs_core::strategy::{HttpClientFactory, XmlConfigurable};
use trawl_rs_core::xml::{ConfigNode, XmlWriter};

/// Builds `reqwest` clients from plain connection settings.
#[derive(Debug, Clone)]
pub struct GenericHttpClientFactory {
    /// Overall request timeout in seconds
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Maximum redirects to follow; 0 disables redirects
    pub max_redirects: usize,

    /// Accept invalid TLS certificates
    pub accept_invalid_certs: bool,
}

impl Default for GenericHttpClientFactory {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 10,
            accept_invalid_certs: false,
        }
    }
}

impl GenericHttpClientFactory {
    /// Construct from a configuration node, falling back to defaults for
    /// anything the node does not declare
    pub fn from_xml(node: &ConfigNode) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            timeout_secs: node
                .child_u64("timeoutSeconds")?
                .unwrap_or(defaults.timeout_secs),
            connect_timeout_secs: node
                .child_u64("connectTimeoutSeconds")?
                .unwrap_or(defaults.connect_timeout_secs),
            max_redirects: node
                .child_u64("maxRedirects")?
                .map(|value| value as usize)
                .unwrap_or(defaults.max_redirects),
            accept_invalid_certs: node
                .child_bool("acceptInvalidCerts")?
                .unwrap_or(defaults.accept_invalid_certs),
        })
    }
}

impl XmlConfigurable for GenericHttpClientFactory {
    fn class_name(&self) -> &'static str {
        "GenericHttpClientFactory"
    }

    fn save_xml(&self, writer: &mut XmlWriter<'_>) -> io::Result<()> {
        writer.u64_element("timeoutSeconds", self.timeout_secs)?;
        writer.u64_element("connectTimeoutSeconds", self.connect_timeout_secs)?;
        writer.u64_element("maxRedirects", self.max_redirects as u64)?;
        writer.bool_element("acceptInvalidCerts", self.accept_invalid_certs)
    }
}

impl HttpClientFactory for GenericHttpClientFactory {
    fn create_client(&self, user_agent: Option<&str>) -> Result<Client> {
        let redirects = if self.max_redirects == 0 {
            Policy::none()
        } else {
            Policy::limited(self.max_redirects)
        };

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .redirect(redirects)
            .danger_accept_invalid_certs(self.accept_invalid_certs);
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent);
        }

        builder.build().map_err(|e| Error::HttpClient(e.to_string()))
    }
}
