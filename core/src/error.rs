use std::io;

use thiserror::Error;
use url::{ParseError, Url};

/// Error types for trawl-rs configuration and strategy operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration document could not be parsed into addressable nodes
    #[error("malformed configuration document: {0}")]
    MalformedDocument(String),

    /// A declared strategy type could not be constructed for a slot
    #[error("cannot instantiate strategy '{class}' for slot '{slot}': {reason}")]
    StrategyInstantiation {
        /// Name of the slot being resolved
        slot: String,
        /// Declared class name
        class: String,
        /// Why construction failed
        reason: String,
    },

    /// Serializing a configuration failed
    #[error("could not write configuration '{id}': {source}")]
    Write {
        /// Identifier of the configuration instance
        id: String,
        /// Underlying output failure
        #[source]
        source: io::Error,
    },

    /// An HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    /// A fetch-facing strategy failed
    #[error("fetch failed for {url}: {message}")]
    Fetch {
        /// URL being fetched
        url: String,
        /// Failure description
        message: String,
    },

    /// Error when parsing a URL
    #[error("URL parse error: {0}")]
    UrlParse(#[from] ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a new strategy instantiation error
    pub fn strategy(
        slot: impl Into<String>,
        class: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::StrategyInstantiation {
            slot: slot.into(),
            class: class.into(),
            reason: reason.into(),
        }
    }

    /// Create a new fetch error
    pub fn fetch(url: &Url, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for trawl-rs operations
pub type Result<T> = std::result::Result<T, Error>;
