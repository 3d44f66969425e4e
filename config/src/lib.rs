//! Strategy-slot configuration model for the trawl-rs crawler.
//!
//! A [`CrawlerConfig`] holds the scalar settings of one crawl run plus a
//! fixed set of named strategy slots, each resolved to one implementation of
//! a capability trait from `trawl_rs_core::strategy`. The
//! [`CrawlerConfigBuilder`] pre-populates every defaulted slot, overlays an
//! XML declaration resolved through a [`StrategyRegistry`], and produces the
//! read-only configuration the rest of the crawler consumes.

pub mod builder;
pub mod crawler_config;
pub mod registry;
pub mod reporter;

pub use builder::CrawlerConfigBuilder;
pub use crawler_config::{BaseSettings, CrawlerConfig};
pub use registry::StrategyRegistry;
pub use reporter::{LoadReporter, LogReporter, ProcessorStage};
