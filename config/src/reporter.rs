use std::fmt;

use log::{debug, info};

/// Stage of the import pipeline a document processor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorStage {
    PreImport,
    PostImport,
}

impl fmt::Display for ProcessorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessorStage::PreImport => write!(f, "pre-import"),
            ProcessorStage::PostImport => write!(f, "post-import"),
        }
    }
}

/// Diagnostic sink for one load operation.
///
/// Passed into the loader rather than reached through a global logger, so a
/// caller can capture or redirect the diagnostics of a single load.
pub trait LoadReporter {
    /// Called once per document processor constructed from the document
    fn processor_loaded(&mut self, stage: ProcessorStage, class: &str);

    /// Called when a strategy slot resolves to a declared implementation
    fn strategy_resolved(&mut self, slot: &str, class: &str) {
        let _ = (slot, class);
    }
}

/// Reporter forwarding diagnostics to the `log` crate.
#[derive(Debug, Default)]
pub struct LogReporter;

impl LoadReporter for LogReporter {
    fn processor_loaded(&mut self, stage: ProcessorStage, class: &str) {
        info!("{} document processor loaded: {}", stage, class);
    }

    fn strategy_resolved(&mut self, slot: &str, class: &str) {
        debug!("slot '{}' resolved to {}", slot, class);
    }
}
