// Application state module
// Immutable, process-wide state shared by every connection

use super::types::Config;
use crate::dataset::ReadOptions;

/// Application state
///
/// Built once at startup and shared behind an `Arc`. Nothing in here is
/// mutated after construction, so request handling needs no locks.
pub struct AppState {
    pub config: Config,
    /// Parsed once so each request does not rebuild the marker set
    pub read_options: ReadOptions,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, String> {
        Ok(Self {
            config: config.clone(),
            read_options: config.read_options()?,
        })
    }

    pub const fn debug(&self) -> bool {
        self.config.server.debug
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
