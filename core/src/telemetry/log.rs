use crate::prelude::Channel;
use log::{debug, info};

/// Thin logging front for tracking stages.
pub struct LogManager {
    scope: &'static str,
}

impl LogManager {
    pub fn new(scope: &'static str) -> Self {
        Self { scope }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.scope, message);
    }

    pub fn detail(&self, channel: Channel, message: &str) {
        debug!("[{}] {} {}", self.scope, channel, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("tracker")
    }
}
