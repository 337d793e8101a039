use std::time::Duration;

/// Lets at most one send through per interval, measured on a caller-supplied clock.
#[derive(Debug, Clone)]
pub struct SendThrottle {
    interval_ms: u64,
    last_sent_ms: Option<u64>,
}

impl SendThrottle {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(50);

    pub fn new(interval: Duration) -> Self {
        Self {
            interval_ms: interval.as_millis() as u64,
            last_sent_ms: None,
        }
    }

    /// Returns true and arms the throttle when a send is allowed at `now_ms`.
    pub fn ready(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_sent_ms {
            if now_ms.saturating_sub(last) < self.interval_ms {
                return false;
            }
        }
        self.last_sent_ms = Some(now_ms);
        true
    }
}

impl Default for SendThrottle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
