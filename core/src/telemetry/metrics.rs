use crate::prelude::Channel;
use serde::Serialize;
use std::sync::Mutex;

/// Counters for one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChannelCounts {
    pub accepted: usize,
    pub missed: usize,
    pub dropouts: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub frames: usize,
    pub left: ChannelCounts,
    pub right: ChannelCounts,
}

impl MetricsSnapshot {
    pub fn channel(&self, channel: Channel) -> ChannelCounts {
        match channel {
            Channel::Left => self.left,
            Channel::Right => self.right,
        }
    }
}

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_frame(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames += 1;
        }
    }

    pub fn record_accepted(&self, channel: Channel) {
        self.update(channel, |counts| counts.accepted += 1);
    }

    pub fn record_miss(&self, channel: Channel) {
        self.update(channel, |counts| counts.missed += 1);
    }

    pub fn record_dropout(&self, channel: Channel) {
        self.update(channel, |counts| counts.dropouts += 1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().map(|metrics| *metrics).unwrap_or_default()
    }

    fn update(&self, channel: Channel, apply: impl FnOnce(&mut ChannelCounts)) {
        if let Ok(mut metrics) = self.inner.lock() {
            match channel {
                Channel::Left => apply(&mut metrics.left),
                Channel::Right => apply(&mut metrics.right),
            }
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_kept_per_channel() {
        let metrics = MetricsRecorder::new();
        metrics.record_frame();
        metrics.record_accepted(Channel::Left);
        metrics.record_miss(Channel::Right);
        metrics.record_dropout(Channel::Right);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frames, 1);
        assert_eq!(snapshot.channel(Channel::Left).accepted, 1);
        assert_eq!(snapshot.channel(Channel::Left).missed, 0);
        assert_eq!(snapshot.right.missed, 1);
        assert_eq!(snapshot.right.dropouts, 1);
    }
}
