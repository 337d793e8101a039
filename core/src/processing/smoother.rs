use crate::prelude::{Channel, ChannelFilter, Observation, SmootherConfig};
use crate::processing::window::AngleWindow;

/// Median-of-window angle smoother with a slew-rate clamp and gap-hold.
///
/// Accepted angles are clamped to within `max_step_deg` of the previous
/// output, pushed into a bounded window, and the window median is emitted.
/// Misses hold the previous output until more than `gap_hold` arrive in a
/// row, after which the channel drops out and must reacquire.
#[derive(Debug, Clone)]
pub struct AngleSmoother {
    config: SmootherConfig,
    window: AngleWindow,
    last_output: Option<f32>,
    last_admitted: Option<f32>,
    misses: u32,
}

impl AngleSmoother {
    pub fn new(config: SmootherConfig) -> Self {
        Self {
            window: AngleWindow::with_capacity(config.window),
            config,
            last_output: None,
            last_admitted: None,
            misses: 0,
        }
    }

    fn admit(&self, raw: f32) -> f32 {
        match self.last_output {
            Some(prior) => {
                let step = self.config.max_step_deg;
                prior + (raw - prior).clamp(-step, step)
            }
            None => raw,
        }
    }

    pub fn output(&self) -> Option<f32> {
        self.last_output
    }

    /// The value most recently pushed into the window, after clamping.
    pub fn last_admitted(&self) -> Option<f32> {
        self.last_admitted
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn buffered(&self) -> Vec<f32> {
        self.window.to_vec()
    }
}

impl Default for AngleSmoother {
    fn default() -> Self {
        Self::new(SmootherConfig::default())
    }
}

impl ChannelFilter for AngleSmoother {
    fn update(&mut self, observation: Observation) -> Option<f32> {
        match observation.accepted_angle(self.config.min_confidence) {
            Some(raw) => {
                let admitted = self.admit(raw);
                self.window.push(admitted);
                self.last_admitted = Some(admitted);
                self.misses = 0;
                self.last_output = self.window.median();
                self.last_output
            }
            None => {
                self.misses += 1;
                if self.misses > self.config.gap_hold {
                    self.reset();
                }
                self.last_output
            }
        }
    }

    fn reset(&mut self) {
        self.window.clear();
        self.last_output = None;
        self.last_admitted = None;
        self.misses = 0;
    }

    fn is_tracking(&self) -> bool {
        !self.window.is_empty()
    }

    fn holds_through_gaps(&self) -> bool {
        true
    }
}

/// Raw angles through, invalid observations out; no temporal state.
#[derive(Debug, Clone, Default)]
pub struct PassThroughFilter {
    min_confidence: f32,
    last: Option<f32>,
}

impl PassThroughFilter {
    pub fn new(config: &SmootherConfig) -> Self {
        Self {
            min_confidence: config.min_confidence,
            last: None,
        }
    }
}

impl ChannelFilter for PassThroughFilter {
    fn update(&mut self, observation: Observation) -> Option<f32> {
        self.last = observation.accepted_angle(self.min_confidence);
        self.last
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn is_tracking(&self) -> bool {
        self.last.is_some()
    }
}

/// One filter per channel, addressed by [`Channel`].
#[derive(Debug, Clone)]
pub struct SmootherBank<F> {
    channels: [F; 2],
}

impl<F: ChannelFilter> SmootherBank<F> {
    pub fn new(left: F, right: F) -> Self {
        Self {
            channels: [left, right],
        }
    }

    pub fn update(
        &mut self,
        channel: Channel,
        raw_angle: Option<f32>,
        confidence: f32,
    ) -> Option<f32> {
        self.channels[channel.index()].update(Observation::new(raw_angle, confidence))
    }

    pub fn filter(&self, channel: Channel) -> &F {
        &self.channels[channel.index()]
    }
}

impl SmootherBank<AngleSmoother> {
    pub fn smoothing(config: &SmootherConfig) -> Self {
        Self::new(
            AngleSmoother::new(config.clone()),
            AngleSmoother::new(config.clone()),
        )
    }
}
