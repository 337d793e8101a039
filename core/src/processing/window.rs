use crate::math::StatsHelper;
use std::collections::VecDeque;

/// Bounded FIFO of accepted angles; the oldest entry is evicted on overflow.
#[derive(Debug, Clone)]
pub struct AngleWindow {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl AngleWindow {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, angle: f32) {
        self.samples.push_back(angle);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn median(&self) -> Option<f32> {
        StatsHelper::median(&self.to_vec())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.samples.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_evicts_oldest_sample() {
        let mut window = AngleWindow::with_capacity(5);
        for angle in [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0] {
            window.push(angle);
            assert!(window.len() <= 5);
        }
        assert_eq!(window.to_vec(), vec![3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn median_tracks_contents() {
        let mut window = AngleWindow::with_capacity(5);
        assert_eq!(window.median(), None);
        for angle in [10.0, 12.0, 11.0, 13.0, 12.0] {
            window.push(angle);
        }
        assert_eq!(window.median(), Some(12.0));
        window.clear();
        assert!(window.is_empty());
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut window = AngleWindow::with_capacity(0);
        window.push(4.0);
        window.push(8.0);
        assert_eq!(window.to_vec(), vec![8.0]);
    }
}
