pub struct StatsHelper;

impl StatsHelper {
    /// Median of `samples`; the mean of the two middle values for even lengths.
    pub fn median(samples: &[f32]) -> Option<f32> {
        if samples.is_empty() {
            return None;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            Some((sorted[mid - 1] + sorted[mid]) / 2.0)
        } else {
            Some(sorted[mid])
        }
    }

    pub fn min(samples: &[f32]) -> f32 {
        samples.iter().copied().fold(f32::INFINITY, f32::min)
    }
}
