use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Wall-clock time spent in one seeding stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Stage timings of one event, in execution order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Records the time elapsed since `start` and returns it.
    pub fn push_since(&mut self, label: impl Into<String>, start: Instant) -> f64 {
        let elapsed_ms = elapsed_ms(start);
        self.push(label, elapsed_ms);
        elapsed_ms
    }

    pub fn stage_ms(&self, label: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.elapsed_ms)
    }
}

#[inline]
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_looked_up_by_label() {
        let mut timings = TimingBreakdown::default();
        timings.push("grid", 1.5);
        let search = timings.push_since("search", Instant::now());
        assert!(search >= 0.0);
        assert_eq!(timings.stage_ms("grid"), Some(1.5));
        assert!(timings.stage_ms("missing").is_none());
        assert_eq!(timings.stages.len(), 2);
    }
}
