//! Count-up animation for the stat cards.

use crate::aggregator::SummaryStats;
use salesdash_common::{format_currency, format_number, StatTarget};
use salesdash_config::AnimationConfig;
use std::time::Duration;

/// Interpolates a stat card from `start` to `end` in fixed-size frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterAnimation {
    /// First value.
    pub start: f64,
    /// Final value, always the last frame.
    pub end: f64,
    /// Total animation length.
    pub duration_ms: u64,
    /// Time between frames.
    pub frame_ms: u64,
    /// Whether frames are shown with a `$` prefix.
    pub currency: bool,
}

impl CounterAnimation {
    /// Counts from zero to `end` with the configured timing.
    pub fn new(end: f64, currency: bool, config: &AnimationConfig) -> Self {
        Self {
            start: 0.0,
            end,
            duration_ms: config.duration_ms,
            frame_ms: config.frame_ms.max(1),
            currency,
        }
    }

    /// Animation for one stat target.
    pub fn for_target(stats: &SummaryStats, target: StatTarget, config: &AnimationConfig) -> Self {
        Self::new(stats.value_of(target), target.is_currency(), config)
    }

    /// Per-frame step: the range divided by the number of frames.
    pub fn increment(&self) -> f64 {
        let frames = self.duration_ms as f64 / self.frame_ms.max(1) as f64;
        (self.end - self.start) / frames
    }

    /// Delay between frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    /// Frame values, clamped so the last one is exactly `end`.
    pub fn frames(&self) -> CounterFrames {
        CounterFrames {
            current: self.start,
            end: self.end,
            increment: self.increment(),
            done: false,
        }
    }

    /// Formats a frame value like the stat card does.
    pub fn format(&self, value: f64) -> String {
        if self.currency {
            format_currency(value)
        } else {
            format_number(value)
        }
    }

    /// Every frame, formatted.
    pub fn frame_texts(&self) -> Vec<String> {
        self.frames().map(|v| self.format(v)).collect()
    }
}

/// Iterator over the values of a [`CounterAnimation`].
#[derive(Debug, Clone)]
pub struct CounterFrames {
    current: f64,
    end: f64,
    increment: f64,
    done: bool,
}

impl Iterator for CounterFrames {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.done {
            return None;
        }

        let stalled = !self.increment.is_finite() || self.increment == 0.0;
        self.current += self.increment;
        let reached = if self.increment > 0.0 {
            self.current >= self.end
        } else {
            self.current <= self.end
        };

        if stalled || reached || !self.current.is_finite() {
            self.done = true;
            return Some(self.end);
        }
        Some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AnimationConfig {
        AnimationConfig::default()
    }

    #[test]
    fn test_last_frame_is_exact() {
        let anim = CounterAnimation::new(2_297_200.86, true, &config());
        let frames: Vec<f64> = anim.frames().collect();
        assert_eq!(frames.len(), 94);
        assert_eq!(*frames.last().unwrap(), 2_297_200.86);
        assert!(frames.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(anim.frame_texts().last().unwrap(), "$2.30M");
    }

    #[test]
    fn test_increment_matches_frame_rate() {
        let anim = CounterAnimation::new(1_500.0, false, &config());
        assert!((anim.increment() - 16.0).abs() < 1e-9);
        assert_eq!(anim.frame_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_zero_and_nan_targets_finish_at_once() {
        let zero = CounterAnimation::new(0.0, false, &config());
        assert_eq!(zero.frames().collect::<Vec<_>>(), vec![0.0]);

        let nan = CounterAnimation::new(f64::NAN, true, &config());
        assert_eq!(nan.frame_texts(), vec!["$-".to_string()]);
    }

    #[test]
    fn test_counts_down_too() {
        let anim = CounterAnimation {
            start: 100.0,
            end: 0.0,
            duration_ms: 160,
            frame_ms: 16,
            currency: false,
        };
        let frames: Vec<f64> = anim.frames().collect();
        assert_eq!(frames.len(), 10);
        assert_eq!(*frames.last().unwrap(), 0.0);
    }

    #[test]
    fn test_for_target_uses_stat_value() {
        let stats = SummaryStats::from_values([10.0, 20.0, 30.0]);
        let anim = CounterAnimation::for_target(&stats, StatTarget::TotalOrders, &config());
        assert_eq!(anim.end, 3.0);
        assert!(!anim.currency);
        assert_eq!(anim.frame_texts().last().unwrap(), "3");
    }
}
