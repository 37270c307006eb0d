use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The three knobs every adapter (CLI, HTTP, GUI) hands to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeParams {
    pub max_items: usize,
    pub start_offset: usize,
    pub delay_seconds: f64,
}

impl Default for ScrapeParams {
    fn default() -> Self {
        Self {
            max_items: 10,
            start_offset: 0,
            delay_seconds: 2.0,
        }
    }
}

impl ScrapeParams {
    pub fn new(max_items: usize, start_offset: usize, delay_seconds: f64) -> Self {
        Self {
            max_items,
            start_offset,
            delay_seconds,
        }
    }

    /// Negative and NaN delays mean none; delays too large for a `Duration`
    /// saturate.
    pub fn item_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_seconds.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// The item delay scaled by `factor`, saturating instead of overflowing.
    pub fn page_delay(&self, factor: f64) -> Duration {
        let item_delay = self.item_delay();
        let factor = factor.max(0.0);
        if item_delay.is_zero() || factor == 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(item_delay.as_secs_f64() * factor).unwrap_or(Duration::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The listing ran out of entries.
    Exhausted,
    MaxItems,
    TimeBudget,
    Cancelled,
    /// The first listing page could not be fetched at all.
    ListingUnavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub total_processed: usize,
    pub successful_extractions: usize,
    pub elapsed_seconds: f64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub stop_reason: Option<StopReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RunStats {
    pub fn start() -> Self {
        Self {
            total_processed: 0,
            successful_extractions: 0,
            elapsed_seconds: 0.0,
            started_at: Utc::now(),
            finished_at: None,
            stop_reason: None,
            note: None,
        }
    }

    pub fn record(&mut self, success: bool) {
        self.total_processed += 1;
        if success {
            self.successful_extractions += 1;
        }
    }

    pub fn finish(&mut self, reason: StopReason, elapsed: Duration) {
        self.stop_reason = Some(reason);
        self.elapsed_seconds = elapsed.as_secs_f64();
        self.finished_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_successes_below_total() {
        let mut stats = RunStats::start();
        stats.record(true);
        stats.record(false);
        stats.record(true);

        assert_eq!(stats.total_processed, 3);
        assert_eq!(stats.successful_extractions, 2);
    }

    #[test]
    fn negative_delay_is_clamped() {
        let params = ScrapeParams::new(1, 0, -3.0);
        assert_eq!(params.item_delay(), Duration::ZERO);
        assert_eq!(ScrapeParams::new(1, 0, f64::NAN).item_delay(), Duration::ZERO);
    }

    #[test]
    fn huge_delays_saturate() {
        for delay in [1e300, f64::INFINITY, 1e19] {
            let params = ScrapeParams::new(1, 0, delay);
            assert_eq!(params.page_delay(2.0), Duration::MAX);
        }
        assert_eq!(ScrapeParams::new(1, 0, f64::INFINITY).item_delay(), Duration::MAX);
        assert_eq!(ScrapeParams::new(1, 0, 1.5).page_delay(2.0), Duration::from_secs(3));
        assert_eq!(ScrapeParams::new(1, 0, 1.5).page_delay(0.0), Duration::ZERO);
    }
}
