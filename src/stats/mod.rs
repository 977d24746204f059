// Latency aggregation
//
// Min/mean/max and tier distribution over any collection of latency
// values. Feeds the health panel.

use crate::error::{EngineError, Result};
use crate::latency::{classify_latency, LatencyConfig, LatencyTier, SampleSet};
use std::fmt;

/// Number of values per latency tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TierCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl TierCounts {
    pub fn get(&self, tier: LatencyTier) -> usize {
        match tier {
            LatencyTier::Low => self.low,
            LatencyTier::Medium => self.medium,
            LatencyTier::High => self.high,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }

    /// Share of values in `tier`, in `[0, 1]`; zero when empty
    pub fn fraction(&self, tier: LatencyTier) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.get(tier) as f64 / total as f64
    }

    fn record(&mut self, tier: LatencyTier) {
        match tier {
            LatencyTier::Low => self.low += 1,
            LatencyTier::Medium => self.medium += 1,
            LatencyTier::High => self.high += 1,
        }
    }
}

/// Overall network health, from the mean latency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Excellent,
    Good,
    Poor,
}

impl HealthStatus {
    pub fn from_mean(mean_ms: f64) -> Self {
        if mean_ms < 50.0 {
            Self::Excellent
        } else if mean_ms < 100.0 {
            Self::Good
        } else {
            Self::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Poor => "Poor",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Summary of a latency collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySummary {
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    /// Number of values summarized (active connections)
    pub count: usize,
    pub tiers: TierCounts,
}

impl LatencySummary {
    pub fn health(&self) -> HealthStatus {
        HealthStatus::from_mean(self.mean_ms)
    }
}

/// Summarize `latencies`
///
/// Fails on an empty slice and on any NaN, infinite or negative value
/// rather than producing NaN statistics.
pub fn aggregate(latencies: &[f64], config: &LatencyConfig) -> Result<LatencySummary> {
    if latencies.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    let mut min_ms = f64::INFINITY;
    let mut max_ms = f64::NEG_INFINITY;
    let mut mean_ms = 0.0;
    let mut tiers = TierCounts::default();

    for (i, &latency) in latencies.iter().enumerate() {
        if !latency.is_finite() || latency < 0.0 {
            return Err(EngineError::InvalidLatency(latency));
        }
        min_ms = min_ms.min(latency);
        max_ms = max_ms.max(latency);
        // running mean stays within [min, max], no overflowing sum
        mean_ms += (latency - mean_ms) / (i + 1) as f64;
        tiers.record(classify_latency(latency, config));
    }

    Ok(LatencySummary {
        min_ms,
        max_ms,
        mean_ms,
        count: latencies.len(),
        tiers,
    })
}

/// Summarize every sample of a snapshot
pub fn aggregate_samples(samples: &SampleSet, config: &LatencyConfig) -> Result<LatencySummary> {
    aggregate(&samples.latencies(), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_aggregate_basic() {
        let summary = aggregate(&[10.0, 20.0, 30.0], &LatencyConfig::default()).unwrap();
        assert_eq!(summary.min_ms, 10.0);
        assert_eq!(summary.max_ms, 30.0);
        assert_eq!(summary.mean_ms, 20.0);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.tiers.low, 3);
        assert_eq!(summary.health(), HealthStatus::Excellent);
    }

    #[test]
    fn test_aggregate_huge_values_keep_a_finite_mean() {
        let summary = aggregate(&[f64::MAX, f64::MAX], &LatencyConfig::default()).unwrap();
        assert!(summary.mean_ms.is_finite());
        assert_eq!(summary.mean_ms, f64::MAX);
        assert_eq!(summary.tiers.high, 2);
    }

    #[test]
    fn test_aggregate_empty_is_an_error() {
        assert_eq!(
            aggregate(&[], &LatencyConfig::default()),
            Err(EngineError::EmptyInput)
        );
        assert_eq!(
            aggregate_samples(&SampleSet::empty(), &LatencyConfig::default()),
            Err(EngineError::EmptyInput)
        );
    }

    #[test]
    fn test_aggregate_rejects_invalid_values() {
        let config = LatencyConfig::default();
        assert!(matches!(
            aggregate(&[10.0, f64::NAN], &config),
            Err(EngineError::InvalidLatency(v)) if v.is_nan()
        ));
        assert_eq!(
            aggregate(&[-1.0], &config),
            Err(EngineError::InvalidLatency(-1.0))
        );
    }

    #[test]
    fn test_tier_distribution_and_fractions() {
        let summary = aggregate(&[10.0, 50.0, 75.0, 100.0], &LatencyConfig::default()).unwrap();
        assert_eq!(summary.tiers, TierCounts { low: 1, medium: 2, high: 1 });
        assert_eq!(summary.tiers.fraction(LatencyTier::Medium), 0.5);
        assert_eq!(TierCounts::default().fraction(LatencyTier::Low), 0.0);
    }

    #[test]
    fn test_health_status_thresholds() {
        assert_eq!(HealthStatus::from_mean(49.9), HealthStatus::Excellent);
        assert_eq!(HealthStatus::from_mean(50.0), HealthStatus::Good);
        assert_eq!(HealthStatus::from_mean(100.0), HealthStatus::Poor);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_summary_is_consistent(values in prop::collection::vec(0.0f64..500.0, 1..64)) {
            let summary = aggregate(&values, &LatencyConfig::default()).unwrap();
            prop_assert!(summary.min_ms <= summary.mean_ms + 1e-9);
            prop_assert!(summary.mean_ms <= summary.max_ms + 1e-9);
            prop_assert_eq!(summary.tiers.total(), values.len());
            let fractions: f64 = LatencyTier::ALL.iter().map(|&t| summary.tiers.fraction(t)).sum();
            prop_assert!((fractions - 1.0).abs() < 1e-9);
        }
    }
}
