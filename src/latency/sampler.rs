// Latency sampler
//
// Draws one fresh latency for every monitored pair per tick. Draws are
// independent: a pair's value is not smoothed against the previous tick.

use super::{LatencyRange, LatencySample, SampleSet};
use crate::error::{EngineError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates complete sample sets from an injectable random source
pub struct LatencySampler<R: Rng = StdRng> {
    rng: R,
    range: LatencyRange,
    generation: u64,
    last_timestamp_ms: u64,
}

impl LatencySampler<StdRng> {
    /// Deterministic sampler for tests and reproducible sessions
    pub fn seeded(seed: u64, range: LatencyRange) -> Self {
        Self::new(StdRng::seed_from_u64(seed), range)
    }

    pub fn from_entropy(range: LatencyRange) -> Self {
        Self::new(StdRng::from_entropy(), range)
    }
}

impl<R: Rng> LatencySampler<R> {
    pub fn new(rng: R, range: LatencyRange) -> Self {
        Self {
            rng,
            range,
            generation: 0,
            last_timestamp_ms: 0,
        }
    }

    pub fn range(&self) -> LatencyRange {
        self.range
    }

    /// Generation number of the last set produced (0 before the first)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Produce a fresh, complete sample set for `pairs`
    ///
    /// Every pair gets its own uniform draw. All samples share one capture
    /// timestamp, which never goes backwards across calls: a `now_ms`
    /// earlier than the previous capture is raised to it.
    pub fn sample_latencies(&mut self, pairs: &[(String, String)], now_ms: u64) -> Result<SampleSet> {
        if let Some((a, _)) = pairs.iter().find(|(a, b)| a == b) {
            return Err(EngineError::SelfPair(a.clone()));
        }

        let timestamp_ms = now_ms.max(self.last_timestamp_ms);
        let samples = pairs
            .iter()
            .map(|(source, target)| LatencySample {
                source: source.clone(),
                target: target.clone(),
                latency_ms: self.range.draw(&mut self.rng),
                timestamp_ms,
            })
            .collect();

        let set = SampleSet::new(self.generation + 1, timestamp_ms, samples)?;
        self.generation += 1;
        self.last_timestamp_ms = timestamp_ms;
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::unordered_pairs;
    use proptest::prelude::*;

    const MONITORED: [&str; 6] = ["binance", "okx", "deribit", "bybit", "coinbase", "kraken"];

    #[test]
    fn test_one_sample_per_pair() {
        let pairs = unordered_pairs(&MONITORED);
        let mut sampler = LatencySampler::seeded(7, LatencyRange::LIVE);
        let set = sampler.sample_latencies(&pairs, 10_000).unwrap();

        assert_eq!(set.len(), 15);
        assert_eq!(set.generation(), 1);
        for (a, b) in &pairs {
            assert!(set.latency_between(a, b).is_some(), "missing {}-{}", a, b);
        }
    }

    #[test]
    fn test_repeated_pair_is_rejected() {
        let pairs = vec![
            ("binance".to_string(), "okx".to_string()),
            ("okx".to_string(), "binance".to_string()),
        ];
        let mut sampler = LatencySampler::seeded(7, LatencyRange::LIVE);
        assert_eq!(
            sampler.sample_latencies(&pairs, 10_000).unwrap_err(),
            EngineError::DuplicatePair("binance-okx".to_string())
        );
        assert_eq!(sampler.generation(), 0);
    }

    #[test]
    fn test_seeded_samplers_are_reproducible() {
        let pairs = unordered_pairs(&MONITORED);
        let a = LatencySampler::seeded(42, LatencyRange::LIVE)
            .sample_latencies(&pairs, 1)
            .unwrap();
        let b = LatencySampler::seeded(42, LatencyRange::LIVE)
            .sample_latencies(&pairs, 1)
            .unwrap();
        assert_eq!(a.latencies(), b.latencies());
    }

    #[test]
    fn test_consecutive_ticks_draw_fresh_values() {
        let pairs = unordered_pairs(&MONITORED);
        let mut sampler = LatencySampler::seeded(3, LatencyRange::LIVE);
        let first = sampler.sample_latencies(&pairs, 1_000).unwrap();
        let second = sampler.sample_latencies(&pairs, 6_000).unwrap();

        assert_eq!(second.generation(), 2);
        assert_ne!(first.latencies(), second.latencies());
    }

    #[test]
    fn test_timestamps_never_go_backwards() {
        let pairs = unordered_pairs(&["a", "b"]);
        let mut sampler = LatencySampler::seeded(1, LatencyRange::LIVE);
        let first = sampler.sample_latencies(&pairs, 5_000).unwrap();
        let second = sampler.sample_latencies(&pairs, 4_000).unwrap();

        assert_eq!(first.captured_at_ms(), 5_000);
        assert_eq!(second.captured_at_ms(), 5_000);
        assert!(second.samples().iter().all(|s| s.timestamp_ms == 5_000));
    }

    #[test]
    fn test_self_pair_rejected_without_advancing_generation() {
        let mut sampler = LatencySampler::seeded(1, LatencyRange::LIVE);
        let pairs = vec![("okx".to_string(), "okx".to_string())];
        assert_eq!(
            sampler.sample_latencies(&pairs, 0).unwrap_err(),
            EngineError::SelfPair("okx".to_string())
        );
        assert_eq!(sampler.generation(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_samples_stay_within_range(seed in any::<u64>()) {
            let pairs = unordered_pairs(&MONITORED);
            let mut sampler = LatencySampler::seeded(seed, LatencyRange::LIVE);
            let set = sampler.sample_latencies(&pairs, 0).unwrap();
            prop_assert!(set.samples().iter().all(|s| LatencyRange::LIVE.contains(s.latency_ms)));
        }
    }
}
