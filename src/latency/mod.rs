// Latency telemetry types
//
// Tier classification, pair keys, samples and the immutable sample-set
// snapshot shared between the sampler, the graph builder and the
// aggregator.

pub mod graph;
pub mod history;
pub mod sampler;

pub use graph::{build_graph, GraphBuilder, GraphConfig, LatencyEdge};
pub use history::{
    synthesize_history, HistoricalPoint, HistoryConfig, HistorySeries, HistorySynthesizer,
};
pub use sampler::LatencySampler;

use crate::error::{EngineError, Result};
use rand::Rng;
use std::collections::HashMap;
use std::fmt;

/// Latency tier of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatencyTier {
    /// Below the low threshold (< 50ms by default)
    Low,
    /// Between the thresholds (50-100ms by default)
    Medium,
    /// At or above the high threshold (>= 100ms by default)
    High,
}

impl LatencyTier {
    pub const ALL: [LatencyTier; 3] = [LatencyTier::Low, LatencyTier::Medium, LatencyTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for LatencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier thresholds in milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyConfig {
    /// Values strictly below this are `Low`
    pub low_threshold_ms: f64,

    /// Values at or above this are `High`
    pub high_threshold_ms: f64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            low_threshold_ms: 50.0,
            high_threshold_ms: 100.0,
        }
    }
}

/// Classify a latency value into a tier
///
/// - Low: `< low_threshold_ms`
/// - Medium: `>= low_threshold_ms` and `< high_threshold_ms`
/// - High: `>= high_threshold_ms`
pub fn classify_latency(latency_ms: f64, config: &LatencyConfig) -> LatencyTier {
    if latency_ms < config.low_threshold_ms {
        LatencyTier::Low
    } else if latency_ms < config.high_threshold_ms {
        LatencyTier::Medium
    } else {
        LatencyTier::High
    }
}

/// Half-open uniform range `[min_ms, max_ms)` for synthetic latency draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyRange {
    min_ms: f64,
    max_ms: f64,
}

impl LatencyRange {
    /// Range used by the live sampler: 20-170ms
    pub const LIVE: LatencyRange = LatencyRange {
        min_ms: 20.0,
        max_ms: 170.0,
    };

    /// Range used to fill pairs without a live sample: 50-250ms
    pub const FALLBACK: LatencyRange = LatencyRange {
        min_ms: 50.0,
        max_ms: 250.0,
    };

    pub fn new(min_ms: f64, max_ms: f64) -> Result<Self> {
        if !min_ms.is_finite() || !max_ms.is_finite() || min_ms < 0.0 || min_ms >= max_ms {
            return Err(EngineError::InvalidRange {
                min: min_ms,
                max: max_ms,
            });
        }
        Ok(Self { min_ms, max_ms })
    }

    pub fn min_ms(&self) -> f64 {
        self.min_ms
    }

    pub fn max_ms(&self) -> f64 {
        self.max_ms
    }

    /// One independent uniform draw
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.min_ms..self.max_ms)
    }

    pub fn contains(&self, latency_ms: f64) -> bool {
        (self.min_ms..self.max_ms).contains(&latency_ms)
    }
}

/// Orientation-independent key of a node pair
///
/// `PairKey::new("a", "b") == PairKey::new("b", "a")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Result<Self> {
        if a == b {
            return Err(EngineError::SelfPair(a.to_string()));
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        Ok(Self {
            first: first.to_string(),
            second: second.to_string(),
        })
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn involves(&self, id: &str) -> bool {
        self.first == id || self.second == id
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// One synthetic point-in-time latency observation
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySample {
    pub source: String,
    pub target: String,
    pub latency_ms: f64,
    /// Capture time in milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl LatencySample {
    pub fn key(&self) -> Result<PairKey> {
        PairKey::new(&self.source, &self.target)
    }
}

/// Immutable snapshot of one sampler generation
///
/// Built completely before publication and then shared by `Arc`, so a
/// reader only ever sees one whole generation.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    generation: u64,
    captured_at_ms: u64,
    samples: Vec<LatencySample>,
    index: HashMap<PairKey, usize>,
}

impl SampleSet {
    /// Empty generation-zero set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from samples
    ///
    /// Rejects self-pairs, latencies that are not finite and non-negative,
    /// and a pair sampled twice in either orientation.
    pub fn new(generation: u64, captured_at_ms: u64, samples: Vec<LatencySample>) -> Result<Self> {
        let mut index = HashMap::with_capacity(samples.len());
        for (i, sample) in samples.iter().enumerate() {
            let key = sample.key()?;
            if !sample.latency_ms.is_finite() || sample.latency_ms < 0.0 {
                return Err(EngineError::InvalidLatency(sample.latency_ms));
            }
            if index.insert(key.clone(), i).is_some() {
                return Err(EngineError::DuplicatePair(key.to_string()));
            }
        }
        Ok(Self {
            generation,
            captured_at_ms,
            samples,
            index,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn captured_at_ms(&self) -> u64 {
        self.captured_at_ms
    }

    pub fn samples(&self) -> &[LatencySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Latency of the edge between `a` and `b`, in either orientation
    pub fn latency_between(&self, a: &str, b: &str) -> Option<f64> {
        let key = PairKey::new(a, b).ok()?;
        self.index.get(&key).map(|&i| self.samples[i].latency_ms)
    }

    pub fn latencies(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.latency_ms).collect()
    }

    /// Mean latency of the samples touching `id`, if any
    pub fn mean_latency_for(&self, id: &str) -> Option<f64> {
        let (sum, count) = self
            .samples
            .iter()
            .filter(|s| s.source == id || s.target == id)
            .fold((0.0, 0usize), |(sum, count), s| (sum + s.latency_ms, count + 1));
        (count > 0).then(|| sum / count as f64)
    }
}

/// Every unordered pair of `ids`, in enumeration order (i < j)
pub fn unordered_pairs<S: AsRef<str>>(ids: &[S]) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(ids.len() * ids.len().saturating_sub(1) / 2);
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            pairs.push((a.as_ref().to_string(), b.as_ref().to_string()));
        }
    }
    pairs
}
