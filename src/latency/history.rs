// Historical latency synthesis
//
// Builds a backward-looking series for one node pair: a slow sinusoidal
// trend plus uniform noise, floored at 20ms. The series lives in a
// capacity-bounded ring that evicts its oldest point on overflow.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Default number of retained points
pub const DEFAULT_HISTORY_POINTS: usize = 100;

/// Default spacing between points (one minute)
pub const DEFAULT_HISTORY_INTERVAL_MS: u64 = 60_000;

/// Default number of points shown by the trend chart
pub const DEFAULT_CHART_WINDOW: usize = 24;

/// Centre of the synthetic trend
const TREND_BASE_MS: f64 = 60.0;

/// Peak deviation of the trend from its centre
const TREND_AMPLITUDE_MS: f64 = 20.0;

/// Phase advance per point index
const TREND_FREQUENCY: f64 = 0.1;

/// Noise is uniform in [-NOISE_SPREAD_MS, +NOISE_SPREAD_MS]; min/max bounds
/// sit the same distance from the average
const NOISE_SPREAD_MS: f64 = 15.0;

/// Lowest latency a synthesized point may report
pub const LATENCY_FLOOR_MS: f64 = 20.0;

/// One point of the trend series
///
/// `min_latency_ms <= latency_ms <= max_latency_ms` does not always hold:
/// the floor can lift a point above `max_latency_ms`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalPoint {
    pub timestamp_ms: u64,
    /// Pair label, e.g. `binance-okx`
    pub pair: String,
    pub latency_ms: f64,
    pub avg_latency_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
}

/// History settings
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryConfig {
    /// Source node of the tracked pair
    pub source: String,
    /// Target node of the tracked pair
    pub target: String,
    /// Number of points synthesized at startup
    pub points: usize,
    /// Retention capacity of the series
    pub retention: usize,
    pub interval_ms: u64,
}

impl HistoryConfig {
    pub fn pair_label(&self) -> String {
        format!("{}-{}", self.source, self.target)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            source: "binance".to_string(),
            target: "okx".to_string(),
            points: DEFAULT_HISTORY_POINTS,
            retention: DEFAULT_HISTORY_POINTS,
            interval_ms: DEFAULT_HISTORY_INTERVAL_MS,
        }
    }
}

/// Append-only series bounded to a fixed retention (FIFO eviction)
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySeries {
    capacity: usize,
    points: VecDeque<HistoricalPoint>,
}

impl HistorySeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a point, evicting the oldest when full
    ///
    /// A zero-capacity series retains nothing.
    pub fn push(&mut self, point: HistoricalPoint) {
        if self.capacity == 0 {
            return;
        }
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Points oldest-first
    pub fn iter(&self) -> impl Iterator<Item = &HistoricalPoint> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoricalPoint> {
        self.points.iter().cloned().collect()
    }

    /// The newest `window` points, oldest-first, optionally limited to
    /// pairs whose label mentions `node_id`
    pub fn chart_window(&self, window: usize, node_id: Option<&str>) -> Vec<&HistoricalPoint> {
        let matching: Vec<&HistoricalPoint> = self
            .points
            .iter()
            .filter(|p| node_id.map_or(true, |id| p.pair.contains(id)))
            .collect();
        let skip = matching.len().saturating_sub(window);
        matching.into_iter().skip(skip).collect()
    }
}

/// Generates the startup trend series
pub struct HistorySynthesizer<R: Rng = StdRng> {
    rng: R,
    pair: String,
}

impl HistorySynthesizer<StdRng> {
    pub fn seeded(seed: u64, pair: &str) -> Self {
        Self::new(StdRng::seed_from_u64(seed), pair)
    }

    pub fn from_entropy(pair: &str) -> Self {
        Self::new(StdRng::from_entropy(), pair)
    }
}

impl<R: Rng> HistorySynthesizer<R> {
    pub fn new(rng: R, pair: &str) -> Self {
        Self {
            rng,
            pair: pair.to_string(),
        }
    }

    /// Synthesize `point_count` points spaced `interval_ms` apart, ending at
    /// `now_ms`, into a series retaining at most `retention` points
    pub fn synthesize(
        &mut self,
        point_count: usize,
        interval_ms: u64,
        now_ms: u64,
        retention: usize,
    ) -> HistorySeries {
        let mut series = HistorySeries::with_capacity(retention);
        // index 0 is "now"; walk from the oldest index so the series is chronological
        for i in (0..point_count).rev() {
            let offset = (i as u64).saturating_mul(interval_ms);
            let base = TREND_BASE_MS + TREND_AMPLITUDE_MS * (TREND_FREQUENCY * i as f64).sin();
            let noise = self.rng.gen_range(-NOISE_SPREAD_MS..=NOISE_SPREAD_MS);

            series.push(HistoricalPoint {
                timestamp_ms: now_ms.saturating_sub(offset),
                pair: self.pair.clone(),
                latency_ms: (base + noise).max(LATENCY_FLOOR_MS),
                avg_latency_ms: base,
                min_latency_ms: base - NOISE_SPREAD_MS,
                max_latency_ms: base + NOISE_SPREAD_MS,
            });
        }
        series
    }
}

/// Synthesize `point_count` chronological points for `pair`
///
/// Convenience wrapper over [`HistorySynthesizer`] with retention equal to
/// the point count.
pub fn synthesize_history<R: Rng>(
    rng: R,
    pair: &str,
    point_count: usize,
    interval_ms: u64,
    now_ms: u64,
) -> Vec<HistoricalPoint> {
    HistorySynthesizer::new(rng, pair)
        .synthesize(point_count, interval_ms, now_ms, point_count)
        .to_vec()
}
