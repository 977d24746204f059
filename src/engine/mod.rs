// Telemetry store
//
// Owns all session state of the engine: the node registry, the sampler,
// the current sample snapshot and the history series. `tick` is the only
// operation that changes any of it.

pub mod scheduler;

pub use scheduler::{RefreshHandle, RefreshScheduler, TickOutcome};

use crate::error::{EngineError, Result};
use crate::geo::DISPLAY_RADIUS;
use crate::latency::{
    unordered_pairs, GraphBuilder, GraphConfig, HistoryConfig, HistorySeries, HistorySynthesizer,
    LatencyConfig, LatencyEdge, LatencyRange, LatencySampler, PairKey, SampleSet,
};
use crate::registry::{reference_regions, CloudRegion, Node, NodeRegistry, ProviderFacet};
use crate::stats::{aggregate_samples, LatencySummary};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Nodes sampled by the live feed in the reference deployment
pub const DEFAULT_MONITORED: [&str; 6] = ["binance", "okx", "deribit", "bybit", "coinbase", "kraken"];

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Live sample range (20-170ms)
    pub sample_range: LatencyRange,

    /// Range for pairs the live feed does not cover (50-250ms)
    pub fallback_range: LatencyRange,

    /// Tier thresholds
    pub latency: LatencyConfig,

    /// Radius edges and markers are projected at
    pub display_radius: f64,

    /// Node ids whose pairs are sampled on every tick
    pub monitored_ids: Vec<String>,

    pub history: HistoryConfig,

    /// Seed for every random source; `None` seeds from the OS
    pub seed: Option<u64>,

    /// Sampling period in milliseconds
    pub refresh_ms: u64,
}

impl EngineConfig {
    pub fn graph_config(&self) -> GraphConfig {
        GraphConfig {
            display_radius: self.display_radius,
            fallback_range: self.fallback_range,
            latency: self.latency,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_range: LatencyRange::LIVE,
            fallback_range: LatencyRange::FALLBACK,
            latency: LatencyConfig::default(),
            display_radius: DISPLAY_RADIUS,
            monitored_ids: DEFAULT_MONITORED.iter().map(|s| s.to_string()).collect(),
            history: HistoryConfig::default(),
            seed: None,
            refresh_ms: scheduler::DEFAULT_REFRESH_MS,
        }
    }
}

/// Milliseconds since the Unix epoch, or 0 if the clock is before it
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Session state of the latency engine
pub struct TelemetryStore {
    registry: NodeRegistry,
    regions: Vec<CloudRegion>,
    monitored_ids: Vec<String>,
    pairs: Vec<(String, String)>,
    sampler: LatencySampler,
    graph: GraphBuilder,
    snapshot: Arc<SampleSet>,
    history: HistorySeries,
    history_pair: PairKey,
    latency: LatencyConfig,
    tick_count: u64,
}

impl TelemetryStore {
    /// Store over the reference catalog
    pub fn new(config: &EngineConfig, now_ms: u64) -> Result<Self> {
        Self::with_registry(NodeRegistry::reference()?, config, now_ms)
    }

    /// Store over an arbitrary registry
    ///
    /// Every monitored id and both ends of the history pair must exist.
    /// Runs the first tick before returning, so the snapshot is populated.
    pub fn with_registry(registry: NodeRegistry, config: &EngineConfig, now_ms: u64) -> Result<Self> {
        for id in config
            .monitored_ids
            .iter()
            .chain([&config.history.source, &config.history.target])
        {
            if !registry.contains(id) {
                return Err(EngineError::UnknownNode(id.clone()));
            }
        }
        let history_pair = PairKey::new(&config.history.source, &config.history.target)?;

        let (sampler, graph, mut synthesizer) = match config.seed {
            Some(seed) => (
                LatencySampler::seeded(seed, config.sample_range),
                GraphBuilder::seeded(seed.wrapping_add(1), config.graph_config()),
                HistorySynthesizer::seeded(seed.wrapping_add(2), &config.history.pair_label()),
            ),
            None => (
                LatencySampler::from_entropy(config.sample_range),
                GraphBuilder::from_entropy(config.graph_config()),
                HistorySynthesizer::from_entropy(&config.history.pair_label()),
            ),
        };

        let history = synthesizer.synthesize(
            config.history.points,
            config.history.interval_ms,
            now_ms,
            config.history.retention,
        );

        let mut store = Self {
            registry,
            regions: reference_regions()?,
            monitored_ids: config.monitored_ids.clone(),
            pairs: unordered_pairs(&config.monitored_ids),
            sampler,
            graph,
            snapshot: Arc::new(SampleSet::empty()),
            history,
            history_pair,
            latency: config.latency,
            tick_count: 0,
        };

        tracing::info!(
            nodes = store.registry.len(),
            pairs = store.pairs.len(),
            history_points = store.history.len(),
            seeded = config.seed.is_some(),
            "Telemetry store initialized"
        );

        store.tick(now_ms)?;
        Ok(store)
    }

    /// Sample every monitored pair and publish the result
    ///
    /// The new set is fully built before it replaces the current one; an
    /// `Arc` taken from [`TelemetryStore::snapshot`] earlier keeps the old
    /// generation intact. Monitored nodes then get the mean of their new
    /// samples as `current_latency`.
    pub fn tick(&mut self, now_ms: u64) -> Result<()> {
        let next = Arc::new(self.sampler.sample_latencies(&self.pairs, now_ms)?);

        let means: Vec<(&str, f64)> = self
            .monitored_ids
            .iter()
            .filter_map(|id| next.mean_latency_for(id).map(|mean| (id.as_str(), mean)))
            .collect();

        self.snapshot = Arc::clone(&next);
        for (id, mean) in means {
            self.registry.record_latency(id, mean)?;
        }
        self.tick_count += 1;

        tracing::debug!(
            generation = next.generation(),
            samples = next.len(),
            captured_at_ms = next.captured_at_ms(),
            "Latency snapshot published"
        );
        Ok(())
    }

    /// The current sample set
    pub fn snapshot(&self) -> Arc<SampleSet> {
        Arc::clone(&self.snapshot)
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn regions(&self) -> &[CloudRegion] {
        &self.regions
    }

    pub fn history(&self) -> &HistorySeries {
        &self.history
    }

    /// Pair the history series tracks
    pub fn history_pair(&self) -> &PairKey {
        &self.history_pair
    }

    pub fn latency_config(&self) -> &LatencyConfig {
        &self.latency
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn filtered_nodes(&self, query: &str, facet: ProviderFacet) -> Vec<Node> {
        self.registry.filter(query, facet)
    }

    /// Edges among `nodes` from the current snapshot
    pub fn build_graph(&mut self, nodes: &[Node]) -> Vec<LatencyEdge> {
        self.graph.build(nodes, &self.snapshot)
    }

    /// Statistics of the current snapshot
    pub fn summary(&self) -> Result<LatencySummary> {
        aggregate_samples(&self.snapshot, &self.latency)
    }
}
