// Latency graph builder
//
// Turns the filtered node set and the current sample snapshot into one
// classified, projected edge per unordered node pair. Pairs without a live
// sample get a synthesized fallback value so the graph stays complete.

use super::{classify_latency, LatencyConfig, LatencyRange, LatencyTier, SampleSet};
use crate::geo::{Point3D, DISPLAY_RADIUS};
use crate::registry::Node;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A renderable link between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyEdge {
    pub source_id: String,
    pub target_id: String,
    pub start: Point3D,
    pub end: Point3D,
    pub latency_ms: f64,
    pub tier: LatencyTier,
    /// True when no live sample existed and the value was synthesized
    pub synthesized: bool,
}

/// Graph builder settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphConfig {
    /// Sphere radius endpoints are projected onto
    pub display_radius: f64,
    /// Range for pairs missing from the sample set
    pub fallback_range: LatencyRange,
    pub latency: LatencyConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            display_radius: DISPLAY_RADIUS,
            fallback_range: LatencyRange::FALLBACK,
            latency: LatencyConfig::default(),
        }
    }
}

/// Builds edge lists, owning the random source used for fallback values
pub struct GraphBuilder<R: Rng = StdRng> {
    rng: R,
    config: GraphConfig,
}

impl GraphBuilder<StdRng> {
    pub fn seeded(seed: u64, config: GraphConfig) -> Self {
        Self::new(StdRng::seed_from_u64(seed), config)
    }

    pub fn from_entropy(config: GraphConfig) -> Self {
        Self::new(StdRng::from_entropy(), config)
    }
}

impl<R: Rng> GraphBuilder<R> {
    pub fn new(rng: R, config: GraphConfig) -> Self {
        Self { rng, config }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// One edge per unordered pair of `nodes`: `k * (k - 1) / 2` edges
    pub fn build(&mut self, nodes: &[Node], samples: &SampleSet) -> Vec<LatencyEdge> {
        build_graph(nodes, samples, &mut self.rng, &self.config)
    }
}

/// Build the classified edge list for `nodes` from `samples`
///
/// Each pair takes its live latency when the snapshot has one (either
/// orientation); otherwise a fallback is drawn from
/// `config.fallback_range`. No pair is ever dropped. Enumeration is
/// quadratic in the node count.
pub fn build_graph<R: Rng + ?Sized>(
    nodes: &[Node],
    samples: &SampleSet,
    rng: &mut R,
    config: &GraphConfig,
) -> Vec<LatencyEdge> {
    let positions: Vec<Point3D> = nodes
        .iter()
        .map(|n| n.position.project(config.display_radius))
        .collect();

    let mut edges = Vec::with_capacity(nodes.len() * nodes.len().saturating_sub(1) / 2);
    for (i, a) in nodes.iter().enumerate() {
        for (j, b) in nodes.iter().enumerate().skip(i + 1) {
            let (latency_ms, synthesized) = match samples.latency_between(&a.id, &b.id) {
                Some(ms) => (ms, false),
                None => {
                    let ms = config.fallback_range.draw(rng);
                    tracing::trace!(source = %a.id, target = %b.id, latency_ms = ms, "Synthesized fallback latency");
                    (ms, true)
                }
            };

            edges.push(LatencyEdge {
                source_id: a.id.clone(),
                target_id: b.id.clone(),
                start: positions[i],
                end: positions[j],
                latency_ms,
                tier: classify_latency(latency_ms, &config.latency),
                synthesized,
            });
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::{unordered_pairs, LatencySample, LatencySampler};
    use crate::registry::{NodeRegistry, ProviderFacet};
    use proptest::prelude::*;

    fn nodes() -> Vec<Node> {
        NodeRegistry::reference().unwrap().nodes().to_vec()
    }

    fn sample(source: &str, target: &str, latency_ms: f64) -> LatencySample {
        LatencySample {
            source: source.to_string(),
            target: target.to_string(),
            latency_ms,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn test_full_catalog_without_samples_is_fully_connected() {
        let mut builder = GraphBuilder::seeded(1, GraphConfig::default());
        let edges = builder.build(&nodes(), &SampleSet::empty());

        assert_eq!(edges.len(), 28);
        assert!(edges.iter().all(|e| e.synthesized));
        assert!(edges.iter().all(|e| LatencyRange::FALLBACK.contains(e.latency_ms)));
    }

    #[test]
    fn test_live_samples_used_in_either_orientation() {
        let all = nodes();
        let subset = vec![all[0].clone(), all[1].clone(), all[5].clone()]; // binance, okx, kraken
        let samples = SampleSet::new(
            3,
            0,
            vec![sample("okx", "binance", 49.999), sample("binance", "kraken", 100.0)],
        )
        .unwrap();

        let mut builder = GraphBuilder::seeded(2, GraphConfig::default());
        let edges = builder.build(&subset, &samples);
        assert_eq!(edges.len(), 3);

        let binance_okx = &edges[0];
        assert_eq!((binance_okx.source_id.as_str(), binance_okx.target_id.as_str()), ("binance", "okx"));
        assert_eq!(binance_okx.latency_ms, 49.999);
        assert_eq!(binance_okx.tier, LatencyTier::Low);
        assert!(!binance_okx.synthesized);

        let binance_kraken = &edges[1];
        assert_eq!(binance_kraken.tier, LatencyTier::High);
        assert!(!binance_kraken.synthesized);

        let okx_kraken = &edges[2];
        assert!(okx_kraken.synthesized);
    }

    #[test]
    fn test_zero_latency_sample_is_not_replaced() {
        let all = nodes();
        let samples = SampleSet::new(1, 0, vec![sample("binance", "okx", 0.0)]).unwrap();
        let mut builder = GraphBuilder::seeded(3, GraphConfig::default());
        let edges = builder.build(&all[..2], &samples);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].latency_ms, 0.0);
        assert!(!edges[0].synthesized);
    }

    #[test]
    fn test_endpoints_are_projected_at_display_radius() {
        let all = nodes();
        let mut builder = GraphBuilder::seeded(4, GraphConfig::default());
        let edges = builder.build(&all, &SampleSet::empty());

        for edge in &edges {
            assert!((edge.start.length() - DISPLAY_RADIUS).abs() < 1e-9);
            assert!((edge.end.length() - DISPLAY_RADIUS).abs() < 1e-9);
        }
        assert_eq!(edges[0].start, all[0].position.project(DISPLAY_RADIUS));
    }

    #[test]
    fn test_degenerate_inputs() {
        let all = nodes();
        let mut builder = GraphBuilder::seeded(5, GraphConfig::default());
        assert!(builder.build(&[], &SampleSet::empty()).is_empty());
        assert!(builder.build(&all[..1], &SampleSet::empty()).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_edge_count_is_k_choose_two(
            seed in any::<u64>(),
            query in prop_oneof![Just(""), Just("o"), Just("singapore"), Just("an")],
            sampled in 0usize..=8,
        ) {
            let registry = NodeRegistry::reference().unwrap();
            let filtered = registry.filter(query, ProviderFacet::All);

            // sampler coverage over an arbitrary prefix of the catalog
            let ids: Vec<&str> = registry.nodes().iter().take(sampled).map(|n| n.id.as_str()).collect();
            let mut sampler = LatencySampler::seeded(seed, LatencyRange::LIVE);
            let samples = sampler.sample_latencies(&unordered_pairs(&ids), 0).unwrap();

            let mut builder = GraphBuilder::seeded(seed, GraphConfig::default());
            let edges = builder.build(&filtered, &samples);

            let k = filtered.len();
            prop_assert_eq!(edges.len(), k * k.saturating_sub(1) / 2);
        }
    }
}
