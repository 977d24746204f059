// Node registry module
//
// Holds the catalog of monitored exchange nodes and the search/provider
// filter used by the control panel, the node list and the graph builder.

mod catalog;

pub use catalog::{reference_nodes, reference_regions, CloudRegion};

use crate::error::{EngineError, Result};
use crate::geo::GeoPosition;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Infrastructure provider hosting a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudProvider {
    Aws,
    Gcp,
    Azure,
}

impl CloudProvider {
    /// All providers in display order
    pub const ALL: [CloudProvider; 3] = [CloudProvider::Aws, CloudProvider::Gcp, CloudProvider::Azure];

    /// Short lowercase identifier (`aws`, `gcp`, `azure`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Gcp => "gcp",
            Self::Azure => "azure",
        }
    }

    /// Human readable provider name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Aws => "AWS",
            Self::Gcp => "Google Cloud",
            Self::Azure => "Microsoft Azure",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider facet of the node filter: everything, or a single provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderFacet {
    #[default]
    All,
    Only(CloudProvider),
}

impl ProviderFacet {
    /// Whether a node hosted by `provider` passes this facet
    pub fn matches(&self, provider: CloudProvider) -> bool {
        match self {
            Self::All => true,
            Self::Only(p) => *p == provider,
        }
    }

    /// Next facet in the cycle All -> AWS -> GCP -> Azure -> All
    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::Only(CloudProvider::Aws),
            Self::Only(CloudProvider::Aws) => Self::Only(CloudProvider::Gcp),
            Self::Only(CloudProvider::Gcp) => Self::Only(CloudProvider::Azure),
            Self::Only(CloudProvider::Azure) => Self::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All Providers",
            Self::Only(p) => p.display_name(),
        }
    }
}

impl FromStr for ProviderFacet {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "aws" => Ok(Self::Only(CloudProvider::Aws)),
            "gcp" => Ok(Self::Only(CloudProvider::Gcp)),
            "azure" => Ok(Self::Only(CloudProvider::Azure)),
            _ => Err(EngineError::UnknownProvider(s.to_string())),
        }
    }
}

/// A monitored exchange site
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub location: String,
    pub position: GeoPosition,
    pub provider: CloudProvider,
    pub region: String,
    /// Last known latency in milliseconds, refreshed on tick boundaries
    pub current_latency: f64,
}

impl Node {
    /// Build a node, validating its coordinates
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        name: &str,
        location: &str,
        latitude: f64,
        longitude: f64,
        provider: CloudProvider,
        region: &str,
        current_latency: f64,
    ) -> Result<Self> {
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            location: location.to_string(),
            position: GeoPosition::new(latitude, longitude)?,
            provider,
            region: region.to_string(),
            current_latency,
        })
    }

    /// Case-insensitive substring match against name or location
    ///
    /// `needle` must already be lowercase.
    fn matches_query(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.location.to_lowercase().contains(needle)
    }
}

/// Keep the nodes whose name or location contains `query` (case-insensitive)
/// and whose provider passes `facet`
///
/// Order is preserved and the input is never modified. An empty query
/// matches every node.
pub fn filter_nodes(nodes: &[Node], query: &str, facet: ProviderFacet) -> Vec<Node> {
    let needle = query.to_lowercase();
    nodes
        .iter()
        .filter(|node| node.matches_query(&needle) && facet.matches(node.provider))
        .cloned()
        .collect()
}

/// Fixed catalog of monitored nodes
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
}

impl NodeRegistry {
    /// Create a registry, rejecting duplicate identifiers
    pub fn new(nodes: Vec<Node>) -> Result<Self> {
        let mut seen = HashSet::new();
        for node in &nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(EngineError::DuplicateNode(node.id.clone()));
            }
        }
        Ok(Self { nodes })
    }

    /// The eight-exchange reference deployment
    pub fn reference() -> Result<Self> {
        Self::new(reference_nodes()?)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn filter(&self, query: &str, facet: ProviderFacet) -> Vec<Node> {
        filter_nodes(&self.nodes, query, facet)
    }

    /// Record a node's last known latency
    ///
    /// Only the telemetry store calls this, on tick boundaries.
    pub(crate) fn record_latency(&mut self, id: &str, latency_ms: f64) -> Result<()> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| EngineError::UnknownNode(id.to_string()))?;
        node.current_latency = latency_ms;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn registry() -> NodeRegistry {
        NodeRegistry::reference().unwrap()
    }

    fn ids(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_reference_catalog_has_eight_nodes() {
        let reg = registry();
        assert_eq!(reg.len(), 8);
        assert_eq!(
            ids(reg.nodes()),
            vec!["binance", "okx", "deribit", "bybit", "coinbase", "kraken", "huobi", "ftx"]
        );
    }

    #[test]
    fn test_empty_query_all_facet_returns_everything_in_order() {
        let reg = registry();
        let filtered = filter_nodes(reg.nodes(), "", ProviderFacet::All);
        assert_eq!(filtered, reg.nodes().to_vec());
    }

    #[test]
    fn test_query_matches_name_or_location_case_insensitive() {
        let reg = registry();
        assert_eq!(ids(&reg.filter("SINGAPORE", ProviderFacet::All)), vec!["binance", "bybit"]);
        assert_eq!(ids(&reg.filter("krak", ProviderFacet::All)), vec!["kraken"]);
        assert_eq!(
            ids(&reg.filter("o", ProviderFacet::All)),
            vec!["binance", "okx", "bybit", "coinbase", "kraken", "huobi"]
        );
        assert!(reg.filter("nowhere", ProviderFacet::All).is_empty());
    }

    #[test]
    fn test_provider_facet_filters() {
        let reg = registry();
        let aws = reg.filter("", ProviderFacet::Only(CloudProvider::Aws));
        assert_eq!(ids(&aws), vec!["binance", "bybit", "kraken", "ftx"]);

        let azure_tokyo = reg.filter("tokyo", ProviderFacet::Only(CloudProvider::Azure));
        assert_eq!(ids(&azure_tokyo), vec!["huobi"]);

        let gcp_tokyo = reg.filter("tokyo", ProviderFacet::Only(CloudProvider::Gcp));
        assert!(gcp_tokyo.is_empty());
    }

    #[test]
    fn test_filter_does_not_mutate_registry() {
        let reg = registry();
        let before = reg.nodes().to_vec();
        let _ = reg.filter("ok", ProviderFacet::Only(CloudProvider::Gcp));
        assert_eq!(reg.nodes(), before.as_slice());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut nodes = reference_nodes().unwrap();
        nodes.push(nodes[0].clone());
        assert_eq!(
            NodeRegistry::new(nodes).unwrap_err(),
            EngineError::DuplicateNode("binance".to_string())
        );
    }

    #[test]
    fn test_record_latency() {
        let mut reg = registry();
        reg.record_latency("okx", 12.5).unwrap();
        assert_eq!(reg.get("okx").unwrap().current_latency, 12.5);
        assert_eq!(
            reg.record_latency("mtgox", 1.0),
            Err(EngineError::UnknownNode("mtgox".to_string()))
        );
    }

    #[test]
    fn test_provider_facet_cycle_and_parse() {
        let mut facet = ProviderFacet::All;
        let mut seen = vec![facet];
        for _ in 0..3 {
            facet = facet.next();
            seen.push(facet);
        }
        assert_eq!(facet.next(), ProviderFacet::All);
        assert_eq!(seen.len(), 4);

        assert_eq!("AWS".parse::<ProviderFacet>(), Ok(ProviderFacet::Only(CloudProvider::Aws)));
        assert_eq!("all".parse::<ProviderFacet>(), Ok(ProviderFacet::All));
        assert_eq!(
            "ibm".parse::<ProviderFacet>(),
            Err(EngineError::UnknownProvider("ibm".to_string()))
        );
    }

    #[test]
    fn test_node_new_validates_coordinates() {
        let err = Node::new("x", "X", "Nowhere", 120.0, 0.0, CloudProvider::Aws, "r", 0.0);
        assert_eq!(err, Err(EngineError::LatitudeOutOfRange(120.0)));
    }

    fn facet_strategy() -> impl Strategy<Value = ProviderFacet> {
        prop_oneof![
            Just(ProviderFacet::All),
            Just(ProviderFacet::Only(CloudProvider::Aws)),
            Just(ProviderFacet::Only(CloudProvider::Gcp)),
            Just(ProviderFacet::Only(CloudProvider::Azure)),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_filter_is_idempotent(query in "[a-zA-Z ]{0,4}", facet in facet_strategy()) {
            let reg = registry();
            let once = filter_nodes(reg.nodes(), &query, facet);
            let twice = filter_nodes(&once, &query, facet);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_filter_result_is_ordered_subset(query in "[a-z]{0,3}", facet in facet_strategy()) {
            let reg = registry();
            let filtered = filter_nodes(reg.nodes(), &query, facet);
            let positions: Vec<usize> = filtered
                .iter()
                .map(|n| reg.nodes().iter().position(|m| m.id == n.id).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
