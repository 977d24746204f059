// Reference catalog
//
// The exchange nodes and cloud regions of the reference deployment.

use super::{CloudProvider, Node};
use crate::error::Result;
use crate::geo::GeoPosition;

/// A provider region shown as a ring marker on the globe
#[derive(Debug, Clone, PartialEq)]
pub struct CloudRegion {
    pub name: String,
    pub provider: CloudProvider,
    pub position: GeoPosition,
}

/// The eight monitored exchanges
pub fn reference_nodes() -> Result<Vec<Node>> {
    use CloudProvider::{Aws, Azure, Gcp};

    Ok(vec![
        Node::new("binance", "Binance", "Singapore", 1.3521, 103.8198, Aws, "ap-southeast-1", 45.0)?,
        Node::new("okx", "OKX", "Hong Kong", 22.3193, 114.1694, Gcp, "asia-east1", 38.0)?,
        Node::new("deribit", "Deribit", "Amsterdam", 52.3676, 4.9041, Azure, "west-europe", 52.0)?,
        Node::new("bybit", "Bybit", "Singapore", 1.3521, 103.8198, Aws, "ap-southeast-1", 41.0)?,
        Node::new("coinbase", "Coinbase Pro", "San Francisco", 37.7749, -122.4194, Gcp, "us-west1", 67.0)?,
        Node::new("kraken", "Kraken", "London", 51.5074, -0.1278, Aws, "eu-west-2", 58.0)?,
        Node::new("huobi", "Huobi", "Tokyo", 35.6762, 139.6503, Azure, "japan-east", 43.0)?,
        Node::new("ftx", "FTX", "Miami", 25.7617, -80.1918, Aws, "us-east-1", 72.0)?,
    ])
}

/// Three regions per provider
pub fn reference_regions() -> Result<Vec<CloudRegion>> {
    use CloudProvider::{Aws, Azure, Gcp};

    let table: [(&str, CloudProvider, f64, f64); 9] = [
        ("us-east-1", Aws, 39.0458, -76.6413),
        ("eu-west-1", Aws, 53.3498, -6.2603),
        ("ap-southeast-1", Aws, 1.3521, 103.8198),
        ("us-central1", Gcp, 41.2619, -95.8608),
        ("europe-west1", Gcp, 50.4501, 3.8196),
        ("asia-east1", Gcp, 24.0717, 120.5624),
        ("East US", Azure, 37.3719, -79.8164),
        ("West Europe", Azure, 52.3667, 4.9),
        ("Southeast Asia", Azure, 1.3521, 103.8198),
    ];

    table
        .iter()
        .map(|&(name, provider, lat, lng)| {
            Ok(CloudRegion {
                name: name.to_string(),
                provider,
                position: GeoPosition::new(lat, lng)?,
            })
        })
        .collect()
}
