// Engine error types
//
// Every fallible engine operation reports one of these variants. All of
// them describe invalid caller input; missing pair data is never an error
// (the graph builder recovers it locally).

use thiserror::Error;

/// Errors returned by the latency engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Latitude is not a finite value within [-90, 90]
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude is not a finite value within [-180, 180]
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// Aggregation was asked to summarize zero latency values
    #[error("cannot aggregate an empty latency collection")]
    EmptyInput,

    /// A latency value is NaN, infinite or negative
    #[error("latency value {0} is not a finite non-negative number of milliseconds")]
    InvalidLatency(f64),

    /// A latency pair names the same node on both ends
    #[error("latency pair must name two distinct nodes, got '{0}' twice")]
    SelfPair(String),

    /// The same unordered pair was sampled twice in one generation
    #[error("latency pair '{0}' appears more than once")]
    DuplicatePair(String),

    /// A sampling range is empty or not finite
    #[error("latency range [{min}, {max}) is empty or not finite")]
    InvalidRange { min: f64, max: f64 },

    /// Two registry entries share one identifier
    #[error("duplicate node identifier '{0}'")]
    DuplicateNode(String),

    /// An identifier does not exist in the registry
    #[error("unknown node identifier '{0}'")]
    UnknownNode(String),

    /// A provider facet string could not be parsed
    #[error("unknown provider '{0}' (expected all, aws, gcp or azure)")]
    UnknownProvider(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
