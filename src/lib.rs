// latglobe - Geospatial latency visualization engine
//
// Projects exchange data centers onto a globe, samples synthetic latency
// between them, builds a classified pairwise graph and summarizes network
// health. The `latglobe` binary renders all of it in the terminal.

pub mod engine;
pub mod error;
pub mod geo;
pub mod latency;
pub mod registry;
pub mod stats;

pub use error::{EngineError, Result};
