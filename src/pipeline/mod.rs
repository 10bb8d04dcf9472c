//! Pipeline module for orchestrating terrain generation.
//!
//! `Generator` walks one planet through noise, displacement and projection
//! with explicit ordering. `GenerationPipeline` runs parameter sweeps over a
//! shared noise field, optionally in parallel.

mod config;
mod generator;
mod sweep;

pub use config::SweepConfig;
pub use generator::{GenerationState, Generator};
pub use sweep::{
    CancellationToken, CollectingSink, GenerationOutput, GenerationPipeline, GridSink,
    InstanceFailure, NoiseInput, SweepReport,
};
