//! Spherical planet terrain synthesis.
//!
//! This crate generates scalar noise fields over a latitude/longitude grid,
//! turns them into displacement (elevation) fields with configurable
//! transforms, and projects the result onto 2D map grids.

pub mod displacement;
pub mod error;
pub mod geometry;
pub mod noise;
pub mod pipeline;
pub mod projection;
pub mod terrain;

pub use displacement::{DisplacementTransform, Parameters, TransformParams};
pub use error::TerrainError;
pub use noise::{FractalNoiseConfig, NoiseConfig, NoiseStrategy};
pub use pipeline::{GenerationPipeline, Generator, NoiseInput, SweepConfig};
pub use projection::ProjectionType;
pub use terrain::{Grid, GridShape};
