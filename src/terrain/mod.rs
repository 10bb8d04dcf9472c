//! Terrain field storage and filtering.
//!
//! Provides the lat/lon `Grid` used for every field in the pipeline, plus the
//! Gaussian smoothing shared by noise synthesis and erosion.

mod grid;
mod filter;

pub use grid::{Grid, GridShape};
pub(crate) use grid::ShapeDims;
pub use filter::gaussian_filter;
