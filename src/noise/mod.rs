//! Noise generation module for terrain synthesis.
//!
//! Uses simdnoise for coherent gradient noise and ChaCha-seeded uniform noise
//! for the smoothed random strategy.

mod fractal;
mod planar;
mod strategy;
mod uniform;

pub use fractal::{FractalNoiseConfig, MultiOctaveNoise};
pub use planar::{PlanarNoise, PlanarNoiseConfig};
pub use strategy::{NoiseConfig, NoiseSource, NoiseStrategy};
pub use uniform::{UniformSmoothedConfig, UniformSmoothedNoise};
