//! Spherical geometry module.
//!
//! Provides the mapping between lat/lon grid cells, spherical angles and
//! unit-sphere positions used for seamless noise sampling.

mod coords;
mod mesh;

pub use coords::{
    cell_to_sphere, colatitude, lat_lon_grid, latitude, linspace, longitude,
    spherical_to_cartesian,
};
pub use mesh::displaced_sphere_positions;
