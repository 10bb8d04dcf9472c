//! Single-planet generator with explicit step ordering.

use std::fmt;

use tracing::debug;

use crate::displacement::Parameters;
use crate::error::TerrainError;
use crate::noise::NoiseStrategy;
use crate::projection::{project, ProjectionType};
use crate::terrain::{Grid, GridShape};

/// How far a [`Generator`] has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationState {
    Uninitialized,
    NoiseReady,
    DisplacementReady,
    Projected,
}

impl GenerationState {
    /// Returns the name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            GenerationState::Uninitialized => "uninitialized",
            GenerationState::NoiseReady => "noise_ready",
            GenerationState::DisplacementReady => "displacement_ready",
            GenerationState::Projected => "projected",
        }
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Holds the noise, displacement and projected grids of one planet.
///
/// Each step requires the previous one. Re-running an earlier step discards
/// everything downstream of it, so the held grids always belong together.
#[derive(Debug, Clone)]
pub struct Generator {
    shape: GridShape,
    noise: Option<Grid>,
    displacement: Option<Grid>,
    projected: Option<(ProjectionType, Grid)>,
}

impl Generator {
    /// Creates an empty generator for grids of `shape`.
    pub fn new(shape: GridShape) -> Self {
        Self {
            shape,
            noise: None,
            displacement: None,
            projected: None,
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Current position in the noise -> displacement -> projection chain.
    pub fn state(&self) -> GenerationState {
        if self.projected.is_some() {
            GenerationState::Projected
        } else if self.displacement.is_some() {
            GenerationState::DisplacementReady
        } else if self.noise.is_some() {
            GenerationState::NoiseReady
        } else {
            GenerationState::Uninitialized
        }
    }

    /// Installs a precomputed noise field. Its shape must match the generator's.
    pub fn load_noise(&mut self, noise: Grid) -> Result<(), TerrainError> {
        if noise.shape() != self.shape {
            return Err(TerrainError::invalid(
                "noise",
                format!("expected shape {}, got {}", self.shape, noise.shape()),
            ));
        }
        self.set_noise(noise);
        Ok(())
    }

    /// Generates the noise field with `strategy`.
    pub fn generate_noise<S>(&mut self, strategy: &S) -> Result<&Grid, TerrainError>
    where
        S: NoiseStrategy + ?Sized,
    {
        let noise = strategy.generate(self.shape)?;
        self.set_noise(noise);
        self.noise()
    }

    /// Applies `params` to the held noise field.
    pub fn create_displacement(&mut self, params: &Parameters) -> Result<&Grid, TerrainError> {
        let noise = self.noise.as_ref().ok_or(TerrainError::MissingPrerequisite {
            operation: "create_displacement",
            requires: "noise",
        })?;

        let displacement = params.apply(noise)?;
        debug!(name = %params.name, transform = %params.transform, "Created displacement");

        self.displacement = Some(displacement);
        self.projected = None;
        self.displacement()
    }

    /// Projects the held displacement field.
    pub fn project(&mut self, projection: ProjectionType) -> Result<&Grid, TerrainError> {
        let displacement = self.displacement.as_ref().ok_or(TerrainError::MissingPrerequisite {
            operation: "project",
            requires: "displacement",
        })?;

        let projected = project(displacement, projection);
        self.projected = Some((projection, projected));
        self.projected()
    }

    pub fn noise(&self) -> Result<&Grid, TerrainError> {
        self.noise.as_ref().ok_or(TerrainError::MissingPrerequisite {
            operation: "noise",
            requires: "load_noise or generate_noise",
        })
    }

    pub fn displacement(&self) -> Result<&Grid, TerrainError> {
        self.displacement.as_ref().ok_or(TerrainError::MissingPrerequisite {
            operation: "displacement",
            requires: "create_displacement",
        })
    }

    pub fn projected(&self) -> Result<&Grid, TerrainError> {
        self.projected
            .as_ref()
            .map(|(_, grid)| grid)
            .ok_or(TerrainError::MissingPrerequisite {
                operation: "projected",
                requires: "project",
            })
    }

    /// The projection used for the held projected grid, if any.
    pub fn projection(&self) -> Option<ProjectionType> {
        self.projected.as_ref().map(|(p, _)| *p)
    }

    fn set_noise(&mut self, noise: Grid) {
        self.noise = Some(noise);
        self.displacement = None;
        self.projected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{NoiseConfig, UniformSmoothedConfig};

    fn shape() -> GridShape {
        GridShape::new(8, 16).unwrap()
    }

    #[test]
    fn test_new_generator_is_uninitialized() {
        let generator = Generator::new(shape());
        assert_eq!(generator.state(), GenerationState::Uninitialized);
        assert!(generator.noise().is_err());
        assert!(generator.displacement().is_err());
        assert!(generator.projected().is_err());
    }

    #[test]
    fn test_full_chain() {
        let mut generator = Generator::new(shape());
        let strategy = NoiseConfig::UniformSmoothed(UniformSmoothedConfig::new(42, 2.0))
            .build()
            .unwrap();

        generator.generate_noise(&strategy).unwrap();
        assert_eq!(generator.state(), GenerationState::NoiseReady);

        generator.create_displacement(&Parameters::linear("x2", 2.0)).unwrap();
        assert_eq!(generator.state(), GenerationState::DisplacementReady);

        let projected = generator.project(ProjectionType::Equirectangular).unwrap().clone();
        assert_eq!(generator.state(), GenerationState::Projected);
        assert_eq!(generator.projection(), Some(ProjectionType::Equirectangular));
        assert_eq!(&projected, generator.displacement().unwrap());
    }

    #[test]
    fn test_displacement_before_noise_fails() {
        let mut generator = Generator::new(shape());
        let err = generator.create_displacement(&Parameters::linear("x", 1.0)).unwrap_err();
        assert!(matches!(
            err,
            TerrainError::MissingPrerequisite { operation: "create_displacement", .. }
        ));
        assert_eq!(generator.state(), GenerationState::Uninitialized);
    }

    #[test]
    fn test_project_before_displacement_fails() {
        let mut generator = Generator::new(shape());
        generator.load_noise(Grid::filled(shape(), 0.25)).unwrap();
        let err = generator.project(ProjectionType::Mercator).unwrap_err();
        assert!(matches!(err, TerrainError::MissingPrerequisite { operation: "project", .. }));
        assert_eq!(generator.state(), GenerationState::NoiseReady);
    }

    #[test]
    fn test_load_noise_rejects_wrong_shape() {
        let mut generator = Generator::new(shape());
        let wrong = Grid::filled(GridShape::new(4, 4).unwrap(), 0.0);
        assert!(matches!(
            generator.load_noise(wrong),
            Err(TerrainError::InvalidParameter { name: "noise", .. })
        ));
    }

    #[test]
    fn test_reloading_noise_discards_downstream() {
        let mut generator = Generator::new(shape());
        generator.load_noise(Grid::filled(shape(), 0.5)).unwrap();
        generator.create_displacement(&Parameters::linear("x", 3.0)).unwrap();
        generator.project(ProjectionType::Mercator).unwrap();

        generator.load_noise(Grid::filled(shape(), 0.1)).unwrap();
        assert_eq!(generator.state(), GenerationState::NoiseReady);
        assert!(generator.displacement().is_err());
        assert!(generator.projection().is_none());
    }

    #[test]
    fn test_failed_displacement_keeps_state() {
        let mut generator = Generator::new(shape());
        generator.load_noise(Grid::filled(shape(), 0.5)).unwrap();
        let flat = Parameters::normalized_offset("flat", Default::default());
        assert!(matches!(
            generator.create_displacement(&flat),
            Err(TerrainError::DegenerateInput { .. })
        ));
        assert_eq!(generator.state(), GenerationState::NoiseReady);
    }
}
