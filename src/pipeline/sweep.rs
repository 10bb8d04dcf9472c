//! Parameter sweeps: one shared noise field, many displacement transforms.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::displacement::Parameters;
use crate::error::TerrainError;
use crate::noise::{NoiseConfig, NoiseStrategy};
use crate::projection::{project, ProjectionType};
use crate::terrain::{Grid, GridShape};

/// Where the shared noise field comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseInput {
    /// Generate with a configured strategy.
    Strategy(NoiseConfig),
    /// Use a grid produced elsewhere. Must match the pipeline shape.
    Precomputed(Grid),
}

impl Default for NoiseInput {
    fn default() -> Self {
        NoiseInput::Strategy(NoiseConfig::default())
    }
}

impl NoiseInput {
    /// Produces the noise grid and the seed that generated it, if any.
    fn resolve(&self, shape: GridShape) -> Result<(Grid, Option<u64>), TerrainError> {
        match self {
            NoiseInput::Strategy(config) => {
                let source = config.build()?;
                let grid = source.generate(shape)?;
                Ok((grid, Some(source.seed())))
            }
            NoiseInput::Precomputed(grid) => {
                if grid.shape() != shape {
                    return Err(TerrainError::invalid(
                        "noise",
                        format!("precomputed grid is {}, pipeline expects {}", grid.shape(), shape),
                    ));
                }
                Ok((grid.clone(), None))
            }
        }
    }
}

/// Result of one parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutput {
    /// Name of the parameter set.
    pub name: String,
    /// One-line description for display.
    pub summary: String,
    pub displacement: Grid,
    /// Present when the pipeline was configured with a projection.
    pub projected: Option<Grid>,
    pub projection: Option<ProjectionType>,
}

/// A parameter set that failed, with the reason.
#[derive(Debug)]
pub struct InstanceFailure {
    pub name: String,
    pub error: TerrainError,
}

/// Outcome of a sweep. Outputs and failures keep the input order.
#[derive(Debug)]
pub struct SweepReport {
    pub outputs: Vec<GenerationOutput>,
    pub failures: Vec<InstanceFailure>,
    /// Seed of the shared noise field; `None` for precomputed noise.
    pub noise_seed: Option<u64>,
    pub elapsed: Duration,
}

impl SweepReport {
    /// Returns true if every parameter set produced an output.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outputs.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Finds an output by parameter set name.
    pub fn output(&self, name: &str) -> Option<&GenerationOutput> {
        self.outputs.iter().find(|o| o.name == name)
    }
}

/// Shared cancellation flag.
///
/// Clones observe the same flag. Instances that have not started when the flag
/// is raised fail with [`TerrainError::Cancelled`]; running ones finish.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Receives finished outputs, e.g. a renderer or a store.
pub trait GridSink {
    fn consume(&mut self, output: &GenerationOutput) -> Result<(), TerrainError>;
}

/// Keeps every output in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    outputs: Vec<GenerationOutput>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outputs(&self) -> &[GenerationOutput] {
        &self.outputs
    }

    pub fn into_outputs(self) -> Vec<GenerationOutput> {
        self.outputs
    }
}

impl GridSink for CollectingSink {
    fn consume(&mut self, output: &GenerationOutput) -> Result<(), TerrainError> {
        self.outputs.push(output.clone());
        Ok(())
    }
}

/// Noise -> displacement -> optional projection, over one or many parameter sets.
#[derive(Debug, Clone)]
pub struct GenerationPipeline {
    shape: GridShape,
    noise: NoiseInput,
    projection: Option<ProjectionType>,
    parallel: bool,
    cancellation: CancellationToken,
}

impl GenerationPipeline {
    /// Creates a sequential pipeline without projection.
    pub fn new(shape: GridShape, noise: NoiseInput) -> Self {
        Self {
            shape,
            noise,
            projection: None,
            parallel: false,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_projection(mut self, projection: ProjectionType) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Runs sweep instances on the rayon pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Shares `token` with the caller so the sweep can be cancelled from outside.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn projection(&self) -> Option<ProjectionType> {
        self.projection
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Runs a single parameter set.
    pub fn run(&self, params: &Parameters) -> Result<GenerationOutput, TerrainError> {
        let (noise, _) = self.noise.resolve(self.shape)?;
        self.run_instance(&noise, params)
    }

    /// Runs every parameter set against one shared noise field.
    ///
    /// A noise failure aborts the sweep. Per-instance failures are collected in
    /// the report and the remaining instances still run.
    pub fn run_sweep(&self, params: &[Parameters]) -> Result<SweepReport, TerrainError> {
        let start = Instant::now();
        let (noise, noise_seed) = self.prepare_noise(params.len())?;

        let results: Vec<Result<GenerationOutput, TerrainError>> = if self.parallel {
            params.par_iter().map(|p| self.run_instance(&noise, p)).collect()
        } else {
            params.iter().map(|p| self.run_instance(&noise, p)).collect()
        };

        Ok(self.finish(params, results, noise_seed, start))
    }

    /// Sequential sweep reporting each instance's start and completion.
    ///
    /// Callbacks receive `(name, index, total)`. `on_instance_complete` is
    /// called for failed instances too.
    pub fn run_sweep_with_callbacks<F1, F2>(
        &self,
        params: &[Parameters],
        mut on_instance_start: F1,
        mut on_instance_complete: F2,
    ) -> Result<SweepReport, TerrainError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let start = Instant::now();
        let total = params.len();
        let (noise, noise_seed) = self.prepare_noise(total)?;

        let mut results = Vec::with_capacity(total);
        for (i, p) in params.iter().enumerate() {
            on_instance_start(&p.name, i, total);
            results.push(self.run_instance(&noise, p));
            on_instance_complete(&p.name, i, total);
        }

        Ok(self.finish(params, results, noise_seed, start))
    }

    /// Runs a sweep and hands every output to `sink`, in input order.
    ///
    /// Sink errors are recorded as failures of the instance being consumed.
    pub fn run_sweep_into<S>(&self, params: &[Parameters], sink: &mut S) -> Result<SweepReport, TerrainError>
    where
        S: GridSink + ?Sized,
    {
        let mut report = self.run_sweep(params)?;

        let mut kept = Vec::with_capacity(report.outputs.len());
        for output in report.outputs.drain(..) {
            match sink.consume(&output) {
                Ok(()) => kept.push(output),
                Err(error) => {
                    warn!(name = %output.name, %error, "Sink rejected output");
                    report.failures.push(InstanceFailure {
                        name: output.name,
                        error,
                    });
                }
            }
        }
        report.outputs = kept;

        Ok(report)
    }

    fn prepare_noise(&self, instances: usize) -> Result<(Grid, Option<u64>), TerrainError> {
        info!(
            shape = %self.shape,
            instances,
            parallel = self.parallel,
            projection = ?self.projection,
            "Starting generation sweep"
        );
        let (noise, seed) = self.noise.resolve(self.shape).map_err(|error| {
            warn!(%error, "Noise generation failed, aborting sweep");
            error
        })?;
        debug!(seed = ?seed, "Shared noise field ready");
        Ok((noise, seed))
    }

    fn run_instance(&self, noise: &Grid, params: &Parameters) -> Result<GenerationOutput, TerrainError> {
        if self.cancellation.is_cancelled() {
            return Err(TerrainError::Cancelled(params.name.clone()));
        }

        let displacement = params.apply(noise)?;
        let projected = self.projection.map(|p| project(&displacement, p));
        debug!(name = %params.name, "Instance complete");

        Ok(GenerationOutput {
            name: params.name.clone(),
            summary: params.summary(),
            displacement,
            projected,
            projection: self.projection,
        })
    }

    fn finish(
        &self,
        params: &[Parameters],
        results: Vec<Result<GenerationOutput, TerrainError>>,
        noise_seed: Option<u64>,
        start: Instant,
    ) -> SweepReport {
        let mut outputs = Vec::new();
        let mut failures = Vec::new();

        for (p, result) in params.iter().zip(results) {
            match result {
                Ok(output) => outputs.push(output),
                Err(error) => {
                    warn!(name = %p.name, %error, "Parameter set failed");
                    failures.push(InstanceFailure {
                        name: p.name.clone(),
                        error,
                    });
                }
            }
        }

        let elapsed = start.elapsed();
        info!(
            succeeded = outputs.len(),
            failed = failures.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Generation sweep finished"
        );

        SweepReport {
            outputs,
            failures,
            noise_seed,
            elapsed,
        }
    }
}
