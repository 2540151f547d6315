//! Synthetic landscape for running the pipeline without the crop model.
//!
//! Builds a regular grid of cells with seeded random crop-model outputs:
//! a cell carries cropland with probability `cropland_share`, cropland
//! bands get a cropland fraction, a harvest date, and a harvest, and every
//! cell gets two soil-carbon layers. [`YieldNoise`] perturbs harvests from
//! tick to tick so the world averages move.

use inseeds_core::cells::{CellOutputSource, CellSourceError};
use inseeds_core::config::WorldConfig;
use inseeds_types::CellId;
use inseeds_world::{Cell, CellOutput, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::EngineError;

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

/// Configuration of the synthetic grid, loaded from the `landscape`
/// section of `inseeds-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LandscapeConfig {
    /// Number of grid rows.
    #[serde(default = "default_rows")]
    pub rows: u32,

    /// Number of grid columns.
    #[serde(default = "default_cols")]
    pub cols: u32,

    /// Cell edge length in degrees.
    #[serde(default = "default_resolution_deg")]
    pub resolution_deg: f64,

    /// Longitude of the south-west cell centre.
    #[serde(default = "default_origin_lon")]
    pub origin_lon: f64,

    /// Latitude of the south-west cell centre.
    #[serde(default = "default_origin_lat")]
    pub origin_lat: f64,

    /// Probability that a cell carries cropland.
    #[serde(default = "default_cropland_share")]
    pub cropland_share: f64,

    /// Number of crop bands per cell.
    #[serde(default = "default_bands")]
    pub bands: u32,

    /// Relative harvest perturbation applied every tick.
    #[serde(default = "default_yield_noise")]
    pub yield_noise: f64,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            resolution_deg: default_resolution_deg(),
            origin_lon: default_origin_lon(),
            origin_lat: default_origin_lat(),
            cropland_share: default_cropland_share(),
            bands: default_bands(),
            yield_noise: default_yield_noise(),
        }
    }
}

impl LandscapeConfig {
    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Landscape`] naming the first bad value.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.resolution_deg.is_finite() || self.resolution_deg <= 0.0 {
            return Err(landscape_error(format!(
                "resolution_deg must be positive, got {}",
                self.resolution_deg
            )));
        }
        if !(0.0..=1.0).contains(&self.cropland_share) {
            return Err(landscape_error(format!(
                "cropland_share must lie in [0, 1], got {}",
                self.cropland_share
            )));
        }
        if !(0.0..1.0).contains(&self.yield_noise) {
            return Err(landscape_error(format!(
                "yield_noise must lie in [0, 1), got {}",
                self.yield_noise
            )));
        }
        if self.bands == 0 {
            return Err(landscape_error(String::from("bands must be at least 1")));
        }
        Ok(())
    }
}

const fn default_rows() -> u32 {
    10
}

const fn default_cols() -> u32 {
    10
}

const fn default_resolution_deg() -> f64 {
    0.5
}

const fn default_origin_lon() -> f64 {
    11.25
}

const fn default_origin_lat() -> f64 {
    50.25
}

const fn default_cropland_share() -> f64 {
    0.7
}

const fn default_bands() -> u32 {
    2
}

const fn default_yield_noise() -> f64 {
    0.1
}

const fn landscape_error(message: String) -> EngineError {
    EngineError::Landscape { message }
}

// -----------------------------------------------------------------------
// Generation
// -----------------------------------------------------------------------

/// Build the world described by `landscape`, seeded from the world seed.
///
/// Cell IDs run row by row from the south-west corner. The same seed and
/// configuration always produce the same world.
///
/// # Errors
///
/// Returns [`EngineError::Landscape`] if the configuration is invalid or
/// the grid has more cells than IDs.
pub fn generate_world(landscape: &LandscapeConfig, world: &WorldConfig) -> Result<World, EngineError> {
    landscape.validate()?;

    let mut rng = StdRng::seed_from_u64(world.seed);
    let mut result = World::new();
    if let Some(country) = &world.country {
        result = result.with_country(country.as_str());
    }
    if let Some(area) = world.area_km2 {
        result = result.with_area_km2(area);
    }

    let mut next_id: u64 = 0;
    for row in 0..landscape.rows {
        for col in 0..landscape.cols {
            let lon = f64::from(col).mul_add(landscape.resolution_deg, landscape.origin_lon);
            let lat = f64::from(row).mul_add(landscape.resolution_deg, landscape.origin_lat);
            let output = random_output(&mut rng, landscape);
            result.add_cell(Cell {
                id: CellId(next_id),
                lon,
                lat,
                output,
            })?;
            next_id = next_id
                .checked_add(1)
                .ok_or_else(|| landscape_error(String::from("cell identifier overflow")))?;
        }
    }

    let cropland = result.cells().iter().filter(|c| c.has_cropland()).count();
    info!(
        cells = result.cell_count(),
        cropland_cells = cropland,
        rows = landscape.rows,
        cols = landscape.cols,
        "Synthetic landscape generated"
    );
    Ok(result)
}

fn random_output(rng: &mut impl Rng, landscape: &LandscapeConfig) -> CellOutput {
    let has_cropland = rng.random_bool(landscape.cropland_share);
    let mut output = CellOutput::default();
    for _ in 0..landscape.bands {
        let (frac, harvest) = if has_cropland {
            (rng.random_range(0.05..0.6), rng.random_range(0.5..8.0))
        } else {
            (0.0, 0.0)
        };
        output.cftfrac.push(frac);
        output.harvestc.push(harvest);
        output.hdate.push(rng.random_range(180.0..280.0_f64).round());
    }
    output.soilc_agr_layer = vec![rng.random_range(20.0..120.0), rng.random_range(5.0..40.0)];
    output
}

// -----------------------------------------------------------------------
// Per-tick outputs
// -----------------------------------------------------------------------

/// Largest noise [`YieldNoise`] applies; keeps perturbed harvests positive.
const MAX_YIELD_NOISE: f64 = 0.99;

/// Cell output source that scales every harvest by a random factor in
/// `1 ± noise` each tick. Non-positive harvests stay where they are.
#[derive(Debug, Clone)]
pub struct YieldNoise {
    rng: StdRng,
    noise: f64,
}

impl YieldNoise {
    /// Create a source seeded from the world seed.
    ///
    /// `noise` is clamped to `[0, 0.99]`; a non-finite value disables the
    /// perturbation.
    pub fn new(seed: u64, noise: f64) -> Self {
        let noise = if noise.is_finite() {
            noise.clamp(0.0, MAX_YIELD_NOISE)
        } else {
            0.0
        };
        Self {
            rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
            noise,
        }
    }
}

impl CellOutputSource for YieldNoise {
    fn advance(&mut self, tick: u64, world: &mut World) -> Result<(), CellSourceError> {
        if self.noise <= 0.0 {
            return Ok(());
        }
        let low = 1.0 - self.noise;
        let high = 1.0 + self.noise;
        for cell in world.cells_mut() {
            for harvest in cell.output.harvestc.iter_mut().filter(|h| **h > 0.0) {
                *harvest *= self.rng.random_range(low..high);
            }
        }
        debug!(tick, noise = self.noise, "Harvests perturbed");
        Ok(())
    }
}
