//! Grid cells and the crop-model outputs they expose.
//!
//! A cell's [`CellOutput`] is written by the external crop model once per
//! tick. Farming agents only ever read it.

use serde::{Deserialize, Serialize};

use inseeds_types::CellId;

/// Per-cell outputs of the crop and soil model.
///
/// Array lengths are not checked against each other: each reader applies
/// its own policy for empty arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellOutput {
    /// Cropland fraction per crop band.
    #[serde(default)]
    pub cftfrac: Vec<f64>,
    /// Harvested carbon (crop yield) per crop band.
    #[serde(default)]
    pub harvestc: Vec<f64>,
    /// Agricultural soil carbon per soil layer, topsoil first.
    #[serde(default)]
    pub soilc_agr_layer: Vec<f64>,
    /// Harvest day of year per crop band.
    #[serde(default)]
    pub hdate: Vec<f64>,
}

impl CellOutput {
    /// Cropland fraction summed over all bands.
    pub fn cropland_fraction(&self) -> f64 {
        self.cftfrac.iter().sum()
    }

    /// Mean harvested carbon over all bands, `None` when there are no bands.
    pub fn mean_harvest(&self) -> Option<f64> {
        mean(&self.harvestc)
    }

    /// Soil carbon of the first (topsoil) layer.
    pub fn topsoil_carbon(&self) -> Option<f64> {
        self.soilc_agr_layer.first().copied()
    }

    /// Average harvest date of the cell.
    ///
    /// Averages over the bands carrying cropland. Falls back to all bands
    /// when no band does, and to `0.0` when the cell reports no dates.
    pub fn mean_harvest_date(&self) -> f64 {
        let cropped: Vec<f64> = self
            .hdate
            .iter()
            .zip(&self.cftfrac)
            .filter(|&(_, frac)| *frac > 0.0)
            .map(|(date, _)| *date)
            .collect();

        mean(&cropped)
            .or_else(|| mean(&self.hdate))
            .unwrap_or(0.0)
    }
}

/// A spatial unit of the simulation grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Identifier assigned by the crop model.
    pub id: CellId,
    /// Longitude of the cell centre in degrees.
    pub lon: f64,
    /// Latitude of the cell centre in degrees.
    pub lat: f64,
    /// Latest crop-model outputs for this cell.
    #[serde(default)]
    pub output: CellOutput,
}

impl Cell {
    /// Create a cell with empty outputs.
    pub fn new(id: CellId, lon: f64, lat: f64) -> Self {
        Self {
            id,
            lon,
            lat,
            output: CellOutput::default(),
        }
    }

    /// Whether the cell carries any cropland, i.e. qualifies for a farmer.
    pub fn has_cropland(&self) -> bool {
        self.output.cropland_fraction() != 0.0
    }
}

/// Arithmetic mean of a slice, `None` when it is empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    let count = u32::try_from(values.len()).ok().filter(|n| *n > 0)?;
    let total: f64 = values.iter().sum();
    Some(total / f64::from(count))
}
