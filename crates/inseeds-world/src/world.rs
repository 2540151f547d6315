//! The world: the ordered set of grid cells plus world-level metadata.
//!
//! Cells keep their insertion order. Every scan over the world (farmer
//! creation, world averages) walks the cells in that order, which keeps
//! runs reproducible regardless of how cell IDs were assigned.

use std::collections::BTreeMap;

use tracing::debug;

use inseeds_types::CellId;

use crate::cell::Cell;
use crate::error::WorldError;

/// The world owned by the simulation context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    /// Cells in insertion order.
    cells: Vec<Cell>,
    /// Position of each cell in `cells`.
    index: BTreeMap<CellId, usize>,
    /// Country the world represents, when known.
    country: Option<String>,
    /// Total area in square kilometres, when known.
    area_km2: Option<f64>,
}

impl World {
    /// Create an empty world without metadata.
    pub const fn new() -> Self {
        Self {
            cells: Vec::new(),
            index: BTreeMap::new(),
            country: None,
            area_km2: None,
        }
    }

    /// Attach a country name.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Attach the world area in square kilometres.
    #[must_use]
    pub fn with_area_km2(mut self, area_km2: f64) -> Self {
        self.area_km2 = Some(area_km2);
        self
    }

    /// Add a cell to the world.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateCell`] if a cell with the same ID
    /// already exists.
    pub fn add_cell(&mut self, cell: Cell) -> Result<(), WorldError> {
        if self.index.contains_key(&cell.id) {
            return Err(WorldError::DuplicateCell(cell.id));
        }
        debug!(cell_id = %cell.id, lon = cell.lon, lat = cell.lat, "Cell added");
        self.index.insert(cell.id, self.cells.len());
        self.cells.push(cell);
        Ok(())
    }

    /// Build a world from a batch of cells.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateCell`] on the first repeated ID.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Result<Self, WorldError> {
        let mut world = Self::new();
        for cell in cells {
            world.add_cell(cell)?;
        }
        Ok(world)
    }

    /// Look up a cell by ID.
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.index.get(&id).and_then(|&pos| self.cells.get(pos))
    }

    /// Look up a cell by ID, failing if absent.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CellNotFound`] if no such cell exists.
    pub fn require_cell(&self, id: CellId) -> Result<&Cell, WorldError> {
        self.cell(id).ok_or(WorldError::CellNotFound(id))
    }

    /// Mutable access to a cell, for the crop model writing outputs.
    pub fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        let pos = *self.index.get(&id)?;
        self.cells.get_mut(pos)
    }

    /// All cells in insertion order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable iterator over all cells in insertion order.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// IDs of all cells in insertion order.
    pub fn cell_ids(&self) -> Vec<CellId> {
        self.cells.iter().map(|c| c.id).collect()
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Country name, if the world carries one.
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// World area in square kilometres, if known.
    pub const fn area_km2(&self) -> Option<f64> {
        self.area_km2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_keep_insertion_order() {
        let world = World::from_cells([
            Cell::new(CellId(9), 0.0, 0.0),
            Cell::new(CellId(2), 0.5, 0.0),
            Cell::new(CellId(5), 1.0, 0.0),
        ]);
        assert!(world.is_ok());
        let world = world.unwrap_or_default();
        assert_eq!(world.cell_ids(), vec![CellId(9), CellId(2), CellId(5)]);
        assert_eq!(world.cell(CellId(2)).map(|c| c.id), Some(CellId(2)));
    }

    #[test]
    fn duplicate_cell_rejected() {
        let mut world = World::new();
        assert!(world.add_cell(Cell::new(CellId(1), 0.0, 0.0)).is_ok());
        let again = world.add_cell(Cell::new(CellId(1), 3.0, 3.0));
        assert!(matches!(again, Err(WorldError::DuplicateCell(CellId(1)))));
        assert_eq!(world.cell_count(), 1);
    }

    #[test]
    fn missing_cell_is_an_error() {
        let world = World::new();
        assert!(world.cell(CellId(4)).is_none());
        assert!(matches!(
            world.require_cell(CellId(4)),
            Err(WorldError::CellNotFound(CellId(4)))
        ));
    }

    #[test]
    fn metadata_is_optional() {
        let bare = World::new();
        assert_eq!(bare.country(), None);
        assert_eq!(bare.area_km2(), None);

        let tagged = World::new().with_country("DEU").with_area_km2(357_588.0);
        assert_eq!(tagged.country(), Some("DEU"));
        assert!(tagged.area_km2().is_some());
    }

    #[test]
    fn crop_model_can_write_outputs() {
        let mut world = World::new();
        let _ = world.add_cell(Cell::new(CellId(0), 0.0, 0.0));
        if let Some(cell) = world.cell_mut(CellId(0)) {
            cell.output.cftfrac = vec![0.2];
        }
        assert!(world.cell(CellId(0)).is_some_and(Cell::has_cropland));
    }
}
