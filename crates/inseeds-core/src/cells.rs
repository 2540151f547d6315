//! Cell output source trait and simple implementations.
//!
//! At the start of every tick the crop and soil model advances the outputs
//! of every cell. That model is external; the [`CellOutputSource`] trait
//! abstracts it, in the same way the farmer decision model sits behind
//! `TillageBehaviour`.
//!
//! - [`StaticCellOutputs`] leaves outputs untouched, so every tick sees the
//!   outputs the world was built with.
//! - [`ScheduledCellOutputs`] replays outputs recorded per tick and cell,
//!   which is enough to drive aggregates through known values in tests and
//!   offline replays.

use std::collections::BTreeMap;

use tracing::debug;

use inseeds_types::CellId;
use inseeds_world::{CellOutput, World, WorldError};

/// Errors that can occur while advancing cell outputs.
#[derive(Debug, thiserror::Error)]
pub enum CellSourceError {
    /// The source referred to a cell the world does not have.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// A source of per-tick cell outputs.
pub trait CellOutputSource {
    /// Write the outputs for `tick` into the world's cells.
    ///
    /// # Errors
    ///
    /// Returns [`CellSourceError`] if the outputs cannot be produced.
    fn advance(&mut self, tick: u64, world: &mut World) -> Result<(), CellSourceError>;
}

/// A source that never changes any cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCellOutputs;

impl StaticCellOutputs {
    /// Create a new static source.
    pub const fn new() -> Self {
        Self
    }
}

impl CellOutputSource for StaticCellOutputs {
    fn advance(&mut self, _tick: u64, _world: &mut World) -> Result<(), CellSourceError> {
        Ok(())
    }
}

/// Replays recorded outputs: at tick `t`, every `(cell, output)` scheduled
/// for `t` replaces that cell's output. Cells without an entry keep theirs.
#[derive(Debug, Clone, Default)]
pub struct ScheduledCellOutputs {
    schedule: BTreeMap<u64, BTreeMap<CellId, CellOutput>>,
}

impl ScheduledCellOutputs {
    /// Create an empty schedule.
    pub const fn new() -> Self {
        Self {
            schedule: BTreeMap::new(),
        }
    }

    /// Schedule `output` for `cell` at `tick`, replacing any earlier entry.
    pub fn insert(&mut self, tick: u64, cell: CellId, output: CellOutput) {
        self.schedule.entry(tick).or_default().insert(cell, output);
    }

    /// Number of ticks with at least one scheduled output.
    pub fn scheduled_ticks(&self) -> usize {
        self.schedule.len()
    }
}

impl CellOutputSource for ScheduledCellOutputs {
    fn advance(&mut self, tick: u64, world: &mut World) -> Result<(), CellSourceError> {
        let Some(entries) = self.schedule.remove(&tick) else {
            return Ok(());
        };
        let updated = entries.len();
        for (cell_id, output) in entries {
            let cell = world
                .cell_mut(cell_id)
                .ok_or(WorldError::CellNotFound(cell_id))?;
            cell.output = output;
        }
        debug!(tick, cells = updated, "Cell outputs replayed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use inseeds_world::Cell;

    use super::*;

    fn world() -> World {
        World::from_cells([Cell::new(CellId(0), 0.0, 0.0), Cell::new(CellId(1), 0.5, 0.0)])
            .unwrap()
    }

    fn output(harvest: f64) -> CellOutput {
        CellOutput {
            cftfrac: vec![0.4],
            harvestc: vec![harvest],
            soilc_agr_layer: vec![30.0],
            hdate: vec![200.0],
        }
    }

    #[test]
    fn static_source_changes_nothing() {
        let mut world = world();
        let before = world.clone();
        StaticCellOutputs::new().advance(3, &mut world).unwrap();
        assert_eq!(world, before);
    }

    #[test]
    fn schedule_applies_only_at_its_tick() {
        let mut world = world();
        let mut source = ScheduledCellOutputs::new();
        source.insert(2, CellId(1), output(5.0));
        assert_eq!(source.scheduled_ticks(), 1);

        source.advance(1, &mut world).unwrap();
        assert_eq!(world.cell(CellId(1)).unwrap().output.mean_harvest(), None);

        source.advance(2, &mut world).unwrap();
        assert_eq!(
            world.cell(CellId(1)).unwrap().output.mean_harvest(),
            Some(5.0)
        );
        assert_eq!(source.scheduled_ticks(), 0);
    }

    #[test]
    fn unknown_cell_is_an_error() {
        let mut world = world();
        let mut source = ScheduledCellOutputs::new();
        source.insert(1, CellId(42), output(1.0));
        let result = source.advance(1, &mut world);
        assert!(matches!(
            result,
            Err(CellSourceError::World {
                source: WorldError::CellNotFound(CellId(42))
            })
        ));
    }
}
