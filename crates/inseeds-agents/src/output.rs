//! Output rows reported by agents after every tick.
//!
//! Every agent produces one [`OutputRow`] per tick holding its declared
//! output variables. Cell-bound agents report their cell's coordinates.
//! World-scoped agents report the literal cell `"world"` at `(0.0, 0.0)`
//! and carry the world's country and area when the world has them.

use std::collections::BTreeMap;

use serde::Serialize;

use inseeds_types::AgentKind;
use inseeds_world::World;

use crate::agent::{AgentScope, SimulationAgent};
use crate::error::AgentError;

/// Cell label used by world-scoped agents.
pub const WORLD_CELL: &str = "world";

/// One agent's reported state at the end of one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    /// Tick the row was taken at.
    pub tick: u64,
    /// Agent tier.
    pub kind: AgentKind,
    /// Agent identifier within its tier.
    pub id: u64,
    /// Cell identifier, or [`WORLD_CELL`].
    pub cell: String,
    /// Longitude of the cell, `0.0` for world-scoped agents.
    pub lon: f64,
    /// Latitude of the cell, `0.0` for world-scoped agents.
    pub lat: f64,
    /// Declared output variables that currently have a value.
    pub values: BTreeMap<String, f64>,
    /// World country, for world-scoped agents when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// World area, for world-scoped agents when known.
    #[serde(rename = "area [km2]", skip_serializing_if = "Option::is_none")]
    pub area_km2: Option<f64>,
}

/// Build the output row of `agent` at `tick`.
///
/// `selection` restricts the reported variables; `None` reports every
/// declared variable. Names the agent does not declare are ignored.
///
/// # Errors
///
/// Returns [`AgentError::World`] if a cell-bound agent's cell is missing.
pub fn output_row<A: SimulationAgent>(
    agent: &A,
    tick: u64,
    world: &World,
    selection: Option<&[String]>,
) -> Result<OutputRow, AgentError> {
    let values = A::OUTPUT_VARIABLES
        .iter()
        .filter(|name| selection.is_none_or(|wanted| wanted.iter().any(|w| w == *name)))
        .filter_map(|&name| {
            agent
                .output_value(name, world)
                .map(|value| (name.to_owned(), value))
        })
        .collect();

    let row = match agent.scope() {
        AgentScope::Cell(cell_id) => {
            let cell = world.require_cell(cell_id)?;
            OutputRow {
                tick,
                kind: A::KIND,
                id: agent.id().into(),
                cell: cell_id.to_string(),
                lon: cell.lon,
                lat: cell.lat,
                values,
                country: None,
                area_km2: None,
            }
        }
        AgentScope::World => OutputRow {
            tick,
            kind: A::KIND,
            id: agent.id().into(),
            cell: WORLD_CELL.to_owned(),
            lon: 0.0,
            lat: 0.0,
            values,
            country: world.country().map(str::to_owned),
            area_km2: world.area_km2(),
        },
    };
    Ok(row)
}

/// Rows collected over one or more ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputTable {
    rows: Vec<OutputRow>,
}

impl OutputTable {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Append the rows of every agent in `agents`.
    ///
    /// # Errors
    ///
    /// Propagates the first failing [`output_row`].
    pub fn extend_from<'a, A: SimulationAgent + 'a>(
        &mut self,
        agents: impl IntoIterator<Item = &'a A>,
        tick: u64,
        world: &World,
        selection: Option<&[String]>,
    ) -> Result<(), AgentError> {
        for agent in agents {
            self.rows.push(output_row(agent, tick, world, selection)?);
        }
        Ok(())
    }

    /// All rows in insertion order.
    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize the table as JSON lines, one row per line.
    pub fn to_json_lines(&self) -> Result<String, AgentError> {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&serde_json::to_string(row)?);
            out.push('\n');
        }
        Ok(out)
    }
}
