//! The capability every simulation agent shares.
//!
//! Farmers, decision makers, and lobby groups all implement
//! [`SimulationAgent`]: an identity, a scope (bound to one cell, or to the
//! whole world), a per-tick `update`, and a set of declared output
//! variables. Each kind implements only what it needs; there is no common
//! base struct.

use std::fmt;

use inseeds_types::{AgentKind, CellId};
use inseeds_world::World;

use crate::error::AgentError;
use crate::ledger::PracticeLedger;

/// Where an agent lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentScope {
    /// Bound to exactly one grid cell for its whole life.
    Cell(CellId),
    /// Not tied to any cell; sees the whole world.
    World,
}

/// Read-only view of the simulation handed to an agent during its turn.
///
/// Agents may read anything here but mutate only themselves. The practice
/// ledger reflects every farmer that has already taken its turn this tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext<'a> {
    /// The world and its current cell outputs.
    pub world: &'a World,
    /// Current practice of every farmer.
    pub practices: &'a PracticeLedger,
}

impl<'a> TickContext<'a> {
    /// Bundle a world and ledger into a context.
    pub const fn new(world: &'a World, practices: &'a PracticeLedger) -> Self {
        Self { world, practices }
    }
}

/// Shared capability of farmers, decision makers, and lobby groups.
pub trait SimulationAgent {
    /// Strongly-typed identifier; its ordering is the update order among
    /// agents of this kind (farmers refine it with their harvest date).
    type Id: Copy + Ord + fmt::Display + Into<u64>;

    /// Which tier this agent belongs to.
    const KIND: AgentKind;

    /// Names of the variables this agent reports in output tables.
    const OUTPUT_VARIABLES: &'static [&'static str];

    /// Stable identifier assigned at construction.
    fn id(&self) -> Self::Id;

    /// Cell binding of the agent.
    fn scope(&self) -> AgentScope;

    /// Advance the agent's own state for tick `tick`.
    fn update(&mut self, tick: u64, ctx: &TickContext<'_>) -> Result<(), AgentError>;

    /// Current value of a declared output variable.
    ///
    /// Returns `None` for undeclared names and for values the agent does
    /// not currently have.
    fn output_value(&self, name: &str, world: &World) -> Option<f64>;
}
