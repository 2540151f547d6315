//! The simulation context: the single owner of all simulation state.
//!
//! There is no global world object. The top-level orchestrator owns one
//! [`SimulationContext`] and hands it to the farming component and the
//! tick cycle. Access rules:
//!
//! - The farming component fills the agent collections during
//!   initialisation and drives the per-tick passes.
//! - An agent mutates only itself, during its own `update`. Everything else
//!   it sees through a read-only `TickContext`.
//! - The cell output source mutates cell outputs at the start of a tick,
//!   before any agent runs.
//!
//! Collections are kept in update order: farmers by harvest date, decision
//! makers and lobby groups by ascending ID.

use inseeds_agents::{
    AgentError, DecisionMaker, Farmer, LobbyGroup, PracticeLedger, SimulationAgent,
};
use inseeds_types::{
    Aft, AgentKind, DecisionMakerId, FarmerId, IdSequence, LobbyGroupId, Tillage,
};
use inseeds_world::World;

/// All state of one simulation run.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    /// Cells and their current outputs.
    pub(crate) world: World,
    /// Farmers in harvest-date order.
    pub(crate) farmers: Vec<Farmer>,
    /// Decision makers in ascending ID order.
    pub(crate) decision_makers: Vec<DecisionMaker>,
    /// Lobby groups in ascending ID order.
    pub(crate) lobby_groups: Vec<LobbyGroup>,
    /// Current practice of every farmer.
    pub(crate) practices: PracticeLedger,
    pub(crate) farmer_ids: IdSequence<FarmerId>,
    pub(crate) decision_maker_ids: IdSequence<DecisionMakerId>,
    pub(crate) lobby_group_ids: IdSequence<LobbyGroupId>,
}

impl SimulationContext {
    /// Create a context around `world` with no agents yet.
    pub const fn new(world: World) -> Self {
        Self {
            world,
            farmers: Vec::new(),
            decision_makers: Vec::new(),
            lobby_groups: Vec::new(),
            practices: PracticeLedger::new(),
            farmer_ids: IdSequence::new(),
            decision_maker_ids: IdSequence::new(),
            lobby_group_ids: IdSequence::new(),
        }
    }

    /// The world.
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world, for cell output sources.
    pub const fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Farmers in harvest-date order.
    pub fn farmers(&self) -> &[Farmer] {
        &self.farmers
    }

    /// Decision makers in ascending ID order.
    pub fn decision_makers(&self) -> &[DecisionMaker] {
        &self.decision_makers
    }

    /// IDs of every decision maker, in update order.
    pub fn decision_maker_ids(&self) -> Vec<DecisionMakerId> {
        self.decision_makers.iter().map(DecisionMaker::id).collect()
    }

    /// Lobby groups in ascending ID order.
    pub fn lobby_groups(&self) -> &[LobbyGroup] {
        &self.lobby_groups
    }

    /// The lobby group representing `aft`, if one exists.
    pub fn lobby_group_for(&self, aft: Aft) -> Option<&LobbyGroup> {
        self.lobby_groups.iter().find(|g| g.aft() == aft)
    }

    /// Current practice of every farmer.
    pub const fn practices(&self) -> &PracticeLedger {
        &self.practices
    }

    /// Number of farmers currently using `tillage`.
    pub fn count_practice(&self, tillage: Tillage) -> usize {
        self.practices.count_practice(tillage)
    }
}

/// Draw the next ID of `kind` from `sequence`.
pub(crate) fn next_id<I: From<u64>>(
    sequence: &mut IdSequence<I>,
    kind: AgentKind,
) -> Result<I, AgentError> {
    sequence.next_id().ok_or(AgentError::IdExhausted { kind })
}
