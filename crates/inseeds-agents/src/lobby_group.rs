//! AFT-bound lobby groups and their agreement statistic.
//!
//! Each lobby group represents the farmers of one agent functional type.
//! Membership is rebuilt from scratch every tick from the practice ledger,
//! so it stays correct no matter how the farmer population changed since
//! the previous tick. The group's `agreement` is the share of members
//! following the majority practice.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use inseeds_types::{Aft, AgentKind, CellId, FarmerId, LobbyGroupId, Tillage};
use inseeds_world::World;

use crate::agent::{AgentScope, SimulationAgent, TickContext};
use crate::error::AgentError;
use crate::farmer::Farmer;
use crate::ledger::PracticeLedger;

/// Agreement of a group with no members, or none with a practice.
pub const VACUOUS_AGREEMENT: f64 = 1.0;

/// A world-scoped group of farmers sharing one AFT.
#[derive(Debug, Clone, PartialEq)]
pub struct LobbyGroup {
    id: LobbyGroupId,
    aft: Aft,
    belief_value: Decimal,
    farmers: Vec<FarmerId>,
    agreement: f64,
    all_cells: Option<Vec<CellId>>,
}

impl LobbyGroup {
    /// Create an empty group bound to `aft`.
    pub const fn new(id: LobbyGroupId, aft: Aft) -> Self {
        Self {
            id,
            aft,
            belief_value: Decimal::ZERO,
            farmers: Vec::new(),
            agreement: VACUOUS_AGREEMENT,
            all_cells: None,
        }
    }

    /// Cache the world's cell list once the world is available.
    pub fn init_world_attributes(&mut self, world: &World) {
        self.all_cells = Some(world.cell_ids());
    }

    /// Cells visible to the group; `None` until world attributes are set.
    pub fn cells(&self) -> Option<&[CellId]> {
        self.all_cells.as_deref()
    }

    /// The AFT this group represents.
    pub const fn aft(&self) -> Aft {
        self.aft
    }

    /// Current belief score.
    pub const fn belief_value(&self) -> Decimal {
        self.belief_value
    }

    /// Share of members following the majority practice, in `[0, 1]`.
    pub const fn agreement(&self) -> f64 {
        self.agreement
    }

    /// Current members in insertion order.
    pub fn farmers(&self) -> &[FarmerId] {
        &self.farmers
    }

    /// Number of current members.
    pub fn farmer_count(&self) -> usize {
        self.farmers.len()
    }

    /// Add a farmer of this group's AFT.
    ///
    /// Returns `false`, leaving membership unchanged, if the AFT differs or
    /// the farmer is already a member.
    pub fn add_farmer(&mut self, farmer: &Farmer) -> bool {
        if farmer.aft() != self.aft || self.farmers.contains(&farmer.id()) {
            return false;
        }
        self.farmers.push(farmer.id());
        true
    }

    /// Remove a farmer. Returns `false` if it was not a member.
    pub fn remove_farmer(&mut self, farmer: &Farmer) -> bool {
        let before = self.farmers.len();
        self.farmers.retain(|id| *id != farmer.id());
        self.farmers.len() != before
    }

    /// Rebuild membership from the current farmer population.
    pub fn update_farmers(&mut self, practices: &PracticeLedger) {
        self.farmers = practices.farmers_of(self.aft);
    }
}

/// Share of practices equal to the majority practice.
///
/// `None` entries are skipped and do not count towards the denominator.
/// Returns [`VACUOUS_AGREEMENT`] when nothing is left to count.
pub fn agreement_of(practices: impl IntoIterator<Item = Option<Tillage>>) -> f64 {
    let mut conventional: u32 = 0;
    let mut conservation: u32 = 0;
    for practice in practices.into_iter().flatten() {
        match practice {
            Tillage::Conventional => conventional = conventional.saturating_add(1),
            Tillage::Conservation => conservation = conservation.saturating_add(1),
        }
    }

    let valid = conventional.saturating_add(conservation);
    if valid == 0 {
        return VACUOUS_AGREEMENT;
    }
    f64::from(conventional.max(conservation)) / f64::from(valid)
}

impl SimulationAgent for LobbyGroup {
    type Id = LobbyGroupId;

    const KIND: AgentKind = AgentKind::LobbyGroup;

    const OUTPUT_VARIABLES: &'static [&'static str] =
        &["belief_value", "agreement", "farmer_count"];

    fn id(&self) -> LobbyGroupId {
        self.id
    }

    fn scope(&self) -> AgentScope {
        AgentScope::World
    }

    fn update(&mut self, tick: u64, ctx: &TickContext<'_>) -> Result<(), AgentError> {
        self.update_farmers(ctx.practices);
        self.agreement = agreement_of(
            self.farmers
                .iter()
                .map(|&id| ctx.practices.tillage_of(id)),
        );
        debug!(
            tick,
            lobby_group_id = %self.id,
            aft = self.aft.as_str(),
            members = self.farmers.len(),
            agreement = self.agreement,
            "Lobby group updated"
        );
        Ok(())
    }

    fn output_value(&self, name: &str, _world: &World) -> Option<f64> {
        match name {
            "belief_value" => self.belief_value.to_f64(),
            "agreement" => Some(self.agreement),
            "farmer_count" => u32::try_from(self.farmers.len()).ok().map(f64::from),
            _ => None,
        }
    }
}
