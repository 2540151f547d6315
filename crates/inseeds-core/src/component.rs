//! The farming component: creation and per-tick ordering of all agents.
//!
//! Initialisation runs in three steps, farmers first:
//!
//! 1. [`FarmingComponent::init_farmers`] creates one farmer per cell with
//!    cropland, sorts the whole batch by harvest date, and only then links
//!    each farmer's neighbourhood, in sorted order.
//! 2. [`FarmingComponent::init_decision_makers`] creates the configured
//!    number of world-scoped decision makers.
//! 3. [`FarmingComponent::init_lobby_groups`] creates exactly one lobby
//!    group per AFT and attaches it to the world immediately.
//!
//! Every tick, [`FarmingComponent::update`] runs three passes: farmers in
//! harvest-date order, then decision makers by ID, then lobby groups by ID.
//! Each farmer records its practice in the ledger at the end of its own
//! turn, so the lobby-group pass always sees this tick's practices.

use tracing::{debug, info};

use inseeds_agents::{
    AgentError, DecisionMaker, Farmer, FarmerConfig, LobbyGroup, NeighbourCandidate,
    SimulationAgent, TickContext, by_harvest_date,
};
use inseeds_types::{Aft, AgentKind, DecisionMakerId, FarmerId, LobbyGroupId};
use inseeds_world::Cell;

use crate::config::CoupledConfig;
use crate::context::{SimulationContext, next_id};

/// Errors that can occur while initialising or updating farming agents.
#[derive(Debug, thiserror::Error)]
pub enum FarmingError {
    /// An agent operation failed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// The configured lobby group count disagrees with the AFT count.
    #[error(
        "num_lobby_groups is {configured} but lobby groups are bound one per AFT ({afts} AFTs)"
    )]
    LobbyGroupCount {
        /// Value from `coupled_config.num_lobby_groups`.
        configured: u32,
        /// Number of AFTs.
        afts: usize,
    },

    /// Agents of this kind were already created.
    #[error("{kind:?} agents are already initialised")]
    AlreadyInitialised {
        /// The agent kind initialised twice.
        kind: AgentKind,
    },

    /// A factory returned an agent that does not match what was requested.
    #[error("{kind:?} factory mismatch: {reason}")]
    FactoryMismatch {
        /// The agent kind the factory builds.
        kind: AgentKind,
        /// What did not match.
        reason: String,
    },
}

/// Orchestrates creation and update order of farmers, decision makers,
/// and lobby groups.
#[derive(Debug, Clone)]
pub struct FarmingComponent {
    config: CoupledConfig,
    farmer_config: FarmerConfig,
}

impl FarmingComponent {
    /// Create a component driven by `config`.
    pub fn new(config: CoupledConfig) -> Self {
        let farmer_config = config.farmer_config();
        Self {
            config,
            farmer_config,
        }
    }

    /// The coupling parameters in use.
    pub const fn config(&self) -> &CoupledConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Initialisation
    // -----------------------------------------------------------------------

    /// Create one farmer per cell with nonzero cropland, sort, then link.
    ///
    /// Cells are scanned in world order and each qualifying cell gets the
    /// next farmer ID. The full batch is sorted by harvest date (ties by
    /// ID) before any neighbourhood is formed, and neighbourhoods are
    /// formed in that sorted order against the sorted population.
    ///
    /// Returns the number of farmers created.
    ///
    /// # Errors
    ///
    /// Returns [`FarmingError::AlreadyInitialised`] on a second call,
    /// [`FarmingError::FactoryMismatch`] if the factory ignores the ID or
    /// cell it was given, and [`FarmingError::Agent`] if IDs run out.
    pub fn init_farmers<F>(
        &self,
        ctx: &mut SimulationContext,
        mut factory: F,
    ) -> Result<usize, FarmingError>
    where
        F: FnMut(FarmerId, &Cell) -> Farmer,
    {
        if !ctx.farmers.is_empty() {
            return Err(FarmingError::AlreadyInitialised {
                kind: AgentKind::Farmer,
            });
        }

        let mut farmers = Vec::new();
        let mut skipped: usize = 0;
        for cell in ctx.world.cells() {
            if !cell.has_cropland() {
                skipped = skipped.saturating_add(1);
                continue;
            }
            let id = next_id(&mut ctx.farmer_ids, AgentKind::Farmer)?;
            let farmer = factory(id, cell);
            if farmer.id() != id || farmer.cell_id() != cell.id {
                return Err(FarmingError::FactoryMismatch {
                    kind: AgentKind::Farmer,
                    reason: format!(
                        "asked for farmer {id} on cell {}, got farmer {} on cell {}",
                        cell.id,
                        farmer.id(),
                        farmer.cell_id()
                    ),
                });
            }
            farmers.push(farmer);
        }

        farmers.sort_by(by_harvest_date);

        let population: Vec<NeighbourCandidate> =
            farmers.iter().map(Farmer::as_candidate).collect();
        for farmer in &mut farmers {
            farmer.init_neighbourhood(&population, &self.farmer_config);
            ctx.practices.record(farmer);
        }

        let created = farmers.len();
        ctx.farmers = farmers;

        info!(
            farmers = created,
            cells_without_cropland = skipped,
            pioneers = ctx.practices.farmers_of(Aft::Pioneer).len(),
            "Farmers initialised"
        );
        Ok(created)
    }

    /// Create `coupled_config.num_decision_makers` decision makers.
    ///
    /// Each one is attached to the world right after construction.
    ///
    /// # Errors
    ///
    /// Returns [`FarmingError::AlreadyInitialised`] on a second call,
    /// [`FarmingError::FactoryMismatch`] if the factory ignores the ID, and
    /// [`FarmingError::Agent`] if IDs run out.
    pub fn init_decision_makers<F>(
        &self,
        ctx: &mut SimulationContext,
        mut factory: F,
    ) -> Result<usize, FarmingError>
    where
        F: FnMut(DecisionMakerId) -> DecisionMaker,
    {
        if !ctx.decision_makers.is_empty() {
            return Err(FarmingError::AlreadyInitialised {
                kind: AgentKind::DecisionMaker,
            });
        }

        for _ in 0..self.config.num_decision_makers {
            let id = next_id(&mut ctx.decision_maker_ids, AgentKind::DecisionMaker)?;
            let mut decision_maker = factory(id);
            if decision_maker.id() != id {
                return Err(FarmingError::FactoryMismatch {
                    kind: AgentKind::DecisionMaker,
                    reason: format!("asked for {id}, got {}", decision_maker.id()),
                });
            }
            decision_maker.init_world_attributes(&ctx.world);
            ctx.decision_makers.push(decision_maker);
        }

        info!(
            decision_makers = ctx.decision_makers.len(),
            "Decision makers initialised"
        );
        Ok(ctx.decision_makers.len())
    }

    /// Create one lobby group per AFT, in AFT order.
    ///
    /// Each group is attached to the world immediately and takes its
    /// initial membership from the farmers created so far.
    ///
    /// # Errors
    ///
    /// Returns [`FarmingError::LobbyGroupCount`] if
    /// `coupled_config.num_lobby_groups` is not the number of AFTs,
    /// [`FarmingError::AlreadyInitialised`] on a second call,
    /// [`FarmingError::FactoryMismatch`] if the factory ignores the ID or
    /// AFT, and [`FarmingError::Agent`] if IDs run out.
    pub fn init_lobby_groups<F>(
        &self,
        ctx: &mut SimulationContext,
        mut factory: F,
    ) -> Result<usize, FarmingError>
    where
        F: FnMut(LobbyGroupId, Aft) -> LobbyGroup,
    {
        let afts = Aft::ALL.len();
        if usize::try_from(self.config.num_lobby_groups).ok() != Some(afts) {
            return Err(FarmingError::LobbyGroupCount {
                configured: self.config.num_lobby_groups,
                afts,
            });
        }
        if !ctx.lobby_groups.is_empty() {
            return Err(FarmingError::AlreadyInitialised {
                kind: AgentKind::LobbyGroup,
            });
        }

        for aft in Aft::ALL {
            let id = next_id(&mut ctx.lobby_group_ids, AgentKind::LobbyGroup)?;
            let mut group = factory(id, aft);
            if group.id() != id || group.aft() != aft {
                return Err(FarmingError::FactoryMismatch {
                    kind: AgentKind::LobbyGroup,
                    reason: format!(
                        "asked for group {id} of {}, got group {} of {}",
                        aft.as_str(),
                        group.id(),
                        group.aft().as_str()
                    ),
                });
            }
            group.init_world_attributes(&ctx.world);
            group.update_farmers(&ctx.practices);
            debug!(
                lobby_group_id = %id,
                aft = aft.as_str(),
                members = group.farmer_count(),
                "Lobby group created"
            );
            ctx.lobby_groups.push(group);
        }

        info!(lobby_groups = ctx.lobby_groups.len(), "Lobby groups initialised");
        Ok(ctx.lobby_groups.len())
    }

    // -----------------------------------------------------------------------
    // Per-tick update
    // -----------------------------------------------------------------------

    /// Advance every agent by one tick.
    ///
    /// Farmers run first, in harvest-date order, each recording its
    /// practice as soon as its turn ends. Decision makers and then lobby
    /// groups follow in ascending ID order and see the settled practices.
    ///
    /// # Errors
    ///
    /// Returns [`FarmingError::Agent`] on the first failing agent update.
    /// The tick is then incomplete and must be treated as failed.
    pub fn update(&self, ctx: &mut SimulationContext, tick: u64) -> Result<(), FarmingError> {
        for farmer in &mut ctx.farmers {
            let view = TickContext::new(&ctx.world, &ctx.practices);
            farmer.update(tick, &view)?;
            ctx.practices.record(farmer);
        }

        let view = TickContext::new(&ctx.world, &ctx.practices);
        for decision_maker in &mut ctx.decision_makers {
            decision_maker.update(tick, &view)?;
        }
        for group in &mut ctx.lobby_groups {
            group.update(tick, &view)?;
        }

        debug!(
            tick,
            farmers = ctx.farmers.len(),
            decision_makers = ctx.decision_makers.len(),
            lobby_groups = ctx.lobby_groups.len(),
            "Farming component updated"
        );
        Ok(())
    }
}

impl Default for FarmingComponent {
    fn default() -> Self {
        Self::new(CoupledConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use inseeds_agents::HoldPractice;
    use inseeds_types::{CellId, Tillage};
    use inseeds_world::{CellOutput, World};

    use super::*;
    use crate::factory::{default_decision_maker, default_lobby_group};

    fn cell(id: u64, cftfrac: f64, hdate: f64) -> Cell {
        Cell {
            id: CellId(id),
            lon: 0.0,
            lat: 0.0,
            output: CellOutput {
                cftfrac: vec![cftfrac],
                harvestc: vec![2.0],
                soilc_agr_layer: vec![50.0],
                hdate: vec![hdate],
            },
        }
    }

    fn hold_farmer(id: FarmerId, cell: &Cell) -> Farmer {
        Farmer::new(
            id,
            cell,
            Aft::Traditionalist,
            Some(Tillage::Conventional),
            Arc::new(HoldPractice),
        )
    }

    fn context(cells: Vec<Cell>) -> SimulationContext {
        SimulationContext::new(World::from_cells(cells).unwrap())
    }

    #[test]
    fn default_component_uses_default_counts() {
        let component = FarmingComponent::default();
        assert_eq!(component.config().num_decision_makers, 3);
        assert_eq!(component.config().num_lobby_groups, 2);
    }

    #[test]
    fn farmers_only_on_cropland_cells() {
        let mut ctx = context(vec![
            cell(0, 0.2, 100.0),
            cell(1, 0.0, 100.0),
            cell(2, 0.7, 90.0),
        ]);
        let component = FarmingComponent::default();
        let created = component.init_farmers(&mut ctx, hold_farmer).unwrap();

        assert_eq!(created, 2);
        let cells: Vec<CellId> = ctx.farmers().iter().map(Farmer::cell_id).collect();
        assert_eq!(cells, vec![CellId(2), CellId(0)]);
        assert_eq!(ctx.practices().len(), 2);
    }

    #[test]
    fn second_farmer_init_is_rejected() {
        let mut ctx = context(vec![cell(0, 0.2, 100.0)]);
        let component = FarmingComponent::default();
        component.init_farmers(&mut ctx, hold_farmer).unwrap();
        let again = component.init_farmers(&mut ctx, hold_farmer);
        assert!(matches!(
            again,
            Err(FarmingError::AlreadyInitialised {
                kind: AgentKind::Farmer
            })
        ));
        assert_eq!(ctx.farmers().len(), 1);
    }

    #[test]
    fn factory_ignoring_cell_is_rejected() {
        let mut ctx = context(vec![cell(0, 0.2, 100.0)]);
        let elsewhere = cell(9, 0.2, 100.0);
        let result = FarmingComponent::default()
            .init_farmers(&mut ctx, |id, _cell| hold_farmer(id, &elsewhere));
        assert!(matches!(result, Err(FarmingError::FactoryMismatch { .. })));
    }

    #[test]
    fn decision_maker_count_follows_config() {
        let mut ctx = context(vec![cell(0, 0.2, 100.0)]);
        let component = FarmingComponent::new(CoupledConfig {
            num_decision_makers: 5,
            ..CoupledConfig::default()
        });
        let created = component
            .init_decision_makers(&mut ctx, default_decision_maker)
            .unwrap();
        assert_eq!(created, 5);
        assert!(ctx.decision_makers().iter().all(DecisionMaker::has_world));
        let ids: Vec<u64> = ctx
            .decision_maker_ids()
            .into_iter()
            .map(DecisionMakerId::into_inner)
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn one_lobby_group_per_aft() {
        let mut ctx = context(vec![cell(0, 0.2, 100.0)]);
        let component = FarmingComponent::default();
        component.init_farmers(&mut ctx, hold_farmer).unwrap();
        component
            .init_lobby_groups(&mut ctx, default_lobby_group)
            .unwrap();

        assert_eq!(ctx.lobby_groups().len(), Aft::ALL.len());
        let trad = ctx.lobby_group_for(Aft::Traditionalist).unwrap();
        assert_eq!(trad.farmer_count(), 1);
        assert!(trad.cells().is_some());
        assert_eq!(ctx.lobby_group_for(Aft::Pioneer).unwrap().farmer_count(), 0);
    }

    #[test]
    fn mismatched_lobby_group_count_is_an_error() {
        let mut ctx = context(vec![]);
        let component = FarmingComponent::new(CoupledConfig {
            num_lobby_groups: 3,
            ..CoupledConfig::default()
        });
        let result = component.init_lobby_groups(&mut ctx, default_lobby_group);
        assert!(matches!(
            result,
            Err(FarmingError::LobbyGroupCount {
                configured: 3,
                afts: 2
            })
        ));
        assert!(ctx.lobby_groups().is_empty());
    }

    #[test]
    fn update_on_empty_context_is_a_no_op() {
        let mut ctx = context(vec![]);
        assert!(FarmingComponent::default().update(&mut ctx, 1).is_ok());
    }
}
