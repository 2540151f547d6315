//! Tick cycle: one step of the farming simulation.
//!
//! Each tick runs through these phases:
//!
//! 1. **Cell outputs** -- the [`CellOutputSource`] writes this tick's crop
//!    and soil outputs into the world.
//! 2. **Agents** -- the [`FarmingComponent`] runs its three ordered passes
//!    (farmers, decision makers, lobby groups).
//! 3. **Summary** -- practice counts, lobby-group agreement, and world
//!    averages are gathered into a [`TickSummary`].
//!
//! The cycle is deterministic given the same initial context, behaviours,
//! and cell outputs.

use std::collections::BTreeMap;

use tracing::info;

use inseeds_agents::{AgentError, OutputTable, SimulationAgent};
use inseeds_types::{Aft, AgentKind, Tillage};

use crate::cells::{CellOutputSource, CellSourceError};
use crate::component::{FarmingComponent, FarmingError};
use crate::config::OutputConfig;
use crate::context::SimulationContext;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// Advancing cell outputs failed.
    #[error("cell output error: {source}")]
    CellSource {
        /// The underlying cell source error.
        #[from]
        source: CellSourceError,
    },

    /// An agent pass failed.
    #[error("farming error: {source}")]
    Farming {
        /// The underlying farming error.
        #[from]
        source: FarmingError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Number of farmers.
    pub farmers: usize,
    /// Farmers using conventional tillage at the end of the tick.
    pub conventional: usize,
    /// Farmers using conservation tillage at the end of the tick.
    pub conservation: usize,
    /// Farmers that changed practice during this tick.
    pub switches: usize,
    /// Agreement of each AFT's lobby group.
    pub agreements: BTreeMap<Aft, f64>,
    /// World average crop yield, as seen by the first decision maker.
    pub world_average_cropyield: Option<f64>,
    /// World average topsoil carbon, as seen by the first decision maker.
    pub world_average_soilc: Option<f64>,
}

/// Execute one complete tick.
///
/// # Errors
///
/// Returns [`TickError`] if the cell output source or any agent update
/// fails. The tick is then incomplete.
pub fn run_tick(
    ctx: &mut SimulationContext,
    component: &FarmingComponent,
    cells: &mut dyn CellOutputSource,
    tick: u64,
) -> Result<TickSummary, TickError> {
    cells.advance(tick, ctx.world_mut())?;
    component.update(ctx, tick)?;

    let summary = summarize(ctx, tick);
    info!(
        tick,
        conventional = summary.conventional,
        conservation = summary.conservation,
        switches = summary.switches,
        "Tick complete"
    );
    Ok(summary)
}

/// Gather the summary of the current context state.
pub fn summarize(ctx: &SimulationContext, tick: u64) -> TickSummary {
    let switches = ctx
        .farmers()
        .iter()
        .filter(|f| f.last_switch_tick() == Some(tick))
        .count();
    let agreements = ctx
        .lobby_groups()
        .iter()
        .map(|g| (g.aft(), g.agreement()))
        .collect();
    let first = ctx.decision_makers().first();

    TickSummary {
        tick,
        farmers: ctx.farmers().len(),
        conventional: ctx.count_practice(Tillage::Conventional),
        conservation: ctx.count_practice(Tillage::Conservation),
        switches,
        agreements,
        world_average_cropyield: first.map(|dm| dm.world_average_cropyield(ctx.world())),
        world_average_soilc: first.map(|dm| dm.world_average_soilc(ctx.world())),
    }
}

/// Append every agent's output row for `tick` to `table`.
///
/// Does nothing when output is disabled.
///
/// # Errors
///
/// Returns [`AgentError`] if a farmer's cell is missing from the world.
pub fn record_output(
    ctx: &SimulationContext,
    tick: u64,
    config: &OutputConfig,
    table: &mut OutputTable,
) -> Result<(), AgentError> {
    if !config.enabled {
        return Ok(());
    }
    let world = ctx.world();
    table.extend_from(ctx.farmers(), tick, world, config.farmer_variables.as_deref())?;
    table.extend_from(
        ctx.decision_makers(),
        tick,
        world,
        config.decision_maker_variables.as_deref(),
    )?;
    table.extend_from(
        ctx.lobby_groups(),
        tick,
        world,
        config.lobby_group_variables.as_deref(),
    )?;
    Ok(())
}

/// Number of agents of each tier, in update order.
pub fn agent_counts(ctx: &SimulationContext) -> [(AgentKind, usize); 3] {
    [
        count(ctx.farmers()),
        count(ctx.decision_makers()),
        count(ctx.lobby_groups()),
    ]
}

fn count<A: SimulationAgent>(agents: &[A]) -> (AgentKind, usize) {
    (A::KIND, agents.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use inseeds_agents::{Farmer, HoldPractice};
    use inseeds_types::CellId;
    use inseeds_world::{Cell, CellOutput, World};

    use super::*;
    use crate::cells::{ScheduledCellOutputs, StaticCellOutputs};
    use crate::factory::{default_decision_maker, default_lobby_group};

    fn cell(id: u64, harvest: f64) -> Cell {
        Cell {
            id: CellId(id),
            lon: 0.0,
            lat: 0.0,
            output: CellOutput {
                cftfrac: vec![0.5],
                harvestc: vec![harvest],
                soilc_agr_layer: vec![20.0],
                hdate: vec![150.0],
            },
        }
    }

    fn initialised() -> (SimulationContext, FarmingComponent) {
        let world = World::from_cells([cell(0, 2.0), cell(1, 4.0)]).unwrap();
        let mut ctx = SimulationContext::new(world);
        let component = FarmingComponent::default();
        component
            .init_farmers(&mut ctx, |id, c| {
                Farmer::new(id, c, Aft::Pioneer, Some(Tillage::Conservation), Arc::new(HoldPractice))
            })
            .unwrap();
        component
            .init_decision_makers(&mut ctx, default_decision_maker)
            .unwrap();
        component
            .init_lobby_groups(&mut ctx, default_lobby_group)
            .unwrap();
        (ctx, component)
    }

    #[test]
    fn summary_reports_counts_and_averages() {
        let (mut ctx, component) = initialised();
        let summary = run_tick(&mut ctx, &component, &mut StaticCellOutputs, 1).unwrap();

        assert_eq!(summary.tick, 1);
        assert_eq!(summary.farmers, 2);
        assert_eq!(summary.conservation, 2);
        assert_eq!(summary.switches, 0);
        assert_eq!(summary.agreements.get(&Aft::Pioneer).copied(), Some(1.0));
        assert_eq!(summary.world_average_cropyield, Some(3.0));
        assert_eq!(summary.world_average_soilc, Some(20.0));
    }

    #[test]
    fn cell_outputs_advance_before_agents() {
        let (mut ctx, component) = initialised();
        let mut source = ScheduledCellOutputs::new();
        source.insert(1, CellId(0), CellOutput {
            cftfrac: vec![0.5],
            harvestc: vec![-1.0],
            soilc_agr_layer: vec![20.0],
            hdate: vec![150.0],
        });
        let summary = run_tick(&mut ctx, &component, &mut source, 1).unwrap();
        // Cell 0 no longer qualifies; only cell 1 remains in the average.
        assert_eq!(summary.world_average_cropyield, Some(4.0));
    }

    #[test]
    fn output_rows_cover_every_agent() {
        let (ctx, _) = initialised();
        let mut table = OutputTable::new();
        record_output(&ctx, 0, &OutputConfig::default(), &mut table).unwrap();
        assert_eq!(table.len(), 2 + 3 + 2);

        let disabled = OutputConfig {
            enabled: false,
            ..OutputConfig::default()
        };
        let mut empty = OutputTable::new();
        record_output(&ctx, 0, &disabled, &mut empty).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn counts_follow_update_order() {
        let (ctx, _) = initialised();
        assert_eq!(
            agent_counts(&ctx),
            [
                (AgentKind::Farmer, 2),
                (AgentKind::DecisionMaker, 3),
                (AgentKind::LobbyGroup, 2)
            ]
        );
    }
}
