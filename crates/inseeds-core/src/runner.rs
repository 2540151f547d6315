//! Simulation loop runner.
//!
//! This module provides [`run_simulation`], which drives the tick loop for
//! a bounded number of ticks and notifies a [`TickCallback`] after every
//! completed tick. The runner wraps the single-tick [`run_tick`] function
//! and stops on the first failing tick.
//!
//! [`run_tick`]: crate::tick::run_tick

use tracing::info;

use inseeds_agents::{AgentError, OutputTable};

use crate::cells::CellOutputSource;
use crate::component::FarmingComponent;
use crate::config::OutputConfig;
use crate::context::SimulationContext;
use crate::tick::{self, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },

    /// A tick callback failed.
    #[error("tick callback failed at tick {tick}: {source}")]
    Callback {
        /// The tick whose callback failed.
        tick: u64,
        /// The underlying agent error.
        source: AgentError,
    },
}

/// Result of the simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
pub trait TickCallback {
    /// Called after a tick completes successfully.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] to abort the run.
    fn on_tick(&mut self, summary: &TickSummary, ctx: &SimulationContext) -> Result<(), AgentError>;
}

/// A no-op tick callback for testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _ctx: &SimulationContext) -> Result<(), AgentError> {
        Ok(())
    }
}

/// Collects every agent's output row after each tick.
#[derive(Debug, Clone, Default)]
pub struct OutputCollector {
    config: OutputConfig,
    table: OutputTable,
}

impl OutputCollector {
    /// Create a collector that honours `config`.
    pub const fn new(config: OutputConfig) -> Self {
        Self {
            config,
            table: OutputTable::new(),
        }
    }

    /// Record the rows of the current state as `tick`, outside the loop.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] if a row cannot be built.
    pub fn record(&mut self, ctx: &SimulationContext, tick: u64) -> Result<(), AgentError> {
        tick::record_output(ctx, tick, &self.config, &mut self.table)
    }

    /// Rows collected so far.
    pub const fn table(&self) -> &OutputTable {
        &self.table
    }

    /// Consume the collector, returning its rows.
    pub fn into_table(self) -> OutputTable {
        self.table
    }
}

impl TickCallback for OutputCollector {
    fn on_tick(&mut self, summary: &TickSummary, ctx: &SimulationContext) -> Result<(), AgentError> {
        self.record(ctx, summary.tick)
    }
}

/// Run ticks `1..=max_ticks`.
///
/// # Errors
///
/// Returns [`RunnerError`] on the first failing tick or callback.
pub fn run_simulation(
    ctx: &mut SimulationContext,
    component: &FarmingComponent,
    cells: &mut dyn CellOutputSource,
    max_ticks: u64,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut final_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks,
        farmers = ctx.farmers().len(),
        decision_makers = ctx.decision_makers().len(),
        lobby_groups = ctx.lobby_groups().len(),
        "Simulation starting"
    );

    for tick in 1..=max_ticks {
        let summary = tick::run_tick(ctx, component, cells, tick)?;
        total_ticks = total_ticks.saturating_add(1);

        callback
            .on_tick(&summary, ctx)
            .map_err(|source| RunnerError::Callback { tick, source })?;

        final_summary = Some(summary);
    }

    Ok(SimulationResult {
        final_summary,
        total_ticks,
    })
}

/// Log the simulation end.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        final_conservation = result.final_summary.as_ref().map(|s| s.conservation),
        final_conventional = result.final_summary.as_ref().map(|s| s.conventional),
        "Simulation ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use inseeds_types::CellId;
    use inseeds_world::{Cell, CellOutput, World};

    use super::*;
    use crate::cells::StaticCellOutputs;
    use crate::factory::{DefaultFarmerFactory, default_decision_maker, default_lobby_group};
    use crate::config::SimulationConfig;

    fn ready() -> (SimulationContext, FarmingComponent) {
        let cells = (0..6).map(|i| Cell {
            id: CellId(i),
            lon: f64::from(u32::try_from(i).unwrap()) * 0.5,
            lat: 0.0,
            output: CellOutput {
                cftfrac: vec![0.3],
                harvestc: vec![1.5],
                soilc_agr_layer: vec![10.0],
                hdate: vec![f64::from(u32::try_from(i).unwrap()) + 100.0],
            },
        });
        let mut ctx = SimulationContext::new(World::from_cells(cells).unwrap());
        let config = SimulationConfig::default();
        let component = FarmingComponent::new(config.coupled_config.clone());
        let factory = DefaultFarmerFactory::from_config(&config);
        component
            .init_farmers(&mut ctx, |id, cell| factory.build(id, cell))
            .unwrap();
        component
            .init_decision_makers(&mut ctx, default_decision_maker)
            .unwrap();
        component
            .init_lobby_groups(&mut ctx, default_lobby_group)
            .unwrap();
        (ctx, component)
    }

    struct Failing;

    impl TickCallback for Failing {
        fn on_tick(&mut self, _: &TickSummary, _: &SimulationContext) -> Result<(), AgentError> {
            Err(AgentError::ArithmeticOverflow {
                context: String::from("test"),
            })
        }
    }

    #[test]
    fn runs_exactly_max_ticks() {
        let (mut ctx, component) = ready();
        let result = run_simulation(
            &mut ctx,
            &component,
            &mut StaticCellOutputs,
            4,
            &mut NoOpCallback,
        )
        .unwrap();
        assert_eq!(result.total_ticks, 4);
        assert_eq!(result.final_summary.map(|s| s.tick), Some(4));
    }

    #[test]
    fn zero_ticks_has_no_summary() {
        let (mut ctx, component) = ready();
        let result = run_simulation(
            &mut ctx,
            &component,
            &mut StaticCellOutputs,
            0,
            &mut NoOpCallback,
        )
        .unwrap();
        assert_eq!(result.total_ticks, 0);
        assert!(result.final_summary.is_none());
    }

    #[test]
    fn collector_gathers_rows_per_tick() {
        let (mut ctx, component) = ready();
        let mut collector = OutputCollector::new(OutputConfig::default());
        collector.record(&ctx, 0).unwrap();
        run_simulation(&mut ctx, &component, &mut StaticCellOutputs, 2, &mut collector).unwrap();

        let per_tick = 6 + 3 + 2;
        assert_eq!(collector.table().len(), per_tick * 3);
        let ticks: Vec<u64> = collector.into_table().rows().iter().map(|r| r.tick).collect();
        assert_eq!(ticks.first().copied(), Some(0));
        assert_eq!(ticks.last().copied(), Some(2));
    }

    #[test]
    fn callback_failure_stops_the_run() {
        let (mut ctx, component) = ready();
        let result = run_simulation(&mut ctx, &component, &mut StaticCellOutputs, 5, &mut Failing);
        assert!(matches!(result, Err(RunnerError::Callback { tick: 1, .. })));
    }
}
