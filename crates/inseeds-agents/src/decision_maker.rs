//! World-scoped decision makers.
//!
//! A decision maker is not tied to any cell. It aggregates crop-model
//! outputs across the world and holds a belief score in `[-1, 1]`. The
//! belief update algorithm is an extension point: [`update`] currently
//! leaves the belief untouched.
//!
//! [`update`]: SimulationAgent::update

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use inseeds_types::{AgentKind, CellId, DecisionMakerId};
use inseeds_world::{Cell, World};

use crate::agent::{AgentScope, SimulationAgent, TickContext};
use crate::error::AgentError;

/// Value returned by world averages when no cell qualifies.
///
/// Strictly positive so the behavioural model can divide by, or take the
/// logarithm of, an average without special-casing empty worlds.
pub const AGGREGATE_EPSILON: f64 = 1e-3;

/// Upper bound of a belief score.
pub const BELIEF_MAX: Decimal = Decimal::ONE;

/// Lower bound of a belief score.
pub const BELIEF_MIN: Decimal = Decimal::NEGATIVE_ONE;

/// A world-level decision maker.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionMaker {
    id: DecisionMakerId,
    belief_value: Decimal,
    /// Cells aggregated over; `None` until world attributes are initialised.
    all_cells: Option<Vec<CellId>>,
}

impl DecisionMaker {
    /// Create a decision maker with neutral belief and no world attached.
    pub const fn new(id: DecisionMakerId) -> Self {
        Self {
            id,
            belief_value: Decimal::ZERO,
            all_cells: None,
        }
    }

    /// Cache the world's cell list. Until this is called every world
    /// average reports [`AGGREGATE_EPSILON`].
    pub fn init_world_attributes(&mut self, world: &World) {
        self.all_cells = Some(world.cell_ids());
    }

    /// Whether world attributes have been initialised.
    pub const fn has_world(&self) -> bool {
        self.all_cells.is_some()
    }

    /// Current belief score.
    pub const fn belief_value(&self) -> Decimal {
        self.belief_value
    }

    /// Shift the belief by `delta`, clamped to `[-1, 1]`.
    ///
    /// Returns the old and the new belief.
    pub fn adjust_belief(&mut self, delta: Decimal) -> Result<(Decimal, Decimal), AgentError> {
        let old = self.belief_value;
        let raw = old
            .checked_add(delta)
            .ok_or_else(|| AgentError::ArithmeticOverflow {
                context: String::from("decision maker belief addition overflow"),
            })?;
        self.belief_value = clamp_belief(raw);
        Ok((old, self.belief_value))
    }

    /// Mean per-cell crop yield over cells with a strictly positive mean.
    ///
    /// Non-positive cells are excluded entirely rather than counted as
    /// zero. Returns [`AGGREGATE_EPSILON`] when no cell qualifies or world
    /// attributes are not initialised.
    pub fn world_average_cropyield(&self, world: &World) -> f64 {
        self.positive_mean(world, |cell| cell.output.mean_harvest())
    }

    /// Mean topsoil carbon over cells with a strictly positive value, with
    /// the same exclusion and fallback policy as
    /// [`world_average_cropyield`](Self::world_average_cropyield).
    pub fn world_average_soilc(&self, world: &World) -> f64 {
        self.positive_mean(world, |cell| cell.output.topsoil_carbon())
    }

    fn positive_mean(&self, world: &World, value: impl Fn(&Cell) -> Option<f64>) -> f64 {
        let Some(cells) = &self.all_cells else {
            return AGGREGATE_EPSILON;
        };
        let qualifying: Vec<f64> = cells
            .iter()
            .filter_map(|&id| world.cell(id))
            .filter_map(&value)
            .filter(|v| *v > 0.0)
            .collect();
        inseeds_world::mean(&qualifying).unwrap_or(AGGREGATE_EPSILON)
    }
}

impl SimulationAgent for DecisionMaker {
    type Id = DecisionMakerId;

    const KIND: AgentKind = AgentKind::DecisionMaker;

    const OUTPUT_VARIABLES: &'static [&'static str] = &[
        "belief_value",
        "world_average_cropyield",
        "world_average_soilc",
    ];

    fn id(&self) -> DecisionMakerId {
        self.id
    }

    fn scope(&self) -> AgentScope {
        AgentScope::World
    }

    fn update(&mut self, _tick: u64, _ctx: &TickContext<'_>) -> Result<(), AgentError> {
        Ok(())
    }

    fn output_value(&self, name: &str, world: &World) -> Option<f64> {
        match name {
            "belief_value" => self.belief_value.to_f64(),
            "world_average_cropyield" => Some(self.world_average_cropyield(world)),
            "world_average_soilc" => Some(self.world_average_soilc(world)),
            _ => None,
        }
    }
}

/// Clamp a belief score to the valid range [-1.0, 1.0].
fn clamp_belief(belief: Decimal) -> Decimal {
    if belief > BELIEF_MAX {
        BELIEF_MAX
    } else if belief < BELIEF_MIN {
        BELIEF_MIN
    } else {
        belief
    }
}
