//! Cell-bound farmers choosing a tillage practice each tick.
//!
//! A farmer is created once per cropland cell, ranked by its average
//! harvest date, linked to a neighbourhood once the whole population is
//! known and sorted, and then updated every tick. The decision itself is
//! delegated to a [`TillageBehaviour`].

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use inseeds_types::{Aft, AgentKind, CellId, FarmerId, Tillage};
use inseeds_world::{Cell, World};

use crate::agent::{AgentScope, SimulationAgent, TickContext};
use crate::behaviour::TillageBehaviour;
use crate::config::FarmerConfig;
use crate::error::AgentError;

/// A farmer's position in the global population, as seen by other farmers
/// forming their neighbourhoods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighbourCandidate {
    /// The candidate farmer.
    pub id: FarmerId,
    /// Longitude of the candidate's cell.
    pub lon: f64,
    /// Latitude of the candidate's cell.
    pub lat: f64,
}

/// A farmer bound to a single grid cell.
#[derive(Debug, Clone)]
pub struct Farmer {
    id: FarmerId,
    cell_id: CellId,
    lon: f64,
    lat: f64,
    aft: Aft,
    tillage: Option<Tillage>,
    avg_hdate: f64,
    neighbourhood: Vec<FarmerId>,
    neighbourhood_formed: bool,
    last_switch_tick: Option<u64>,
    behaviour: Arc<dyn TillageBehaviour>,
}

impl Farmer {
    /// Create a farmer on `cell`.
    ///
    /// The harvest-date ranking key is read from the cell's outputs once,
    /// here, and stays fixed for the farmer's life.
    pub fn new(
        id: FarmerId,
        cell: &Cell,
        aft: Aft,
        tillage: Option<Tillage>,
        behaviour: Arc<dyn TillageBehaviour>,
    ) -> Self {
        Self {
            id,
            cell_id: cell.id,
            lon: cell.lon,
            lat: cell.lat,
            aft,
            tillage,
            avg_hdate: cell.output.mean_harvest_date(),
            neighbourhood: Vec::new(),
            neighbourhood_formed: false,
            last_switch_tick: None,
            behaviour,
        }
    }

    /// The cell this farmer works.
    pub const fn cell_id(&self) -> CellId {
        self.cell_id
    }

    /// Average harvest date, the primary ranking key.
    pub const fn avg_hdate(&self) -> f64 {
        self.avg_hdate
    }

    /// Agent functional type.
    pub const fn aft(&self) -> Aft {
        self.aft
    }

    /// Current practice, if any.
    pub const fn tillage(&self) -> Option<Tillage> {
        self.tillage
    }

    /// IDs of the farmers in this farmer's neighbourhood.
    pub fn neighbourhood(&self) -> &[FarmerId] {
        &self.neighbourhood
    }

    /// Tick at which the farmer last changed practice.
    pub const fn last_switch_tick(&self) -> Option<u64> {
        self.last_switch_tick
    }

    /// This farmer as a neighbourhood candidate for others.
    pub const fn as_candidate(&self) -> NeighbourCandidate {
        NeighbourCandidate {
            id: self.id,
            lon: self.lon,
            lat: self.lat,
        }
    }

    /// Form the neighbourhood from the globally sorted population.
    ///
    /// Candidates are scanned in the given order and taken greedily while
    /// they lie within the configured radius, until the neighbourhood is
    /// full. The result therefore depends on the population order, which
    /// must be the harvest-date order. Only the first call has an effect.
    pub fn init_neighbourhood(&mut self, population: &[NeighbourCandidate], config: &FarmerConfig) {
        if self.neighbourhood_formed {
            return;
        }

        let neighbours: Vec<FarmerId> = population
            .iter()
            .filter(|c| c.id != self.id)
            .filter(|c| {
                (c.lon - self.lon).abs().max((c.lat - self.lat).abs())
                    <= config.neighbourhood_radius_deg
            })
            .take(config.max_neighbours)
            .map(|c| c.id)
            .collect();

        debug!(
            farmer_id = %self.id,
            neighbours = neighbours.len(),
            "Neighbourhood formed"
        );
        self.neighbourhood = neighbours;
        self.neighbourhood_formed = true;
    }
}

/// Harvest-date order: ascending `avg_hdate`, ties broken by creation order.
///
/// Dates that compare equal (including `0.0` and `-0.0`) always fall through
/// to the ID. NaN dates are placed by `total_cmp`.
pub fn by_harvest_date(a: &Farmer, b: &Farmer) -> Ordering {
    a.avg_hdate
        .partial_cmp(&b.avg_hdate)
        .unwrap_or_else(|| a.avg_hdate.total_cmp(&b.avg_hdate))
        .then_with(|| a.id.cmp(&b.id))
}

impl SimulationAgent for Farmer {
    type Id = FarmerId;

    const KIND: AgentKind = AgentKind::Farmer;

    const OUTPUT_VARIABLES: &'static [&'static str] =
        &["tillage", "avg_hdate", "neighbourhood_size", "crop_yield", "soilc"];

    fn id(&self) -> FarmerId {
        self.id
    }

    fn scope(&self) -> AgentScope {
        AgentScope::Cell(self.cell_id)
    }

    fn update(&mut self, tick: u64, ctx: &TickContext<'_>) -> Result<(), AgentError> {
        let next = self.behaviour.decide(tick, self, ctx)?;
        if next != self.tillage {
            debug!(
                tick,
                farmer_id = %self.id,
                from = ?self.tillage,
                to = ?next,
                "Farmer switched practice"
            );
            self.last_switch_tick = Some(tick);
        }
        self.tillage = next;
        Ok(())
    }

    fn output_value(&self, name: &str, world: &World) -> Option<f64> {
        match name {
            "tillage" => self.tillage.map(|t| f64::from(t.code())),
            "avg_hdate" => Some(self.avg_hdate),
            "neighbourhood_size" => u32::try_from(self.neighbourhood.len()).ok().map(f64::from),
            "crop_yield" => world.cell(self.cell_id)?.output.mean_harvest(),
            "soilc" => world.cell(self.cell_id)?.output.topsoil_carbon(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use inseeds_world::CellOutput;

    use super::*;
    use crate::behaviour::HoldPractice;
    use crate::ledger::PracticeLedger;

    fn cell_at(id: u64, lon: f64, lat: f64, hdate: f64) -> Cell {
        Cell {
            id: CellId(id),
            lon,
            lat,
            output: CellOutput {
                cftfrac: vec![0.5],
                harvestc: vec![3.0],
                soilc_agr_layer: vec![60.0],
                hdate: vec![hdate],
            },
        }
    }

    fn farmer_at(id: u64, lon: f64, lat: f64, hdate: f64) -> Farmer {
        Farmer::new(
            FarmerId(id),
            &cell_at(id, lon, lat, hdate),
            Aft::Traditionalist,
            Some(Tillage::Conventional),
            Arc::new(HoldPractice),
        )
    }

    #[test]
    fn harvest_date_read_from_cell() {
        let f = farmer_at(0, 0.0, 0.0, 212.0);
        assert!((f.avg_hdate() - 212.0).abs() < 1e-12);
        assert_eq!(f.scope(), AgentScope::Cell(CellId(0)));
    }

    #[test]
    fn sort_breaks_ties_by_creation_order() {
        let mut farmers = vec![
            farmer_at(3, 0.0, 0.0, 200.0),
            farmer_at(1, 0.0, 0.0, 200.0),
            farmer_at(2, 0.0, 0.0, 150.0),
        ];
        farmers.sort_by(by_harvest_date);
        let ids: Vec<FarmerId> = farmers.iter().map(Farmer::id).collect();
        assert_eq!(ids, vec![FarmerId(2), FarmerId(1), FarmerId(3)]);
    }

    #[test]
    fn signed_zero_dates_tie_by_creation_order() {
        let positive = farmer_at(1, 0.0, 0.0, 0.0);
        let negative = farmer_at(3, 0.0, 0.0, -0.0);
        assert!(negative.avg_hdate().is_sign_negative());

        let mut farmers = vec![negative, positive];
        farmers.sort_by(by_harvest_date);
        let ids: Vec<FarmerId> = farmers.iter().map(Farmer::id).collect();
        assert_eq!(ids, vec![FarmerId(1), FarmerId(3)]);
    }

    #[test]
    fn neighbourhood_respects_radius_order_and_cap() {
        let config = FarmerConfig {
            neighbourhood_radius_deg: 1.0,
            max_neighbours: 2,
            ..FarmerConfig::default()
        };
        let mut me = farmer_at(0, 10.0, 50.0, 100.0);
        let population = [
            me.as_candidate(),
            NeighbourCandidate { id: FarmerId(4), lon: 10.5, lat: 50.5 },
            NeighbourCandidate { id: FarmerId(5), lon: 13.0, lat: 50.0 },
            NeighbourCandidate { id: FarmerId(2), lon: 9.0, lat: 49.0 },
            NeighbourCandidate { id: FarmerId(1), lon: 10.0, lat: 50.5 },
        ];

        me.init_neighbourhood(&population, &config);
        assert_eq!(me.neighbourhood(), &[FarmerId(4), FarmerId(2)]);

        // A second call does not re-link.
        me.init_neighbourhood(&[], &config);
        assert_eq!(me.neighbourhood().len(), 2);
    }

    #[test]
    fn hold_practice_keeps_tillage() {
        let world = World::new();
        let ledger = PracticeLedger::new();
        let ctx = TickContext::new(&world, &ledger);
        let mut f = farmer_at(0, 0.0, 0.0, 100.0);

        assert!(f.update(1, &ctx).is_ok());
        assert_eq!(f.tillage(), Some(Tillage::Conventional));
        assert_eq!(f.last_switch_tick(), None);
    }

    #[test]
    fn output_values_read_own_cell() {
        let world = World::from_cells([cell_at(0, 0.0, 0.0, 100.0)]).unwrap_or_default();
        let f = farmer_at(0, 0.0, 0.0, 100.0);
        assert_eq!(f.output_value("tillage", &world), Some(0.0));
        assert_eq!(f.output_value("crop_yield", &world), Some(3.0));
        assert_eq!(f.output_value("soilc", &world), Some(60.0));
        assert_eq!(f.output_value("unknown", &world), None);
    }
}
