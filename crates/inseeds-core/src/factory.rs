//! Default agent factories.
//!
//! The farming component never decides how an agent is built: it hands an
//! identifier (and a cell or AFT) to a factory closure. This module
//! provides the factories the engine uses by default.
//!
//! The default farmer factory assigns each farmer an AFT drawn
//! deterministically from the world seed and the cell ID, so the same seed
//! always yields the same population no matter in which order cells are
//! scanned. Pioneers start with conservation tillage, traditionalists with
//! conventional tillage.

use std::sync::Arc;

use inseeds_agents::{
    DecisionMaker, Farmer, FarmerConfig, HoldPractice, LobbyGroup, NeighbourImitation,
    TillageBehaviour,
};
use inseeds_types::{Aft, DecisionMakerId, FarmerId, LobbyGroupId};
use inseeds_world::Cell;

use crate::config::{BehaviourKind, SimulationConfig};

/// Resolution of the pioneer roll.
const ROLL_SCALE: u32 = 1_000_000;

/// Builds farmers with a seeded AFT draw and a shared behaviour.
#[derive(Debug, Clone)]
pub struct DefaultFarmerFactory {
    seed: u64,
    pioneer_share: f64,
    behaviour: Arc<dyn TillageBehaviour>,
}

impl DefaultFarmerFactory {
    /// Create a factory from its parts.
    pub fn new(seed: u64, pioneer_share: f64, behaviour: Arc<dyn TillageBehaviour>) -> Self {
        Self {
            seed,
            pioneer_share,
            behaviour,
        }
    }

    /// Create the factory described by `config`.
    pub fn from_config(config: &SimulationConfig) -> Self {
        let coupled = &config.coupled_config;
        Self::new(
            config.world.seed,
            coupled.pioneer_share,
            behaviour_for(coupled.behaviour, &coupled.farmer_config()),
        )
    }

    /// The AFT a farmer on `cell` receives.
    pub fn aft_for(&self, cell: &Cell) -> Aft {
        let random = deterministic_random(self.seed, cell.id.into_inner());
        let roll = random.checked_rem(u64::from(ROLL_SCALE)).unwrap_or(0);
        let roll = u32::try_from(roll).unwrap_or(0);
        if f64::from(roll) / f64::from(ROLL_SCALE) < self.pioneer_share {
            Aft::Pioneer
        } else {
            Aft::Traditionalist
        }
    }

    /// Build the farmer with `id` on `cell`.
    pub fn build(&self, id: FarmerId, cell: &Cell) -> Farmer {
        let aft = self.aft_for(cell);
        Farmer::new(
            id,
            cell,
            aft,
            Some(aft.initial_tillage()),
            Arc::clone(&self.behaviour),
        )
    }
}

/// The behaviour selected by `kind`.
pub fn behaviour_for(kind: BehaviourKind, config: &FarmerConfig) -> Arc<dyn TillageBehaviour> {
    match kind {
        BehaviourKind::Imitation => Arc::new(NeighbourImitation::from_config(config)),
        BehaviourKind::Hold => Arc::new(HoldPractice),
    }
}

/// Default decision maker: neutral belief.
pub const fn default_decision_maker(id: DecisionMakerId) -> DecisionMaker {
    DecisionMaker::new(id)
}

/// Default lobby group: empty, bound to `aft`.
pub const fn default_lobby_group(id: LobbyGroupId, aft: Aft) -> LobbyGroup {
    LobbyGroup::new(id, aft)
}

/// Deterministic pseudo-random number from a seed and a salt.
///
/// Uses xorshift64 so the draw is reproducible across platforms and runs.
const fn deterministic_random(seed: u64, salt: u64) -> u64 {
    let mut state = seed.wrapping_add(salt.wrapping_mul(0x517c_c1b7_2722_0a95));

    // xorshift has a fixed point at zero.
    if state == 0 {
        state = 0xdead_beef_cafe_babe;
    }

    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;

    state
}
