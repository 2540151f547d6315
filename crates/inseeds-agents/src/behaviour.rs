//! Tillage behaviour: the seam to the farmer decision model.
//!
//! Once per tick each farmer asks its [`TillageBehaviour`] which practice
//! to use next. The full planned-behaviour model lives outside this
//! workspace; two simple deterministic behaviours ship here:
//!
//! - [`HoldPractice`] keeps whatever the farmer currently does.
//! - [`NeighbourImitation`] adopts the neighbourhood majority once its
//!   share reaches an AFT-specific threshold.

use std::fmt;

use inseeds_types::{Aft, Tillage};

use crate::agent::TickContext;
use crate::config::FarmerConfig;
use crate::error::AgentError;
use crate::farmer::Farmer;

/// A source of practice decisions for farmers.
///
/// Implementations receive the deciding farmer read-only together with the
/// tick context. The ledger in the context already holds this tick's
/// practice of every farmer updated earlier in harvest-date order.
pub trait TillageBehaviour: fmt::Debug {
    /// Decide the farmer's practice for `tick`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] if the decision cannot be made at all.
    fn decide(
        &self,
        tick: u64,
        farmer: &Farmer,
        ctx: &TickContext<'_>,
    ) -> Result<Option<Tillage>, AgentError>;
}

/// A behaviour that never changes practice.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldPractice;

impl TillageBehaviour for HoldPractice {
    fn decide(
        &self,
        _tick: u64,
        farmer: &Farmer,
        _ctx: &TickContext<'_>,
    ) -> Result<Option<Tillage>, AgentError> {
        Ok(farmer.tillage())
    }
}

/// Follow the neighbourhood once enough of it agrees.
///
/// Counts the practices of the farmer's neighbours (neighbours without a
/// practice are ignored). If one practice holds a strict majority and its
/// share reaches the threshold for the farmer's AFT, the farmer adopts it.
/// Otherwise the current practice is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighbourImitation {
    /// Share required by traditionalists.
    pub traditionalist_threshold: f64,
    /// Share required by pioneers.
    pub pioneer_threshold: f64,
}

impl NeighbourImitation {
    /// Build the behaviour from farmer configuration.
    pub const fn from_config(config: &FarmerConfig) -> Self {
        Self {
            traditionalist_threshold: config.imitation_threshold_traditionalist,
            pioneer_threshold: config.imitation_threshold_pioneer,
        }
    }

    const fn threshold(&self, aft: Aft) -> f64 {
        match aft {
            Aft::Traditionalist => self.traditionalist_threshold,
            Aft::Pioneer => self.pioneer_threshold,
        }
    }
}

impl TillageBehaviour for NeighbourImitation {
    fn decide(
        &self,
        _tick: u64,
        farmer: &Farmer,
        ctx: &TickContext<'_>,
    ) -> Result<Option<Tillage>, AgentError> {
        let mut conventional: u32 = 0;
        let mut conservation: u32 = 0;
        for &neighbour in farmer.neighbourhood() {
            let entry = ctx
                .practices
                .get(neighbour)
                .ok_or(AgentError::FarmerNotFound(neighbour))?;
            match entry.tillage {
                Some(Tillage::Conventional) => conventional = conventional.saturating_add(1),
                Some(Tillage::Conservation) => conservation = conservation.saturating_add(1),
                None => {}
            }
        }

        let (majority, count) = match conventional.cmp(&conservation) {
            std::cmp::Ordering::Greater => (Tillage::Conventional, conventional),
            std::cmp::Ordering::Less => (Tillage::Conservation, conservation),
            std::cmp::Ordering::Equal => return Ok(farmer.tillage()),
        };

        let total = f64::from(conventional.saturating_add(conservation));
        let share = f64::from(count) / total;
        if share >= self.threshold(farmer.aft()) {
            Ok(Some(majority))
        } else {
            Ok(farmer.tillage())
        }
    }
}
