//! Practice ledger: the current AFT and tillage of every farmer.
//!
//! Farmers record themselves here at the end of their own turn, so anything
//! reading the ledger later in the tick (neighbours further down the
//! harvest-date order, lobby groups) sees post-update practices.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use inseeds_types::{Aft, FarmerId, Tillage};

use crate::agent::SimulationAgent;
use crate::farmer::Farmer;

/// The ledger's view of one farmer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeEntry {
    /// The farmer's functional type.
    pub aft: Aft,
    /// The farmer's current practice, if it has one.
    pub tillage: Option<Tillage>,
}

/// Current practice of every farmer, keyed by farmer ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PracticeLedger {
    entries: BTreeMap<FarmerId, PracticeEntry>,
}

impl PracticeLedger {
    /// Create an empty ledger.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Record (or overwrite) a farmer's current practice.
    pub fn record(&mut self, farmer: &Farmer) {
        self.entries.insert(
            farmer.id(),
            PracticeEntry {
                aft: farmer.aft(),
                tillage: farmer.tillage(),
            },
        );
    }

    /// Look up a farmer's entry.
    pub fn get(&self, id: FarmerId) -> Option<PracticeEntry> {
        self.entries.get(&id).copied()
    }

    /// A farmer's current practice; `None` if unknown or without practice.
    pub fn tillage_of(&self, id: FarmerId) -> Option<Tillage> {
        self.entries.get(&id).and_then(|e| e.tillage)
    }

    /// IDs of all farmers of the given AFT, in ascending ID order.
    pub fn farmers_of(&self, aft: Aft) -> Vec<FarmerId> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.aft == aft)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Number of farmers currently using `tillage`.
    pub fn count_practice(&self, tillage: Tillage) -> usize {
        self.entries
            .values()
            .filter(|e| e.tillage == Some(tillage))
            .count()
    }

    /// Number of recorded farmers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no farmer is recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use inseeds_types::CellId;
    use inseeds_world::Cell;

    use super::*;
    use crate::behaviour::HoldPractice;

    fn farmer(id: u64, aft: Aft, tillage: Option<Tillage>) -> Farmer {
        let cell = Cell::new(CellId(id), 0.0, 0.0);
        Farmer::new(FarmerId(id), &cell, aft, tillage, Arc::new(HoldPractice))
    }

    #[test]
    fn record_and_filter_by_aft() {
        let mut ledger = PracticeLedger::new();
        ledger.record(&farmer(2, Aft::Pioneer, Some(Tillage::Conservation)));
        ledger.record(&farmer(0, Aft::Traditionalist, Some(Tillage::Conventional)));
        ledger.record(&farmer(1, Aft::Pioneer, None));

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.farmers_of(Aft::Pioneer), vec![FarmerId(1), FarmerId(2)]);
        assert_eq!(ledger.farmers_of(Aft::Traditionalist), vec![FarmerId(0)]);
        assert_eq!(ledger.tillage_of(FarmerId(1)), None);
        assert_eq!(ledger.count_practice(Tillage::Conservation), 1);
    }

    #[test]
    fn record_overwrites_previous_entry() {
        let mut ledger = PracticeLedger::new();
        ledger.record(&farmer(0, Aft::Pioneer, Some(Tillage::Conventional)));
        ledger.record(&farmer(0, Aft::Pioneer, Some(Tillage::Conservation)));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.tillage_of(FarmerId(0)), Some(Tillage::Conservation));
    }
}
