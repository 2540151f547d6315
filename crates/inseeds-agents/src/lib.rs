//! Farmers, decision makers, and lobby groups for the INSEEDS farming
//! simulation.
//!
//! This crate contains the logic layer for agents -- everything that
//! operates on agent state without touching I/O. It sits between
//! `inseeds-world` (cells and crop-model outputs) and `inseeds-core`
//! (creation order and tick orchestration).
//!
//! # Modules
//!
//! - [`agent`] -- The shared [`SimulationAgent`] capability and [`TickContext`]
//! - [`behaviour`] -- [`TillageBehaviour`] seam to the farmer decision model
//! - [`config`] -- Neighbourhood and imitation parameters ([`FarmerConfig`])
//! - [`decision_maker`] -- World-scoped [`DecisionMaker`] and world averages
//! - [`error`] -- Error types for all agent operations ([`AgentError`])
//! - [`farmer`] -- Cell-bound [`Farmer`], harvest-date ranking, neighbourhoods
//! - [`ledger`] -- [`PracticeLedger`] of every farmer's current practice
//! - [`lobby_group`] -- AFT-bound [`LobbyGroup`] and agreement
//! - [`output`] -- Per-tick [`OutputRow`]s and [`OutputTable`]

pub mod agent;
pub mod behaviour;
pub mod config;
pub mod decision_maker;
pub mod error;
pub mod farmer;
pub mod ledger;
pub mod lobby_group;
pub mod output;

// Re-export primary types at crate root for convenience.
pub use agent::{AgentScope, SimulationAgent, TickContext};
pub use behaviour::{HoldPractice, NeighbourImitation, TillageBehaviour};
pub use config::FarmerConfig;
pub use decision_maker::{AGGREGATE_EPSILON, DecisionMaker};
pub use error::AgentError;
pub use farmer::{Farmer, NeighbourCandidate, by_harvest_date};
pub use ledger::{PracticeEntry, PracticeLedger};
pub use lobby_group::{LobbyGroup, VACUOUS_AGREEMENT, agreement_of};
pub use output::{OutputRow, OutputTable, WORLD_CELL, output_row};
