//! Shared type definitions for the INSEEDS farming simulation.
//!
//! This crate is the single source of truth for the identifiers and
//! categorical values used across the workspace.
//!
//! # Modules
//!
//! - [`ids`] -- Counter-backed identifiers for cells and agents, plus the
//!   [`IdSequence`] that hands them out in creation order
//! - [`enums`] -- Agent functional types, tillage practices, agent kinds

pub mod enums;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use enums::{AgentKind, Aft, Tillage};
pub use ids::{CellId, DecisionMakerId, FarmerId, IdSequence, LobbyGroupId};
