//! Configuration, agent lifecycle, and tick orchestration for the INSEEDS
//! farming simulation.
//!
//! This crate owns the three-pass tick that drives the agent tiers:
//! farmers in harvest-date order, then decision makers, then lobby groups.
//!
//! # Modules
//!
//! - [`cells`] -- [`CellOutputSource`] seam to the external crop model and
//!   the [`StaticCellOutputs`] stand-in.
//! - [`component`] -- [`FarmingComponent`]: agent creation and per-tick
//!   update ordering.
//! - [`config`] -- Configuration loading from `inseeds-config.yaml` into
//!   strongly-typed structs.
//! - [`context`] -- [`SimulationContext`], the explicit owner of the world
//!   and every agent.
//! - [`factory`] -- Default factories for farmers, decision makers, and
//!   lobby groups.
//! - [`runner`] -- Bounded simulation loop with a per-tick callback.
//! - [`tick`] -- A single tick and its [`TickSummary`].
//!
//! [`CellOutputSource`]: cells::CellOutputSource
//! [`StaticCellOutputs`]: cells::StaticCellOutputs
//! [`FarmingComponent`]: component::FarmingComponent
//! [`SimulationContext`]: context::SimulationContext
//! [`TickSummary`]: tick::TickSummary

pub mod cells;
pub mod component;
pub mod config;
pub mod context;
pub mod factory;
pub mod runner;
pub mod tick;
