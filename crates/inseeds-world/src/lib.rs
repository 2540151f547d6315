//! Grid cells, crop-model outputs, and the world context for the INSEEDS
//! farming simulation.
//!
//! The physical crop and soil simulation is an external collaborator. This
//! crate only models the outputs it exposes per cell and the world that
//! owns the cells.
//!
//! # Modules
//!
//! - [`cell`] -- [`Cell`] and its [`CellOutput`] arrays (cropland fraction,
//!   harvest carbon, soil carbon, harvest dates).
//! - [`error`] -- Error types for world operations.
//! - [`world`] -- [`World`], the ordered cell collection plus optional
//!   country and area metadata.

pub mod cell;
pub mod error;
pub mod world;

// Re-export primary types at crate root.
pub use cell::{Cell, CellOutput, mean};
pub use error::WorldError;
pub use world::World;
