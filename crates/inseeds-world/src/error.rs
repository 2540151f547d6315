//! Error types for the `inseeds-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use inseeds_types::CellId;

/// Errors that can occur during world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A cell was not found in the world.
    #[error("cell not found: {0}")]
    CellNotFound(CellId),

    /// A duplicate cell was inserted where uniqueness is required.
    #[error("duplicate cell id: {0}")]
    DuplicateCell(CellId),
}
