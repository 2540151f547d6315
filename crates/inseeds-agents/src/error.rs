//! Error types for the inseeds-agents crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! Missing data on the aggregation paths is not an error: those paths fall
//! back to documented defaults instead.

use inseeds_types::{AgentKind, FarmerId};

/// Errors that can occur during agent operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A farmer referenced by ID has no entry in the practice ledger.
    #[error("farmer not found: {0}")]
    FarmerNotFound(FarmerId),

    /// A world lookup failed (e.g. a farmer's cell is gone).
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: inseeds_world::WorldError,
    },

    /// The ID counter for an agent kind ran out.
    #[error("identifier space exhausted for {kind:?}")]
    IdExhausted {
        /// The agent kind whose sequence overflowed.
        kind: AgentKind,
    },

    /// An arithmetic overflow occurred during a belief update.
    #[error("arithmetic overflow in belief computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// Serializing an output table failed.
    #[error("output serialization failed: {source}")]
    Output {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
