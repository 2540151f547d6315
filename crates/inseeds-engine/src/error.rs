//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and simulation execution.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: inseeds_core::config::ConfigError,
    },

    /// World construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: inseeds_world::WorldError,
    },

    /// Agent initialisation failed.
    #[error("farming error: {source}")]
    Farming {
        /// The underlying farming error.
        #[from]
        source: inseeds_core::component::FarmingError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: inseeds_core::runner::RunnerError,
    },

    /// Building or serializing output rows failed.
    #[error("output error: {source}")]
    Output {
        /// The underlying agent error.
        #[from]
        source: inseeds_agents::AgentError,
    },

    /// Writing the output file failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The landscape section is missing values or out of range.
    #[error("landscape error: {message}")]
    Landscape {
        /// Description of the landscape failure.
        message: String,
    },
}
