//! Tunable parameters for farmer neighbourhoods and practice imitation.
//!
//! These values correspond to the `coupled_config` section of
//! `inseeds-config.yaml`. The [`FarmerConfig`] struct bundles every tunable
//! so that callers (farming component, tests) can override defaults.

/// Configuration for farmer neighbourhood formation and practice imitation.
///
/// The farming component constructs this from `inseeds-config.yaml` at
/// simulation start and hands it to farmers and behaviours.
#[derive(Debug, Clone, PartialEq)]
pub struct FarmerConfig {
    /// Maximum Chebyshev distance, in degrees, between a farmer's cell and
    /// a neighbour's cell (default: 1.0).
    pub neighbourhood_radius_deg: f64,

    /// Maximum neighbourhood size (default: 8).
    pub max_neighbours: usize,

    /// Neighbourhood majority share a traditionalist needs before switching
    /// practice (default: 0.75).
    pub imitation_threshold_traditionalist: f64,

    /// Neighbourhood majority share a pioneer needs before switching
    /// practice (default: 0.5).
    pub imitation_threshold_pioneer: f64,
}

impl Default for FarmerConfig {
    fn default() -> Self {
        Self {
            neighbourhood_radius_deg: 1.0,
            max_neighbours: 8,
            imitation_threshold_traditionalist: 0.75,
            imitation_threshold_pioneer: 0.5,
        }
    }
}
