//! Enumeration types for the INSEEDS farming simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Agent functional types
// ---------------------------------------------------------------------------

/// Categorical farmer archetype governing baseline decision tendencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aft {
    /// Conservative farmer, slow to abandon an established practice.
    Traditionalist,
    /// Early adopter, quick to follow a shift in the neighbourhood.
    Pioneer,
}

impl Aft {
    /// Every AFT, in declaration order.
    pub const ALL: [Self; 2] = [Self::Traditionalist, Self::Pioneer];

    /// Lower-case name used in output rows and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Traditionalist => "traditionalist",
            Self::Pioneer => "pioneer",
        }
    }

    /// The practice a farmer of this type starts out with.
    pub const fn initial_tillage(self) -> Tillage {
        match self {
            Self::Traditionalist => Tillage::Conventional,
            Self::Pioneer => Tillage::Conservation,
        }
    }
}

// ---------------------------------------------------------------------------
// Tillage practice
// ---------------------------------------------------------------------------

/// Binary land-management choice.
///
/// Encoded as `0` (conventional) and `1` (conservation) in output tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tillage {
    /// Conventional (full) tillage.
    Conventional,
    /// Conservation (reduced / no) tillage.
    Conservation,
}

impl Tillage {
    /// Numeric code of the practice.
    pub const fn code(self) -> u8 {
        match self {
            Self::Conventional => 0,
            Self::Conservation => 1,
        }
    }

    /// The other practice.
    pub const fn flipped(self) -> Self {
        match self {
            Self::Conventional => Self::Conservation,
            Self::Conservation => Self::Conventional,
        }
    }
}

// ---------------------------------------------------------------------------
// Agent kinds
// ---------------------------------------------------------------------------

/// The three agent tiers of the farming pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Cell-bound farmer.
    Farmer,
    /// World-scoped decision maker.
    DecisionMaker,
    /// World-scoped, AFT-bound lobby group.
    LobbyGroup,
}

impl AgentKind {
    /// Snake-case name used in output rows.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Farmer => "farmer",
            Self::DecisionMaker => "decision_maker",
            Self::LobbyGroup => "lobby_group",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tillage_codes() {
        assert_eq!(Tillage::Conventional.code(), 0);
        assert_eq!(Tillage::Conservation.code(), 1);
    }

    #[test]
    fn flipping_is_an_involution() {
        for t in [Tillage::Conventional, Tillage::Conservation] {
            assert_ne!(t.flipped(), t);
            assert_eq!(t.flipped().flipped(), t);
        }
    }

    #[test]
    fn initial_practice_follows_aft() {
        assert_eq!(Aft::Traditionalist.initial_tillage(), Tillage::Conventional);
        assert_eq!(Aft::Pioneer.initial_tillage(), Tillage::Conservation);
    }

    #[test]
    fn aft_serializes_snake_case() {
        let json = serde_json::to_string(&Aft::Traditionalist).ok();
        assert_eq!(json.as_deref(), Some("\"traditionalist\""));
        let kind = serde_json::to_string(&AgentKind::DecisionMaker).ok();
        assert_eq!(kind.as_deref(), Some("\"decision_maker\""));
    }
}
