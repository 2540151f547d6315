//! Type-safe identifier wrappers around a `u64` counter value.
//!
//! Every entity in the simulation has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. Agent IDs are handed
//! out by an [`IdSequence`] in strictly increasing creation order, so they
//! double as a reproducible tie-breaker wherever agents are sorted.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around `u64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Return the inner counter value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a grid cell supplied by the crop model.
    CellId
}

define_id! {
    /// Unique identifier for a cell-bound farmer.
    FarmerId
}

define_id! {
    /// Unique identifier for a world-scoped decision maker.
    DecisionMakerId
}

define_id! {
    /// Unique identifier for a world-scoped lobby group.
    LobbyGroupId
}

/// Monotonically increasing source of identifiers of one kind.
///
/// The first call to [`next_id`](Self::next_id) yields `0`. Returns `None`
/// once the counter is exhausted instead of wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence<I> {
    next: u64,
    _kind: PhantomData<I>,
}

impl<I: From<u64>> IdSequence<I> {
    /// Create a sequence starting at zero.
    pub const fn new() -> Self {
        Self {
            next: 0,
            _kind: PhantomData,
        }
    }

    /// Hand out the next identifier.
    pub fn next_id(&mut self) -> Option<I> {
        let id = self.next;
        self.next = self.next.checked_add(1)?;
        Some(I::from(id))
    }
}

impl<I: From<u64>> Default for IdSequence<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let mut seq: IdSequence<FarmerId> = IdSequence::new();
        let a = seq.next_id();
        let b = seq.next_id();
        let c = seq.next_id();
        assert_eq!(a, Some(FarmerId(0)));
        assert_eq!(b, Some(FarmerId(1)));
        assert_eq!(c, Some(FarmerId(2)));
    }

    #[test]
    fn sequence_refuses_to_wrap() {
        let mut seq: IdSequence<LobbyGroupId> = IdSequence {
            next: u64::MAX,
            _kind: PhantomData,
        };
        assert_eq!(seq.next_id(), None);
    }

    #[test]
    fn id_serializes_as_plain_number() {
        let json = serde_json::to_string(&DecisionMakerId(7)).ok();
        assert_eq!(json.as_deref(), Some("7"));
    }

    #[test]
    fn id_display_matches_counter() {
        assert_eq!(CellId(12).to_string(), "12");
    }
}
