//! Node lifecycle: declared, bound to a backend, realized.
//!
//! A node only ever moves forward through these states. The state is derived
//! from what the node holds (a backend counterpart, a pending payload), never
//! stored.

use std::fmt;

/// Where a node stands in the declare-then-run lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Configuration only; no backend counterpart yet.
    Declared,
    /// A backend counterpart was minted but has not been created yet.
    Bound,
    /// The payload was handed to the backend and released.
    Realized,
}

impl Lifecycle {
    /// Derive the state from what a node currently holds.
    pub fn from_parts(has_backend: bool, has_pending_properties: bool) -> Self {
        match (has_backend, has_pending_properties) {
            (_, false) => Lifecycle::Realized,
            (true, true) => Lifecycle::Bound,
            (false, true) => Lifecycle::Declared,
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Lifecycle::Declared => "declared",
            Lifecycle::Bound => "bound",
            Lifecycle::Realized => "realized",
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts() {
        assert_eq!(Lifecycle::from_parts(false, true), Lifecycle::Declared);
        assert_eq!(Lifecycle::from_parts(true, true), Lifecycle::Bound);
        assert_eq!(Lifecycle::from_parts(true, false), Lifecycle::Realized);
    }

    #[test]
    fn display() {
        assert_eq!(Lifecycle::Bound.to_string(), "bound");
    }
}
