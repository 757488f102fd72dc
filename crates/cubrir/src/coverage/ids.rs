//! Type-safe statement and branch identifiers.
//!
//! These types are intentionally NOT interchangeable: a statement id can
//! never be recorded where a branch edge is expected, and vice versa.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Type-safe executable-statement identifier.
///
/// Assigned in deterministic pre-order by the static analyzer. Cannot be
/// confused with `BranchId` or `BranchEdge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StmtId(u32);

impl StmtId {
    /// Create a new statement ID
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the inner value
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl Hash for StmtId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for StmtId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StmtId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

/// Type-safe branch-decision identifier.
///
/// One per decision point (`if`/`elif` test, `while` test, `for` test).
/// Every decision owns exactly two directional edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchId(u32);

impl BranchId {
    /// Create a new branch decision ID
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the inner value
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl Hash for BranchId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for BranchId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BranchId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

/// A directional control-flow edge: one of a decision's two outcomes.
///
/// Encoded as `(decision << 1) | outcome` in a single u32, so the edge set
/// stays `Copy` and cheap to union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchEdge(u32);

impl BranchEdge {
    /// Create an edge from a decision and its boolean outcome.
    #[inline]
    #[must_use]
    pub const fn new(decision: BranchId, outcome: bool) -> Self {
        Self(decision.0 << 1 | outcome as u32)
    }

    /// The decision this edge belongs to.
    #[inline]
    #[must_use]
    pub const fn decision(self) -> BranchId {
        BranchId(self.0 >> 1)
    }

    /// The directional outcome: `true` for the taken/enter side,
    /// `false` for the not-taken/skip side.
    #[inline]
    #[must_use]
    pub const fn outcome(self) -> bool {
        self.0 & 1 == 1
    }
}

impl Hash for BranchEdge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for BranchEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BranchEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}
