// Error types for the fallible edges of the crate.
//
// The reachability check itself never fails: absent voxels, exhausted step
// budgets and out-of-range targets are all ordinary `false` answers. Only
// loading a `ReachConfig` or a stored `PlanArena` can go wrong.

use crate::types::PlanNodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// A stored plan arena whose chains would not be finite and acyclic.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("plan node at index {index} has id {id:?}")]
    MisplacedNode { index: usize, id: PlanNodeId },

    #[error("plan node {node:?} has parent {parent:?}; a parent must precede its child")]
    ParentNotEarlier {
        node: PlanNodeId,
        parent: PlanNodeId,
    },
}
