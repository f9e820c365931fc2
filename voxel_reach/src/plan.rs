// Plan nodes: the chain of pending world edits behind a candidate position.
//
// A path search expands candidate positions step by step. Some steps break
// blocks out of the way or place blocks to stand on; those edits have not
// happened yet when the search evaluates a candidate, so the reachability
// check must consult them instead of the live world.
//
// Nodes live in a `PlanArena` (a `Vec` indexed by `PlanNodeId`, same layout
// as the nav graph's node storage). Each node points at its predecessor by
// id. A parent must already exist when a child is added, so every chain is
// finite and acyclic by construction, and walking it never needs
// shared ownership or mutation. Deserialized arenas are checked for the
// same shape (each node's id is its index, each parent id is smaller)
// before they are accepted.
//
// `PlanChain` is a borrowed, `Copy` view of one candidate: the arena plus
// the head node. Ancestry is walked child -> root, most recent step first.
//
// See also: `raytrace.rs` which resolves obstructions through
// `PlanChain::pending_change()`, `goal.rs` which receives chains from the
// search.

use crate::error::PlanError;
use crate::types::{PlanNodeId, VoxelCoord};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Most steps touch zero, one, or two blocks.
pub type EditSet = SmallVec<[VoxelCoord; 2]>;

/// One step of a candidate plan.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanNode {
    pub id: PlanNodeId,
    /// Where the agent stands after this step.
    pub position: VoxelCoord,
    pub parent: Option<PlanNodeId>,
    /// Voxels this step removes before the agent moves on.
    pub to_break: EditSet,
    /// Voxels this step adds.
    pub to_place: EditSet,
}

/// What a plan intends to do to a voxel before the agent arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingChange {
    Break,
    Place,
}

/// Storage for every plan node the search has created.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "RawPlanArena")]
pub struct PlanArena {
    nodes: Vec<PlanNode>,
}

/// Unchecked wire form of `PlanArena`.
#[derive(Deserialize)]
struct RawPlanArena {
    nodes: Vec<PlanNode>,
}

impl TryFrom<RawPlanArena> for PlanArena {
    type Error = PlanError;

    fn try_from(raw: RawPlanArena) -> Result<Self, PlanError> {
        for (index, node) in raw.nodes.iter().enumerate() {
            if node.id.0 as usize != index {
                return Err(PlanError::MisplacedNode { index, id: node.id });
            }
            if let Some(parent) = node.parent.filter(|parent| parent.0 >= node.id.0) {
                return Err(PlanError::ParentNotEarlier {
                    node: node.id,
                    parent,
                });
            }
        }
        Ok(Self { nodes: raw.nodes })
    }
}

impl PlanArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chain root (the agent's starting position, no edits).
    pub fn add_root(&mut self, position: VoxelCoord) -> PlanNodeId {
        self.push(position, None, EditSet::new(), EditSet::new())
    }

    /// Add a step after `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not in this arena.
    pub fn add_step(
        &mut self,
        parent: PlanNodeId,
        position: VoxelCoord,
        to_break: impl IntoIterator<Item = VoxelCoord>,
        to_place: impl IntoIterator<Item = VoxelCoord>,
    ) -> PlanNodeId {
        assert!(
            (parent.0 as usize) < self.nodes.len(),
            "unknown parent plan node {parent:?}"
        );
        self.push(
            position,
            Some(parent),
            to_break.into_iter().collect(),
            to_place.into_iter().collect(),
        )
    }

    fn push(
        &mut self,
        position: VoxelCoord,
        parent: Option<PlanNodeId>,
        to_break: EditSet,
        to_place: EditSet,
    ) -> PlanNodeId {
        let id = PlanNodeId(self.nodes.len() as u32);
        self.nodes.push(PlanNode {
            id,
            position,
            parent,
            to_break,
            to_place,
        });
        id
    }

    /// Get a node by ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in this arena.
    pub fn node(&self, id: PlanNodeId) -> &PlanNode {
        &self.nodes[id.0 as usize]
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Borrowed view of the chain ending at `head`.
    ///
    /// # Panics
    ///
    /// Panics if `head` is not in this arena.
    pub fn chain(&self, head: PlanNodeId) -> PlanChain<'_> {
        assert!(
            (head.0 as usize) < self.nodes.len(),
            "unknown head plan node {head:?}"
        );
        PlanChain { arena: self, head }
    }
}

/// A candidate plan: a head node and everything before it.
#[derive(Clone, Copy, Debug)]
pub struct PlanChain<'a> {
    arena: &'a PlanArena,
    head: PlanNodeId,
}

impl<'a> PlanChain<'a> {
    pub fn head(&self) -> PlanNodeId {
        self.head
    }

    /// The candidate standing position.
    pub fn position(&self) -> VoxelCoord {
        self.arena.node(self.head).position
    }

    /// Nodes from the head back to the root.
    pub fn ancestry(&self) -> Ancestry<'a> {
        Ancestry {
            arena: self.arena,
            next: Some(self.head),
        }
    }

    /// The most recent planned edit to `coord`, if any.
    ///
    /// Within one node `to_break` is consulted before `to_place`, so a step
    /// that lists a voxel in both counts as a break.
    pub fn pending_change(&self, coord: VoxelCoord) -> Option<PendingChange> {
        for node in self.ancestry() {
            if node.to_break.contains(&coord) {
                return Some(PendingChange::Break);
            }
            if node.to_place.contains(&coord) {
                return Some(PendingChange::Place);
            }
        }
        None
    }
}

/// Iterator over a chain, child -> root.
pub struct Ancestry<'a> {
    arena: &'a PlanArena,
    next: Option<PlanNodeId>,
}

impl<'a> Iterator for Ancestry<'a> {
    type Item = &'a PlanNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.node(self.next?);
        self.next = node.parent;
        Some(node)
    }
}
