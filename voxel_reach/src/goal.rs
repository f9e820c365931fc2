// Search goals: cost estimate plus terminal test.
//
// A path search asks its goal two things about every candidate: how far it
// probably is from done (`heuristic`) and whether it is done (`is_end`).
// `Goal` captures exactly that, and is object-safe so a search can hold
// whichever goal its caller picked as `Box<dyn Goal>`.
//
// Two goals live here:
// - `BlockGoal` — stand on a specific voxel. Its heuristic (octile distance
//   in XZ plus vertical distance) is the standard estimate for block-grid
//   walking.
// - `ReachabilityGoal` — stand anywhere the agent can interact with a
//   target voxel. It composes a `BlockGoal` for the heuristic (the agent
//   still heads toward the block) and a `RayTracer` for the terminal test.
//
// `interact_goal()` is the goal-selection step of the move-to-interact
// behavior: with no target picked there is nothing to search for.
//
// See also: `raytrace.rs` for the line-of-sight test, `plan.rs` for the
// candidate chains the search passes in.

use crate::config::ReachConfig;
use crate::plan::PlanChain;
use crate::raytrace::RayTracer;
use crate::types::VoxelCoord;
use crate::world::VoxelLookup;
use glam::DVec3;
use log::debug;
use std::f64::consts::SQRT_2;

/// What a path search needs from its goal.
pub trait Goal {
    /// Estimated remaining cost from `position`.
    fn heuristic(&self, position: VoxelCoord) -> f64;

    /// Whether the candidate ending in `chain` is an accepted endpoint.
    fn is_end(&self, world: &dyn VoxelLookup, chain: PlanChain<'_>) -> bool;
}

/// Stand exactly on `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockGoal {
    pub target: VoxelCoord,
}

impl BlockGoal {
    pub fn new(target: VoxelCoord) -> Self {
        Self { target }
    }
}

impl Goal for BlockGoal {
    fn heuristic(&self, position: VoxelCoord) -> f64 {
        let dx = (self.target.x - position.x).unsigned_abs() as f64;
        let dy = (self.target.y - position.y).unsigned_abs() as f64;
        let dz = (self.target.z - position.z).unsigned_abs() as f64;
        (dx - dz).abs() + dx.min(dz) * SQRT_2 + dy
    }

    fn is_end(&self, _world: &dyn VoxelLookup, chain: PlanChain<'_>) -> bool {
        chain.position() == self.target
    }
}

/// The agent's body, as far as reach is concerned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentPose {
    /// Eye offset above the floor of the standing voxel.
    pub height: f64,
}

impl AgentPose {
    pub fn new(height: f64) -> Self {
        Self { height }
    }

    pub fn from_config(config: &ReachConfig) -> Self {
        Self::new(config.agent_height)
    }

    /// Eye point when standing in `standing`: horizontally centered, raised
    /// by the agent height.
    pub fn eye_position(&self, standing: VoxelCoord) -> DVec3 {
        DVec3::new(
            standing.x as f64 + 0.5,
            standing.y as f64 + self.height,
            standing.z as f64 + 0.5,
        )
    }
}

/// Accept candidates from which `target` is in reach and in sight.
#[derive(Clone, Debug)]
pub struct ReachabilityGoal {
    block: BlockGoal,
    pose: AgentPose,
    tracer: RayTracer,
}

impl ReachabilityGoal {
    pub fn new(target: VoxelCoord, pose: AgentPose, config: &ReachConfig) -> Self {
        Self {
            block: BlockGoal::new(target),
            pose,
            tracer: RayTracer::new(config),
        }
    }

    pub fn target(&self) -> VoxelCoord {
        self.block.target
    }

    pub fn target_center(&self) -> DVec3 {
        self.block.target.center()
    }

    /// The terminal test: can the agent standing at the head of `chain`
    /// reach the target once every step in the chain has been carried out?
    pub fn accepts(&self, world: &dyn VoxelLookup, chain: PlanChain<'_>) -> bool {
        let standing = chain.position();
        let eye = self.pose.eye_position(standing);
        let reachable = self
            .tracer
            .trace_reachable(world, eye, self.target_center(), self.target(), chain);
        if reachable {
            debug!(
                "interact goal {}: accepted standing at {standing}",
                self.target()
            );
        }
        reachable
    }
}

impl Goal for ReachabilityGoal {
    fn heuristic(&self, position: VoxelCoord) -> f64 {
        self.block.heuristic(position)
    }

    fn is_end(&self, world: &dyn VoxelLookup, chain: PlanChain<'_>) -> bool {
        self.accepts(world, chain)
    }
}

/// Build the goal for moving into interaction range of `target`.
///
/// Returns `None` when no target has been chosen.
pub fn interact_goal(
    target: Option<VoxelCoord>,
    pose: AgentPose,
    config: &ReachConfig,
) -> Option<ReachabilityGoal> {
    target.map(|target| ReachabilityGoal::new(target, pose, config))
}
