// voxel_reach — line-of-sight reachability for voxel path planning.
//
// Answers one question for a path search: standing at a candidate position,
// after carrying out every block break and placement planned on the way
// there, can the agent reach and see a target voxel? The search engine
// itself, and the behavior that picks targets and drives it, live outside
// this crate.
//
// Module overview:
// - `types.rs`:    VoxelCoord, PlanNodeId, VoxelType, BlockShape, VoxelSample.
// - `world.rs`:    VoxelLookup (the read-only world boundary) + dense VoxelWorld.
// - `plan.rs`:     PlanArena / PlanChain — pending edits behind a candidate.
// - `raytrace.rs`: RayTracer — bounded ray march with plan-aware obstruction.
// - `goal.rs`:     Goal trait, BlockGoal, ReachabilityGoal, interact_goal().
// - `config.rs`:   ReachConfig — reach distance, step budget, agent height.
// - `error.rs`:    ConfigError.
//
// **Critical constraint: determinism.** A reachability check is a pure
// function of the world contents, the candidate chain and the config. It
// keeps no state between calls and only ever reads the world.

pub mod config;
pub mod error;
pub mod goal;
pub mod plan;
pub mod raytrace;
pub mod types;
pub mod world;
