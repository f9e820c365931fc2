// Line-of-sight ray march from an eye point to a target voxel.
//
// The tracer walks from `origin` toward the target center in fixed steps,
// samples the voxel under the cursor at each step, and stops at the first
// decisive sample:
// - the target voxel itself: reachable,
// - any other voxel that obstructs: not reachable.
// Samples where the world has no data are skipped; the ray passes through
// unloaded space rather than failing on it.
//
// Obstruction is resolved against the candidate's plan chain before the
// static world: a voxel some step will break is already gone, a voxel some
// step will place is already there. Only voxels the plan never mentions fall
// back to their shape classification.
//
// Unlike the DDA traversal a renderer would use, this is a point-sampling
// march. The step is `(target_center - origin) * step_fraction`, so the
// number of steps across the full offset is constant and resolution drops
// as the target gets farther away. Thin diagonal corners can be skipped
// between samples; callers rely on the exact stepping, so keep it.
//
// See also: `plan.rs` for `PlanChain::pending_change()`, `world.rs` for the
// `VoxelLookup` boundary, `goal.rs` for the goal that wraps this tracer.
//
// **Determinism.** A trace is a pure function of its inputs and the world
// contents; it holds no state between calls.

use crate::config::ReachConfig;
use crate::plan::{PendingChange, PlanChain};
use crate::types::{VoxelCoord, VoxelSample};
use crate::world::VoxelLookup;
use glam::DVec3;
use log::trace;

/// How a trace ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TraceOutcome {
    /// The eye is at least `reach_distance` from the target center. No
    /// voxels were sampled.
    OutOfRange { distance: f64 },
    /// The target voxel was sampled on step `steps` (1-based).
    Hit { steps: u32 },
    /// A voxel other than the target obstructs the ray.
    Blocked { at: VoxelCoord, steps: u32 },
    /// `max_steps` samples without a decisive voxel.
    Exhausted,
}

impl TraceOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, TraceOutcome::Hit { .. })
    }
}

/// Whether `sample` blocks line of sight for the candidate `chain`.
///
/// The nearest step that mentions the voxel decides; `to_break` is checked
/// before `to_place` within a step. Unmentioned voxels obstruct unless their
/// shape is fully passable.
pub fn is_obstruction(sample: &VoxelSample, chain: PlanChain<'_>) -> bool {
    match chain.pending_change(sample.coord) {
        Some(PendingChange::Break) => false,
        Some(PendingChange::Place) => true,
        None => !sample.shape().is_fully_passable(),
    }
}

/// Bounded step-wise ray marcher.
#[derive(Clone, Debug)]
pub struct RayTracer {
    max_steps: u32,
    step_fraction: f64,
    reach_distance: f64,
}

impl Default for RayTracer {
    fn default() -> Self {
        Self::new(&ReachConfig::default())
    }
}

impl RayTracer {
    pub fn new(config: &ReachConfig) -> Self {
        Self {
            max_steps: config.max_steps,
            step_fraction: config.step_fraction,
            reach_distance: config.reach_distance,
        }
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// `true` if `target` can be reached from `origin` without obstruction.
    pub fn trace_reachable<W: VoxelLookup + ?Sized>(
        &self,
        world: &W,
        origin: DVec3,
        target_center: DVec3,
        target: VoxelCoord,
        chain: PlanChain<'_>,
    ) -> bool {
        self.trace(world, origin, target_center, target, chain)
            .is_hit()
    }

    /// Run the march and report how it ended.
    pub fn trace<W: VoxelLookup + ?Sized>(
        &self,
        world: &W,
        origin: DVec3,
        target_center: DVec3,
        target: VoxelCoord,
        chain: PlanChain<'_>,
    ) -> TraceOutcome {
        let distance = origin.distance(target_center);
        // A non-finite offset fails closed; NaN compares false against the limit.
        if !distance.is_finite() || distance >= self.reach_distance {
            trace!("reach {target}: out of range ({distance:.3})");
            return TraceOutcome::OutOfRange { distance };
        }

        let step = (target_center - origin) * self.step_fraction;
        let mut cursor = origin;

        for i in 1..=self.max_steps {
            cursor += step;

            let Some(sample) = world.sample(cursor) else {
                continue;
            };

            if sample.coord == target {
                trace!("reach {target}: hit after {i} steps");
                return TraceOutcome::Hit { steps: i };
            }

            if is_obstruction(&sample, chain) {
                let at = sample.coord;
                trace!("reach {target}: blocked by {at} after {i} steps");
                return TraceOutcome::Blocked { at, steps: i };
            }
        }

        trace!("reach {target}: exhausted {} steps", self.max_steps);
        TraceOutcome::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanArena;
    use crate::types::{PlanNodeId, VoxelType};
    use crate::world::VoxelWorld;
    use std::cell::Cell;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn v(x: i32, y: i32, z: i32) -> VoxelCoord {
        VoxelCoord::new(x, y, z)
    }

    /// Counts every lookup it forwards.
    struct Counting<W> {
        inner: W,
        samples: Cell<u32>,
    }

    impl<W> Counting<W> {
        fn new(inner: W) -> Self {
            Self {
                inner,
                samples: Cell::new(0),
            }
        }
    }

    impl<W: VoxelLookup> VoxelLookup for Counting<W> {
        fn sample(&self, point: DVec3) -> Option<VoxelSample> {
            self.samples.set(self.samples.get() + 1);
            self.inner.sample(point)
        }
    }

    /// A world with no data anywhere.
    struct Unloaded;

    impl VoxelLookup for Unloaded {
        fn sample(&self, _point: DVec3) -> Option<VoxelSample> {
            None
        }
    }

    /// World around the origin scenario: eye at (0, 65, 0), target (0, 64, 3).
    fn scenario_world() -> VoxelWorld {
        let mut world = VoxelWorld::with_origin(v(-8, 56, -8), 16, 16, 16);
        world.set(v(0, 64, 3), VoxelType::Stone);
        world
    }

    const EYE: DVec3 = DVec3::new(0.0, 65.0, 0.0);
    const TARGET: VoxelCoord = VoxelCoord::new(0, 64, 3);

    /// `trace_reachable` from `EYE` to `TARGET`.
    fn reaches(tracer: &RayTracer, world: &VoxelWorld, chain: PlanChain<'_>) -> bool {
        tracer.trace_reachable(world, EYE, TARGET.center(), TARGET, chain)
    }

    fn single_root() -> (PlanArena, PlanNodeId) {
        let mut arena = PlanArena::new();
        let root = arena.add_root(v(0, 64, 0));
        (arena, root)
    }

    #[test]
    fn target_itself_is_a_hit_not_an_obstruction() {
        init_logging();
        let world = scenario_world();
        let (arena, root) = single_root();
        let tracer = RayTracer::default();
        let outcome = tracer.trace(&world, EYE, TARGET.center(), TARGET, arena.chain(root));
        assert_eq!(outcome, TraceOutcome::Hit { steps: 3 });
    }

    #[test]
    fn solid_voxel_in_between_blocks() {
        let mut world = scenario_world();
        world.set(v(0, 64, 1), VoxelType::Dirt);
        let (arena, root) = single_root();
        let tracer = RayTracer::default();
        let outcome = tracer.trace(&world, EYE, TARGET.center(), TARGET, arena.chain(root));
        assert_eq!(
            outcome,
            TraceOutcome::Blocked {
                at: v(0, 64, 1),
                steps: 1
            }
        );
        assert!(!reaches(&tracer, &world, arena.chain(root)));
    }

    #[test]
    fn planned_break_clears_obstruction() {
        let mut world = scenario_world();
        world.set(v(0, 64, 1), VoxelType::Dirt);

        let mut arena = PlanArena::new();
        let root = arena.add_root(v(0, 64, -1));
        let dig = arena.add_step(root, v(0, 64, -1), [v(0, 64, 1)], []);
        let head = arena.add_step(dig, v(0, 64, 0), [], []);

        let tracer = RayTracer::default();
        assert!(reaches(&tracer, &world, arena.chain(head)));
        // The root alone has not broken anything yet.
        assert!(!reaches(&tracer, &world, arena.chain(root)));
    }

    #[test]
    fn planned_place_obstructs_empty_voxel() {
        let world = scenario_world();
        let mut arena = PlanArena::new();
        let root = arena.add_root(v(0, 64, -1));
        let bridge = arena.add_step(root, v(0, 64, 0), [], [v(0, 64, 2)]);

        let tracer = RayTracer::default();
        let outcome = tracer.trace(&world, EYE, TARGET.center(), TARGET, arena.chain(bridge));
        assert_eq!(
            outcome,
            TraceOutcome::Blocked {
                at: v(0, 64, 2),
                steps: 2
            }
        );
    }

    #[test]
    fn water_does_not_obstruct() {
        let mut world = scenario_world();
        world.set(v(0, 64, 1), VoxelType::Water);
        world.set(v(0, 64, 2), VoxelType::Water);
        let (arena, root) = single_root();
        let tracer = RayTracer::default();
        assert!(reaches(&tracer, &world, arena.chain(root)));
    }

    #[test]
    fn out_of_range_samples_nothing() {
        let world = Counting::new(VoxelWorld::new(16, 16, 16));
        let (arena, root) = single_root();
        let tracer = RayTracer::default();
        let target = v(5, 0, 0);
        // Exactly 5 units between eye and target center.
        let origin = DVec3::new(0.5, 0.5, 0.5);
        let outcome = tracer.trace(&world, origin, target.center(), target, arena.chain(root));
        assert_eq!(outcome, TraceOutcome::OutOfRange { distance: 5.0 });
        assert_eq!(world.samples.get(), 0);

        let far = v(12, 9, 3);
        let far_outcome = tracer.trace(&world, origin, far.center(), far, arena.chain(root));
        assert!(matches!(far_outcome, TraceOutcome::OutOfRange { .. }));
        assert_eq!(world.samples.get(), 0);
    }

    #[test]
    fn non_finite_origin_fails_without_sampling() {
        let world = Counting::new(VoxelWorld::new(16, 16, 16));
        let (arena, root) = single_root();
        let tracer = RayTracer::default();
        let target = v(1, 1, 1);
        for origin in [
            DVec3::new(f64::NAN, 1.5, 1.5),
            DVec3::new(1.5, f64::INFINITY, 1.5),
        ] {
            let outcome = tracer.trace(&world, origin, target.center(), target, arena.chain(root));
            assert!(
                matches!(outcome, TraceOutcome::OutOfRange { .. }),
                "origin {origin} should be out of range, got {outcome:?}"
            );
        }
        assert_eq!(world.samples.get(), 0);
    }

    #[test]
    fn adjacent_target_hits_quickly() {
        let mut world = VoxelWorld::new(8, 8, 8);
        let target = v(1, 1, 0);
        world.set(target, VoxelType::Stone);
        let (arena, root) = single_root();
        let tracer = RayTracer::default();
        let outcome = tracer.trace(
            &world,
            DVec3::new(0.5, 1.6, 0.5),
            target.center(),
            target,
            arena.chain(root),
        );
        match outcome {
            TraceOutcome::Hit { steps } => assert!(steps < tracer.max_steps()),
            other => panic!("expected hit, got {other:?}"),
        }
    }

    #[test]
    fn unloaded_world_exhausts_steps_without_failing() {
        let world = Counting::new(Unloaded);
        let (arena, root) = single_root();
        let tracer = RayTracer::default();
        let outcome = tracer.trace(&world, EYE, TARGET.center(), TARGET, arena.chain(root));
        assert_eq!(outcome, TraceOutcome::Exhausted);
        assert_eq!(world.samples.get(), 256);
    }

    #[test]
    fn absent_voxels_are_transparent() {
        // Only the target column is loaded; everything between is unknown.
        let mut world = VoxelWorld::with_origin(v(0, 64, 3), 1, 1, 1);
        world.set(TARGET, VoxelType::Stone);
        let (arena, root) = single_root();
        let tracer = RayTracer::default();
        assert!(reaches(&tracer, &world, arena.chain(root)));
    }

    #[test]
    fn step_budget_bounds_the_march() {
        let world = scenario_world();
        let (arena, root) = single_root();
        let tracer = RayTracer::new(&ReachConfig {
            max_steps: 2,
            ..ReachConfig::default()
        });
        let outcome = tracer.trace(&world, EYE, TARGET.center(), TARGET, arena.chain(root));
        assert_eq!(outcome, TraceOutcome::Exhausted);
    }

    #[test]
    fn trace_is_deterministic() {
        let mut world = scenario_world();
        world.set(v(0, 64, 2), VoxelType::Leaves);
        let mut arena = PlanArena::new();
        let root = arena.add_root(v(0, 64, 0));
        let head = arena.add_step(root, v(0, 64, 0), [v(0, 64, 2)], []);
        let tracer = RayTracer::default();

        let first = tracer.trace(&world, EYE, TARGET.center(), TARGET, arena.chain(head));
        for _ in 0..10 {
            let again = tracer.trace(&world, EYE, TARGET.center(), TARGET, arena.chain(head));
            assert_eq!(first, again);
        }
        assert!(first.is_hit());
    }

    #[test]
    fn is_obstruction_prefers_plan_over_shape() {
        let mut arena = PlanArena::new();
        let root = arena.add_root(v(0, 0, 0));
        let head = arena.add_step(root, v(1, 0, 0), [v(2, 0, 0)], [v(3, 0, 0)]);
        let chain = arena.chain(head);

        let stone = |coord| VoxelSample {
            coord,
            voxel: VoxelType::Stone,
        };
        let air = |coord| VoxelSample {
            coord,
            voxel: VoxelType::Air,
        };

        assert!(!is_obstruction(&stone(v(2, 0, 0)), chain));
        assert!(is_obstruction(&air(v(3, 0, 0)), chain));
        assert!(is_obstruction(&stone(v(4, 0, 0)), chain));
        assert!(!is_obstruction(&air(v(4, 0, 0)), chain));
    }
}
