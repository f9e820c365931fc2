// Core types shared across the reachability crate.
//
// Defines spatial coordinates (`VoxelCoord`), plan-node identifiers, the
// world material enum (`VoxelType`), and the shape descriptor used to decide
// whether a voxel can be seen through (`BlockShape`). All plain-data types
// derive `Serialize` and `Deserialize` so fixtures and configs can be stored
// as JSON.
//
// Continuous positions (eye points, ray cursors) are `glam::DVec3`. The ray
// march accumulates a step vector many times, so f64 keeps cell boundaries
// stable for targets a few voxels away.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position in the 3D voxel grid. Each component is in voxel units.
///
/// The coordinate system uses right-handed conventions:
/// - X: east  (positive) / west  (negative)
/// - Y: up    (positive) / down  (negative)
/// - Z: south (positive) / north (negative)
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The voxel containing a continuous point (each axis floored).
    pub fn containing(point: DVec3) -> Self {
        Self {
            x: point.x.floor() as i32,
            y: point.y.floor() as i32,
            z: point.z.floor() as i32,
        }
    }

    /// Center of this voxel in world space.
    pub fn center(self) -> DVec3 {
        DVec3::new(
            self.x as f64 + 0.5,
            self.y as f64 + 0.5,
            self.z as f64 + 0.5,
        )
    }

    /// Manhattan distance between two coordinates.
    pub fn manhattan_distance(self, other: Self) -> u32 {
        ((self.x - other.x).unsigned_abs())
            + ((self.y - other.y).unsigned_abs())
            + ((self.z - other.z).unsigned_abs())
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Plan graph IDs — simple integers for compactness.
// ---------------------------------------------------------------------------

/// Compact identifier for a node in a `PlanArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanNodeId(pub u32);

// ---------------------------------------------------------------------------
// Voxel types
// ---------------------------------------------------------------------------

/// Collision shape of a voxel, as far as line of sight is concerned.
///
/// Only whole-cell shapes exist today. Partial shapes (slabs, stairs,
/// fences) would be new variants; callers go through
/// `is_fully_passable()` rather than matching, so adding one does not
/// change the ray tracer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockShape {
    /// No collision box at all.
    Empty,
    /// Occupies the whole cell.
    Full,
}

impl BlockShape {
    pub fn is_fully_passable(self) -> bool {
        match self {
            BlockShape::Empty => true,
            BlockShape::Full => false,
        }
    }
}

/// The material/type of a single voxel in the world grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoxelType {
    #[default]
    Air,
    Water,
    Dirt,
    Stone,
    Wood,
    Leaves,
    Glass,
}

impl VoxelType {
    /// Fluids have no bounding box, so they never block reach.
    pub fn shape(self) -> BlockShape {
        match self {
            VoxelType::Air | VoxelType::Water => BlockShape::Empty,
            VoxelType::Dirt
            | VoxelType::Stone
            | VoxelType::Wood
            | VoxelType::Leaves
            | VoxelType::Glass => BlockShape::Full,
        }
    }

    pub fn is_solid(self) -> bool {
        !self.shape().is_fully_passable()
    }
}

/// What the world reports for the voxel containing a sampled point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoxelSample {
    pub coord: VoxelCoord,
    pub voxel: VoxelType,
}

impl VoxelSample {
    pub fn shape(&self) -> BlockShape {
        self.voxel.shape()
    }
}
