// Voxel lookup boundary and a dense in-memory world.
//
// `VoxelLookup` is the only thing the ray tracer knows about the world: map
// a continuous point to the voxel containing it, or report that nothing is
// known there. Runtime worlds (chunked, streamed, shared with a game loop)
// implement it on their own storage; the core only reads.
//
// `VoxelWorld` is a dense box of voxels stored as a flat `Vec<VoxelType>`
// indexed by `x + z * size_x + y * size_x * size_z` (relative to `origin`),
// giving O(1) read/write access. Points outside the box are absent: the
// lookup returns `None`, which the tracer treats as transparent. Out-of-bounds
// writes are no-ops.
//
// See also: `raytrace.rs` for the consumer of `VoxelLookup`, `types.rs` for
// `VoxelSample` and the shape classification.

use crate::types::{VoxelCoord, VoxelSample, VoxelType};
use glam::DVec3;

/// Read-only access to world voxels at continuous points.
///
/// Must be safe to call with any point, including far outside loaded
/// space; unknown voxels are `None`, never an error.
pub trait VoxelLookup {
    fn sample(&self, point: DVec3) -> Option<VoxelSample>;
}

/// Dense 3D voxel grid anchored at `origin`.
#[derive(Clone, Debug, Default)]
pub struct VoxelWorld {
    /// Flat storage: index = x + z * size_x + y * size_x * size_z.
    voxels: Vec<VoxelType>,
    /// World coordinate of the grid's minimum corner.
    pub origin: VoxelCoord,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
}

impl VoxelWorld {
    /// Create a new world filled with `Air`, with its minimum corner at
    /// the world origin.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        Self::with_origin(VoxelCoord::new(0, 0, 0), size_x, size_y, size_z)
    }

    /// Create a new world filled with `Air` whose minimum corner is `origin`.
    pub fn with_origin(origin: VoxelCoord, size_x: u32, size_y: u32, size_z: u32) -> Self {
        let total = (size_x as usize) * (size_y as usize) * (size_z as usize);
        Self {
            voxels: vec![VoxelType::Air; total],
            origin,
            size_x,
            size_y,
            size_z,
        }
    }

    /// Check whether a coordinate is within bounds.
    pub fn in_bounds(&self, coord: VoxelCoord) -> bool {
        let (x, y, z) = self.local(coord);
        x >= 0
            && y >= 0
            && z >= 0
            && x < self.size_x as i64
            && y < self.size_y as i64
            && z < self.size_z as i64
    }

    fn local(&self, coord: VoxelCoord) -> (i64, i64, i64) {
        (
            coord.x as i64 - self.origin.x as i64,
            coord.y as i64 - self.origin.y as i64,
            coord.z as i64 - self.origin.z as i64,
        )
    }

    /// Convert a coordinate to a flat index. Returns `None` if out of bounds.
    fn index(&self, coord: VoxelCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            let (x, y, z) = self.local(coord);
            let sx = self.size_x as usize;
            let sz = self.size_z as usize;
            Some(x as usize + z as usize * sx + y as usize * sx * sz)
        } else {
            None
        }
    }

    /// Read a voxel. Returns `None` for out-of-bounds coordinates.
    pub fn get(&self, coord: VoxelCoord) -> Option<VoxelType> {
        self.index(coord).map(|i| self.voxels[i])
    }

    /// Write a voxel. No-op for out-of-bounds coordinates.
    pub fn set(&mut self, coord: VoxelCoord, voxel: VoxelType) {
        if let Some(i) = self.index(coord) {
            self.voxels[i] = voxel;
        }
    }

    /// Fill the inclusive box between `min` and `max` with `voxel`.
    /// Cells outside the world are skipped.
    pub fn fill(&mut self, min: VoxelCoord, max: VoxelCoord, voxel: VoxelType) {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    self.set(VoxelCoord::new(x, y, z), voxel);
                }
            }
        }
    }
}

impl VoxelLookup for VoxelWorld {
    fn sample(&self, point: DVec3) -> Option<VoxelSample> {
        let coord = VoxelCoord::containing(point);
        self.get(coord).map(|voxel| VoxelSample { coord, voxel })
    }
}
