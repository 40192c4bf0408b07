//! # Coordinate Module
//!
//! Conversions between world-space positions and the chunk grid, plus the
//! world bounds checks used by streaming and terrain generation.
//!
//! Chunk coordinates are derived by truncating division, so positions with a
//! negative component round toward zero rather than toward negative infinity.

use cgmath::Point3;

use crate::config::WorldConfig;

/// Identifies one chunk column on the horizontal grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoordinate {
    /// X coordinate, in chunks
    pub x: i32,
    /// Z coordinate, in chunks
    pub z: i32,
}

impl ChunkCoordinate {
    /// Creates a new chunk coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkCoordinate { x, z }
    }

    /// Largest per-axis distance between two coordinates.
    pub fn chebyshev_distance(self, other: ChunkCoordinate) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// World-space voxel position of this chunk's (0, 0, 0) corner.
    pub fn origin(self, chunk_width: i32) -> Point3<i32> {
        Point3::new(self.x * chunk_width, 0, self.z * chunk_width)
    }
}

impl WorldConfig {
    /// The chunk containing a world position.
    ///
    /// Used for exact containment queries such as routing an edit to its chunk.
    pub fn to_chunk_coordinate(&self, position: Point3<f32>) -> ChunkCoordinate {
        self.voxel_to_chunk_coordinate(position.x as i32, position.z as i32)
    }

    /// The chunk containing an integer voxel position.
    pub fn voxel_to_chunk_coordinate(&self, x: i32, z: i32) -> ChunkCoordinate {
        ChunkCoordinate::new(x / self.chunk_width, z / self.chunk_width)
    }

    /// The chunk coordinate used to centre the view window on the observer.
    ///
    /// Offset by half a chunk, so the window only moves once the observer is
    /// half a chunk past a boundary.
    pub fn to_midpoint_chunk_coordinate(&self, position: Point3<f32>) -> ChunkCoordinate {
        let half_width = self.chunk_width / 2;
        ChunkCoordinate::new(
            (position.x as i32).saturating_add(half_width) / self.chunk_width,
            (position.z as i32).saturating_add(half_width) / self.chunk_width,
        )
    }

    /// Whether a chunk coordinate may be streamed in.
    ///
    /// Both bounds are exclusive, so the row and column at coordinate 0 are
    /// never part of the view window.
    pub fn is_chunk_in_world(&self, coordinate: ChunkCoordinate) -> bool {
        coordinate.x > 0
            && coordinate.x < self.map_size_in_chunks
            && coordinate.z > 0
            && coordinate.z < self.map_size_in_chunks
    }

    /// Whether a voxel position lies inside the map and the chunk height.
    pub fn is_voxel_in_world(&self, x: i32, y: i32, z: i32) -> bool {
        let map_size = self.map_size_in_voxels();
        (0..map_size).contains(&x)
            && (0..self.chunk_height).contains(&y)
            && (0..map_size).contains(&z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WorldConfig {
        WorldConfig {
            chunk_width: 16,
            map_size_in_chunks: 10,
            chunk_height: 64,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn chunk_coordinate_truncates_toward_zero() {
        let config = config();
        assert_eq!(
            config.to_chunk_coordinate(Point3::new(31.9, 5.0, 16.0)),
            ChunkCoordinate::new(1, 1)
        );
        assert_eq!(
            config.to_chunk_coordinate(Point3::new(-5.0, 0.0, -17.0)),
            ChunkCoordinate::new(0, -1)
        );
    }

    #[test]
    fn midpoint_coordinate_moves_half_a_chunk_late() {
        let config = config();
        assert_eq!(
            config.to_midpoint_chunk_coordinate(Point3::new(23.0, 0.0, 0.0)),
            ChunkCoordinate::new(1, 0)
        );
        assert_eq!(
            config.to_midpoint_chunk_coordinate(Point3::new(24.0, 0.0, 0.0)),
            ChunkCoordinate::new(2, 0)
        );
    }

    #[test]
    fn midpoint_coordinate_saturates_far_from_the_origin() {
        let config = config();
        let edge = i32::MAX / config.chunk_width;
        assert_eq!(
            config.to_midpoint_chunk_coordinate(Point3::new(f32::MAX, 0.0, 3.0e9)),
            ChunkCoordinate::new(edge, edge)
        );
        assert!(!config.is_chunk_in_world(ChunkCoordinate::new(edge, edge)));
    }

    #[test]
    fn chunk_bounds_exclude_zero_and_map_edge() {
        let config = config();
        assert!(!config.is_chunk_in_world(ChunkCoordinate::new(0, 5)));
        assert!(!config.is_chunk_in_world(ChunkCoordinate::new(5, 10)));
        assert!(config.is_chunk_in_world(ChunkCoordinate::new(1, 9)));
    }

    #[test]
    fn voxel_bounds_include_zero() {
        let config = config();
        assert!(config.is_voxel_in_world(0, 0, 0));
        assert!(config.is_voxel_in_world(159, 63, 159));
        assert!(!config.is_voxel_in_world(160, 0, 0));
        assert!(!config.is_voxel_in_world(0, 64, 0));
        assert!(!config.is_voxel_in_world(0, -1, 0));
    }

    #[test]
    fn chebyshev_distance_takes_the_larger_axis() {
        let a = ChunkCoordinate::new(10, 10);
        assert_eq!(a.chebyshev_distance(ChunkCoordinate::new(20, 12)), 10);
        assert_eq!(a.chebyshev_distance(ChunkCoordinate::new(7, 4)), 6);
    }
}
