//! # Chunk Module
//!
//! This module provides the `Chunk` struct: one `width × height × width`
//! column of voxels addressed by a [`ChunkCoordinate`], together with its
//! local queue of deferred edits.
//!
//! ## Lifecycle
//!
//! A chunk starts `Unbuilt`, is `Building` while its terrain is generated,
//! and is `Active` once `initialized` is set. As the view window moves it
//! toggles between `Active` and `OutOfView`; it is never destroyed.
//!
//! ## Storage
//!
//! - `blocks`: dense storage, one [`Block`] per voxel, x fastest then z then y
//! - `solid_array`: one bit per voxel, set for every non-air block
//!
//! ### Performance Characteristics
//! - **Solidity Check**: O(1) - Just check the bit in `solid_array`
//! - **Block Lookup**: O(1) - Direct index into `blocks`
//! - **Edit**: O(1), deferred until the next rebuild

use std::collections::VecDeque;

use bitvec::prelude::BitVec;
use cgmath::Point3;
use chunk_creation::ChunkCreationIterator;
use log::trace;

use super::block::block_type::BlockType;
use super::block::Block;
use super::coordinates::ChunkCoordinate;
use super::modifications::VoxelMod;
use super::terrain::TerrainGenerator;

pub mod chunk_creation;

/// Where a chunk is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Allocated but not yet generated
    Unbuilt,
    /// Terrain generation in progress
    Building,
    /// Generated and inside the view window
    Active,
    /// Generated but retained outside the view window
    OutOfView,
}

/// A column of voxels in the world.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not voxel coordinates).
    pub coordinate: ChunkCoordinate,

    /// Set once terrain generation has completed.
    pub initialized: bool,

    state: ChunkState,
    width: i32,
    height: i32,

    /// A bit vector where each bit represents whether the corresponding block is solid (1) or air (0).
    solid_array: BitVec,

    /// Dense block data, indexed by [`Chunk::local_index`].
    blocks: Vec<Block>,

    /// Edits routed to this chunk, applied in order on the next rebuild.
    modifications: VecDeque<VoxelMod>,

    /// Bumped every time the chunk is rebuilt.
    mesh_revision: u32,
}

impl Chunk {
    /// Creates an unbuilt chunk with no voxel storage.
    ///
    /// # Arguments
    /// * `coordinate` - The chunk coordinates of the new chunk
    /// * `width` - Chunk width (and depth) in voxels
    /// * `height` - Chunk height in voxels
    pub fn new(coordinate: ChunkCoordinate, width: i32, height: i32) -> Self {
        Chunk {
            coordinate,
            initialized: false,
            state: ChunkState::Unbuilt,
            width,
            height,
            solid_array: BitVec::new(),
            blocks: Vec::new(),
            modifications: VecDeque::new(),
            mesh_revision: 0,
        }
    }

    /// Generates the terrain of this chunk and marks it initialized.
    ///
    /// Trees rooted inside the chunk are emitted into `structures` rather than
    /// written directly, since their canopy may overhang neighbouring chunks.
    ///
    /// # Arguments
    /// * `generator` - The terrain function to sample
    /// * `structures` - Receives the edits of every tree rooted in this chunk
    pub fn initialize(
        &mut self,
        generator: &TerrainGenerator,
        structures: &mut impl Extend<VoxelMod>,
    ) {
        self.state = ChunkState::Building;

        let origin = self.coordinate.origin(self.width);
        let mut cci = ChunkCreationIterator::new(self.width as usize, self.height as usize);
        while let Some(local) = cci.next_position() {
            let world = Point3::new(origin.x + local.x, local.y, origin.z + local.z);
            cci.push_block_type(generator.generate_voxel(world, structures));
        }

        let (blocks, solid_array) = cci.return_storage();
        self.blocks = blocks;
        self.solid_array = solid_array;
        self.initialized = true;
        self.state = ChunkState::Active;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChunkState {
        self.state
    }

    /// Whether the chunk is currently presented.
    pub fn is_visible(&self) -> bool {
        self.state == ChunkState::Active
    }

    /// Marks the chunk as inside (`true`) or outside (`false`) the view window.
    ///
    /// Has no effect on a chunk that has not finished generating.
    pub fn set_visible(&mut self, visible: bool) {
        if !self.initialized {
            return;
        }
        self.state = if visible {
            ChunkState::Active
        } else {
            ChunkState::OutOfView
        };
    }

    /// Returns the stored block at a world voxel position.
    ///
    /// Positions outside this chunk, or queried before initialization, are air.
    pub fn get_voxel(&self, position: Point3<i32>) -> BlockType {
        self.local_index_of(position)
            .and_then(|index| self.blocks.get(index))
            .map_or(BlockType::AIR, |block| block.block_type())
    }

    /// Checks if the block at a world voxel position is non-air.
    pub fn is_voxel_solid(&self, position: Point3<i32>) -> bool {
        self.local_index_of(position)
            .and_then(|index| self.solid_array.get(index).map(|bit| *bit))
            .unwrap_or(false)
    }

    /// Appends an edit to this chunk's local queue.
    pub fn queue_modification(&mut self, modification: VoxelMod) {
        self.modifications.push_back(modification);
    }

    /// Edits waiting for the next rebuild, oldest first.
    pub fn pending_modifications(&self) -> &VecDeque<VoxelMod> {
        &self.modifications
    }

    /// Number of times this chunk has been rebuilt.
    pub fn mesh_revision(&self) -> u32 {
        self.mesh_revision
    }

    /// Applies every queued edit to the voxel storage and bumps the mesh revision.
    ///
    /// Edits that fall outside this chunk's bounds are discarded.
    ///
    /// # Returns
    /// The number of edits written into the chunk.
    pub fn rebuild(&mut self) -> usize {
        let mut applied = 0;
        while let Some(modification) = self.modifications.pop_front() {
            match self.local_index_of(modification.position) {
                Some(index) => {
                    self.blocks[index] = Block::new(modification.block_type);
                    self.solid_array.set(index, !modification.block_type.is_air());
                    applied += 1;
                }
                None => trace!(
                    "Discarding edit at {:?} outside chunk {:?}",
                    modification.position,
                    self.coordinate
                ),
            }
        }
        self.mesh_revision = self.mesh_revision.wrapping_add(1);
        applied
    }

    /// Index into the storage for a world position, if the chunk holds it.
    fn local_index_of(&self, position: Point3<i32>) -> Option<usize> {
        if !self.initialized {
            return None;
        }
        let origin = self.coordinate.origin(self.width);
        let local_x = position.x - origin.x;
        let local_z = position.z - origin.z;
        let in_bounds = (0..self.width).contains(&local_x)
            && (0..self.width).contains(&local_z)
            && (0..self.height).contains(&position.y);
        in_bounds.then(|| Self::local_index(self.width, local_x, position.y, local_z))
    }

    fn local_index(width: i32, x: i32, y: i32, z: i32) -> usize {
        (x + width * (z + width * y)) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::engine_state::voxels::biome::Biome;

    fn flat_generator(config: &WorldConfig) -> TerrainGenerator {
        let biome = Biome {
            solid_ground_height: 8,
            terrain_height: 0,
            water_height: 0,
            sand_depth: 0,
            stone_height: 1000,
            tree_zone_height: 1000,
            lodes: Vec::new(),
            ..Biome::default()
        };
        TerrainGenerator::new(config, biome)
    }

    fn config() -> WorldConfig {
        WorldConfig {
            chunk_width: 4,
            chunk_height: 16,
            map_size_in_chunks: 8,
            ..WorldConfig::default()
        }
    }

    fn built_chunk(coordinate: ChunkCoordinate) -> Chunk {
        let config = config();
        let mut chunk = Chunk::new(coordinate, config.chunk_width, config.chunk_height);
        let mut structures: Vec<VoxelMod> = Vec::new();
        chunk.initialize(&flat_generator(&config), &mut structures);
        chunk
    }

    #[test]
    fn initialize_moves_through_building_to_active() {
        let config = config();
        let mut chunk = Chunk::new(ChunkCoordinate::new(2, 3), config.chunk_width, config.chunk_height);
        assert_eq!(chunk.state(), ChunkState::Unbuilt);
        assert!(!chunk.initialized);
        assert_eq!(chunk.get_voxel(Point3::new(8, 8, 12)), BlockType::AIR);

        let mut structures: Vec<VoxelMod> = Vec::new();
        chunk.initialize(&flat_generator(&config), &mut structures);
        assert!(chunk.initialized);
        assert_eq!(chunk.state(), ChunkState::Active);
    }

    #[test]
    fn stored_voxels_match_the_generator() {
        let chunk = built_chunk(ChunkCoordinate::new(2, 3));
        assert_eq!(chunk.get_voxel(Point3::new(9, 0, 13)), BlockType::BEDROCK);
        assert_eq!(chunk.get_voxel(Point3::new(9, 8, 13)), BlockType::GRASS);
        assert_eq!(chunk.get_voxel(Point3::new(9, 6, 13)), BlockType::DIRT);
        assert_eq!(chunk.get_voxel(Point3::new(9, 12, 13)), BlockType::AIR);
        assert!(chunk.is_voxel_solid(Point3::new(9, 8, 13)));
        // Neighbouring chunk's column
        assert_eq!(chunk.get_voxel(Point3::new(12, 8, 13)), BlockType::AIR);
    }

    #[test]
    fn rebuild_applies_edits_in_order() {
        let mut chunk = built_chunk(ChunkCoordinate::new(1, 1));
        let target = Point3::new(5, 10, 6);
        chunk.queue_modification(VoxelMod::new(target, BlockType::WOOD));
        chunk.queue_modification(VoxelMod::new(target, BlockType::LEAVES));
        chunk.queue_modification(VoxelMod::new(Point3::new(5, 8, 6), BlockType::AIR));

        assert_eq!(chunk.rebuild(), 3);
        assert_eq!(chunk.get_voxel(target), BlockType::LEAVES);
        assert!(!chunk.is_voxel_solid(Point3::new(5, 8, 6)));
        assert!(chunk.pending_modifications().is_empty());
        assert_eq!(chunk.mesh_revision(), 1);
    }

    #[test]
    fn rebuild_discards_edits_outside_the_column() {
        let mut chunk = built_chunk(ChunkCoordinate::new(1, 1));
        chunk.queue_modification(VoxelMod::new(Point3::new(5, 40, 6), BlockType::LEAVES));
        chunk.queue_modification(VoxelMod::new(Point3::new(-1, 5, 6), BlockType::LEAVES));
        assert_eq!(chunk.rebuild(), 0);
    }

    #[test]
    fn visibility_toggles_state() {
        let mut chunk = built_chunk(ChunkCoordinate::new(1, 1));
        chunk.set_visible(false);
        assert_eq!(chunk.state(), ChunkState::OutOfView);
        assert!(!chunk.is_visible());
        chunk.set_visible(true);
        assert_eq!(chunk.state(), ChunkState::Active);
    }
}
