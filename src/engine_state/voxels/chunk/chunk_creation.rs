//! # Chunk Creation Module
//!
//! This module provides a builder that fills a chunk column voxel by voxel,
//! keeping the dense block storage and the solidity bit vector in step.
//!
//! Voxels are pushed in storage order: x fastest, then z, then y, so a whole
//! horizontal layer is completed before moving up.

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::engine_state::voxels::block::{block_type::BlockType, Block};

/// A builder for populating a chunk column in storage order.
///
/// The builder ensures that `blocks` and `solid_array` remain consistent as
/// blocks are added, and reports the local position the next block belongs to.
pub struct ChunkCreationIterator {
    width: usize,
    height: usize,
    /// Dense block storage, one entry per voxel
    blocks: Vec<Block>,
    /// One bit per voxel, set for every non-air block
    solid_array: BitVec,
    /// Current X position within the chunk
    local_x: usize,
    /// Current Y position within the chunk
    local_y: usize,
    /// Current Z position within the chunk
    local_z: usize,
}

impl ChunkCreationIterator {
    /// Creates a builder for a column of `width × height × width` voxels.
    pub fn new(width: usize, height: usize) -> Self {
        let capacity = width * width * height;
        ChunkCreationIterator {
            width,
            height,
            blocks: Vec::with_capacity(capacity),
            solid_array: BitVec::with_capacity(capacity),
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }

    /// The local position the next pushed block will occupy, or `None` once
    /// the column is full.
    pub fn next_position(&self) -> Option<Point3<i32>> {
        if self.local_y >= self.height {
            return None;
        }
        Some(Point3::new(
            self.local_x as i32,
            self.local_y as i32,
            self.local_z as i32,
        ))
    }

    /// Adds a block at the current position and advances the position.
    ///
    /// Pushing past the end of the column is ignored.
    pub fn push_block_type(&mut self, block_type: BlockType) {
        if self.local_y >= self.height {
            return;
        }

        self.solid_array.push(!block_type.is_air());
        self.blocks.push(Block::new(block_type));

        // Move to the next position
        self.local_x += 1;

        // Handle end of row (X boundary)
        if self.local_x == self.width {
            self.local_x = 0;
            self.local_z += 1;

            // Handle end of layer (Z boundary)
            if self.local_z == self.width {
                self.local_z = 0;
                self.local_y += 1;
            }
        }
    }

    /// Finalizes the column and returns its storage.
    ///
    /// Any voxels never pushed are filled with air.
    pub fn return_storage(mut self) -> (Vec<Block>, BitVec) {
        while self.next_position().is_some() {
            self.push_block_type(BlockType::AIR);
        }
        (self.blocks, self.solid_array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_advance_x_then_z_then_y() {
        let mut cci = ChunkCreationIterator::new(2, 2);
        let mut visited = Vec::new();
        while let Some(position) = cci.next_position() {
            visited.push((position.x, position.y, position.z));
            cci.push_block_type(BlockType::DIRT);
        }
        assert_eq!(
            visited,
            vec![
                (0, 0, 0),
                (1, 0, 0),
                (0, 0, 1),
                (1, 0, 1),
                (0, 1, 0),
                (1, 1, 0),
                (0, 1, 1),
                (1, 1, 1),
            ]
        );
    }

    #[test]
    fn solid_bits_track_non_air_blocks() {
        let mut cci = ChunkCreationIterator::new(2, 1);
        cci.push_block_type(BlockType::STONE);
        cci.push_block_type(BlockType::AIR);
        let (blocks, solid_array) = cci.return_storage();
        assert_eq!(blocks.len(), 4);
        assert_eq!(solid_array.count_ones(), 1);
        assert!(solid_array[0]);
        assert_eq!(blocks[3].block_type(), BlockType::AIR);
    }
}
