//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides conversion from the compact storage integer back to the rich enum.

use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The set is closed: terrain generation, edits and the block catalog all speak
/// in these variants. The `FromPrimitive` derive allows conversion from the
/// `BlockTypeSize` stored inside chunks.
#[allow(non_camel_case_types)]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize,
)]
pub enum BlockType {
    /// An air block, which is non-solid and transparent.
    #[default]
    AIR,

    /// The indestructible world floor at `y = 0`.
    BEDROCK,

    /// A basic dirt block found just below the surface.
    DIRT,

    /// A grass block covering the terrain surface.
    GRASS,

    /// Shoreline and lake-bed sand.
    SAND,

    /// Plain stone, the bulk of the underground.
    STONE,

    /// Tree trunks.
    WOOD,

    /// Tree canopies.
    LEAVES,

    /// Coal ore vein.
    COAL_ORE,

    /// Iron ore vein.
    IRON_ORE,

    /// Gold ore vein.
    GOLD_ORE,

    /// Diamond ore vein.
    DIAMOND_ORE,
}

impl BlockType {
    /// Every block type, in storage order.
    pub const ALL: [BlockType; 12] = [
        BlockType::AIR,
        BlockType::BEDROCK,
        BlockType::DIRT,
        BlockType::GRASS,
        BlockType::SAND,
        BlockType::STONE,
        BlockType::WOOD,
        BlockType::LEAVES,
        BlockType::COAL_ORE,
        BlockType::IRON_ORE,
        BlockType::GOLD_ORE,
        BlockType::DIAMOND_ORE,
    ];

    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// # Arguments
    /// * `btype` - The block type as a `BlockTypeSize`
    ///
    /// # Returns
    /// The corresponding `BlockType`, or `None` if the value names no variant.
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(btype)
    }

    /// Whether this block is anything other than air.
    pub fn is_air(self) -> bool {
        self == BlockType::AIR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_integers_round_trip_for_every_variant() {
        for block_type in BlockType::ALL {
            let stored = block_type as BlockTypeSize;
            assert_eq!(BlockType::get_block_type_from_int(stored), Some(block_type));
        }
    }

    #[test]
    fn unknown_storage_integer_is_rejected() {
        assert_eq!(BlockType::get_block_type_from_int(200), None);
    }

    #[test]
    fn deserializes_from_variant_name() {
        let block_type: BlockType = serde_json::from_str("\"IRON_ORE\"").unwrap();
        assert_eq!(block_type, BlockType::IRON_ORE);
    }
}
