//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, the compact in-chunk block representation,
//! and the block catalog that maps each type to its metadata.

use std::collections::HashMap;
use std::path::Path;

use block_type::BlockType;
use serde::{Deserialize, Serialize};

use crate::error::{read_config_file, ConfigError};

pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage of block data inside chunks.
pub type BlockTypeSize = u8;

/// Represents a single voxel block in the world.
///
/// This is a lightweight structure that stores only the essential block data.
/// The actual block properties are looked up from the [`BlockCatalog`].
///
/// # Memory Layout
/// The `#[repr(C)]` attribute keeps the layout stable so chunk storage can be
/// handed to a mesher as raw bytes.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, Default, PartialEq, Eq)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// Decodes the stored type. Unknown values read back as air.
    pub fn block_type(self) -> BlockType {
        BlockType::get_block_type_from_int(self.block_type).unwrap_or(BlockType::AIR)
    }
}

/// Metadata for one block type, as loaded from the block definition list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDefinition {
    /// The block type this definition describes
    pub block_type: BlockType,
    /// Display name
    pub name: String,
    /// Whether the block collides with the observer
    pub is_solid: bool,
    /// Texture atlas index per face: [Front, Back, Bottom, Top, Left, Right]
    pub texture_indices: [usize; 6],
}

impl BlockDefinition {
    fn new(block_type: BlockType, name: &str, is_solid: bool, texture_indices: [usize; 6]) -> Self {
        BlockDefinition {
            block_type,
            name: name.to_string(),
            is_solid,
            texture_indices,
        }
    }
}

/// Read-only mapping from block type to its definition.
///
/// Built once at startup from a list of definitions and never mutated.
#[derive(Clone, Debug)]
pub struct BlockCatalog {
    definitions: HashMap<BlockType, BlockDefinition>,
}

impl BlockCatalog {
    /// Builds a catalog from a list of definitions.
    ///
    /// # Errors
    /// Returns [`ConfigError::DuplicateBlock`] if a block type appears twice.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = BlockDefinition>,
    ) -> Result<Self, ConfigError> {
        let mut map = HashMap::new();
        for definition in definitions {
            let block_type = definition.block_type;
            if map.insert(block_type, definition).is_some() {
                return Err(ConfigError::DuplicateBlock(block_type));
            }
        }
        Ok(BlockCatalog { definitions: map })
    }

    /// Parses a JSON array of definitions.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let definitions: Vec<BlockDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(definitions)
    }

    /// Reads a JSON array of definitions from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = read_config_file(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Looks up the definition for a block type.
    pub fn get(&self, block_type: BlockType) -> Option<&BlockDefinition> {
        self.definitions.get(&block_type)
    }

    /// Whether the block type is solid. Types missing from the catalog are not.
    pub fn is_solid(&self, block_type: BlockType) -> bool {
        self.get(block_type).is_some_and(|definition| definition.is_solid)
    }

    /// Number of defined block types.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the catalog holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        let definitions = [
            BlockDefinition::new(BlockType::AIR, "Air", false, [0; 6]),
            BlockDefinition::new(BlockType::BEDROCK, "Bedrock", true, [9; 6]),
            BlockDefinition::new(BlockType::DIRT, "Dirt", true, [1; 6]),
            BlockDefinition::new(BlockType::GRASS, "Grass", true, [2, 2, 1, 3, 2, 2]),
            BlockDefinition::new(BlockType::SAND, "Sand", true, [10; 6]),
            BlockDefinition::new(BlockType::STONE, "Stone", true, [0; 6]),
            BlockDefinition::new(BlockType::WOOD, "Wood", true, [7, 7, 6, 6, 7, 7]),
            BlockDefinition::new(BlockType::LEAVES, "Leaves", true, [16; 6]),
            BlockDefinition::new(BlockType::COAL_ORE, "Coal Ore", true, [11; 6]),
            BlockDefinition::new(BlockType::IRON_ORE, "Iron Ore", true, [12; 6]),
            BlockDefinition::new(BlockType::GOLD_ORE, "Gold Ore", true, [13; 6]),
            BlockDefinition::new(BlockType::DIAMOND_ORE, "Diamond Ore", true, [14; 6]),
        ];

        let definitions = definitions
            .into_iter()
            .map(|definition| (definition.block_type, definition))
            .collect();
        BlockCatalog { definitions }
    }
}
