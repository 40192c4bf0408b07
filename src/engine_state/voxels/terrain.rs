//! # Terrain Module
//!
//! The deterministic terrain function: world position, biome and seeded noise
//! in, block type out. Tree placement additionally emits a batch of deferred
//! edits describing the tree structure.
//!
//! ## Passes
//!
//! Each voxel is evaluated in a fixed order, with early returns:
//!
//! 1. Outside the world → air; `y = 0` → bedrock
//! 2. Base strata: grass surface, a dirt band, air above, lodes below
//! 3. Trees on high enough surfaces inside a forest zone
//! 4. Shoreline sand and lake beds
//! 5. Exposed stone on high surfaces
//!
//! The generator holds no mutable state. Tree heights come from a random
//! generator derived from the seed and the column, so evaluating the same
//! position twice always yields the same block and the same tree.

use cgmath::Point3;

use super::biome::Biome;
use super::block::block_type::BlockType;
use super::modifications::VoxelMod;
use super::noise_field::NoiseField;
use super::structure;
use crate::config::WorldConfig;

/// Depth of the dirt band below the grass surface.
const DIRT_DEPTH: i32 = 4;

/// Multiplier spreading the seed across the column hash.
const COLUMN_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Maps positions to block types for one biome and seed.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    config: WorldConfig,
    biome: Biome,
    noise: NoiseField,
}

impl TerrainGenerator {
    /// Creates a generator for the configured seed and the given biome.
    pub fn new(config: &WorldConfig, biome: Biome) -> Self {
        TerrainGenerator {
            config: config.clone(),
            noise: NoiseField::new(config.seed, config.chunk_width),
            biome,
        }
    }

    /// The biome this generator samples.
    pub fn biome(&self) -> &Biome {
        &self.biome
    }

    /// The world configuration this generator was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Height of the grass surface in the column at (x, z).
    pub fn terrain_height(&self, x: i32, z: i32) -> i32 {
        let height_noise = self
            .noise
            .sample_2d(x as f64, z as f64, 0.0, self.biome.terrain_scale);
        (self.biome.terrain_height as f64 * height_noise).floor() as i32 + self.biome.solid_ground_height
    }

    /// Generates the block at a world position.
    ///
    /// # Arguments
    /// * `position` - World voxel position
    /// * `structures` - Receives the edits of any tree rooted at this position
    ///
    /// # Returns
    /// The block type at `position`. Positions outside the world are air.
    pub fn generate_voxel(
        &self,
        position: Point3<i32>,
        structures: &mut impl Extend<VoxelMod>,
    ) -> BlockType {
        let Point3 { x, y, z } = position;

        if !self.config.is_voxel_in_world(x, y, z) {
            return BlockType::AIR;
        }

        if y == 0 {
            return BlockType::BEDROCK;
        }

        let biome = &self.biome;
        let terrain_height = self.terrain_height(x, z);

        // Base strata
        let mut block_type = BlockType::AIR;
        if y == terrain_height {
            block_type = BlockType::GRASS;
        } else if y < terrain_height && y > terrain_height - DIRT_DEPTH {
            block_type = BlockType::DIRT;
        } else if y > terrain_height {
            return BlockType::AIR;
        } else {
            let sample_position = [x as f64, y as f64, z as f64];
            for lode in &biome.lodes {
                if lode.contains_height(y)
                    && self.noise.sample_3d(
                        sample_position,
                        lode.noise_offset,
                        lode.scale,
                        lode.threshold,
                    )
                {
                    block_type = lode.block_type;
                }
            }
        }

        if y != terrain_height {
            return block_type;
        }

        let (column_x, column_z) = (x as f64, z as f64);

        // Trees
        if terrain_height > biome.tree_zone_height
            && self
                .noise
                .sample_2d(column_x, column_z, 0.0, biome.tree_zone_scale)
                > biome.tree_zone_threshold
        {
            block_type = BlockType::GRASS;
            if self
                .noise
                .sample_2d(column_x, column_z, 0.0, biome.tree_placement_scale)
                > biome.tree_placement_threshold
            {
                block_type = BlockType::WOOD;
                let mut rng = self.column_rng(x, z);
                structure::create_tree(
                    position,
                    &mut rng,
                    biome.min_tree_height,
                    biome.max_tree_height,
                    structures,
                );
            }
            return block_type;
        }

        // Shoreline
        let beach_floor = biome.water_height - biome.sand_depth;
        if terrain_height <= biome.water_height && terrain_height > beach_floor {
            return BlockType::SAND;
        } else if terrain_height <= beach_floor {
            return if self.noise.sample_2d(column_x, column_z, 0.0, 1.0)
                > biome.water_sand_zone_threshold
            {
                BlockType::SAND
            } else {
                BlockType::DIRT
            };
        }

        // Exposed stone
        if terrain_height > biome.stone_height
            && self.noise.sample_2d(column_x, column_z, 0.0, 1.0) > biome.stone_zone_threshold
        {
            return BlockType::STONE;
        }

        block_type
    }

    fn column_rng(&self, x: i32, z: i32) -> fastrand::Rng {
        let column = (u64::from(x as u32) << 32) | u64::from(z as u32);
        fastrand::Rng::with_seed(u64::from(self.config.seed).wrapping_mul(COLUMN_SEED_MIX) ^ column)
    }
}
