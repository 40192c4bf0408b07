//! # Biome Module
//!
//! Immutable terrain parameters consumed by the terrain generator: surface
//! height, shoreline and stone bands, tree zones and an ordered list of ore
//! lodes. Biomes are loaded once from JSON and never mutated afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::block::block_type::BlockType;
use crate::error::{read_config_file, ConfigError};

/// A configured vein generator: a height band and a 3D noise threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lode {
    /// Name used in logs and asset files
    pub name: String,
    /// Block placed where the lode fires
    pub block_type: BlockType,
    /// Exclusive lower bound of the band
    pub min_height: i32,
    /// Exclusive upper bound of the band
    pub max_height: i32,
    /// 3D noise frequency
    pub scale: f64,
    /// Mean noise value above which the lode fires
    pub threshold: f64,
    /// Offset decorrelating this lode from the others
    pub noise_offset: f64,
}

impl Lode {
    /// Whether `y` lies strictly inside this lode's band.
    pub fn contains_height(&self, y: i32) -> bool {
        y > self.min_height && y < self.max_height
    }
}

/// Terrain parameters for one biome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Biome {
    /// Name used in logs and asset files
    pub name: String,
    /// Height below which every column is solid
    pub solid_ground_height: i32,
    /// Amplitude of the height noise above `solid_ground_height`
    pub terrain_height: i32,
    /// Frequency of the height noise
    pub terrain_scale: f64,

    /// Surface at or below this height is shoreline or lake bed
    pub water_height: i32,
    /// Thickness of the beach band just below `water_height`
    pub sand_depth: i32,
    /// Uniform noise value above which a lake bed is sand rather than dirt
    pub water_sand_zone_threshold: f64,

    /// Surface above this height may be exposed stone
    pub stone_height: i32,
    /// Uniform noise value above which a high surface is stone
    pub stone_zone_threshold: f64,

    /// Trees only grow on surfaces above this height
    pub tree_zone_height: i32,
    /// Frequency of the forest-zone noise
    pub tree_zone_scale: f64,
    /// Forest-zone noise value above which trees may grow
    pub tree_zone_threshold: f64,
    /// Frequency of the per-column placement noise
    pub tree_placement_scale: f64,
    /// Placement noise value above which a tree is rooted
    pub tree_placement_threshold: f64,
    /// Shortest trunk, in voxels
    pub min_tree_height: i32,
    /// Tallest trunk, in voxels
    pub max_tree_height: i32,

    /// Ore veins, evaluated in order; later entries win
    pub lodes: Vec<Lode>,
}

impl Default for Biome {
    fn default() -> Self {
        Biome {
            name: "Grasslands".to_string(),
            solid_ground_height: 42,
            terrain_height: 42,
            terrain_scale: 0.25,
            water_height: 50,
            sand_depth: 3,
            water_sand_zone_threshold: 0.5,
            stone_height: 75,
            stone_zone_threshold: 0.55,
            tree_zone_height: 52,
            tree_zone_scale: 1.3,
            tree_zone_threshold: 0.6,
            tree_placement_scale: 15.0,
            tree_placement_threshold: 0.8,
            min_tree_height: 5,
            max_tree_height: 12,
            lodes: vec![
                Lode {
                    name: "Stone".to_string(),
                    block_type: BlockType::STONE,
                    min_height: 0,
                    max_height: 255,
                    scale: 0.1,
                    threshold: 0.0,
                    noise_offset: 0.0,
                },
                Lode {
                    name: "Dirt pockets".to_string(),
                    block_type: BlockType::DIRT,
                    min_height: 1,
                    max_height: 255,
                    scale: 0.1,
                    threshold: 0.6,
                    noise_offset: 0.0,
                },
                Lode {
                    name: "Coal".to_string(),
                    block_type: BlockType::COAL_ORE,
                    min_height: 5,
                    max_height: 60,
                    scale: 0.2,
                    threshold: 0.62,
                    noise_offset: 300.0,
                },
                Lode {
                    name: "Iron".to_string(),
                    block_type: BlockType::IRON_ORE,
                    min_height: 5,
                    max_height: 45,
                    scale: 0.2,
                    threshold: 0.64,
                    noise_offset: 600.0,
                },
                Lode {
                    name: "Gold".to_string(),
                    block_type: BlockType::GOLD_ORE,
                    min_height: 2,
                    max_height: 30,
                    scale: 0.25,
                    threshold: 0.67,
                    noise_offset: 900.0,
                },
                Lode {
                    name: "Diamond".to_string(),
                    block_type: BlockType::DIAMOND_ORE,
                    min_height: 1,
                    max_height: 16,
                    scale: 0.3,
                    threshold: 0.7,
                    noise_offset: 1200.0,
                },
            ],
        }
    }
}

impl Biome {
    /// Parses a biome from JSON. Missing fields take the default biome's values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let biome: Biome = serde_json::from_str(json)?;
        biome.validate()?;
        Ok(biome)
    }

    /// Reads a biome asset from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = read_config_file(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Rejects parameter combinations the generator cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_tree_height < 1 || self.min_tree_height > self.max_tree_height {
            return Err(ConfigError::Invalid(format!(
                "biome {}: tree height range {}..={} is empty",
                self.name, self.min_tree_height, self.max_tree_height
            )));
        }
        if let Some(lode) = self.lodes.iter().find(|lode| lode.min_height >= lode.max_height) {
            return Err(ConfigError::Invalid(format!(
                "biome {}: lode {} has an empty height band",
                self.name, lode.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_biome_is_valid() {
        assert!(Biome::default().validate().is_ok());
    }

    #[test]
    fn json_overrides_merge_with_defaults() {
        let biome = Biome::from_json_str(
            r#"{ "name": "Flats", "terrain_height": 0, "lodes": [] }"#,
        )
        .unwrap();
        assert_eq!(biome.name, "Flats");
        assert_eq!(biome.terrain_height, 0);
        assert!(biome.lodes.is_empty());
        assert_eq!(biome.solid_ground_height, Biome::default().solid_ground_height);
    }

    #[test]
    fn inverted_tree_heights_are_rejected() {
        let result = Biome::from_json_str(r#"{ "min_tree_height": 9, "max_tree_height": 4 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn lode_band_is_exclusive() {
        let lode = &Biome::default().lodes[2];
        assert!(!lode.contains_height(lode.min_height));
        assert!(lode.contains_height(lode.min_height + 1));
        assert!(!lode.contains_height(lode.max_height));
    }
}
