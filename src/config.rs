//! # World Configuration
//!
//! Process-wide constants for the streamed world: seed, chunk dimensions, map
//! extent, view distance and the per-tick edit budget. The configuration is
//! read once at startup and treated as read-only afterwards.
//!
//! ## Loading
//!
//! Every field has a default, so a JSON document only needs to list the values
//! it overrides:
//!
//! ```
//! use voxel_streaming::WorldConfig;
//!
//! let config = WorldConfig::from_json_str(r#"{ "view_distance_in_chunks": 3 }"#).unwrap();
//! assert_eq!(config.view_distance_in_chunks, 3);
//! assert_eq!(config.seed, 1337);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{read_config_file, ConfigError};

/// The seed every world uses unless a configuration overrides it.
pub const DEFAULT_SEED: u32 = 1337;
/// Width and depth of a chunk column in voxels.
pub const DEFAULT_CHUNK_WIDTH: i32 = 16;
/// Height of a chunk column in voxels.
pub const DEFAULT_CHUNK_HEIGHT: i32 = 128;
/// Side length of the square map, in chunks.
pub const DEFAULT_MAP_SIZE_IN_CHUNKS: i32 = 100;
/// Radius around the observer, in chunks, that stays active.
pub const DEFAULT_VIEW_DISTANCE_IN_CHUNKS: i32 = 5;
/// Number of queued edits routed before a cooperative drain yields.
pub const DEFAULT_MODIFICATIONS_PER_TICK: usize = 200;

/// Sizing and budget parameters shared by every world component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for the noise field and tree placement
    pub seed: u32,
    /// Width (and depth) of a chunk in voxels
    pub chunk_width: i32,
    /// Height of a chunk in voxels
    pub chunk_height: i32,
    /// The map is `map_size_in_chunks` chunks along both horizontal axes
    pub map_size_in_chunks: i32,
    /// Chunks further than this (Chebyshev distance) from the observer are deactivated
    pub view_distance_in_chunks: i32,
    /// Edits routed per tick by a cooperative drain
    pub modifications_per_tick: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: DEFAULT_SEED,
            chunk_width: DEFAULT_CHUNK_WIDTH,
            chunk_height: DEFAULT_CHUNK_HEIGHT,
            map_size_in_chunks: DEFAULT_MAP_SIZE_IN_CHUNKS,
            view_distance_in_chunks: DEFAULT_VIEW_DISTANCE_IN_CHUNKS,
            modifications_per_tick: DEFAULT_MODIFICATIONS_PER_TICK,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for values that fail [`WorldConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`WorldConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = read_config_file(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Rejects configurations the streaming manager cannot operate on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_width <= 0 {
            return Err(ConfigError::Invalid(format!(
                "chunk_width must be positive, got {}",
                self.chunk_width
            )));
        }
        if self.chunk_height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "chunk_height must be positive, got {}",
                self.chunk_height
            )));
        }
        if self.map_size_in_chunks <= 0 {
            return Err(ConfigError::Invalid(format!(
                "map_size_in_chunks must be positive, got {}",
                self.map_size_in_chunks
            )));
        }
        if self.view_distance_in_chunks <= 0 {
            return Err(ConfigError::Invalid(format!(
                "view_distance_in_chunks must be positive, got {}",
                self.view_distance_in_chunks
            )));
        }
        if self.modifications_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "modifications_per_tick must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Side length of the map in voxels.
    pub fn map_size_in_voxels(&self) -> i32 {
        self.map_size_in_chunks * self.chunk_width
    }

    /// Number of voxels stored by a single chunk column.
    pub fn voxels_per_chunk(&self) -> usize {
        (self.chunk_width * self.chunk_width * self.chunk_height) as usize
    }
}
