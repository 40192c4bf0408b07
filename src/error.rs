//! # Error Module
//!
//! Errors surfaced while loading the process-wide configuration: world sizing,
//! biome assets and the block catalog. Runtime streaming never produces an
//! error; out-of-bounds queries degrade to air instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine_state::voxels::block::block_type::BlockType;

/// Failure while reading or validating configuration data.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The configuration text was not valid JSON for the expected type.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but holds values the world cannot run with.
    #[error("invalid world configuration: {0}")]
    Invalid(String),

    /// A block catalog listed the same block type twice.
    #[error("block type {0:?} is defined more than once")]
    DuplicateBlock(BlockType),
}

/// Reads a whole file, attaching the path to any I/O failure.
pub(crate) fn read_config_file(path: &std::path::Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
