#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Streaming
//!
//! A streamed, procedurally generated voxel world around a moving observer.
//!
//! This crate keeps a bounded window of chunks resident, generates terrain on
//! demand from seeded noise, parks chunks that leave the window for cheap
//! reactivation, and applies a backlog of deferred voxel edits without ever
//! exceeding a fixed amount of work per tick.
//!
//! ## Key Modules
//!
//! * `config` - Process-wide world configuration
//! * `engine_state` - The world map, its tick loop and all voxel subsystems
//! * `error` - Configuration errors
//!
//! ## Usage
//!
//! ```rust,no_run
//! // Headless driver
//! fn main() {
//!     if let Err(error) = voxel_streaming::run() {
//!         eprintln!("{error}");
//!     }
//! }
//! ```
//!
//! ## Per-Tick Budget
//!
//! * At most one chunk generated from the pending list
//! * At most `modifications_per_tick` deferred edits routed
//! * At most one chunk rebuilt

use std::path::PathBuf;

use cgmath::Point3;
use log::{debug, info};

pub mod config;
pub mod engine_state;
pub mod error;

pub use config::WorldConfig;
pub use engine_state::presenter::{ChunkPresenter, LoggingPresenter};
pub use engine_state::voxels::biome::{Biome, Lode};
pub use engine_state::voxels::block::block_type::BlockType;
pub use engine_state::voxels::block::{BlockCatalog, BlockDefinition};
pub use engine_state::voxels::coordinates::ChunkCoordinate;
pub use engine_state::voxels::modifications::{DrainProgress, VoxelMod};
pub use engine_state::{TickReport, WorldMap};
pub use error::ConfigError;

/// Number of ticks the headless driver simulates.
const DRIVER_TICKS: usize = 480;

/// Distance the simulated observer walks along +x each tick, in voxels.
const DRIVER_WALK_SPEED: f32 = 0.5;

/// Runs the headless driver.
///
/// Optional command line arguments: a world configuration JSON path, then a
/// biome JSON path. The driver generates the map and walks an observer east
/// for a fixed number of ticks, logging what each tick did.
pub fn run() -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let config = match args.next() {
        Some(path) => WorldConfig::from_json_file(path)?,
        None => WorldConfig::default(),
    };
    let biome = match args.next() {
        Some(path) => Biome::from_json_file(path)?,
        None => Biome::default(),
    };

    let mut world = WorldMap::new(config, biome, BlockCatalog::default(), LoggingPresenter::new())?;

    let started = web_time::Instant::now();
    world.generate_map();
    info!("Initial generation took {:?}", started.elapsed());

    let spawn = world.spawn_position();
    let mut slowest = web_time::Duration::ZERO;
    let walk_started = web_time::Instant::now();
    for tick in 0..DRIVER_TICKS {
        let observer = Point3::new(
            spawn.x + tick as f32 * DRIVER_WALK_SPEED,
            spawn.y,
            spawn.z,
        );

        let tick_started = web_time::Instant::now();
        let report = world.tick(observer);
        let elapsed = tick_started.elapsed();
        slowest = slowest.max(elapsed);

        if !report.is_idle() {
            debug!(
                "Tick {}: window moved: {}, generated {:?}, drain {:?}, rebuilt {:?} ({:?})",
                tick,
                report.window.is_some(),
                report.generated,
                report.drain,
                report.rebuilt.map(|outcome| outcome.coordinate),
                elapsed
            );
        }
    }

    let streamer = world.streamer();
    info!(
        "Walked {} ticks in {:?} (slowest tick {:?}): {} active, {} out of view, {} pending, {} built",
        DRIVER_TICKS,
        walk_started.elapsed(),
        slowest,
        streamer.active_len(),
        streamer.out_of_view_len(),
        streamer.pending_len(),
        streamer.chunks_built()
    );
    info!(
        "Presenter saw {} mesh rebuilds and {} visibility changes",
        world.presenter().meshes_rebuilt(),
        world.presenter().visibility_changes()
    );

    Ok(())
}
