//! # Engine State Module
//!
//! The world map that ties chunk streaming, terrain generation, deferred
//! edits and rebuild throttling into a single per-tick update.
//!
//! ## Key Components
//!
//! * `WorldMap` - Owns every world subsystem and exposes the tick entry point
//! * `presenter` - The hooks through which the host learns about mesh and visibility changes
//! * `voxels` - Chunks, terrain, streaming and the modification queue
//!
//! ## Tick Order
//!
//! Each call to [`WorldMap::tick`] runs, in order:
//!
//! 1. Recentre the view window on the observer (no-op unless they crossed half a chunk)
//! 2. Generate at most one pending chunk
//! 3. Start or resume draining the modification queue, one batch at most
//! 4. Rebuild at most one dirty chunk
//!
//! The world map never schedules work on its own; the host drives it by
//! calling `tick` once per frame.

use cgmath::Point3;
use log::{debug, info};

use presenter::{ChunkPresenter, LoggingPresenter};
use voxels::biome::Biome;
use voxels::block::block_type::BlockType;
use voxels::block::BlockCatalog;
use voxels::coordinates::ChunkCoordinate;
use voxels::modifications::{ChunkRouter, DrainProgress, ModificationQueue, VoxelMod};
use voxels::rebuild::{RebuildOutcome, RebuildWorklist};
use voxels::streaming::{ChunkStreamer, WindowUpdate};
use voxels::terrain::TerrainGenerator;

use crate::config::WorldConfig;
use crate::error::ConfigError;

pub mod presenter;
pub mod voxels;

/// How far below the top of the world the observer spawns.
const SPAWN_DEPTH_BELOW_CEILING: i32 = 50;

/// What one call to [`WorldMap::tick`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Set when the observer's tracked chunk changed and the window moved
    pub window: Option<WindowUpdate>,
    /// Chunk generated from the pending list this tick
    pub generated: Option<ChunkCoordinate>,
    /// Progress of the modification drain this tick
    pub drain: DrainProgress,
    /// Chunk rebuilt this tick
    pub rebuilt: Option<RebuildOutcome>,
}

impl TickReport {
    /// Whether the tick changed anything at all.
    pub fn is_idle(&self) -> bool {
        self.window.is_none()
            && self.generated.is_none()
            && self.drain == DrainProgress::Idle
            && self.rebuilt.is_none()
    }
}

/// The streamed voxel world around a single observer.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_streaming::{Biome, BlockCatalog, LoggingPresenter, WorldConfig, WorldMap};
///
/// let config = WorldConfig {
///     chunk_width: 4,
///     chunk_height: 32,
///     map_size_in_chunks: 16,
///     view_distance_in_chunks: 2,
///     ..WorldConfig::default()
/// };
/// let mut world = WorldMap::new(config, Biome::default(), BlockCatalog::default(), LoggingPresenter::new())?;
/// world.generate_map();
///
/// let observer = world.spawn_position();
/// world.tick(Point3::new(observer.x + 8.0, observer.y, observer.z));
/// # Ok::<(), voxel_streaming::ConfigError>(())
/// ```
pub struct WorldMap<P: ChunkPresenter = LoggingPresenter> {
    config: WorldConfig,
    catalog: BlockCatalog,
    generator: TerrainGenerator,
    /// Single owner of every chunk
    streamer: ChunkStreamer,
    modifications: ModificationQueue,
    rebuilds: RebuildWorklist,
    presenter: P,
    spawn_position: Point3<f32>,
    /// Chunk the observer was last seen in
    current_coordinate: Option<ChunkCoordinate>,
}

impl<P: ChunkPresenter> WorldMap<P> {
    /// Creates an empty world.
    ///
    /// # Arguments
    /// * `config` - Sizing, seed and budgets; validated here
    /// * `biome` - Terrain parameters; validated here
    /// * `catalog` - Block metadata used by solidity queries
    /// * `presenter` - Receives mesh rebuild and visibility notifications
    ///
    /// # Returns
    /// The world, or the first configuration problem found.
    pub fn new(
        config: WorldConfig,
        biome: Biome,
        catalog: BlockCatalog,
        presenter: P,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        biome.validate()?;

        let centre = config.map_size_in_voxels() as f32 / 2.0;
        let spawn_height = (config.chunk_height - SPAWN_DEPTH_BELOW_CEILING).max(1) as f32;

        Ok(WorldMap {
            generator: TerrainGenerator::new(&config, biome),
            streamer: ChunkStreamer::new(&config),
            modifications: ModificationQueue::new(config.modifications_per_tick),
            rebuilds: RebuildWorklist::new(),
            spawn_position: Point3::new(centre, spawn_height, centre),
            current_coordinate: None,
            catalog,
            presenter,
            config,
        })
    }

    /// Builds the initial world around the spawn position.
    ///
    /// Unlike steady-state ticks this is not rate limited: the whole window is
    /// generated, every queued edit is routed, and every dirty chunk is rebuilt
    /// before returning.
    pub fn generate_map(&mut self) {
        info!(
            "Generating world '{}' (seed {}) around {:?}",
            self.generator.biome().name,
            self.config.seed,
            self.spawn_position
        );

        if let Some(update) = self.streamer.recentre(
            self.spawn_position,
            true,
            &self.generator,
            self.modifications.queue_mut(),
        ) {
            self.apply_window_update(&update);
            self.current_coordinate = Some(update.centre);
        }

        let (drain, built_in_view) = {
            let mut router = ChunkRouter::new(&mut self.streamer, &self.generator, &mut self.rebuilds);
            let drain = self.modifications.drain(true, &mut router);
            (drain, router.built_in_view)
        };
        for coordinate in built_in_view {
            self.presenter.set_visible(coordinate, true);
        }

        let outcomes = self.rebuilds.process_all(&mut self.streamer);
        for outcome in &outcomes {
            if let Some(chunk) = self.streamer.get(outcome.coordinate) {
                self.presenter.rebuild_mesh(chunk);
            }
        }

        info!(
            "World generated: {} chunks built, {} edits routed, {} chunks meshed",
            self.streamer.chunks_built(),
            drain.routed(),
            outcomes.len()
        );
    }

    /// Advances the world by one tick.
    ///
    /// # Arguments
    /// * `observer` - The observer's world position this tick
    ///
    /// # Returns
    /// A summary of the work done.
    pub fn tick(&mut self, observer: Point3<f32>) -> TickReport {
        let window = self.streamer.recentre(
            observer,
            false,
            &self.generator,
            self.modifications.queue_mut(),
        );
        if let Some(update) = &window {
            self.apply_window_update(update);
            self.current_coordinate = Some(update.centre);
        }

        let generated = self
            .streamer
            .tick(&self.generator, self.modifications.queue_mut());
        if let Some(coordinate) = generated {
            self.rebuilds.mark_dirty(coordinate);
            self.presenter.set_visible(coordinate, true);
        }

        let (drain, built_in_view) = {
            let mut router = ChunkRouter::new(&mut self.streamer, &self.generator, &mut self.rebuilds);
            let drain = if self.modifications.is_applying() {
                self.modifications.resume(&mut router)
            } else {
                self.modifications.drain(false, &mut router)
            };
            (drain, router.built_in_view)
        };
        for coordinate in built_in_view {
            self.presenter.set_visible(coordinate, true);
        }

        let rebuilt = self.rebuilds.process_one(&mut self.streamer);
        if let Some(outcome) = &rebuilt {
            if let Some(chunk) = self.streamer.get(outcome.coordinate) {
                self.presenter.rebuild_mesh(chunk);
            }
        }

        TickReport {
            window,
            generated,
            drain,
            rebuilt,
        }
    }

    /// Queues an edit; it reaches its chunk during a later tick's drain.
    pub fn queue_modification(&mut self, modification: VoxelMod) {
        self.modifications.push(modification);
    }

    /// The block at a world voxel position.
    ///
    /// Resident chunks answer from their stored voxels. Anywhere else inside
    /// the world the terrain function is sampled, without queueing any trees
    /// it would have planted.
    pub fn get_existing_voxel(&self, x: i32, y: i32, z: i32) -> BlockType {
        let coordinate = self.config.voxel_to_chunk_coordinate(x, z);
        if !self.config.is_chunk_in_world(coordinate) || !(0..self.config.chunk_height).contains(&y) {
            return BlockType::AIR;
        }

        let position = Point3::new(x, y, z);
        match self.streamer.get(coordinate) {
            Some(chunk) if chunk.initialized => chunk.get_voxel(position),
            _ => {
                let mut discarded: Vec<VoxelMod> = Vec::new();
                self.generator.generate_voxel(position, &mut discarded)
            }
        }
    }

    /// Whether the block containing a world position is solid.
    pub fn is_solid(&self, position: Point3<f32>) -> bool {
        let block_type =
            self.get_existing_voxel(position.x as i32, position.y as i32, position.z as i32);
        self.catalog.is_solid(block_type)
    }

    /// Where the observer starts: the map centre, `SPAWN_DEPTH_BELOW_CEILING` below the top.
    pub fn spawn_position(&self) -> Point3<f32> {
        self.spawn_position
    }

    /// The chunk the observer was last seen in, once the map has been generated.
    pub fn current_coordinate(&self) -> Option<ChunkCoordinate> {
        self.current_coordinate
    }

    /// The world configuration.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The block catalog.
    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    /// The terrain generator.
    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// The chunk streamer owning every chunk.
    pub fn streamer(&self) -> &ChunkStreamer {
        &self.streamer
    }

    /// The global modification queue.
    pub fn modifications(&self) -> &ModificationQueue {
        &self.modifications
    }

    /// Chunks waiting for rebuild.
    pub fn rebuilds(&self) -> &RebuildWorklist {
        &self.rebuilds
    }

    /// The host's presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Marks freshly built chunks dirty and forwards visibility changes to the presenter.
    fn apply_window_update(&mut self, update: &WindowUpdate) {
        for coordinate in &update.built {
            self.rebuilds.mark_dirty(*coordinate);
            self.presenter.set_visible(*coordinate, true);
        }
        for coordinate in &update.reactivated {
            self.presenter.set_visible(*coordinate, true);
        }
        for coordinate in &update.deactivated {
            self.presenter.set_visible(*coordinate, false);
        }
        debug!(
            "Observer now in chunk {:?}, {} chunks pending",
            update.centre,
            self.streamer.pending_len()
        );
    }
}
