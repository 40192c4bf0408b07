//! # Chunk Streaming Module
//!
//! This module provides the `ChunkStreamer`, the single owner of every chunk
//! in the world. It keeps a square window of chunks active around the
//! observer, parks chunks that leave the window, and spreads the generation
//! of new chunks across ticks.
//!
//! ## Chunk Maps
//!
//! A coordinate lives in at most one of:
//! - `active`: generated and inside the view window
//! - `out_of_view`: generated, retained, and reactivated without regeneration
//! - `pending`: waiting to be generated, first in first out
//!
//! ## Budget
//!
//! Recentring only enqueues new coordinates. [`ChunkStreamer::tick`] then
//! builds at most one chunk per call, so world generation never costs more
//! than one chunk per tick. The one exception is the initial world build,
//! which recentres with `instant` set.

use std::collections::{HashMap, VecDeque};

use cgmath::Point3;
use log::{debug, trace};

use super::chunk::Chunk;
use super::coordinates::ChunkCoordinate;
use super::modifications::VoxelMod;
use super::rebuild::ChunkStore;
use super::terrain::TerrainGenerator;
use crate::config::WorldConfig;

/// What a recentre changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WindowUpdate {
    /// The new window centre
    pub centre: ChunkCoordinate,
    /// Coordinates added to the pending list
    pub enqueued: Vec<ChunkCoordinate>,
    /// Coordinates generated immediately (instant recentres only)
    pub built: Vec<ChunkCoordinate>,
    /// Out-of-view chunks moved back into the active map
    pub reactivated: Vec<ChunkCoordinate>,
    /// Active chunks moved into the out-of-view map
    pub deactivated: Vec<ChunkCoordinate>,
}

/// Owns all chunks and the view window around the observer.
pub struct ChunkStreamer {
    config: WorldConfig,
    active: HashMap<ChunkCoordinate, Chunk>,
    out_of_view: HashMap<ChunkCoordinate, Chunk>,
    pending: VecDeque<ChunkCoordinate>,
    /// The coordinate the window is currently centred on
    centre: Option<ChunkCoordinate>,
    chunks_built: usize,
}

impl ChunkStreamer {
    /// Creates a streamer with no chunks and no window.
    pub fn new(config: &WorldConfig) -> Self {
        ChunkStreamer {
            config: config.clone(),
            active: HashMap::new(),
            out_of_view: HashMap::new(),
            pending: VecDeque::new(),
            centre: None,
            chunks_built: 0,
        }
    }

    /// Generates a new chunk at `coordinate` and inserts it into the active map.
    ///
    /// If the coordinate was pending it is removed from the pending list.
    ///
    /// # Arguments
    /// * `coordinate` - Where to build
    /// * `generator` - The terrain function
    /// * `structures` - Receives the edits of trees rooted in the new chunk
    ///
    /// # Panics
    /// Panics if a chunk already exists at `coordinate`. Callers check
    /// membership first; a second chunk for one coordinate is a logic error.
    pub fn build(
        &mut self,
        coordinate: ChunkCoordinate,
        generator: &TerrainGenerator,
        structures: &mut impl Extend<VoxelMod>,
    ) -> &mut Chunk {
        assert!(
            !self.contains(coordinate),
            "chunk {coordinate:?} is already resident and must not be built twice"
        );

        self.pending.retain(|pending| *pending != coordinate);

        let mut chunk = Chunk::new(coordinate, self.config.chunk_width, self.config.chunk_height);
        chunk.initialize(generator, structures);
        self.chunks_built += 1;
        debug!("Built chunk {:?} ({} total)", coordinate, self.chunks_built);

        self.active.entry(coordinate).or_insert(chunk)
    }

    /// Builds a chunk requested by an edit.
    ///
    /// Edits can land anywhere, so a chunk built outside the current window is
    /// parked straight in the out-of-view map.
    ///
    /// # Returns
    /// `true` if the new chunk is active, `false` if it was parked.
    pub fn build_for_edit(
        &mut self,
        coordinate: ChunkCoordinate,
        generator: &TerrainGenerator,
        structures: &mut impl Extend<VoxelMod>,
    ) -> bool {
        self.build(coordinate, generator, structures);
        if self.is_in_window(coordinate) {
            return true;
        }
        self.deactivate(coordinate);
        false
    }

    /// Moves the view window to follow the observer.
    ///
    /// Nothing changes while the observer stays within half a chunk of the
    /// tracked centre. Otherwise every in-world coordinate of the new window
    /// is reactivated, enqueued, or (when `instant`) built immediately, and
    /// active chunks beyond the view distance are deactivated.
    ///
    /// The window enqueues `centre - view_distance..centre + view_distance` on
    /// each axis, while deactivation only happens past the view distance, so a
    /// chunk on the trailing `centre + view_distance` edge stays active after
    /// the observer steps back.
    ///
    /// # Returns
    /// `None` if the window did not move, otherwise a summary of the changes.
    pub fn recentre(
        &mut self,
        observer: Point3<f32>,
        instant: bool,
        generator: &TerrainGenerator,
        structures: &mut impl Extend<VoxelMod>,
    ) -> Option<WindowUpdate> {
        let centre = self.config.to_midpoint_chunk_coordinate(observer);
        if self.centre == Some(centre) {
            return None;
        }

        let view_distance = self.config.view_distance_in_chunks;
        let mut update = WindowUpdate {
            centre,
            ..WindowUpdate::default()
        };

        for x in centre.x - view_distance..centre.x + view_distance {
            for z in centre.z - view_distance..centre.z + view_distance {
                let coordinate = ChunkCoordinate::new(x, z);
                if !self.config.is_chunk_in_world(coordinate) {
                    continue;
                }

                if let Some(mut chunk) = self.out_of_view.remove(&coordinate) {
                    chunk.set_visible(true);
                    self.active.insert(coordinate, chunk);
                    update.reactivated.push(coordinate);
                } else if !self.active.contains_key(&coordinate) && !self.pending.contains(&coordinate) {
                    if instant {
                        self.build(coordinate, generator, structures);
                        update.built.push(coordinate);
                    } else {
                        self.pending.push_back(coordinate);
                        update.enqueued.push(coordinate);
                    }
                }
            }
        }

        let mut far: Vec<ChunkCoordinate> = self
            .active
            .keys()
            .filter(|coordinate| coordinate.chebyshev_distance(centre) > view_distance)
            .copied()
            .collect();
        far.sort();
        for coordinate in far {
            self.deactivate(coordinate);
            update.deactivated.push(coordinate);
        }

        // Pending work the observer has walked away from is dropped; it is
        // enqueued again if the window returns.
        self.pending
            .retain(|coordinate| coordinate.chebyshev_distance(centre) <= view_distance);

        self.centre = Some(centre);

        debug!(
            "Window recentred on {:?}: {} enqueued, {} built, {} reactivated, {} deactivated",
            centre,
            update.enqueued.len(),
            update.built.len(),
            update.reactivated.len(),
            update.deactivated.len()
        );

        Some(update)
    }

    /// Per-tick maintenance: builds at most one pending chunk.
    ///
    /// # Returns
    /// The coordinate built this tick, if any.
    pub fn tick(
        &mut self,
        generator: &TerrainGenerator,
        structures: &mut impl Extend<VoxelMod>,
    ) -> Option<ChunkCoordinate> {
        let coordinate = self.pending.pop_front()?;
        if self.contains(coordinate) {
            trace!("Pending chunk {:?} already resident, skipping", coordinate);
            return None;
        }
        self.build(coordinate, generator, structures);
        Some(coordinate)
    }

    fn deactivate(&mut self, coordinate: ChunkCoordinate) {
        if let Some(mut chunk) = self.active.remove(&coordinate) {
            chunk.set_visible(false);
            self.out_of_view.insert(coordinate, chunk);
        }
    }

    /// Whether `coordinate` is within the view distance of the current centre.
    ///
    /// Before the first recentre there is no window and every coordinate counts.
    pub fn is_in_window(&self, coordinate: ChunkCoordinate) -> bool {
        self.centre.map_or(true, |centre| {
            coordinate.chebyshev_distance(centre) <= self.config.view_distance_in_chunks
        })
    }

    /// Looks up a resident chunk, active or out of view.
    pub fn get(&self, coordinate: ChunkCoordinate) -> Option<&Chunk> {
        self.active
            .get(&coordinate)
            .or_else(|| self.out_of_view.get(&coordinate))
    }

    /// Mutable lookup of a resident chunk, active or out of view.
    pub fn get_mut(&mut self, coordinate: ChunkCoordinate) -> Option<&mut Chunk> {
        match self.active.get_mut(&coordinate) {
            Some(chunk) => Some(chunk),
            None => self.out_of_view.get_mut(&coordinate),
        }
    }

    /// Looks up an active chunk only.
    pub fn get_active(&self, coordinate: ChunkCoordinate) -> Option<&Chunk> {
        self.active.get(&coordinate)
    }

    /// Whether a chunk exists at `coordinate`.
    pub fn contains(&self, coordinate: ChunkCoordinate) -> bool {
        self.active.contains_key(&coordinate) || self.out_of_view.contains_key(&coordinate)
    }

    /// Whether the chunk at `coordinate` is active.
    pub fn is_active(&self, coordinate: ChunkCoordinate) -> bool {
        self.active.contains_key(&coordinate)
    }

    /// Whether the chunk at `coordinate` is retained out of view.
    pub fn is_out_of_view(&self, coordinate: ChunkCoordinate) -> bool {
        self.out_of_view.contains_key(&coordinate)
    }

    /// Whether `coordinate` is waiting to be generated.
    pub fn is_pending(&self, coordinate: ChunkCoordinate) -> bool {
        self.pending.contains(&coordinate)
    }

    /// Coordinates of every active chunk, in no particular order.
    pub fn active_coordinates(&self) -> impl Iterator<Item = ChunkCoordinate> + '_ {
        self.active.keys().copied()
    }

    /// Coordinates of every out-of-view chunk, in no particular order.
    pub fn out_of_view_coordinates(&self) -> impl Iterator<Item = ChunkCoordinate> + '_ {
        self.out_of_view.keys().copied()
    }

    /// Coordinates waiting to be generated, oldest first.
    pub fn pending_coordinates(&self) -> impl Iterator<Item = ChunkCoordinate> + '_ {
        self.pending.iter().copied()
    }

    /// Number of active chunks.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Number of retained out-of-view chunks.
    pub fn out_of_view_len(&self) -> usize {
        self.out_of_view.len()
    }

    /// Number of coordinates waiting to be generated.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// The tracked window centre, once the observer has been placed.
    pub fn centre(&self) -> Option<ChunkCoordinate> {
        self.centre
    }

    /// Total number of chunks generated so far.
    pub fn chunks_built(&self) -> usize {
        self.chunks_built
    }
}

impl ChunkStore for ChunkStreamer {
    fn chunk(&self, coordinate: ChunkCoordinate) -> Option<&Chunk> {
        self.get(coordinate)
    }

    fn chunk_mut(&mut self, coordinate: ChunkCoordinate) -> Option<&mut Chunk> {
        self.get_mut(coordinate)
    }
}
