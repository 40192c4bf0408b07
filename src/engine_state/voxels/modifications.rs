//! # Modification Queue
//!
//! Deferred single-voxel edits and the processor that routes them to their
//! owning chunks.
//!
//! ## Draining
//!
//! - **Synchronous** (initial world build): every queued edit is routed in one call.
//! - **Cooperative** (steady state): a drain routes a fixed batch per call and
//!   then suspends. The queue itself is the cursor; the `applying` flag keeps a
//!   second drain from starting while one is suspended mid-batch.
//!
//! Routing an edit can generate a chunk, and generating a chunk can queue more
//! edits (trees). Those land at the back of the same queue and are routed by
//! the drain already in progress.

use std::collections::VecDeque;

use cgmath::Point3;
use log::{debug, trace};

use super::block::block_type::BlockType;
use super::coordinates::ChunkCoordinate;
use super::rebuild::RebuildWorklist;
use super::streaming::ChunkStreamer;
use super::terrain::TerrainGenerator;

/// One deferred edit: place `block_type` at an absolute world position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoxelMod {
    /// World voxel position
    pub position: Point3<i32>,
    /// Block to place
    pub block_type: BlockType,
}

impl VoxelMod {
    /// Creates a new edit.
    pub fn new(position: Point3<i32>, block_type: BlockType) -> Self {
        VoxelMod {
            position,
            block_type,
        }
    }
}

/// Delivers edits to wherever they belong.
pub trait VoxelModRouter {
    /// Routes one edit.
    ///
    /// # Arguments
    /// * `modification` - The edit popped from the front of the queue
    /// * `queue` - The queue being drained; follow-up edits are appended here
    fn route(&mut self, modification: VoxelMod, queue: &mut VecDeque<VoxelMod>);
}

/// What a call into the processor accomplished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrainProgress {
    /// Nothing to do: the queue was empty and no drain was in progress
    Idle,
    /// A drain is already in progress; this call did nothing
    Busy,
    /// A batch was routed and edits remain; call [`ModificationQueue::resume`] next tick
    Suspended {
        /// Edits routed by this call
        routed: usize,
    },
    /// The queue is empty and the drain has finished
    Completed {
        /// Edits routed by this call
        routed: usize,
    },
}

impl DrainProgress {
    /// Edits routed by the call that returned this progress.
    pub fn routed(self) -> usize {
        match self {
            DrainProgress::Suspended { routed } | DrainProgress::Completed { routed } => routed,
            DrainProgress::Idle | DrainProgress::Busy => 0,
        }
    }
}

/// Global FIFO of deferred edits with a rate-limited, non-reentrant drain.
#[derive(Debug)]
pub struct ModificationQueue {
    queue: VecDeque<VoxelMod>,
    applying: bool,
    batch_size: usize,
}

impl ModificationQueue {
    /// Creates an empty queue whose cooperative drain routes `batch_size` edits per call.
    pub fn new(batch_size: usize) -> Self {
        ModificationQueue {
            queue: VecDeque::new(),
            applying: false,
            batch_size: batch_size.max(1),
        }
    }

    /// Appends an edit.
    pub fn push(&mut self, modification: VoxelMod) {
        self.queue.push_back(modification);
    }

    /// Number of queued edits.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no edits are queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether a cooperative drain is in progress.
    pub fn is_applying(&self) -> bool {
        self.applying
    }

    /// Direct access to the backing queue, for producers that emit edits in bulk.
    pub fn queue_mut(&mut self) -> &mut VecDeque<VoxelMod> {
        &mut self.queue
    }

    /// Starts a drain.
    ///
    /// A synchronous drain routes everything, including edits queued while it
    /// runs. A cooperative drain routes one batch and suspends if edits
    /// remain; it is a no-op ([`DrainProgress::Busy`]) while another
    /// cooperative drain is suspended.
    pub fn drain(&mut self, synchronous: bool, router: &mut impl VoxelModRouter) -> DrainProgress {
        if synchronous {
            let mut routed = 0;
            while let Some(modification) = self.queue.pop_front() {
                router.route(modification, &mut self.queue);
                routed += 1;
            }
            self.applying = false;
            debug!("Synchronously routed {} edits", routed);
            return DrainProgress::Completed { routed };
        }

        if self.applying {
            return DrainProgress::Busy;
        }
        if self.queue.is_empty() {
            return DrainProgress::Idle;
        }

        self.applying = true;
        self.route_batch(router)
    }

    /// Continues a suspended cooperative drain by one batch.
    pub fn resume(&mut self, router: &mut impl VoxelModRouter) -> DrainProgress {
        if !self.applying {
            return DrainProgress::Idle;
        }
        self.route_batch(router)
    }

    fn route_batch(&mut self, router: &mut impl VoxelModRouter) -> DrainProgress {
        let mut routed = 0;
        while routed < self.batch_size {
            let Some(modification) = self.queue.pop_front() else {
                break;
            };
            router.route(modification, &mut self.queue);
            routed += 1;
        }

        if self.queue.is_empty() {
            self.applying = false;
            debug!("Drain completed after routing {} edits", routed);
            DrainProgress::Completed { routed }
        } else {
            trace!("Drain suspended with {} edits remaining", self.queue.len());
            DrainProgress::Suspended { routed }
        }
    }
}

/// Routes edits into the chunks owned by a [`ChunkStreamer`].
///
/// A chunk that does not exist yet is built on the spot, whatever the
/// generation budget, so an edit is never dropped or deferred indefinitely.
pub struct ChunkRouter<'a> {
    /// Owner of every chunk
    pub streamer: &'a mut ChunkStreamer,
    /// Terrain function for on-demand builds
    pub generator: &'a TerrainGenerator,
    /// Chunks touched by an edit are marked dirty here
    pub rebuilds: &'a mut RebuildWorklist,
    /// Chunks this router built that landed inside the view window
    pub built_in_view: Vec<ChunkCoordinate>,
}

impl<'a> ChunkRouter<'a> {
    /// Creates a router with an empty build log.
    pub fn new(
        streamer: &'a mut ChunkStreamer,
        generator: &'a TerrainGenerator,
        rebuilds: &'a mut RebuildWorklist,
    ) -> Self {
        ChunkRouter {
            streamer,
            generator,
            rebuilds,
            built_in_view: Vec::new(),
        }
    }
}

impl VoxelModRouter for ChunkRouter<'_> {
    fn route(&mut self, modification: VoxelMod, queue: &mut VecDeque<VoxelMod>) {
        let coordinate = self
            .generator
            .config()
            .voxel_to_chunk_coordinate(modification.position.x, modification.position.z);

        if !self.streamer.contains(coordinate) {
            trace!("Edit at {:?} builds chunk {:?}", modification.position, coordinate);
            if self.streamer.build_for_edit(coordinate, self.generator, queue) {
                self.built_in_view.push(coordinate);
            }
        }

        if let Some(chunk) = self.streamer.get_mut(coordinate) {
            chunk.queue_modification(modification);
        }
        self.rebuilds.mark_dirty(coordinate);
    }
}
