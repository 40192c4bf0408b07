//! # Presentation Hooks
//!
//! The world map decides *when* a chunk must be re-meshed or shown; the host
//! decides *how*. A [`ChunkPresenter`] receives those two notifications and
//! nothing else, so meshing and rendering stay outside the streaming core.

use log::{debug, trace};

use super::voxels::chunk::Chunk;
use super::voxels::coordinates::ChunkCoordinate;

/// Host-side receiver of chunk presentation changes.
pub trait ChunkPresenter {
    /// Called after a chunk's voxels were rebuilt; derived content (a mesh)
    /// must be regenerated from `chunk`'s current state.
    fn rebuild_mesh(&mut self, chunk: &Chunk);

    /// Called when a resident chunk enters (`true`) or leaves (`false`) the view window.
    fn set_visible(&mut self, coordinate: ChunkCoordinate, visible: bool);
}

/// A presenter for headless runs: it only logs, and counts what it was asked to do.
#[derive(Debug, Default)]
pub struct LoggingPresenter {
    meshes_rebuilt: usize,
    visibility_changes: usize,
}

impl LoggingPresenter {
    /// Creates a presenter with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mesh rebuilds requested so far.
    pub fn meshes_rebuilt(&self) -> usize {
        self.meshes_rebuilt
    }

    /// Number of visibility changes requested so far.
    pub fn visibility_changes(&self) -> usize {
        self.visibility_changes
    }
}

impl ChunkPresenter for LoggingPresenter {
    fn rebuild_mesh(&mut self, chunk: &Chunk) {
        self.meshes_rebuilt += 1;
        trace!(
            "Mesh for chunk {:?} rebuilt (revision {})",
            chunk.coordinate,
            chunk.mesh_revision()
        );
    }

    fn set_visible(&mut self, coordinate: ChunkCoordinate, visible: bool) {
        self.visibility_changes += 1;
        debug!("Chunk {:?} visible: {}", coordinate, visible);
    }
}
