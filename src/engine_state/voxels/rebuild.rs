//! # Rebuild Worklist
//!
//! Chunks whose voxels changed (or that were just generated) need their
//! derived content rebuilt. The worklist throttles that to one chunk per tick,
//! matching the one-chunk-per-tick generation budget.

use log::trace;

use super::chunk::Chunk;
use super::coordinates::ChunkCoordinate;

/// Anything that can hand out chunks by coordinate.
pub trait ChunkStore {
    /// Looks up a chunk.
    fn chunk(&self, coordinate: ChunkCoordinate) -> Option<&Chunk>;
    /// Looks up a chunk for mutation.
    fn chunk_mut(&mut self, coordinate: ChunkCoordinate) -> Option<&mut Chunk>;
}

impl ChunkStore for std::collections::HashMap<ChunkCoordinate, Chunk> {
    fn chunk(&self, coordinate: ChunkCoordinate) -> Option<&Chunk> {
        self.get(&coordinate)
    }

    fn chunk_mut(&mut self, coordinate: ChunkCoordinate) -> Option<&mut Chunk> {
        self.get_mut(&coordinate)
    }
}

/// Result of rebuilding one chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RebuildOutcome {
    /// The rebuilt chunk
    pub coordinate: ChunkCoordinate,
    /// Edits written into its voxels
    pub applied: usize,
}

/// Dirty chunks awaiting rebuild, oldest first.
#[derive(Debug, Default)]
pub struct RebuildWorklist {
    entries: Vec<ChunkCoordinate>,
}

impl RebuildWorklist {
    /// Creates an empty worklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a chunk to the worklist unless it is already dirty.
    ///
    /// # Returns
    /// `true` if the chunk was newly marked.
    pub fn mark_dirty(&mut self, coordinate: ChunkCoordinate) -> bool {
        if self.entries.contains(&coordinate) {
            return false;
        }
        self.entries.push(coordinate);
        true
    }

    /// Whether a chunk is waiting for rebuild.
    pub fn is_dirty(&self, coordinate: ChunkCoordinate) -> bool {
        self.entries.contains(&coordinate)
    }

    /// Number of dirty chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is waiting for rebuild.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuilds the oldest dirty chunk that has finished generating.
    ///
    /// Chunks still under construction are skipped and keep their place for a
    /// later tick.
    pub fn process_one(&mut self, chunks: &mut impl ChunkStore) -> Option<RebuildOutcome> {
        let index = self.entries.iter().position(|coordinate| {
            chunks
                .chunk(*coordinate)
                .is_some_and(|chunk| chunk.initialized)
        })?;
        let coordinate = self.entries.remove(index);
        let applied = chunks.chunk_mut(coordinate)?.rebuild();
        trace!("Rebuilt chunk {:?} with {} edits", coordinate, applied);
        Some(RebuildOutcome { coordinate, applied })
    }

    /// Rebuilds every dirty chunk that has finished generating.
    pub fn process_all(&mut self, chunks: &mut impl ChunkStore) -> Vec<RebuildOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.process_one(chunks) {
            outcomes.push(outcome);
        }
        outcomes
    }
}
