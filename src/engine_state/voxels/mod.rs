//! # Voxel World Core
//!
//! This module contains everything that decides what the streamed world is
//! made of and which parts of it are resident.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components, leaves first:
//!
//! * **Coordinates**: Conversions between world positions and chunk-grid coordinates, plus bounds checks
//! * **Block**: Block types, the compact in-chunk representation and the block catalog
//! * **Noise field / Biome / Structure / Terrain**: The deterministic terrain function
//! * **Chunk**: A column of voxels with its own queue of pending edits
//! * **Streaming**: The view window, the out-of-view cache and the pending-generation list
//! * **Modifications / Rebuild**: Rate-limited routing of deferred edits and chunk rebuilds
//!
//! ## Data Flow
//!
//! 1. The observer moves; streaming enqueues the chunks entering the window
//! 2. One pending chunk per tick is generated, emitting tree edits into the modification queue
//! 3. The modification queue routes a batch of edits per tick into their chunks, building chunks on demand
//! 4. One dirty chunk per tick applies its edits and is handed to the presenter
//!
//! ## Threading
//!
//! Everything here runs on the single logic thread. Suspension means
//! returning to the tick driver, never true concurrency.

pub mod biome;
pub mod block;
pub mod chunk;
pub mod coordinates;
pub mod modifications;
pub mod noise_field;
pub mod rebuild;
pub mod streaming;
pub mod structure;
pub mod terrain;
