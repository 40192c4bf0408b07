//! # Voxel Streaming Driver
//!
//! Headless entry point. It calls into the library's `run()` function, which
//! generates a world and walks a simulated observer through it.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [world.json] [biome.json]
//! ```

fn main() {
    if let Err(error) = voxel_streaming::run() {
        log::error!("{error}");
        eprintln!("{error}");
        std::process::exit(1);
    }
}
