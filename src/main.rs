//! # Voxel World Demo Entry Point
//!
//! Calls into the library's `run()`, which streams the world along a straight
//! flight path without opening a window.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

fn main() {
    voxel_world::run();
}
