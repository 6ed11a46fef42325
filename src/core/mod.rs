//! # Core Module
//!
//! Concurrency primitives shared by the rest of the crate.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking,
//!   used to lend chunks to worker threads for the duration of one batch

pub mod mt_resource;

pub use mt_resource::MtResource;
