//! # Composition Engine
//!
//! Drives the per-image pipeline (decode, scale, composite onto the background
//! frame, encode) over a single file or a directory of files.

pub mod engine;

// Re-exports for convenience
pub use engine::{scaled_dimensions, CompositionEngine, CompositionReport};
