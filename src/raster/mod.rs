//! # Raster Module
//!
//! In-memory image frames and the imaging backend that decodes, resamples,
//! composites and encodes them.

pub mod backend;
pub mod types;

pub use backend::{ImagingBackend, RasterBackend};
pub use types::Frame;
