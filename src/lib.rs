//! # Canvas-Framer
//!
//! Batch-resize images and composite them onto a fixed-size colored canvas.
//!
//! Every input image is scaled to a configured width (keeping its aspect
//! ratio), drawn over a solid background frame at a configured offset, and
//! written to the output path. Settings come from a YAML file deep-merged over
//! built-in defaults.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use canvas_framer::{config::load_config, CompositionEngine};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = load_config("config.yaml")?;
//! config.validate()?;
//!
//! let report = CompositionEngine::new(config).run()?;
//! println!("wrote {} image(s)", report.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - Defaults, YAML loading and deep merge
//! - [`styles`] - Frame/image layout and color parsing
//! - [`raster`] - Frames and the imaging backend
//! - [`composition`] - The per-image pipeline and batch driver
//!
//! ## Custom Backends
//!
//! The engine only talks to images through [`ImagingBackend`], so another
//! raster library can be plugged in with
//! [`CompositionEngine::with_backend`](composition::CompositionEngine::with_backend).

pub mod composition;
pub mod config;
pub mod error;
pub mod raster;
pub mod styles;

// Re-export commonly used types for convenience
pub use crate::{
    composition::{CompositionEngine, CompositionReport},
    config::Config,
    error::{CompositorError, Result},
    raster::{Frame, ImagingBackend, RasterBackend},
    styles::{Color, Styles},
};
