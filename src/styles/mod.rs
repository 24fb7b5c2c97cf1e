//! # Output Styles
//!
//! Describes what every output image looks like: a fixed-size background
//! frame and the width/offset of the scaled source drawn on top of it.
//!
//! ```yaml
//! styles:
//!   frame:
//!     width: 1080
//!     height: 1080
//!     background: "#ffffff"
//!   image:
//!     width: 960
//!     top: 60
//!     left: 60
//! ```

pub mod color;
pub mod types;

pub use color::Color;
pub use types::{FrameStyle, ImageStyle, Styles};
