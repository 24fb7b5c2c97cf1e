use image::{ImageBuffer, ImageFormat, RgbaImage};

use crate::styles::Color;

/// An in-memory RGBA image
///
/// This is a thin wrapper around an RGBA buffer. Compositor operations never
/// mutate a frame they were handed; they return a new one.
///
/// Frames read from disk remember the format their bytes were detected as, so
/// an output path without a usable extension can be written in the same
/// format. Equality only compares pixels.
#[derive(Clone, Debug)]
pub struct Frame {
    buffer: RgbaImage,
    format: Option<ImageFormat>,
}

impl Frame {
    /// Create a new frame from an RGBA image buffer
    pub fn new(buffer: RgbaImage) -> Self {
        Self {
            buffer,
            format: None,
        }
    }

    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: Color) -> Self {
        Self::new(ImageBuffer::from_pixel(width, height, color.to_pixel()))
    }

    /// Tag the frame with the format it was decoded from
    pub fn with_format(mut self, format: Option<ImageFormat>) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Get a pixel at the given coordinates (returns RGBA array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.get_pixel(x, y).0
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Get a mutable reference to the underlying image buffer
    pub fn as_image_mut(&mut self) -> &mut RgbaImage {
        &mut self.buffer
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.buffer == other.buffer
    }
}
