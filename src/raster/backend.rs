use std::path::Path;

use image::imageops::{self, FilterType};
use image::io::Reader as ImageReader;
use image::{DynamicImage, GenericImageView, ImageFormat};
use tracing::debug;

use crate::{
    error::{ImageError, Result},
    raster::types::Frame,
};

/// Imaging capabilities the compositor needs from a raster library
///
/// Implementations must treat their inputs as read-only: every operation
/// that changes pixels returns a new [`Frame`].
pub trait ImagingBackend {
    /// Read and decode the image at `path`, detecting the format from its contents
    fn decode(&self, path: &Path) -> Result<Frame>;

    /// Resample `frame` to exactly `width × height`
    fn resize(&self, frame: &Frame, width: u32, height: u32) -> Frame;

    /// Draw `image` over `canvas` with its top-left corner at `(left, top)`
    ///
    /// Uses the alpha "over" operator. Parts of `image` outside the canvas
    /// are clipped; offsets may be negative.
    fn composite_over(&self, canvas: &Frame, image: &Frame, left: i64, top: i64) -> Frame;

    /// Encode `frame` to `path`
    ///
    /// The format comes from the file extension. When the extension is missing
    /// or unknown the frame's source format is used instead.
    fn encode(&self, frame: &Frame, path: &Path) -> Result<()>;
}

/// [`ImagingBackend`] built on the `image` crate
#[derive(Debug, Clone, Copy)]
pub struct RasterBackend {
    filter: FilterType,
}

impl RasterBackend {
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }

    /// Use a different resampling filter for [`ImagingBackend::resize`]
    pub fn with_filter(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for RasterBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImagingBackend for RasterBackend {
    fn decode(&self, path: &Path) -> Result<Frame> {
        let decode_failed = |reason: String| ImageError::DecodeFailed {
            path: path.display().to_string(),
            reason,
        };

        // Extensions can be missing or wrong, so sniff the leading bytes
        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| decode_failed(e.to_string()))?;
        let format = reader.format();
        let image = reader.decode().map_err(|e| decode_failed(e.to_string()))?;

        let (width, height) = image.dimensions();
        debug!("Decoded {:?} as {:?}: {}x{}", path, format, width, height);
        Ok(Frame::new(image.to_rgba8()).with_format(format))
    }

    fn resize(&self, frame: &Frame, width: u32, height: u32) -> Frame {
        Frame::new(imageops::resize(frame.as_image(), width, height, self.filter))
    }

    fn composite_over(&self, canvas: &Frame, image: &Frame, left: i64, top: i64) -> Frame {
        let mut output = canvas.clone();
        imageops::overlay(output.as_image_mut(), image.as_image(), left, top);
        restore_over_alpha(&mut output, canvas, image, left, top);
        output
    }

    fn encode(&self, frame: &Frame, path: &Path) -> Result<()> {
        let encode_failed = |reason: String| ImageError::EncodeFailed {
            path: path.display().to_string(),
            reason,
        };

        let format = match ImageFormat::from_path(path) {
            Ok(format) => format,
            Err(e) => frame.format().ok_or_else(|| encode_failed(e.to_string()))?,
        };
        let image = DynamicImage::ImageRgba8(frame.as_image().clone());

        // JPEG has no alpha channel
        let image = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
            _ => image,
        };

        image
            .save_with_format(path, format)
            .map_err(|e| encode_failed(e.to_string()))?;

        debug!("Encoded {:?} as {:?}", path, format);
        Ok(())
    }
}

/// Rewrite the alpha of the region `image` covers as `a_s + a_d * (1 - a_s)`
///
/// `imageops::overlay` truncates the blended alpha, which leaves an opaque
/// canvas slightly transparent under partially transparent pixels.
fn restore_over_alpha(output: &mut Frame, canvas: &Frame, image: &Frame, left: i64, top: i64) {
    let (canvas_width, canvas_height) = canvas.dimensions();
    let (image_width, image_height) = image.dimensions();

    let x_end = (left + i64::from(image_width)).min(i64::from(canvas_width));
    let y_end = (top + i64::from(image_height)).min(i64::from(canvas_height));

    for y in top.max(0)..y_end {
        for x in left.max(0)..x_end {
            let source = image.get_pixel((x - left) as u32, (y - top) as u32)[3];
            let below = canvas.get_pixel(x as u32, y as u32)[3];
            let pixel = output.as_image_mut().get_pixel_mut(x as u32, y as u32);
            pixel[3] = over_alpha(source, below);
        }
    }
}

fn over_alpha(source: u8, below: u8) -> u8 {
    let (source, below) = (f32::from(source), f32::from(below));
    (source + below * (255.0 - source) / 255.0).round().min(255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::Color;
    use tempfile::tempdir;

    #[test]
    fn test_resize_exact_dimensions() {
        let backend = RasterBackend::new();
        let frame = Frame::new_filled(10, 6, Color::rgb(200, 0, 0));
        let resized = backend.resize(&frame, 25, 15);
        assert_eq!(resized.dimensions(), (25, 15));
        assert_eq!(frame.dimensions(), (10, 6));
    }

    #[test]
    fn test_composite_over_opaque_replaces_pixels() {
        let backend = RasterBackend::new();
        let canvas = Frame::new_filled(6, 6, Color::WHITE);
        let image = Frame::new_filled(2, 2, Color::rgb(0, 0, 255));

        let output = backend.composite_over(&canvas, &image, 3, 1);

        assert_eq!(output.get_pixel(3, 1), [0, 0, 255, 255]);
        assert_eq!(output.get_pixel(4, 2), [0, 0, 255, 255]);
        assert_eq!(output.get_pixel(2, 1), [255, 255, 255, 255]);
        assert_eq!(output.get_pixel(3, 3), [255, 255, 255, 255]);
        // Canvas is untouched
        assert_eq!(canvas.get_pixel(3, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn test_composite_over_transparent_keeps_background() {
        let backend = RasterBackend::new();
        let canvas = Frame::new_filled(4, 4, Color::rgb(10, 20, 30));
        let image = Frame::new_filled(4, 4, Color::rgba(255, 255, 255, 0));

        let output = backend.composite_over(&canvas, &image, 0, 0);
        assert_eq!(output, canvas);
    }

    #[test]
    fn test_composite_over_clips_negative_offset() {
        let backend = RasterBackend::new();
        let canvas = Frame::new_filled(4, 4, Color::WHITE);
        let image = Frame::new_filled(3, 3, Color::rgb(0, 0, 0));

        let output = backend.composite_over(&canvas, &image, -2, -2);

        assert_eq!(output.dimensions(), (4, 4));
        assert_eq!(output.get_pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(output.get_pixel(1, 0), [255, 255, 255, 255]);
        assert_eq!(output.get_pixel(0, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn test_composite_over_half_transparent_keeps_canvas_opaque() {
        let backend = RasterBackend::new();
        let canvas = Frame::new_filled(3, 3, Color::rgb(0, 0, 255));
        let image = Frame::new_filled(2, 2, Color::rgba(255, 0, 0, 128));

        let output = backend.composite_over(&canvas, &image, 1, 1);

        let [r, g, b, a] = output.get_pixel(1, 1);
        assert_eq!(a, 255);
        assert!((127..=128).contains(&r), "red {}", r);
        assert_eq!(g, 0);
        assert!((126..=128).contains(&b), "blue {}", b);
        assert_eq!(output.get_pixel(0, 0), [0, 0, 255, 255]);
    }

    #[test]
    fn test_composite_over_alpha_on_translucent_canvas() {
        let backend = RasterBackend::new();
        let image = Frame::new_filled(1, 1, Color::rgba(255, 0, 0, 128));

        let clear = Frame::new_filled(1, 1, Color::rgba(0, 0, 0, 0));
        assert_eq!(backend.composite_over(&clear, &image, 0, 0).get_pixel(0, 0)[3], 128);

        let half = Frame::new_filled(1, 1, Color::rgba(0, 0, 255, 128));
        assert_eq!(backend.composite_over(&half, &image, 0, 0).get_pixel(0, 0)[3], 192);
    }

    #[test]
    fn test_over_alpha() {
        assert_eq!(over_alpha(0, 77), 77);
        assert_eq!(over_alpha(255, 0), 255);
        assert_eq!(over_alpha(1, 255), 255);
        assert_eq!(over_alpha(128, 255), 255);
    }

    #[test]
    fn test_decode_sniffs_format_from_contents() {
        let dir = tempdir().unwrap();
        let backend = RasterBackend::new();
        let frame = Frame::new_filled(3, 2, Color::rgb(9, 99, 199));
        let original = dir.path().join("source.png");
        backend.encode(&frame, &original).unwrap();

        for name in ["IMG_0001", "misnamed.jpg"] {
            let copy = dir.path().join(name);
            std::fs::copy(&original, &copy).unwrap();

            let decoded = backend.decode(&copy).unwrap();
            assert_eq!(decoded, frame, "{}", name);
            assert_eq!(decoded.format(), Some(ImageFormat::Png), "{}", name);
        }
    }

    #[test]
    fn test_encode_without_extension_uses_source_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("IMG_0002");
        let backend = RasterBackend::new();
        let frame =
            Frame::new_filled(4, 4, Color::rgb(1, 2, 3)).with_format(Some(ImageFormat::Png));

        backend.encode(&frame, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
        assert_eq!(backend.decode(&path).unwrap(), frame);
    }

    #[test]
    fn test_encode_then_decode_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let backend = RasterBackend::new();
        let frame = Frame::new_filled(5, 7, Color::rgba(1, 2, 3, 4));

        backend.encode(&frame, &path).unwrap();
        assert_eq!(backend.decode(&path).unwrap(), frame);
    }

    #[test]
    fn test_encode_jpeg_drops_alpha() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        let backend = RasterBackend::new();

        backend
            .encode(&Frame::new_filled(8, 8, Color::rgba(0, 0, 0, 128)), &path)
            .unwrap();
        assert_eq!(backend.decode(&path).unwrap().dimensions(), (8, 8));
    }

    #[test]
    fn test_encode_unknown_extension_without_source_format_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.unknown");
        let err = RasterBackend::new()
            .encode(&Frame::new_filled(1, 1, Color::WHITE), &path)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to encode image"));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"not really a png").unwrap();
        let err = RasterBackend::new().decode(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to decode image"));
    }
}
