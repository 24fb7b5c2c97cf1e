use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    config::Config,
    error::{ImageError, Result},
    raster::{Frame, ImagingBackend, RasterBackend},
    styles::Styles,
};

/// Outputs written by one [`CompositionEngine::run`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositionReport {
    /// Every file written, in processing order
    pub outputs: Vec<PathBuf>,
}

impl CompositionReport {
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// Largest scaled image, in pixels, the engine will allocate (1 GiB of RGBA)
pub const MAX_SCALED_PIXELS: u64 = 1 << 28;

/// Compute the size of an image scaled proportionally to `target_width`
///
/// Both sides are multiplied by the same factor and rounded up, never below 1.
/// Sizes above [`MAX_SCALED_PIXELS`] are rejected.
pub fn scaled_dimensions(target_width: u32, width: u32, height: u32) -> Result<(u32, u32)> {
    if width == 0 || height == 0 || target_width == 0 {
        return Err(ImageError::InvalidDimensions {
            details: format!("cannot scale {}x{} image to width {}", width, height, target_width),
        }
        .into());
    }

    let factor = f64::from(target_width) / f64::from(width);
    let scaled_width = (f64::from(width) * factor).ceil().max(1.0);
    let scaled_height = (f64::from(height) * factor).ceil().max(1.0);

    if scaled_width * scaled_height > MAX_SCALED_PIXELS as f64 {
        return Err(ImageError::InvalidDimensions {
            details: format!(
                "scaling {}x{} to width {} needs {}x{} pixels",
                width, height, target_width, scaled_width, scaled_height
            ),
        }
        .into());
    }

    Ok((scaled_width as u32, scaled_height as u32))
}

/// Main composition engine that frames every input image
///
/// The engine follows a clear pipeline per image:
/// 1. Decode - Read the source image
/// 2. Canvas - Allocate the background frame filled with its color
/// 3. Scale - Resize the source to the configured width, keeping aspect ratio
/// 4. Composite - Draw the scaled source over the canvas at the configured offset
/// 5. Encode - Write the canvas to the output path
pub struct CompositionEngine<B: ImagingBackend = RasterBackend> {
    config: Config,
    backend: B,
}

impl CompositionEngine<RasterBackend> {
    /// Create a new composition engine backed by the `image` crate
    pub fn new(config: Config) -> Self {
        Self::with_backend(config, RasterBackend::new())
    }
}

impl<B: ImagingBackend> CompositionEngine<B> {
    pub fn with_backend(config: Config, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process the configured input and write every output
    ///
    /// A directory input frames each regular file it directly contains into
    /// the output directory under the same file name. A file input writes a
    /// single output file. Missing output directories are created. The first
    /// failure aborts the run; outputs already written are left in place.
    pub fn run(&self) -> Result<CompositionReport> {
        let input = self.config.input.as_path();
        let output = self.config.output.as_path();

        info!("🖼️  Starting composition");
        info!("   Input: {:?}", input);
        info!("   Output: {:?}", output);

        let report = if input.is_dir() {
            self.run_directory(input, output)?
        } else if input.is_file() {
            self.run_file(input, output)?
        } else {
            return Err(ImageError::InputNotFound {
                path: input.display().to_string(),
            }
            .into());
        };

        info!("✅ Composition complete: {} image(s) written", report.len());
        Ok(report)
    }

    fn run_directory(&self, input: &Path, output: &Path) -> Result<CompositionReport> {
        if !output.is_dir() {
            debug!("Creating output directory {:?}", output);
            fs::create_dir_all(output)?;
        }

        let mut sources = Vec::new();
        for entry in fs::read_dir(input)? {
            let path = entry?.path();
            if path.is_file() {
                sources.push(path);
            }
        }
        sources.sort();

        info!("   Found {} file(s) in {:?}", sources.len(), input);

        let mut report = CompositionReport::default();
        for source in sources {
            let Some(name) = source.file_name() else {
                continue;
            };
            let destination = output.join(name);
            self.process_file(&source, &destination)?;
            report.outputs.push(destination);
        }

        Ok(report)
    }

    fn run_file(&self, input: &Path, output: &Path) -> Result<CompositionReport> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                debug!("Creating output directory {:?}", parent);
                fs::create_dir_all(parent)?;
            }
        }

        self.process_file(input, output)?;
        Ok(CompositionReport {
            outputs: vec![output.to_path_buf()],
        })
    }

    /// Frame a single image file and write it to `destination`
    pub fn process_file(&self, source: &Path, destination: &Path) -> Result<()> {
        debug!("Framing {:?} -> {:?}", source, destination);

        let target = self.backend.decode(source)?;
        let framed = self.build_output(&target, &self.config.styles)?;
        self.backend.encode(&framed, destination)
    }

    /// Produce the framed canvas for one decoded image
    pub fn build_output(&self, target: &Frame, styles: &Styles) -> Result<Frame> {
        let frame = &styles.frame;
        let canvas = Frame::new_filled(frame.width, frame.height, frame.background);
        let scaled = self.scale_image(styles.image.width, target)?;
        let (top, left) = (styles.image.top, styles.image.left);
        let output = self.composite_on_canvas(&scaled, &canvas, top, left);

        // Lets an output path without an extension reuse the source format
        Ok(output.with_format(target.format()))
    }

    /// Resize `image` to `target_width`, preserving its aspect ratio
    pub fn scale_image(&self, target_width: u32, image: &Frame) -> Result<Frame> {
        let (width, height) = image.dimensions();
        let (scaled_width, scaled_height) = scaled_dimensions(target_width, width, height)?;
        debug!("Scaling {}x{} -> {}x{}", width, height, scaled_width, scaled_height);

        Ok(self.backend.resize(image, scaled_width, scaled_height))
    }

    /// Draw `image` over a copy of `canvas` with its corner at `(left, top)`
    pub fn composite_on_canvas(&self, image: &Frame, canvas: &Frame, top: i64, left: i64) -> Frame {
        self.backend.composite_over(canvas, image, left, top)
    }
}
