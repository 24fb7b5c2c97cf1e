use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::styles::Color;

/// Layout of one output image: the background frame and where the source lands on it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Styles {
    /// Background canvas settings
    pub frame: FrameStyle,

    /// Placement of the scaled source image
    pub image: ImageStyle,
}

impl Styles {
    pub fn validate(&self) -> Result<()> {
        self.frame.validate()?;
        self.image.validate()?;
        Ok(())
    }
}

/// Background canvas the source image is composited onto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStyle {
    /// Canvas width in pixels
    pub width: u32,

    /// Canvas height in pixels
    pub height: u32,

    /// Fill color for every pixel the image does not cover
    pub background: Color,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1080,
            background: Color::WHITE,
        }
    }
}

impl FrameStyle {
    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "styles.frame".to_string(),
                value: format!("{}x{}", self.width, self.height),
            }
            .into());
        }
        Ok(())
    }
}

/// Scaled source image placement
///
/// `top` and `left` are measured from the canvas origin and may be negative,
/// in which case the image is clipped at the canvas edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageStyle {
    /// Width the source is scaled to; height follows the aspect ratio
    pub width: u32,

    pub top: i64,

    pub left: i64,
}

impl Default for ImageStyle {
    fn default() -> Self {
        Self {
            width: 960,
            top: 60,
            left: 60,
        }
    }
}

impl ImageStyle {
    fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(ConfigError::InvalidValue {
                key: "styles.image.width".to_string(),
                value: self.width.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
