//! Option set consumed by the rendering engine

use crate::error::{Error, Result};
use crate::style::DotStyle;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fully transparent colour used for transparent exports
pub const TRANSPARENT: &str = "#00000000";

/// Everything the engine needs to draw one code
///
/// Always sent as a complete snapshot; the engine never merges partial
/// updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Encoded content
    pub data: String,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Error correction level handed to the encoder
    pub error_correction: ErrorCorrection,
    /// Data module styling
    pub dots: DotsOptions,
    /// Canvas styling
    pub background: BackgroundOptions,
    /// Finder pattern outer ring styling
    pub corners_square: CornersSquareOptions,
    /// Finder pattern centre styling
    pub corners_dot: CornersDotOptions,
    /// Logo placement
    pub image_options: ImageOptions,
    /// Logo as a `data:` URL
    pub image: Option<String>,
}

impl RenderOptions {
    /// Copy of these options with a different background colour
    pub fn with_background(&self, color: impl Into<String>) -> Self {
        let mut options = self.clone();
        options.background.color = color.into();
        options
    }
}

/// Data module styling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotsOptions {
    /// CSS colour
    pub color: String,
    /// Shape preset
    pub style: DotStyle,
}

/// Canvas styling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundOptions {
    /// CSS colour; may carry alpha
    pub color: String,
}

/// Finder pattern outer ring styling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornersSquareOptions {
    /// CSS colour
    pub color: String,
    /// Ring shape
    pub style: CornerSquareStyle,
}

/// Finder pattern centre styling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornersDotOptions {
    /// CSS colour
    pub color: String,
    /// Centre shape
    pub style: CornerDotStyle,
}

/// Shape of the 7x7 finder ring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerSquareStyle {
    /// Square ring
    Square,
    /// Circular ring
    Dot,
    /// Square ring with heavily rounded corners
    ExtraRounded,
}

impl From<DotStyle> for CornerSquareStyle {
    fn from(style: DotStyle) -> Self {
        match style {
            DotStyle::Square | DotStyle::Classy => CornerSquareStyle::Square,
            DotStyle::Dots => CornerSquareStyle::Dot,
            DotStyle::Rounded | DotStyle::ClassyRounded => CornerSquareStyle::ExtraRounded,
        }
    }
}

/// Shape of the 3x3 finder centre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDotStyle {
    /// Square block
    Square,
    /// Filled circle
    Dot,
}

impl From<DotStyle> for CornerDotStyle {
    fn from(style: DotStyle) -> Self {
        match style {
            DotStyle::Square | DotStyle::Classy => CornerDotStyle::Square,
            _ => CornerDotStyle::Dot,
        }
    }
}

/// Logo placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// Skip data modules underneath the logo box
    pub hide_background_dots: bool,
    /// Logo box side as a fraction of the symbol side
    pub image_size: f64,
    /// Gap in pixels between the logo and the surrounding modules
    pub margin: u32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            hide_background_dots: true,
            image_size: 0.3,
            margin: 8,
        }
    }
}

/// QR error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCorrection {
    /// ~7% recovery
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    #[default]
    Q,
    /// ~30% recovery
    H,
}

impl From<ErrorCorrection> for qrcode::EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::L => qrcode::EcLevel::L,
            ErrorCorrection::M => qrcode::EcLevel::M,
            ErrorCorrection::Q => qrcode::EcLevel::Q,
            ErrorCorrection::H => qrcode::EcLevel::H,
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(Self::L),
            "M" | "MEDIUM" => Ok(Self::M),
            "Q" | "QUARTILE" => Ok(Self::Q),
            "H" | "HIGH" => Ok(Self::H),
            other => Err(format!("Unknown error correction level '{other}', expected L/M/Q/H")),
        }
    }
}

/// A parsed colour ready for drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    /// Straight (non-premultiplied) RGBA
    pub rgba: [u8; 4],
}

impl Paint {
    /// Parse any CSS colour string
    pub fn parse(value: &str) -> Result<Self> {
        let color = csscolorparser::parse(value.trim()).map_err(|e| Error::InvalidColor {
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            rgba: color.to_rgba8(),
        })
    }

    /// `#rrggbb` form, alpha dropped
    pub fn hex(&self) -> String {
        let [r, g, b, _] = self.rgba;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Alpha in [0, 1]
    pub fn opacity(&self) -> f64 {
        f64::from(self.rgba[3]) / 255.0
    }

    /// Whether nothing would be drawn with this paint
    pub fn is_transparent(&self) -> bool {
        self.rgba[3] == 0
    }
}
