//! User-editable settings driving the preview

use crate::style::DotStyle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest allowed output size in pixels
pub const MIN_SIZE: u32 = 200;
/// Largest allowed output size in pixels
pub const MAX_SIZE: u32 = 500;

/// The complete set of user-facing knobs
///
/// Fields are independent and may change at any time. Colours are kept as
/// supplied; the engine decides whether they are usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// URL or text to encode
    pub content: String,
    /// Colour of dots and corners
    pub foreground: String,
    /// Canvas colour
    pub background: String,
    /// Shape preset
    pub style: DotStyle,
    /// Output width and height in pixels, within [`MIN_SIZE`, `MAX_SIZE`]
    size: u32,
    /// Logo as a base64 `data:` URL
    pub logo: Option<String>,
    /// Export with a fully transparent background
    pub transparent_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content: "https://example.com".to_string(),
            foreground: "#1a73e8".to_string(),
            background: "#ffffff".to_string(),
            style: DotStyle::Rounded,
            size: 300,
            logo: None,
            transparent_export: false,
        }
    }
}

impl Settings {
    /// Current size in pixels
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Set the size, clamping into the allowed range.
    ///
    /// Returns the value actually stored.
    pub fn set_size(&mut self, size: u32) -> u32 {
        let clamped = size.clamp(MIN_SIZE, MAX_SIZE);
        if clamped != size {
            tracing::debug!(requested = size, clamped, "Size clamped to allowed range");
        }
        self.size = clamped;
        clamped
    }

    /// Builder-style size setter
    pub fn with_size(mut self, size: u32) -> Self {
        self.set_size(size);
        self
    }
}

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Raster image
    #[default]
    Png,
    /// Vector image
    Svg,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "svg" => Ok(ExportFormat::Svg),
            other => Err(format!("Unsupported export format '{other}', expected png or svg")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_clamped() {
        let mut settings = Settings::default();
        assert_eq!(settings.set_size(120), MIN_SIZE);
        assert_eq!(settings.set_size(9000), MAX_SIZE);
        assert_eq!(settings.set_size(420), 420);
        assert_eq!(settings.size(), 420);
    }

    #[test]
    fn export_format_parsing() {
        assert_eq!("PNG".parse::<ExportFormat>(), Ok(ExportFormat::Png));
        assert_eq!(".svg".parse::<ExportFormat>(), Ok(ExportFormat::Svg));
        assert!("gif".parse::<ExportFormat>().is_err());
    }
}
