//! QR rendering engine
//!
//! The controller only talks to the [`QrEngine`] trait. [`StyledQrEngine`]
//! is the shipped implementation: symbol encoding is delegated to the
//! `qrcode` crate, styling and output (PNG via `image`, SVG as text) happen
//! here.

pub mod geometry;
pub mod matrix;
pub mod options;
pub mod raster;
pub mod scene;
mod styling;
pub mod vector;

pub use matrix::Matrix;
pub use options::{
    BackgroundOptions, CornerDotStyle, CornerSquareStyle, CornersDotOptions, CornersSquareOptions,
    DotsOptions, ErrorCorrection, ImageOptions, Paint, RenderOptions, TRANSPARENT,
};
pub use styling::StyledQrEngine;

use crate::error::Result;
use crate::settings::ExportFormat;
use crate::surface::Surface;
use async_trait::async_trait;
use std::path::PathBuf;

/// What to call a download and which format to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// File name without extension
    pub name: String,
    /// Output format; also decides the extension
    pub format: ExportFormat,
}

impl DownloadOptions {
    /// Name plus extension
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.format.extension())
    }
}

/// A QR renderer the preview controller drives
#[async_trait]
pub trait QrEngine: Send {
    /// Replace the current options and redraw attached surfaces.
    ///
    /// The options are stored even when redrawing fails.
    fn update(&mut self, options: RenderOptions) -> Result<()>;

    /// Options most recently applied
    fn options(&self) -> &RenderOptions;

    /// Attach a surface and draw the current state onto it.
    fn append(&mut self, surface: Box<dyn Surface>) -> Result<()>;

    /// Render with the current options and save the result.
    async fn download(&mut self, request: &DownloadOptions) -> Result<PathBuf>;
}
