//! qrstudio - styled QR codes with a live preview
//!
//! Type some text, choose a dot shape, colours, a size and optionally a logo,
//! and export the code as PNG or SVG.
//!
//! # Features
//!
//! - **Preview controller**: every settings change re-renders the preview
//! - **Styles**: rounded, square, dots, classy and classy-rounded modules
//! - **Logos**: embedded in the centre with background modules cleared
//! - **Exports**: PNG (anti-aliased) or SVG, optionally with a transparent background
//!
//! # Example
//!
//! ```no_run
//! use qrstudio::{DirectorySaver, ExportFormat, PreviewController, Settings, StyledQrEngine};
//! use qrstudio::surface::Headless;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let saver = Arc::new(DirectorySaver::new("exports"));
//!     let mut controller = PreviewController::new(Settings::default(), move |options| {
//!         StyledQrEngine::new(options, saver.clone())
//!     });
//!
//!     controller.mount(Box::new(Headless))?;
//!     controller.set_content("https://www.rust-lang.org")?;
//!     let path = controller.export(ExportFormat::Svg).await?;
//!
//!     println!("Saved {}", path.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod logging;
pub mod logo;
pub mod notify;
pub mod save;
pub mod settings;
pub mod studio;
pub mod style;
pub mod surface;

// Re-exports for convenience
pub use error::{Error, Result};

pub use config::{DefaultsOptions, ExportOptions, LogRotation, LoggingOptions, LogoOptions, StudioConfig};
pub use controller::{PreviewController, RenderDefaults, render_options};
pub use engine::{DownloadOptions, QrEngine, RenderOptions, StyledQrEngine};
pub use notify::{Notification, NotificationKind};
pub use save::{DirectorySaver, SaveAs};
pub use settings::{ExportFormat, Settings};
pub use style::{COLOR_PRESETS, DotStyle};
