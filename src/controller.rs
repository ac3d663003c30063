//! Preview controller: owns the settings and the engine handle
//!
//! Every settings mutation goes through [`PreviewController::modify`], which
//! pushes a complete options snapshot to the engine so the attached surfaces
//! always show the current state.

use crate::engine::{
    BackgroundOptions, CornersDotOptions, CornersSquareOptions, DotsOptions, DownloadOptions,
    ErrorCorrection, ImageOptions, QrEngine, RenderOptions, TRANSPARENT,
};
use crate::error::{Error, Result};
use crate::logo::{self, FilePicker, MAX_LOGO_BYTES};
use crate::notify::{Notification, Notifications};
use crate::settings::{ExportFormat, Settings};
use crate::style::DotStyle;
use crate::surface::Surface;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, warn};

/// Engine-level options that are not user settings
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderDefaults {
    /// Error correction level for every render
    pub error_correction: ErrorCorrection,
    /// Logo placement
    pub image_options: ImageOptions,
}

/// Build the full option snapshot for `settings`.
pub fn render_options(settings: &Settings, defaults: &RenderDefaults) -> RenderOptions {
    RenderOptions {
        data: settings.content.clone(),
        width: settings.size(),
        height: settings.size(),
        error_correction: defaults.error_correction,
        dots: DotsOptions {
            color: settings.foreground.clone(),
            style: settings.style,
        },
        background: BackgroundOptions {
            color: settings.background.clone(),
        },
        corners_square: CornersSquareOptions {
            color: settings.foreground.clone(),
            style: settings.style.into(),
        },
        corners_dot: CornersDotOptions {
            color: settings.foreground.clone(),
            style: settings.style.into(),
        },
        image_options: defaults.image_options,
        image: settings.logo.clone(),
    }
}

/// Creates the engine on first mount
pub type EngineBuilder<E> = Box<dyn Fn(RenderOptions) -> E + Send>;

/// Holds user settings and drives a [`QrEngine`]
pub struct PreviewController<E: QrEngine> {
    settings: Settings,
    initial: Settings,
    defaults: RenderDefaults,
    logo_limit: u64,
    builder: EngineBuilder<E>,
    engine: Option<E>,
    file_picker: FilePicker,
    notifications: Notifications,
    generating: bool,
}

impl<E: QrEngine> PreviewController<E> {
    /// Controller starting from `settings`; `builder` runs on first mount.
    pub fn new(settings: Settings, builder: impl Fn(RenderOptions) -> E + Send + 'static) -> Self {
        Self {
            initial: settings.clone(),
            settings,
            defaults: RenderDefaults::default(),
            logo_limit: MAX_LOGO_BYTES,
            builder: Box::new(builder),
            engine: None,
            file_picker: FilePicker::default(),
            notifications: Notifications::default(),
            generating: false,
        }
    }

    /// Override engine-level defaults
    pub fn with_defaults(mut self, defaults: RenderDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Override the logo upload limit in bytes
    pub fn with_logo_limit(mut self, limit: u64) -> Self {
        self.logo_limit = limit;
        self
    }

    /// Current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The engine, once mounted
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Whether an export is in flight
    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Logo file selection
    pub fn file_picker(&self) -> &FilePicker {
        &self.file_picker
    }

    /// Take queued notifications
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// Options the engine would receive for the current settings
    pub fn snapshot(&self) -> RenderOptions {
        render_options(&self.settings, &self.defaults)
    }

    /// Create the engine if needed and attach `surface` to it.
    ///
    /// A failed first draw (an unusable colour, say) is logged and the
    /// surface stays attached, so later setting changes can repair it.
    pub fn mount(&mut self, surface: Box<dyn Surface>) -> Result<()> {
        let snapshot = self.snapshot();
        let builder = &self.builder;
        let engine = self.engine.get_or_insert_with(|| {
            debug!("Constructing rendering engine");
            builder(snapshot)
        });
        if let Err(err) = engine.append(surface) {
            warn!(error = %err, "Initial preview draw failed");
        }
        Ok(())
    }

    /// Mutate settings and push the new snapshot to the engine.
    ///
    /// The mutation is kept even if the engine rejects the result.
    pub fn modify(&mut self, change: impl FnOnce(&mut Settings)) -> Result<()> {
        change(&mut self.settings);
        self.refresh()
    }

    fn refresh(&mut self) -> Result<()> {
        let options = self.snapshot();
        let Some(engine) = self.engine.as_mut() else {
            return Ok(());
        };
        engine.update(options).inspect_err(|err| {
            warn!(error = %err, "Preview update failed");
        })
    }

    /// Set the encoded text
    pub fn set_content(&mut self, content: impl Into<String>) -> Result<()> {
        let content = content.into();
        self.modify(|s| s.content = content)
    }

    /// Set the foreground colour
    pub fn set_foreground(&mut self, color: impl Into<String>) -> Result<()> {
        let color = color.into();
        self.modify(|s| s.foreground = color)
    }

    /// Set the background colour
    pub fn set_background(&mut self, color: impl Into<String>) -> Result<()> {
        let color = color.into();
        self.modify(|s| s.background = color)
    }

    /// Set the shape preset
    pub fn set_style(&mut self, style: DotStyle) -> Result<()> {
        self.modify(|s| s.style = style)
    }

    /// Set the size; out-of-range values are clamped
    pub fn set_size(&mut self, size: u32) -> Result<()> {
        self.modify(|s| {
            s.set_size(size);
        })
    }

    /// Toggle transparent exports
    pub fn set_transparent_export(&mut self, enabled: bool) -> Result<()> {
        self.modify(|s| s.transparent_export = enabled)
    }

    /// Read a logo from disk and make it the active logo.
    pub async fn upload_logo(&mut self, path: &Path) -> Result<()> {
        let bytes = match logo::read_logo_file(path, self.logo_limit).await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.report_logo_error(&err);
                return Err(err);
            }
        };
        self.accept_logo(&bytes)?;
        self.file_picker.select(path);
        self.refresh()?;
        self.notifications.success("Logo uploaded successfully!");
        Ok(())
    }

    /// Make in-memory image bytes the active logo.
    pub fn upload_logo_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let size = bytes.len() as u64;
        if size > self.logo_limit {
            let err = Error::LogoTooLarge {
                size,
                limit: self.logo_limit,
            };
            self.report_logo_error(&err);
            return Err(err);
        }
        self.accept_logo(bytes)?;
        self.refresh()?;
        self.notifications.success("Logo uploaded successfully!");
        Ok(())
    }

    fn accept_logo(&mut self, bytes: &[u8]) -> Result<()> {
        if let Err(err) = image::guess_format(bytes) {
            let err = Error::InvalidLogo(format!("Unsupported image format: {err}"));
            self.report_logo_error(&err);
            return Err(err);
        }
        self.settings.logo = Some(logo::encode_data_url(bytes));
        Ok(())
    }

    fn report_logo_error(&mut self, err: &Error) {
        match err {
            Error::LogoTooLarge { limit, .. } => {
                let megabytes = limit / (1024 * 1024);
                self.notifications
                    .error(format!("Image size should be less than {megabytes}MB"));
            }
            other => self.notifications.error(format!("Failed to load logo: {other}")),
        }
    }

    /// Drop the logo and reset the file picker.
    pub fn remove_logo(&mut self) -> Result<()> {
        self.file_picker.clear();
        let result = self.modify(|s| s.logo = None);
        self.notifications.success("Logo removed");
        result
    }

    /// Render and save the code in `format`.
    ///
    /// With transparent export enabled the engine background is cleared for
    /// the download and restored afterwards, whether or not it succeeded.
    pub async fn export(&mut self, format: ExportFormat) -> Result<PathBuf> {
        let Some(engine) = self.engine.as_mut() else {
            return Err(Error::EngineNotMounted);
        };

        self.generating = true;
        let request = DownloadOptions {
            name: export_name(),
            format,
        };
        let original = engine.options().clone();
        let transparent = self.settings.transparent_export;

        let result = async {
            if transparent {
                engine.update(original.with_background(TRANSPARENT))?;
            }
            engine.download(&request).await
        }
        .await;

        if transparent {
            if let Err(err) = engine.update(original) {
                warn!(error = %err, "Failed to restore background after export");
            }
        }
        self.generating = false;

        match &result {
            Ok(path) => {
                debug!(path = %path.display(), "Export complete");
                self.notifications.success(format!(
                    "QR Code exported as {}",
                    format.extension().to_ascii_uppercase()
                ));
            }
            Err(err) => {
                error!(error = %err, "Export error");
                self.notifications.error("Failed to export QR code");
            }
        }
        result
    }

    /// Drop the engine and go back to the initial settings.
    ///
    /// The next [`mount`](Self::mount) builds a fresh engine.
    pub fn reset(&mut self) {
        self.engine = None;
        self.settings = self.initial.clone();
        self.file_picker.clear();
        self.generating = false;
    }
}

/// Timestamped export name, e.g. `qrcode-1760700000000`
pub fn export_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    format!("qrcode-{millis}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_mirrors_settings() {
        let mut settings = Settings::default().with_size(420);
        settings.style = DotStyle::Dots;
        settings.foreground = "#6F42C1".to_string();
        let options = render_options(&settings, &RenderDefaults::default());

        assert_eq!((options.width, options.height), (420, 420));
        assert_eq!(options.dots.style, DotStyle::Dots);
        assert_eq!(options.corners_square.color, "#6F42C1");
        assert_eq!(options.error_correction, ErrorCorrection::Q);
        assert!(options.image.is_none());
    }

    #[test]
    fn export_names_are_timestamped() {
        let name = export_name();
        let millis = name.strip_prefix("qrcode-").expect("prefix");
        assert!(millis.parse::<u128>().unwrap() > 0);
    }
}
