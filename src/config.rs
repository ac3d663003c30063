//! qrstudio runtime configuration handling

use crate::controller::RenderDefaults;
use crate::engine::{ErrorCorrection, ImageOptions};
use crate::error::{Error, Result};
use crate::logo::MAX_LOGO_BYTES;
use crate::settings::Settings;
use crate::style::DotStyle;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure persisted to disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Initial settings for new sessions
    pub defaults: DefaultsOptions,
    /// Logo handling
    pub logo: LogoOptions,
    /// Where exports go
    pub export: ExportOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl StudioConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No qrstudio.toml / qrstudio.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrstudio.toml", "qrstudio.yaml", "qrstudio.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrstudio");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.defaults.apply_env_overrides();
        self.export.apply_env_overrides();
        self.logging.apply_env_overrides();
    }

    /// Engine-level defaults derived from the config
    pub fn render_defaults(&self) -> RenderDefaults {
        RenderDefaults {
            error_correction: self.defaults.error_correction,
            image_options: ImageOptions {
                hide_background_dots: self.logo.hide_background_dots,
                image_size: self.logo.image_size.clamp(0.0, 0.5),
                margin: self.logo.margin,
            },
        }
    }
}

/// Initial values for the user settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsOptions {
    /// Text to encode
    pub content: String,
    /// Dot colour
    pub foreground: String,
    /// Canvas colour
    pub background: String,
    /// Shape preset
    pub style: DotStyle,
    /// Pixel size, clamped to 200..=500
    pub size: u32,
    /// Export with a transparent background
    pub transparent_export: bool,
    /// Error correction level
    pub error_correction: ErrorCorrection,
}

impl Default for DefaultsOptions {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            content: settings.content,
            foreground: settings.foreground,
            background: settings.background,
            style: settings.style,
            size: 300,
            transparent_export: settings.transparent_export,
            error_correction: ErrorCorrection::default(),
        }
    }
}

impl DefaultsOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(content) = env::var("QRSTUDIO_CONTENT") {
            self.content = content;
        }
        if let Ok(color) = env::var("QRSTUDIO_FOREGROUND") {
            self.foreground = color;
        }
        if let Ok(color) = env::var("QRSTUDIO_BACKGROUND") {
            self.background = color;
        }
        if let Ok(style) = env::var("QRSTUDIO_STYLE") {
            match style.parse::<DotStyle>() {
                Ok(parsed) => self.style = parsed,
                Err(err) => tracing::warn!("Ignoring QRSTUDIO_STYLE: {err}"),
            }
        }
        if let Ok(size) = env::var("QRSTUDIO_SIZE") {
            if let Ok(parsed) = size.parse::<u32>() {
                self.size = parsed;
            }
        }
        if let Ok(level) = env::var("QRSTUDIO_ERROR_CORRECTION") {
            if let Ok(parsed) = level.parse::<ErrorCorrection>() {
                self.error_correction = parsed;
            }
        }
    }

    /// Settings seeded from these defaults
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default().with_size(self.size);
        settings.content = self.content.clone();
        settings.foreground = self.foreground.clone();
        settings.background = self.background.clone();
        settings.style = self.style;
        settings.transparent_export = self.transparent_export;
        settings
    }
}

/// Logo handling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoOptions {
    /// Largest accepted upload in bytes
    pub max_bytes: u64,
    /// Logo box side as a fraction of the symbol side (capped at 0.5)
    pub image_size: f64,
    /// Gap around the logo in pixels
    pub margin: u32,
    /// Leave modules under the logo undrawn
    pub hide_background_dots: bool,
}

impl Default for LogoOptions {
    fn default() -> Self {
        let image = ImageOptions::default();
        Self {
            max_bytes: MAX_LOGO_BYTES,
            image_size: image.image_size,
            margin: image.margin,
            hide_background_dots: image.hide_background_dots,
        }
    }
}

/// Export destination
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Directory receiving exported files
    pub directory: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("exports"),
        }
    }
}

impl ExportOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("QRSTUDIO_EXPORT_DIR") {
            if !dir.trim().is_empty() {
                self.directory = PathBuf::from(dir);
            }
        }
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QRSTUDIO_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stderr logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("QRSTUDIO_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("QRSTUDIO_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("QRSTUDIO_LOG_COLOR") {
            match color.to_ascii_lowercase().as_str() {
                "0" | "false" | "off" => self.color = false,
                "1" | "true" | "on" => self.color = true,
                _ => {}
            }
        }
        if let Ok(rotation) = env::var("QRSTUDIO_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::parse(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("qrstudio-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parses_toml_sections() {
        let path = write_temp(
            "config.toml",
            r##"
[defaults]
content = "https://rust-lang.org"
foreground = "#000000"
style = "classy-rounded"
size = 9999
error_correction = "H"

[logo]
max_bytes = 1024
image_size = 0.8

[export]
directory = "out"

[logging]
level = "debug"
rotation = "daily"
"##,
        );
        let config = StudioConfig::from_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(config.defaults.style, DotStyle::ClassyRounded);
        assert_eq!(config.defaults.error_correction, ErrorCorrection::H);
        assert_eq!(config.logo.max_bytes, 1024);
        assert_eq!(config.export.directory, PathBuf::from("out"));
        assert_eq!(config.logging.rotation, Some(LogRotation::Daily));
        // untouched fields keep defaults
        assert_eq!(config.defaults.background, "#ffffff");

        let settings = config.defaults.to_settings();
        assert_eq!(settings.size(), 500);
        assert_eq!(settings.content, "https://rust-lang.org");
        assert_eq!(config.render_defaults().image_options.image_size, 0.5);
    }

    #[test]
    fn parses_yaml() {
        let path = write_temp(
            "config.yaml",
            "defaults:\n  style: dots\n  transparent_export: true\nlogging:\n  color: false\n",
        );
        let config = StudioConfig::from_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(config.defaults.style, DotStyle::Dots);
        assert!(config.defaults.transparent_export);
        assert!(!config.logging.color);
    }

    #[test]
    fn rejects_unknown_extension() {
        let path = write_temp("config.ini", "style=dots");
        let result = StudioConfig::from_file(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
