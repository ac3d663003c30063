//! Interactive session: line commands edit settings, the preview redraws
//! after each one

use crate::controller::PreviewController;
use crate::engine::QrEngine;
use crate::error::{Error, Result};
use crate::settings::{ExportFormat, Settings};
use crate::style::{COLOR_PRESETS, DotStyle};
use crate::surface::Surface;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// One studio command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the encoded text
    Content(String),
    /// Set the foreground colour
    Foreground(String),
    /// Set the foreground to a numbered preset (1-based)
    Preset(usize),
    /// Set the background colour
    Background(String),
    /// Switch shape preset
    Style(DotStyle),
    /// Change pixel size
    Size(u32),
    /// Upload a logo file
    Logo(PathBuf),
    /// Remove the logo
    RemoveLogo,
    /// Toggle transparent export
    Transparent(bool),
    /// Export in the given format
    Export(ExportFormat),
    /// Print the current settings
    Show,
    /// Back to initial settings with a fresh engine
    Reset,
    /// List commands
    Help,
    /// Leave the session
    Quit,
}

const HELP: &str = "\
commands:
  content <text>           text or URL to encode
  fg <colour>              foreground colour (any CSS colour)
  preset <1-12>            foreground from the quick colours
  bg <colour>              background colour
  style <name>             rounded | square | dots | classy | classy-rounded
  size <200-500>           output size in pixels
  logo <path>              embed an image (max 5MB)
  nologo                   remove the logo
  transparent on|off       transparent background on export
  export png|svg           save the code
  show                     print current settings
  reset                    start over
  quit";

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));
        let need = |what: &'static str| -> Result<&str> {
            if rest.is_empty() {
                Err(Error::InvalidCommand(format!("'{word}' needs {what}")))
            } else {
                Ok(rest)
            }
        };

        match word.to_ascii_lowercase().as_str() {
            // Content may legitimately be empty
            "content" => Ok(Command::Content(rest.to_string())),
            "fg" | "foreground" => Ok(Command::Foreground(need("a colour")?.to_string())),
            "bg" | "background" => Ok(Command::Background(need("a colour")?.to_string())),
            "preset" => {
                let index = need("a number")?
                    .parse::<usize>()
                    .ok()
                    .filter(|n| (1..=COLOR_PRESETS.len()).contains(n))
                    .ok_or_else(|| {
                        Error::InvalidCommand(format!(
                            "preset must be between 1 and {}",
                            COLOR_PRESETS.len()
                        ))
                    })?;
                Ok(Command::Preset(index))
            }
            "style" => need("a style name")?
                .parse::<DotStyle>()
                .map(Command::Style)
                .map_err(Error::InvalidCommand),
            "size" => need("a number of pixels")?
                .parse::<u32>()
                .map(Command::Size)
                .map_err(|e| Error::InvalidCommand(format!("size: {e}"))),
            "logo" => Ok(Command::Logo(PathBuf::from(need("a file path")?))),
            "nologo" => Ok(Command::RemoveLogo),
            "transparent" => match need("on or off")?.to_ascii_lowercase().as_str() {
                "on" | "true" | "1" | "yes" => Ok(Command::Transparent(true)),
                "off" | "false" | "0" | "no" => Ok(Command::Transparent(false)),
                other => Err(Error::InvalidCommand(format!(
                    "transparent expects on/off, got '{other}'"
                ))),
            },
            "export" => need("png or svg")?
                .parse::<ExportFormat>()
                .map(Command::Export)
                .map_err(Error::InvalidCommand),
            "show" => Ok(Command::Show),
            "reset" => Ok(Command::Reset),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err(Error::InvalidCommand("empty command".to_string())),
            other => Err(Error::InvalidCommand(format!(
                "unknown command '{other}', try 'help'"
            ))),
        }
    }
}

/// Creates a fresh display surface whenever the engine is (re)mounted
pub type SurfaceFactory = Box<dyn Fn() -> Box<dyn Surface> + Send>;

/// An interactive session around a controller
pub struct Studio<E: QrEngine, W: Write> {
    controller: PreviewController<E>,
    surfaces: SurfaceFactory,
    out: W,
}

impl<E: QrEngine, W: Write + Send> Studio<E, W> {
    /// Wrap a controller; messages go to `out`
    pub fn new(controller: PreviewController<E>, surfaces: SurfaceFactory, out: W) -> Self {
        Self {
            controller,
            surfaces,
            out,
        }
    }

    /// The wrapped controller
    pub fn controller(&self) -> &PreviewController<E> {
        &self.controller
    }

    /// Give back the output writer
    pub fn into_output(self) -> W {
        self.out
    }

    /// Mount the engine, then process commands until `quit` or end of input.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        if let Err(err) = self.controller.mount((self.surfaces)()) {
            writeln!(self.out, "error: {err}")?;
        }
        writeln!(self.out, "Type 'help' for commands.")?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    writeln!(self.out, "{err}")?;
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }
            if let Err(err) = self.execute(command).await {
                tracing::debug!(error = %err, "Studio command failed");
                writeln!(self.out, "error: {err}")?;
            }
            for note in self.controller.drain_notifications() {
                writeln!(self.out, "{note}")?;
            }
        }
        Ok(())
    }

    /// Apply one command to the controller.
    pub async fn execute(&mut self, command: Command) -> Result<()> {
        let controller = &mut self.controller;
        match command {
            Command::Content(text) => controller.set_content(text),
            Command::Foreground(color) => controller.set_foreground(color),
            Command::Preset(index) => {
                let color = COLOR_PRESETS.get(index.wrapping_sub(1)).ok_or_else(|| {
                    Error::InvalidCommand(format!(
                        "preset must be between 1 and {}",
                        COLOR_PRESETS.len()
                    ))
                })?;
                controller.set_foreground(*color)
            }
            Command::Background(color) => controller.set_background(color),
            Command::Style(style) => controller.set_style(style),
            Command::Size(size) => controller.set_size(size),
            Command::Logo(path) => controller.upload_logo(&path).await,
            Command::RemoveLogo => controller.remove_logo(),
            Command::Transparent(enabled) => controller.set_transparent_export(enabled),
            Command::Export(format) => controller.export(format).await.map(|path| {
                tracing::debug!(path = %path.display(), "Exported from studio");
            }),
            Command::Show => {
                let summary = describe(controller.settings());
                writeln!(self.out, "{summary}")?;
                Ok(())
            }
            Command::Reset => {
                controller.reset();
                controller.mount((self.surfaces)())
            }
            Command::Help => {
                writeln!(self.out, "{HELP}")?;
                Ok(())
            }
            Command::Quit => Ok(()),
        }
    }
}

/// Multi-line summary of the settings; the logo is reported by size only.
pub fn describe(settings: &Settings) -> String {
    let logo = match &settings.logo {
        Some(url) => format!("{} chars of data URL", url.len()),
        None => "none".to_string(),
    };
    format!(
        "content: {}\nstyle: {} {}\nforeground: {}\nbackground: {}\nsize: {}px\nlogo: {}\ntransparent export: {}",
        settings.content,
        settings.style.preview(),
        settings.style.name(),
        settings.foreground,
        settings.background,
        settings.size(),
        logo,
        if settings.transparent_export { "on" } else { "off" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StyledQrEngine;
    use crate::save::{DirectorySaver, SaveAs};
    use crate::surface::{Headless, RecordingSurface};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("qrstudio-studio-{}-{name}", std::process::id()))
    }

    fn controller(
        settings: Settings,
        dir: PathBuf,
        builds: Arc<AtomicUsize>,
    ) -> PreviewController<StyledQrEngine> {
        let saver: Arc<dyn SaveAs> = Arc::new(DirectorySaver::new(dir));
        PreviewController::new(settings, move |options| {
            builds.fetch_add(1, Ordering::SeqCst);
            StyledQrEngine::new(options, Arc::clone(&saver))
        })
    }

    fn headless() -> SurfaceFactory {
        Box::new(|| Box::new(Headless) as Box<dyn Surface>)
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            "content https://example.com/a b".parse::<Command>().unwrap(),
            Command::Content("https://example.com/a b".to_string())
        );
        assert_eq!("content".parse::<Command>().unwrap(), Command::Content(String::new()));
        assert_eq!(
            "fg   rgb(1, 2, 3)".parse::<Command>().unwrap(),
            Command::Foreground("rgb(1, 2, 3)".to_string())
        );
        assert_eq!("preset 12".parse::<Command>().unwrap(), Command::Preset(12));
        assert_eq!(
            "style classy-rounded".parse::<Command>().unwrap(),
            Command::Style(DotStyle::ClassyRounded)
        );
        assert_eq!("SIZE 350".parse::<Command>().unwrap(), Command::Size(350));
        assert_eq!(
            "transparent on".parse::<Command>().unwrap(),
            Command::Transparent(true)
        );
        assert_eq!(
            "export svg".parse::<Command>().unwrap(),
            Command::Export(ExportFormat::Svg)
        );
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn rejects_bad_commands() {
        for line in ["preset 0", "preset 13", "fg", "style star", "size big", "export gif", "fly"] {
            assert!(
                matches!(line.parse::<Command>(), Err(Error::InvalidCommand(_))),
                "{line} should be rejected"
            );
        }
    }

    #[test]
    fn describe_hides_logo_payload() {
        let mut settings = Settings::default();
        settings.logo = Some("data:image/png;base64,AAAA".to_string());
        let text = describe(&settings);
        assert!(text.contains("logo: 26 chars"));
        assert!(!text.contains("AAAA"));
    }

    #[tokio::test]
    async fn session_redraws_and_reports_each_command() {
        let builds = Arc::new(AtomicUsize::new(0));
        let recording = RecordingSurface::new();
        let frames = recording.clone();
        let surfaces: SurfaceFactory =
            Box::new(move || Box::new(frames.clone()) as Box<dyn Surface>);
        let controller = controller(Settings::default(), temp_dir("session"), Arc::clone(&builds));
        let mut studio = Studio::new(controller, surfaces, Vec::new());

        let script = b"content hello\nstyle dots\nfly\nnologo\nreset\nshow\nquit\ncontent ignored\n";
        studio.run(&script[..]).await.unwrap();

        // mount, content, style, nologo, then the remount after reset
        assert_eq!(recording.len(), 5);
        assert_eq!(builds.load(Ordering::SeqCst), 2);
        let last = recording.last().unwrap();
        assert_eq!(last.options.data, "https://example.com");
        assert_eq!(last.options.dots.style, DotStyle::Rounded);
        assert_eq!(studio.controller().settings(), &Settings::default());

        let output = String::from_utf8(studio.into_output()).unwrap();
        assert!(output.starts_with("Type 'help' for commands."));
        assert!(output.contains("unknown command 'fly'"));
        assert!(output.contains("✓ Logo removed"));
        assert!(output.contains("content: https://example.com"));
        assert!(!output.contains("ignored"));
    }

    #[tokio::test]
    async fn session_recovers_from_bad_start_colour() {
        let dir = temp_dir("recover");
        let mut settings = Settings::default();
        settings.foreground = "nope".to_string();
        let controller = controller(settings, dir.clone(), Arc::default());
        let mut studio = Studio::new(controller, headless(), Vec::new());

        studio.run(&b"fg #000000\nexport svg\n"[..]).await.unwrap();

        assert_eq!(studio.controller().settings().foreground, "#000000");
        assert!(studio.controller().engine().is_some());
        let output = String::from_utf8(studio.into_output()).unwrap();
        assert!(output.contains("✓ QR Code exported as SVG"), "{output}");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn preset_out_of_range_is_rejected() {
        let controller = controller(Settings::default(), temp_dir("preset"), Arc::default());
        let mut studio = Studio::new(controller, headless(), Vec::new());

        for index in [0, 13] {
            assert!(matches!(
                studio.execute(Command::Preset(index)).await,
                Err(Error::InvalidCommand(_))
            ));
        }
        studio.execute(Command::Preset(4)).await.unwrap();
        assert_eq!(studio.controller().settings().foreground, "#DC3545");
    }
}
