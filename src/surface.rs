//! Display surfaces the engine draws its live preview onto

use crate::engine::matrix::Matrix;
use crate::engine::options::{ErrorCorrection, RenderOptions};
use crate::engine::scene::Scene;
use crate::error::Result;
use qrcode::QrCode;
use qrcode::render::unicode;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// One redraw of the preview
#[derive(Debug, Clone, Copy)]
pub struct PreviewFrame<'a> {
    /// Options the frame was drawn with
    pub options: &'a RenderOptions,
    /// Encoded modules
    pub matrix: &'a Matrix,
    /// Laid-out shapes
    pub scene: &'a Scene,
}

/// Something that shows the preview
pub trait Surface: Send {
    /// Redraw with the given frame.
    fn present(&mut self, frame: &PreviewFrame<'_>) -> Result<()>;
}

/// Discards frames
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Surface for Headless {
    fn present(&mut self, _frame: &PreviewFrame<'_>) -> Result<()> {
        Ok(())
    }
}

/// Prints the code as half-block characters
pub struct TerminalSurface<W> {
    writer: W,
}

impl TerminalSurface<std::io::Stdout> {
    /// Surface writing to stdout
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    /// Surface writing to `writer`
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Surface for TerminalSurface<W> {
    fn present(&mut self, frame: &PreviewFrame<'_>) -> Result<()> {
        let options = frame.options;
        let art = terminal_art(&options.data, options.error_correction)?;
        writeln!(self.writer, "{art}")?;
        writeln!(
            self.writer,
            "{} | {}x{} px | fg {} | bg {}{}",
            options.dots.style.name(),
            options.width,
            options.height,
            options.dots.color,
            options.background.color,
            if options.image.is_some() { " | logo" } else { "" },
        )?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Two module rows per text line, dark modules drawn solid.
pub fn terminal_art(data: &str, level: ErrorCorrection) -> Result<String> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), level.into())?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .quiet_zone(true)
        .build())
}

/// Summary of a presented frame
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    /// Options the frame was drawn with
    pub options: RenderOptions,
    /// Modules per side
    pub modules: usize,
}

/// Keeps every frame it is shown; clones share the same record
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    frames: Arc<Mutex<Vec<RecordedFrame>>>,
}

impl RecordingSurface {
    /// Empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far
    pub fn len(&self) -> usize {
        self.frames.lock().map(|frames| frames.len()).unwrap_or_default()
    }

    /// Whether nothing has been presented
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most recent frame
    pub fn last(&self) -> Option<RecordedFrame> {
        self.frames.lock().ok().and_then(|frames| frames.last().cloned())
    }
}

impl Surface for RecordingSurface {
    fn present(&mut self, frame: &PreviewFrame<'_>) -> Result<()> {
        let mut frames = self
            .frames
            .lock()
            .map_err(|_| crate::Error::Other("recording surface poisoned".to_string()))?;
        frames.push(RecordedFrame {
            options: frame.options.clone(),
            modules: frame.matrix.width(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_art_has_light_quiet_zone() {
        let art = terminal_art("hi", ErrorCorrection::L).unwrap();
        let lines: Vec<&str> = art.lines().collect();
        let width = lines[0].chars().count();

        // 21 modules plus a quiet zone on both sides
        assert!(width > 21);
        assert!(lines.len() > 21 / 2);
        assert!(lines.iter().all(|line| line.chars().count() == width));
        assert!(lines[0].chars().all(|c| c == ' '));
        assert!(art.contains('█'));
    }

    #[test]
    fn terminal_surface_prints_art_and_caption() {
        let options = crate::controller::render_options(
            &crate::settings::Settings::default(),
            &Default::default(),
        );
        let matrix = Matrix::encode(&options.data, options.error_correction).unwrap();
        let scene = Scene::build(&matrix, &options).unwrap();
        let frame = PreviewFrame {
            options: &options,
            matrix: &matrix,
            scene: &scene,
        };

        let mut surface = TerminalSurface::new(Vec::new());
        surface.present(&frame).unwrap();
        let text = String::from_utf8(surface.into_inner()).unwrap();

        assert!(text.contains('█'));
        assert!(text.contains("Rounded | 300x300 px | fg #1a73e8 | bg #ffffff"));
    }
}
