use crate::engine::matrix::Matrix;
use crate::engine::options::{ErrorCorrection, RenderOptions};
use crate::engine::scene::Scene;
use crate::engine::{DownloadOptions, QrEngine, raster, vector};
use crate::error::{Error, Result};
use crate::save::SaveAs;
use crate::settings::ExportFormat;
use crate::surface::{PreviewFrame, Surface};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Encoded matrix remembered across colour-only updates
struct Encoded {
    data: String,
    level: ErrorCorrection,
    matrix: Matrix,
}

/// Engine drawing styled codes with the `qrcode` encoder
pub struct StyledQrEngine {
    options: RenderOptions,
    encoded: Option<Encoded>,
    surfaces: Vec<Box<dyn Surface>>,
    saver: Arc<dyn SaveAs>,
}

impl StyledQrEngine {
    /// Create an engine; nothing is encoded until first needed.
    pub fn new(options: RenderOptions, saver: Arc<dyn SaveAs>) -> Self {
        Self {
            options,
            encoded: None,
            surfaces: Vec::new(),
            saver,
        }
    }

    fn matrix(&mut self) -> Result<&Matrix> {
        let stale = self.encoded.as_ref().is_none_or(|cached| {
            cached.data != self.options.data || cached.level != self.options.error_correction
        });
        if stale {
            let matrix = Matrix::encode(&self.options.data, self.options.error_correction)?;
            self.encoded = Some(Encoded {
                data: self.options.data.clone(),
                level: self.options.error_correction,
                matrix,
            });
        }
        self.encoded
            .as_ref()
            .map(|cached| &cached.matrix)
            .ok_or_else(|| Error::QrEncode("matrix cache empty after encoding".to_string()))
    }

    fn redraw(&mut self) -> Result<()> {
        if self.surfaces.is_empty() {
            return Ok(());
        }
        self.matrix()?;
        let Some(encoded) = self.encoded.as_ref() else {
            return Ok(());
        };
        let scene = Scene::build(&encoded.matrix, &self.options)?;
        let frame = PreviewFrame {
            options: &self.options,
            matrix: &encoded.matrix,
            scene: &scene,
        };
        for surface in &mut self.surfaces {
            surface.present(&frame)?;
        }
        Ok(())
    }
}

#[async_trait]
impl QrEngine for StyledQrEngine {
    fn update(&mut self, options: RenderOptions) -> Result<()> {
        self.options = options;
        self.redraw()
    }

    fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn append(&mut self, surface: Box<dyn Surface>) -> Result<()> {
        self.surfaces.push(surface);
        self.redraw()
    }

    #[instrument(skip(self), fields(format = %request.format))]
    async fn download(&mut self, request: &DownloadOptions) -> Result<PathBuf> {
        let matrix = self.matrix()?.clone();
        let options = self.options.clone();
        let format = request.format;

        // Rasterising a 500px canvas is CPU work; keep it off the async workers
        let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let scene = Scene::build(&matrix, &options)?;
            match format {
                ExportFormat::Png => raster::encode_png(&scene),
                ExportFormat::Svg => Ok(vector::to_svg_string(&scene).into_bytes()),
            }
        })
        .await
        .map_err(|e| Error::Export(format!("Render task failed: {e}")))??;

        debug!(bytes = bytes.len(), "Rendered export");
        self.saver.save(&request.file_name(), bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{RenderDefaults, render_options};
    use crate::save::DirectorySaver;
    use crate::settings::Settings;
    use crate::surface::RecordingSurface;

    fn engine() -> StyledQrEngine {
        let options = render_options(&Settings::default(), &RenderDefaults::default());
        StyledQrEngine::new(options, Arc::new(DirectorySaver::new(std::env::temp_dir())))
    }

    #[test]
    fn append_draws_current_state() {
        let mut engine = engine();
        let recording = RecordingSurface::new();
        engine.append(Box::new(recording.clone())).unwrap();

        assert_eq!(recording.len(), 1);
        assert_eq!(recording.last().unwrap().options, *engine.options());
    }

    #[test]
    fn update_stores_options_even_when_redraw_fails() {
        let mut engine = engine();
        engine.append(Box::new(RecordingSurface::new())).unwrap();

        let mut options = engine.options().clone();
        options.dots.color = "nope".to_string();
        assert!(engine.update(options.clone()).is_err());
        assert_eq!(engine.options(), &options);
    }

    #[test]
    fn matrix_is_reused_for_colour_changes() {
        let mut engine = engine();
        let first = engine.matrix().unwrap().clone();

        let options = engine.options().with_background("#000000");
        engine.update(options).unwrap();
        assert_eq!(engine.matrix().unwrap(), &first);

        let mut options = engine.options().clone();
        options.data = "something else entirely".to_string();
        engine.update(options).unwrap();
        assert_ne!(engine.matrix().unwrap(), &first);
    }
}
