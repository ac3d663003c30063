//! Module grid produced by the `qrcode` encoder

use crate::engine::options::ErrorCorrection;
use crate::error::Result;
use qrcode::QrCode;

/// Side of a finder pattern in modules
pub const FINDER_SIZE: usize = 7;

/// Square grid of dark/light modules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    width: usize,
    dark: Vec<bool>,
}

impl Matrix {
    /// Encode `data` at the given error correction level.
    pub fn encode(data: &str, level: ErrorCorrection) -> Result<Self> {
        let code = QrCode::with_error_correction_level(data.as_bytes(), level.into())?;
        let width = code.width();
        let dark = code
            .to_colors()
            .into_iter()
            .map(|color| color == qrcode::Color::Dark)
            .collect();

        tracing::trace!(width, version = ?code.version(), "Encoded QR matrix");
        Ok(Self { width, dark })
    }

    /// Modules per side
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the module at (`col`, `row`) is dark; out of range is light.
    pub fn is_dark(&self, col: isize, row: isize) -> bool {
        if col < 0 || row < 0 {
            return false;
        }
        let (col, row) = (col as usize, row as usize);
        col < self.width && row < self.width && self.dark[row * self.width + col]
    }

    /// Top-left module coordinates of the three finder patterns
    pub fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.width - FINDER_SIZE;
        [(0, 0), (far, 0), (0, far)]
    }

    /// Whether the module belongs to one of the finder patterns
    pub fn in_finder(&self, col: usize, row: usize) -> bool {
        self.finder_origins().iter().any(|&(x, y)| {
            (x..x + FINDER_SIZE).contains(&col) && (y..y + FINDER_SIZE).contains(&row)
        })
    }
}
