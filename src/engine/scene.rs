//! Lays out a styled code as shapes, independent of output format

use crate::engine::geometry::{RoundedRect, Shape};
use crate::engine::matrix::{FINDER_SIZE, Matrix};
use crate::engine::options::{CornerDotStyle, CornerSquareStyle, Paint, RenderOptions};
use crate::error::{Error, Result};
use crate::logo;
use crate::style::DotStyle;
use image::{DynamicImage, GenericImageView};
use std::ops::Range;

/// A group of shapes sharing one paint
#[derive(Debug, Clone)]
pub struct Layer {
    /// Fill colour
    pub paint: Paint,
    /// Filled regions
    pub shapes: Vec<Shape>,
}

/// Logo placement in pixels
#[derive(Debug, Clone)]
pub struct PlacedLogo {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Drawn width
    pub w: f64,
    /// Drawn height
    pub h: f64,
    /// Decoded pixels
    pub image: DynamicImage,
    /// Original `data:` URL
    pub data_url: String,
}

/// Everything needed to draw one code
#[derive(Debug, Clone)]
pub struct Scene {
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
    /// Canvas fill
    pub background: Paint,
    /// Data modules, then finder rings, then finder centres
    pub layers: Vec<Layer>,
    /// Logo drawn last
    pub logo: Option<PlacedLogo>,
}

impl Scene {
    /// Lay out `matrix` according to `options`.
    pub fn build(matrix: &Matrix, options: &RenderOptions) -> Result<Self> {
        let background = Paint::parse(&options.background.color)?;
        let dot_paint = Paint::parse(&options.dots.color)?;
        let square_paint = Paint::parse(&options.corners_square.color)?;
        let centre_paint = Paint::parse(&options.corners_dot.color)?;

        let count = matrix.width();
        let side = options.width.min(options.height) as usize;
        let dot = (side / count).max(1);
        let offset_x = (options.width as usize).saturating_sub(count * dot) / 2;
        let offset_y = (options.height as usize).saturating_sub(count * dot) / 2;
        let grid = Grid {
            dot: dot as f64,
            offset_x: offset_x as f64,
            offset_y: offset_y as f64,
        };

        let (logo, hidden) = match &options.image {
            Some(data_url) if options.image_options.image_size > 0.0 => {
                let (placed, hidden) = place_logo(data_url, count, &grid, options)?;
                (Some(placed), hidden)
            }
            _ => (None, 0..0),
        };

        let is_data = |col: isize, row: isize| {
            matrix.is_dark(col, row)
                && !matrix.in_finder(col as usize, row as usize)
                && !(hidden.contains(&(col as usize)) && hidden.contains(&(row as usize)))
        };

        let mut dots = Vec::new();
        for row in 0..count as isize {
            for col in 0..count as isize {
                if !is_data(col, row) {
                    continue;
                }
                let neighbours = Neighbours {
                    left: is_data(col - 1, row),
                    right: is_data(col + 1, row),
                    top: is_data(col, row - 1),
                    bottom: is_data(col, row + 1),
                };
                let (x, y) = grid.origin(col as usize, row as usize);
                dots.push(dot_shape(options.dots.style, x, y, grid.dot, neighbours));
            }
        }

        let mut rings = Vec::with_capacity(3);
        let mut centres = Vec::with_capacity(3);
        for (col, row) in matrix.finder_origins() {
            let (x, y) = grid.origin(col, row);
            rings.push(corner_square_shape(options.corners_square.style, x, y, grid.dot));
            let (cx, cy) = grid.origin(col + 2, row + 2);
            centres.push(corner_dot_shape(options.corners_dot.style, cx, cy, grid.dot));
        }

        Ok(Self {
            width: options.width,
            height: options.height,
            background,
            layers: vec![
                Layer {
                    paint: dot_paint,
                    shapes: dots,
                },
                Layer {
                    paint: square_paint,
                    shapes: rings,
                },
                Layer {
                    paint: centre_paint,
                    shapes: centres,
                },
            ],
            logo,
        })
    }
}

struct Grid {
    dot: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Grid {
    fn origin(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.offset_x + col as f64 * self.dot,
            self.offset_y + row as f64 * self.dot,
        )
    }
}

/// Which orthogonal neighbours are drawn data modules
#[derive(Debug, Clone, Copy, Default)]
pub struct Neighbours {
    /// Module to the left
    pub left: bool,
    /// Module to the right
    pub right: bool,
    /// Module above
    pub top: bool,
    /// Module below
    pub bottom: bool,
}

impl Neighbours {
    fn none(&self) -> bool {
        !(self.left || self.right || self.top || self.bottom)
    }
}

/// Shape for one data module.
pub fn dot_shape(style: DotStyle, x: f64, y: f64, size: f64, n: Neighbours) -> Shape {
    let half = size / 2.0;
    let open_tl = !n.left && !n.top;
    let open_tr = !n.right && !n.top;
    let open_br = !n.right && !n.bottom;
    let open_bl = !n.left && !n.bottom;
    let r = |open: bool, radius: f64| if open { radius } else { 0.0 };

    let rect = match style {
        DotStyle::Square => RoundedRect::square(x, y, size),
        DotStyle::Dots => RoundedRect::circle(x, y, size),
        DotStyle::Rounded => RoundedRect::with_radii(
            x,
            y,
            size,
            [r(open_tl, half), r(open_tr, half), r(open_br, half), r(open_bl, half)],
        ),
        DotStyle::Classy => {
            RoundedRect::with_radii(x, y, size, [r(open_tl, half), 0.0, r(open_br, half), 0.0])
        }
        DotStyle::ClassyRounded if n.none() => {
            RoundedRect::with_radii(x, y, size, [half, 0.0, half, 0.0])
        }
        DotStyle::ClassyRounded => {
            RoundedRect::with_radii(x, y, size, [r(open_tl, size), 0.0, r(open_br, size), 0.0])
        }
    };
    Shape::Solid(rect)
}

fn corner_square_shape(style: CornerSquareStyle, x: f64, y: f64, dot: f64) -> Shape {
    let outer_side = FINDER_SIZE as f64 * dot;
    let inner_side = outer_side - 2.0 * dot;
    let (outer, inner) = match style {
        CornerSquareStyle::Square => (
            RoundedRect::square(x, y, outer_side),
            RoundedRect::square(x + dot, y + dot, inner_side),
        ),
        CornerSquareStyle::Dot => (
            RoundedRect::circle(x, y, outer_side),
            RoundedRect::circle(x + dot, y + dot, inner_side),
        ),
        CornerSquareStyle::ExtraRounded => (
            RoundedRect::with_radii(x, y, outer_side, [2.5 * dot; 4]),
            RoundedRect::with_radii(x + dot, y + dot, inner_side, [1.5 * dot; 4]),
        ),
    };
    Shape::Ring { outer, inner }
}

fn corner_dot_shape(style: CornerDotStyle, x: f64, y: f64, dot: f64) -> Shape {
    let side = 3.0 * dot;
    Shape::Solid(match style {
        CornerDotStyle::Square => RoundedRect::square(x, y, side),
        CornerDotStyle::Dot => RoundedRect::circle(x, y, side),
    })
}

/// Decode the logo, fit it in the centre box and report the module range
/// (on both axes) it covers when background dots are hidden.
fn place_logo(
    data_url: &str,
    count: usize,
    grid: &Grid,
    options: &RenderOptions,
) -> Result<(PlacedLogo, Range<usize>)> {
    let bytes = logo::decode_data_url(data_url)?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| Error::InvalidLogo(format!("Failed to decode logo image: {e}")))?;
    let (iw, ih) = image.dimensions();
    if iw == 0 || ih == 0 {
        return Err(Error::InvalidLogo("Logo image is empty".to_string()));
    }

    // Odd module count keeps the box centred on the symbol
    let mut modules = (count as f64 * options.image_options.image_size).round() as usize;
    if modules % 2 == 0 {
        modules = modules.saturating_sub(1);
    }
    let modules = modules.clamp(1, count);
    let start = (count - modules) / 2;

    let (box_x, box_y) = grid.origin(start, start);
    let box_side = modules as f64 * grid.dot;
    let margin = f64::from(options.image_options.margin);
    let available = (box_side - 2.0 * margin).max(1.0);
    let scale = (available / f64::from(iw)).min(available / f64::from(ih));
    let (w, h) = (f64::from(iw) * scale, f64::from(ih) * scale);

    let hidden = if options.image_options.hide_background_dots {
        start..start + modules
    } else {
        0..0
    };

    tracing::debug!(modules, w, h, "Placed logo");

    Ok((
        PlacedLogo {
            x: box_x + (box_side - w) / 2.0,
            y: box_y + (box_side - h) / 2.0,
            w,
            h,
            image,
            data_url: data_url.to_string(),
        },
        hidden,
    ))
}
