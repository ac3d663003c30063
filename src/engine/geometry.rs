//! Shape primitives shared by the raster and vector back-ends

use std::fmt::Write as _;

/// Axis-aligned rectangle with independent corner radii, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub w: f64,
    /// Height
    pub h: f64,
    /// Radii for top-left, top-right, bottom-right, bottom-left
    pub radii: [f64; 4],
}

impl RoundedRect {
    /// Sharp-cornered square
    pub fn square(x: f64, y: f64, side: f64) -> Self {
        Self::with_radii(x, y, side, [0.0; 4])
    }

    /// Square with all corners rounded by half the side
    pub fn circle(x: f64, y: f64, side: f64) -> Self {
        Self::with_radii(x, y, side, [side / 2.0; 4])
    }

    /// Square with explicit radii, each capped at the side
    pub fn with_radii(x: f64, y: f64, side: f64, radii: [f64; 4]) -> Self {
        Self {
            x,
            y,
            w: side,
            h: side,
            radii: radii.map(|r| r.clamp(0.0, side)),
        }
    }

    /// Append a closed SVG sub-path tracing the outline clockwise.
    pub fn write_path(&self, out: &mut String) {
        let (x0, y0, x1, y1) = (self.x, self.y, self.x + self.w, self.y + self.h);
        let [tl, tr, br, bl] = self.radii;

        let _ = write!(out, "M{} {}", fmt(x0 + tl), fmt(y0));
        let _ = write!(out, "H{}", fmt(x1 - tr));
        arc(out, tr, x1, y0 + tr);
        let _ = write!(out, "V{}", fmt(y1 - br));
        arc(out, br, x1 - br, y1);
        let _ = write!(out, "H{}", fmt(x0 + bl));
        arc(out, bl, x0, y1 - bl);
        let _ = write!(out, "V{}", fmt(y0 + tl));
        arc(out, tl, x0 + tl, y0);
        out.push('Z');
    }
}

fn arc(out: &mut String, r: f64, x: f64, y: f64) {
    if r > 0.0 {
        let _ = write!(out, "A{} {} 0 0 1 {} {}", fmt(r), fmt(r), fmt(x), fmt(y));
    }
}

// Two decimals is plenty at these sizes and keeps the documents small
fn fmt(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

/// A filled region
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Filled rounded rectangle
    Solid(RoundedRect),
    /// Outer rectangle with the inner one cut out
    Ring {
        /// Outer boundary
        outer: RoundedRect,
        /// Hole
        inner: RoundedRect,
    },
}

impl Shape {
    /// Outermost rectangle
    pub fn bounds(&self) -> &RoundedRect {
        match self {
            Shape::Solid(rect) => rect,
            Shape::Ring { outer, .. } => outer,
        }
    }

    /// Append SVG path data; rings rely on `fill-rule="evenodd"`.
    pub fn write_path(&self, out: &mut String) {
        match self {
            Shape::Solid(rect) => rect.write_path(out),
            Shape::Ring { outer, inner } => {
                outer.write_path(out);
                inner.write_path(out);
            }
        }
    }
}
