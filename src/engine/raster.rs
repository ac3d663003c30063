//! PNG back-end: fills scene paths into a `tiny_skia` pixmap

use crate::engine::geometry::{RoundedRect, Shape};
use crate::engine::options::Paint;
use crate::engine::scene::Scene;
use crate::error::{Error, Result};
use image::RgbaImage;
use image::imageops::FilterType;
use tiny_skia::{
    Color, ColorU8, FillRule, PathBuilder, Pixmap, PixmapPaint, Shader, Transform,
};

// Cubic control distance approximating a quarter circle
const KAPPA: f32 = 0.552_284_8;

/// Draw the scene into a new pixmap.
///
/// Each layer becomes one even-odd path, matching the SVG output.
pub fn rasterize(scene: &Scene) -> Result<Pixmap> {
    let mut pixmap = new_pixmap(scene.width, scene.height)?;
    pixmap.fill(color(scene.background));

    for layer in &scene.layers {
        if layer.paint.is_transparent() || layer.shapes.is_empty() {
            continue;
        }
        let mut builder = PathBuilder::new();
        for shape in &layer.shapes {
            push_shape(&mut builder, shape);
        }
        let Some(path) = builder.finish() else {
            continue;
        };
        let paint = tiny_skia::Paint {
            shader: Shader::SolidColor(color(layer.paint)),
            anti_alias: true,
            ..Default::default()
        };
        pixmap.fill_path(&path, &paint, FillRule::EvenOdd, Transform::identity(), None);
    }

    if let Some(logo) = &scene.logo {
        let w = logo.w.round().max(1.0) as u32;
        let h = logo.h.round().max(1.0) as u32;
        let resized = logo.image.resize_exact(w, h, FilterType::Lanczos3).to_rgba8();
        let logo_pixmap = to_pixmap(&resized)?;
        pixmap.draw_pixmap(
            logo.x.round() as i32,
            logo.y.round() as i32,
            logo_pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    Ok(pixmap)
}

/// Rasterise and encode as PNG bytes.
pub fn encode_png(scene: &Scene) -> Result<Vec<u8>> {
    rasterize(scene)?
        .encode_png()
        .map_err(|e| Error::Image(format!("PNG encoding failed: {e}")))
}

fn new_pixmap(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width, height)
        .ok_or_else(|| Error::Image(format!("Cannot allocate a {width}x{height} canvas")))
}

fn color(paint: Paint) -> Color {
    let [r, g, b, a] = paint.rgba;
    Color::from_rgba8(r, g, b, a)
}

// tiny-skia stores premultiplied pixels
fn to_pixmap(img: &RgbaImage) -> Result<Pixmap> {
    let mut pixmap = new_pixmap(img.width(), img.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

fn push_shape(builder: &mut PathBuilder, shape: &Shape) {
    match shape {
        Shape::Solid(rect) => push_rounded_rect(builder, rect),
        Shape::Ring { outer, inner } => {
            push_rounded_rect(builder, outer);
            push_rounded_rect(builder, inner);
        }
    }
}

/// Clockwise outline, same order as the SVG path writer.
fn push_rounded_rect(builder: &mut PathBuilder, rect: &RoundedRect) {
    let (x0, y0) = (rect.x as f32, rect.y as f32);
    let (x1, y1) = (x0 + rect.w as f32, y0 + rect.h as f32);
    let [tl, tr, br, bl] = rect.radii.map(|r| r as f32);

    builder.move_to(x0 + tl, y0);
    builder.line_to(x1 - tr, y0);
    corner(builder, (x1 - tr, y0), (x1, y0), (x1, y0 + tr));
    builder.line_to(x1, y1 - br);
    corner(builder, (x1, y1 - br), (x1, y1), (x1 - br, y1));
    builder.line_to(x0 + bl, y1);
    corner(builder, (x0 + bl, y1), (x0, y1), (x0, y1 - bl));
    builder.line_to(x0, y0 + tl);
    corner(builder, (x0, y0 + tl), (x0, y0), (x0 + tl, y0));
    builder.close();
}

/// Quarter arc from `from` to `to` bending towards the rectangle corner.
fn corner(builder: &mut PathBuilder, from: (f32, f32), at: (f32, f32), to: (f32, f32)) {
    if from == to {
        return;
    }
    builder.cubic_to(
        from.0 + (at.0 - from.0) * KAPPA,
        from.1 + (at.1 - from.1) * KAPPA,
        to.0 + (at.0 - to.0) * KAPPA,
        to.1 + (at.1 - to.1) * KAPPA,
        to.0,
        to.1,
    );
}
