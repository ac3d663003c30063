//! SVG back-end

use crate::engine::options::Paint;
use crate::engine::scene::Scene;
use std::fmt::Write as _;

/// Render the scene as a standalone SVG document.
///
/// The string always uses Unix newlines.
pub fn to_svg_string(scene: &Scene) -> String {
    let (w, h) = (scene.width, scene.height);
    let mut out = String::new();
    out += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
         version=\"1.1\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
    );

    if !scene.background.is_transparent() {
        let _ = writeln!(
            out,
            "\t<rect width=\"100%\" height=\"100%\"{}/>",
            fill_attrs(scene.background)
        );
    }

    for layer in &scene.layers {
        if layer.shapes.is_empty() || layer.paint.is_transparent() {
            continue;
        }
        let mut d = String::new();
        for shape in &layer.shapes {
            shape.write_path(&mut d);
        }
        let _ = writeln!(
            out,
            "\t<path fill-rule=\"evenodd\"{} d=\"{d}\"/>",
            fill_attrs(layer.paint)
        );
    }

    if let Some(logo) = &scene.logo {
        let _ = writeln!(
            out,
            "\t<image x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" \
             preserveAspectRatio=\"xMidYMid meet\" href=\"{url}\" xlink:href=\"{url}\"/>",
            logo.x,
            logo.y,
            logo.w,
            logo.h,
            url = logo.data_url
        );
    }

    out += "</svg>\n";
    out
}

fn fill_attrs(paint: Paint) -> String {
    if paint.rgba[3] == u8::MAX {
        format!(" fill=\"{}\"", paint.hex())
    } else {
        format!(" fill=\"{}\" fill-opacity=\"{:.3}\"", paint.hex(), paint.opacity())
    }
}
