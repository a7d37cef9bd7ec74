use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};
use serde::Serialize;

use crate::color::{colormap_rgb, heatmap_rgb, ColorScale};
use crate::dsp::scale::DisplayMatrix;
use crate::pipeline::Analysis;

/// Minimum size of the heatmap area in pixels; cells are repeated
/// (nearest neighbour) until the image reaches it.
const MIN_PLOT_WIDTH: usize = 640;
const MIN_PLOT_HEIGHT: usize = 360;
const COLORBAR_GAP: u32 = 16;
const COLORBAR_WIDTH: u32 = 24;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

// ---------------------------------------------------------------------------
// PNG
// ---------------------------------------------------------------------------

/// Render the heatmap with a colour bar on its right.
///
/// Frequency grows upwards, time to the right; the colour bar runs from
/// the matrix minimum (bottom) to its maximum (top).
pub fn render_image(display: &DisplayMatrix) -> RgbImage {
    let scale = ColorScale::for_matrix(display);
    let (cols, rows, pixels) = heatmap_rgb(display, &scale);
    let cols = cols.max(1);
    let rows = rows.max(1);

    let cell_w = MIN_PLOT_WIDTH.div_ceil(cols);
    let cell_h = MIN_PLOT_HEIGHT.div_ceil(rows);
    let plot_w = (cols * cell_w) as u32;
    let plot_h = (rows * cell_h) as u32;

    let mut img = RgbImage::from_pixel(plot_w + COLORBAR_GAP + COLORBAR_WIDTH, plot_h, BACKGROUND);

    for y in 0..plot_h {
        let row = y as usize / cell_h;
        for x in 0..plot_w {
            let col = x as usize / cell_w;
            let idx = (row * cols + col) * 3;
            if let Some(px) = pixels.get(idx..idx + 3) {
                img.put_pixel(x, y, Rgb([px[0], px[1], px[2]]));
            }
        }
    }

    let bar_x = plot_w + COLORBAR_GAP;
    for y in 0..plot_h {
        let level = if plot_h > 1 {
            1.0 - y as f64 / (plot_h - 1) as f64
        } else {
            1.0
        };
        let color = Rgb(colormap_rgb(level));
        for x in bar_x..bar_x + COLORBAR_WIDTH {
            img.put_pixel(x, y, color);
        }
    }

    img
}

/// Write the rendered heatmap as a PNG file.
pub fn write_png(path: &Path, display: &DisplayMatrix) -> Result<()> {
    let img = render_image(display);
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("writing PNG to {}", path.display()))?;
    log::info!(
        "Wrote {}x{} heatmap of '{}' ({} scale) to {}",
        img.width(),
        img.height(),
        display.title,
        display.scale,
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct JsonDump<'a> {
    f: &'a [f64],
    t: &'a [f64],
    #[serde(flatten)]
    display: &'a DisplayMatrix,
}

/// Dump the axes and the display matrix as JSON:
/// `{ "f": [...], "t": [...], "title": ..., "scale": ..., "values": [[...]] }`.
pub fn write_json(path: &Path, analysis: &Analysis) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let dump = JsonDump {
        f: analysis.f(),
        t: analysis.t(),
        display: &analysis.display,
    };
    serde_json::to_writer(BufWriter::new(file), &dump)
        .with_context(|| format!("writing JSON to {}", path.display()))?;
    log::info!("Wrote display matrix to {}", path.display());
    Ok(())
}
