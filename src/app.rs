use eframe::egui::{self, ColorImage, TextureOptions};

use showspec::color::heatmap_rgb;

use crate::state::ViewState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SpectrogramApp {
    pub state: ViewState,
}

impl SpectrogramApp {
    pub fn new(state: ViewState) -> Self {
        Self { state }
    }

    /// Upload the heatmap once; the matrix never changes afterwards.
    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.state.texture.is_some() {
            return;
        }
        let (width, height, pixels) =
            heatmap_rgb(&self.state.analysis.display, &self.state.color_scale);
        if width == 0 || height == 0 {
            return;
        }
        let max_side = ctx.input(|i| i.max_texture_side);
        let (width, height, pixels) = fit_texture(width, height, &pixels, max_side);
        log::debug!("uploading {width}x{height} heatmap texture");

        let image = ColorImage::from_rgb([width, height], &pixels);
        self.state.texture = Some(ctx.load_texture("spectrogram", image, TextureOptions::NEAREST));
    }
}

impl eframe::App for SpectrogramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_texture(ctx);

        // ---- Top panel: title and readout ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Right side panel: colour bar ----
        egui::SidePanel::right("colorbar_panel")
            .default_width(90.0)
            .resizable(false)
            .show(ctx, |ui| {
                panels::colorbar(ui, &self.state);
            });

        // ---- Central panel: heatmap ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::spectrogram_plot(ui, &mut self.state);
        });
    }
}

/// Nearest-neighbour resample so neither side exceeds `max_side` pixels.
fn fit_texture(
    width: usize,
    height: usize,
    pixels: &[u8],
    max_side: usize,
) -> (usize, usize, Vec<u8>) {
    if width <= max_side && height <= max_side {
        return (width, height, pixels.to_vec());
    }
    let new_w = width.min(max_side);
    let new_h = height.min(max_side);
    let mut out = Vec::with_capacity(new_w * new_h * 3);
    for y in 0..new_h {
        let src_y = y * height / new_h;
        for x in 0..new_w {
            let src_x = x * width / new_w;
            let idx = (src_y * width + src_x) * 3;
            out.extend_from_slice(&pixels[idx..idx + 3]);
        }
    }
    (new_w, new_h, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_textures_pass_through() {
        let px = vec![1u8; 4 * 2 * 3];
        assert_eq!(fit_texture(4, 2, &px, 16), (4, 2, px.clone()));
    }

    #[test]
    fn wide_textures_are_decimated() {
        // 8 columns with the column index as red channel, squeezed into 4.
        let px: Vec<u8> = (0..8u8).flat_map(|x| [x, 0, 0]).collect();
        let (w, h, out) = fit_texture(8, 1, &px, 4);
        assert_eq!((w, h), (4, 1));
        let reds: Vec<u8> = out.chunks(3).map(|c| c[0]).collect();
        assert_eq!(reds, vec![0, 2, 4, 6]);
    }
}
