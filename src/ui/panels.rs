use eframe::egui::{self, Color32, RichText, Sense, Ui};

use showspec::color::colormap_rgb;

use crate::state::ViewState;

/// Number of bands the colour bar is painted with.
const COLORBAR_STEPS: usize = 128;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Title, analysis summary and the value under the pointer.
pub fn top_bar(ui: &mut Ui, state: &ViewState) {
    let display = &state.analysis.display;
    let (bins, segments) = display.dims();

    ui.horizontal(|ui: &mut Ui| {
        ui.heading(&display.title);
        ui.separator();
        ui.label(format!("{} scale", display.scale));
        ui.separator();
        ui.label(format!("{bins} bins × {segments} segments"));
        ui.separator();
        ui.label(RichText::new(&state.source).weak());

        if let Some(h) = &state.hover {
            ui.separator();
            ui.label(
                RichText::new(format!(
                    "t = {:.3} s   f = {:.2} Hz   value = {:.4e}",
                    h.time, h.frequency, h.value
                ))
                .monospace(),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Colour bar (right side panel)
// ---------------------------------------------------------------------------

/// Vertical colour bar labelled with the value range.
pub fn colorbar(ui: &mut Ui, state: &ViewState) {
    let scale = state.color_scale;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(format!("{:.3e}", scale.max)).small());

        let height = (ui.available_height() - 40.0).max(60.0);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(24.0, height), Sense::hover());
        let painter = ui.painter_at(rect);
        let band = rect.height() / COLORBAR_STEPS as f32;
        for step in 0..COLORBAR_STEPS {
            // Top band is the maximum.
            let level = 1.0 - (step as f64 + 0.5) / COLORBAR_STEPS as f64;
            let [r, g, b] = colormap_rgb(level);
            let top = rect.top() + step as f32 * band;
            let band_rect = egui::Rect::from_min_max(
                egui::pos2(rect.left(), top),
                egui::pos2(rect.right(), top + band + 0.5),
            );
            painter.rect_filled(band_rect, 0.0, Color32::from_rgb(r, g, b));
        }

        ui.label(RichText::new(format!("{:.3e}", scale.min)).small());
    });
}
