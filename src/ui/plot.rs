use eframe::egui::{Ui, Vec2};
use egui_plot::{Plot, PlotImage, PlotPoint};

use crate::state::ViewState;

// ---------------------------------------------------------------------------
// Spectrogram heatmap (central panel)
// ---------------------------------------------------------------------------

/// Render the heatmap with time on x and frequency on y.
pub fn spectrogram_plot(ui: &mut Ui, state: &mut ViewState) {
    let Some(texture) = &state.texture else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Nothing to display");
        });
        return;
    };

    let extent = state.extent();
    let [cx, cy] = extent.center();
    let [width, height] = extent.size();
    let image = PlotImage::new(
        texture.id(),
        PlotPoint::new(cx, cy),
        Vec2::new(width as f32, height as f32),
    )
    .name(&state.analysis.display.title);

    let response = Plot::new("spectrogram_plot")
        .x_axis_label("Time [sec]")
        .y_axis_label("Frequency [Hz]")
        .include_x(extent.x_min)
        .include_x(extent.x_max)
        .include_y(extent.y_min)
        .include_y(extent.y_max)
        .label_formatter(|_name, point| format!("{:.3} s\n{:.2} Hz", point.x, point.y))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.image(image);
            plot_ui.pointer_coordinate()
        });

    state.update_hover(response.inner.map(|p| [p.x, p.y]));
}
