use eframe::egui::TextureHandle;

use showspec::color::ColorScale;
use showspec::pipeline::Analysis;

// ---------------------------------------------------------------------------
// Plot geometry
// ---------------------------------------------------------------------------

/// Area covered by the heatmap in plot coordinates (seconds × Hz).
///
/// Cells are centred on their `(t, f)` coordinates, so the image extends half
/// a cell beyond the first and last axis values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Extent {
    pub fn center(&self) -> [f64; 2] {
        [
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        ]
    }

    pub fn size(&self) -> [f64; 2] {
        [self.x_max - self.x_min, self.y_max - self.y_min]
    }
}

/// Value under the mouse pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readout {
    pub time: f64,
    pub frequency: f64,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// Everything the viewer shows, independent of rendering.
pub struct ViewState {
    /// Finished pipeline output; never modified by the viewer.
    pub analysis: Analysis,

    /// Where the data came from, for the top bar.
    pub source: String,

    /// Value range mapped onto the colour map.
    pub color_scale: ColorScale,

    /// Heatmap texture, uploaded on the first frame.
    pub texture: Option<TextureHandle>,

    /// Cell under the pointer, if any.
    pub hover: Option<Readout>,

    /// Cached geometry.
    extent: Extent,
    cell: [f64; 2],
}

impl ViewState {
    pub fn new(analysis: Analysis, source: String) -> Self {
        let color_scale = ColorScale::for_matrix(&analysis.display);
        let (extent, cell) = layout(analysis.t(), analysis.f());
        Self {
            analysis,
            source,
            color_scale,
            texture: None,
            hover: None,
            extent,
            cell,
        }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// `(frequency bin, segment)` of the cell containing a plot coordinate.
    pub fn cell_at(&self, time: f64, frequency: f64) -> Option<(usize, usize)> {
        let (rows, cols) = self.analysis.display.dims();
        let col = ((time - self.extent.x_min) / self.cell[0]).floor();
        let row = ((frequency - self.extent.y_min) / self.cell[1]).floor();
        if col < 0.0 || row < 0.0 || col >= cols as f64 || row >= rows as f64 {
            return None;
        }
        Some((row as usize, col as usize))
    }

    /// Refresh the readout for the pointer position (plot coordinates).
    pub fn update_hover(&mut self, pointer: Option<[f64; 2]>) {
        self.hover = pointer.and_then(|[time, frequency]| {
            let (bin, segment) = self.cell_at(time, frequency)?;
            Some(Readout {
                time: self.analysis.t()[segment],
                frequency: self.analysis.f()[bin],
                value: self.analysis.display.get(bin, segment)?,
            })
        });
    }
}

/// Heatmap extent and cell size `[dt, df]` for the given axes.
fn layout(t: &[f64], f: &[f64]) -> (Extent, [f64; 2]) {
    let step = |axis: &[f64]| match axis {
        [a, b, ..] => b - a,
        // A single segment spans from 0 to twice its centre time.
        [a] => 2.0 * a,
        [] => 1.0,
    };
    let dt = step(t);
    let df = step(f);
    let first = |axis: &[f64]| axis.first().copied().unwrap_or(0.0);
    let last = |axis: &[f64]| axis.last().copied().unwrap_or(0.0);

    let extent = Extent {
        x_min: first(t) - dt / 2.0,
        x_max: last(t) + dt / 2.0,
        y_min: first(f) - df / 2.0,
        y_max: last(f) + df / 2.0,
    };
    (extent, [dt, df])
}
