use palette::{IntoColor, LinSrgb, Mix, Srgb};

use crate::dsp::scale::DisplayMatrix;

// ---------------------------------------------------------------------------
// Sequential colour map
// ---------------------------------------------------------------------------

/// Viridis sampled at nine evenly spaced stops (sRGB).
const VIRIDIS_STOPS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

fn stop(idx: usize) -> LinSrgb {
    let [r, g, b] = VIRIDIS_STOPS[idx];
    Srgb::new(r, g, b).into_linear()
}

/// Colour for a position `t` in `[0, 1]` along the map (clamped).
/// Neighbouring stops are blended in linear light.
pub fn colormap_rgb(t: f64) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let segments = (VIRIDIS_STOPS.len() - 1) as f64;
    let pos = t * segments;
    let lower = (pos.floor() as usize).min(VIRIDIS_STOPS.len() - 2);
    let frac = (pos - lower as f64) as f32;

    let mixed = stop(lower).mix(stop(lower + 1), frac);
    let rgb: Srgb = mixed.into_color();
    let rgb: Srgb<u8> = rgb.into_format();
    [rgb.red, rgb.green, rgb.blue]
}

// ---------------------------------------------------------------------------
// Value range → colour
// ---------------------------------------------------------------------------

/// Maps display values onto the colour map between `min` and `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    /// Scale spanning the finite values of `display`. A flat matrix gets a
    /// unit-wide range so every cell maps to the bottom colour.
    pub fn for_matrix(display: &DisplayMatrix) -> Self {
        let (min, max) = display.value_range().unwrap_or((0.0, 1.0));
        if max > min {
            ColorScale { min, max }
        } else {
            ColorScale { min, max: min + 1.0 }
        }
    }

    /// Position of `value` in `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    pub fn color_for(&self, value: f64) -> [u8; 3] {
        colormap_rgb(self.normalize(value))
    }
}

/// RGB pixels of the heatmap, one pixel per cell, `T` wide and `F` high.
/// Row 0 is the highest frequency so the image reads like the plot.
pub fn heatmap_rgb(display: &DisplayMatrix, scale: &ColorScale) -> (usize, usize, Vec<u8>) {
    let (rows, cols) = display.dims();
    let mut pixels = Vec::with_capacity(rows * cols * 3);
    for row in display.values.iter().rev() {
        for &value in row {
            pixels.extend_from_slice(&scale.color_for(value));
        }
    }
    (cols, rows, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::scale::ScaleKind;

    #[test]
    fn endpoints_hit_first_and_last_stop() {
        assert_eq!(colormap_rgb(0.0), VIRIDIS_STOPS[0]);
        assert_eq!(colormap_rgb(1.0), VIRIDIS_STOPS[8]);
        assert_eq!(colormap_rgb(-3.0), VIRIDIS_STOPS[0]);
        assert_eq!(colormap_rgb(7.0), VIRIDIS_STOPS[8]);
        assert_eq!(colormap_rgb(f64::NAN), VIRIDIS_STOPS[0]);
    }

    #[test]
    fn map_gets_brighter() {
        let luma = |c: [u8; 3]| 0.2126 * c[0] as f64 + 0.7152 * c[1] as f64 + 0.0722 * c[2] as f64;
        let samples: Vec<f64> = (0..=20).map(|i| luma(colormap_rgb(i as f64 / 20.0))).collect();
        assert!(samples.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn flat_matrix_gets_unit_range() {
        let display = DisplayMatrix {
            title: "az".into(),
            scale: ScaleKind::Log,
            values: vec![vec![400.0; 3]; 2],
        };
        let scale = ColorScale::for_matrix(&display);
        assert_eq!(scale, ColorScale { min: 400.0, max: 401.0 });
        assert_eq!(scale.normalize(400.0), 0.0);
    }

    #[test]
    fn heatmap_puts_high_frequencies_on_top() {
        let display = DisplayMatrix {
            title: "roll".into(),
            scale: ScaleKind::Linear,
            values: vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![2.0, 2.0]],
        };
        let scale = ColorScale::for_matrix(&display);
        let (w, h, px) = heatmap_rgb(&display, &scale);
        assert_eq!((w, h), (2, 3));
        assert_eq!(px.len(), 2 * 3 * 3);
        assert_eq!(&px[0..3], &VIRIDIS_STOPS[8]);
        assert_eq!(&px[px.len() - 3..], &VIRIDIS_STOPS[0]);
    }
}
