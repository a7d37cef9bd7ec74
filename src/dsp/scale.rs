use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::spectrogram::Spectrogram;
use crate::error::{Result, SpectroError};

/// Smallest power fed to the logarithm. Exact zeros (silence, or a
/// detrended constant signal) would otherwise become `+inf`; with this
/// floor they map to `-20 · log10(1e-20) = 400`.
pub const POWER_FLOOR: f64 = 1e-20;

/// Display representation of the power matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    /// Power as computed.
    #[default]
    Linear,
    /// `-20 · log10(power)`.
    Log,
    /// Square root of the power spectral density (amplitude density).
    RootPsd,
}

impl ScaleKind {
    pub const ALL: [ScaleKind; 3] = [ScaleKind::Linear, ScaleKind::Log, ScaleKind::RootPsd];

    pub fn name(self) -> &'static str {
        match self {
            ScaleKind::Linear => "linear",
            ScaleKind::Log => "log",
            ScaleKind::RootPsd => "rootpsd",
        }
    }

    /// Transform a single power value.
    pub fn map(self, power: f64) -> f64 {
        match self {
            ScaleKind::Linear => power,
            ScaleKind::Log => -20.0 * power.max(POWER_FLOOR).log10(),
            ScaleKind::RootPsd => power.sqrt(),
        }
    }
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScaleKind {
    type Err = SpectroError;

    fn from_str(s: &str) -> Result<Self> {
        ScaleKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| SpectroError::UnknownScale(s.to_string()))
    }
}

/// Apply `kind` element-wise to a power matrix.
pub fn apply(sxx: &[Vec<f64>], kind: ScaleKind) -> Vec<Vec<f64>> {
    sxx.iter()
        .map(|row| row.iter().map(|&p| kind.map(p)).collect())
        .collect()
}

// ---------------------------------------------------------------------------
// DisplayMatrix – what the renderer receives
// ---------------------------------------------------------------------------

/// Transformed power values ready for rendering, `values[freq_bin][segment]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayMatrix {
    /// Plot title (the channel name).
    pub title: String,
    pub scale: ScaleKind,
    pub values: Vec<Vec<f64>>,
}

impl DisplayMatrix {
    pub fn new(title: impl Into<String>, spectrogram: &Spectrogram, scale: ScaleKind) -> Self {
        DisplayMatrix {
            title: title.into(),
            scale,
            values: apply(&spectrogram.sxx, scale),
        }
    }

    /// `(rows, columns)`, i.e. `(F, T)`.
    pub fn dims(&self) -> (usize, usize) {
        (
            self.values.len(),
            self.values.first().map_or(0, Vec::len),
        )
    }

    /// Minimum and maximum of the finite entries, `None` if there are none.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Value at `(bin, segment)`, if in range.
    pub fn get(&self, bin: usize, segment: usize) -> Option<f64> {
        self.values.get(bin)?.get(segment).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> Vec<Vec<f64>> {
        vec![vec![0.0, 1.0, 4.0], vec![1e-3, 0.25, 100.0]]
    }

    #[test]
    fn linear_is_identity() {
        assert_eq!(apply(&matrix(), ScaleKind::Linear), matrix());
    }

    #[test]
    fn rootpsd_is_square_root() {
        let out = apply(&matrix(), ScaleKind::RootPsd);
        assert_eq!(out, vec![vec![0.0, 1.0, 2.0], vec![1e-3f64.sqrt(), 0.5, 10.0]]);
    }

    #[test]
    fn log_is_negated_decibels_with_floor() {
        let out = apply(&matrix(), ScaleKind::Log);
        assert!((out[0][0] - 400.0).abs() < 1e-9);
        assert_eq!(out[0][1], 0.0);
        assert!((out[0][2] - -20.0 * 4f64.log10()).abs() < 1e-12);
        assert!((out[1][0] - 60.0).abs() < 1e-12);
        assert!((out[1][2] - -40.0).abs() < 1e-12);
        assert!(out.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn values_below_floor_are_clamped() {
        assert_eq!(ScaleKind::Log.map(1e-30), ScaleKind::Log.map(POWER_FLOOR));
    }

    #[test]
    fn scale_names_parse() {
        for kind in ScaleKind::ALL {
            assert_eq!(kind.name().parse::<ScaleKind>().unwrap(), kind);
        }
        assert!(matches!(
            "db".parse::<ScaleKind>(),
            Err(SpectroError::UnknownScale(ref s)) if s == "db"
        ));
    }

    #[test]
    fn display_matrix_keeps_shape_and_title() {
        let spec = Spectrogram {
            f: vec![0.0, 1.0],
            t: vec![0.5, 1.0, 1.5],
            sxx: matrix(),
        };
        let dm = DisplayMatrix::new("roll", &spec, ScaleKind::RootPsd);
        assert_eq!(dm.title, "roll");
        assert_eq!(dm.dims(), (2, 3));
        assert_eq!(dm.value_range(), Some((0.0, 10.0)));
        assert_eq!(dm.get(0, 2), Some(2.0));
        assert_eq!(dm.get(2, 0), None);
    }
}
