use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SpectroError};

/// Taper applied to every analysis segment before the FFT.
///
/// All windows are periodic ("DFT-even"): a symmetric window of length
/// `M + 1` with the last sample dropped, which is what spectral estimators
/// conventionally use.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WindowKind {
    /// Raised cosine, zero at the segment start.
    #[default]
    Hann,
    /// Flat top with cosine tapers covering `alpha` of the segment.
    Tukey { alpha: f64 },
    /// Rectangular, no tapering.
    Boxcar,
}

impl WindowKind {
    pub const DEFAULT_TUKEY_ALPHA: f64 = 0.25;

    /// Window coefficients for a segment of `len` samples.
    pub fn coefficients(self, len: usize) -> Vec<f64> {
        match self {
            WindowKind::Hann => hann(len),
            WindowKind::Tukey { alpha } => tukey(len, alpha),
            WindowKind::Boxcar => vec![1.0; len],
        }
    }

    pub(crate) fn validate(self) -> Result<()> {
        if let WindowKind::Tukey { alpha } = self {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(SpectroError::InvalidParameter(format!(
                    "tukey alpha must lie in [0, 1], got {alpha}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowKind::Hann => f.write_str("hann"),
            WindowKind::Tukey { alpha } => write!(f, "tukey:{alpha}"),
            WindowKind::Boxcar => f.write_str("boxcar"),
        }
    }
}

impl FromStr for WindowKind {
    type Err = SpectroError;

    /// Accepts `hann`, `boxcar`, `tukey` and `tukey:<alpha>`.
    fn from_str(s: &str) -> Result<Self> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        let kind = match (name, arg) {
            ("hann", None) => WindowKind::Hann,
            ("boxcar", None) => WindowKind::Boxcar,
            ("tukey", None) => WindowKind::Tukey {
                alpha: Self::DEFAULT_TUKEY_ALPHA,
            },
            ("tukey", Some(arg)) => {
                let alpha = arg.trim().parse::<f64>().map_err(|_| {
                    SpectroError::InvalidParameter(format!("tukey alpha '{arg}' is not a number"))
                })?;
                WindowKind::Tukey { alpha }
            }
            _ => {
                return Err(SpectroError::InvalidParameter(format!(
                    "unknown window '{s}' (expected hann, boxcar or tukey[:alpha])"
                )))
            }
        };
        kind.validate()?;
        Ok(kind)
    }
}

/// Periodic Hann window: `0.5 - 0.5 cos(2πn / M)`.
fn hann(len: usize) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    (0..len)
        .map(|n| 0.5 - 0.5 * (2.0 * PI * n as f64 / len as f64).cos())
        .collect()
}

/// Periodic Tukey window.
fn tukey(len: usize, alpha: f64) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    if alpha <= 0.0 {
        return vec![1.0; len];
    }
    if alpha >= 1.0 {
        return hann(len);
    }

    // Symmetric window of len + 1 points, truncated to len.
    let m = len + 1;
    let span = (m - 1) as f64;
    let width = (alpha * span / 2.0).floor() as usize;

    (0..len)
        .map(|n| {
            let x = n as f64;
            if n <= width {
                0.5 * (1.0 + (PI * (-1.0 + 2.0 * x / alpha / span)).cos())
            } else if n < m - width - 1 {
                1.0
            } else {
                0.5 * (1.0 + (PI * (-2.0 / alpha + 1.0 + 2.0 * x / alpha / span)).cos())
            }
        })
        .collect()
}
