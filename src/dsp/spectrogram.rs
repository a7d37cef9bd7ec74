use std::fmt;
use std::str::FromStr;

use realfft::RealFftPlanner;
use serde::{Deserialize, Serialize};

use super::window::WindowKind;
use crate::error::{Result, SpectroError};

/// Segment length used when none is configured (shortened to the signal
/// length for short signals).
pub const DEFAULT_NPERSEG: usize = 256;

/// Shortest signal that still forms one analysis segment.
pub const MIN_SAMPLES: usize = 2;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What is removed from each segment before windowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detrend {
    /// Subtract the segment mean.
    #[default]
    Constant,
    None,
}

impl FromStr for Detrend {
    type Err = SpectroError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "constant" => Ok(Detrend::Constant),
            "none" => Ok(Detrend::None),
            other => Err(SpectroError::InvalidParameter(format!(
                "unknown detrend mode '{other}' (expected constant or none)"
            ))),
        }
    }
}

impl fmt::Display for Detrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Detrend::Constant => "constant",
            Detrend::None => "none",
        })
    }
}

/// How `|X|²` is normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DensityScaling {
    /// Power spectral density, units²/Hz: divide by `fs · Σw²`.
    #[default]
    Density,
    /// Power spectrum, units²: divide by `(Σw)²`.
    Spectrum,
}

impl FromStr for DensityScaling {
    type Err = SpectroError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "density" => Ok(DensityScaling::Density),
            "spectrum" => Ok(DensityScaling::Spectrum),
            other => Err(SpectroError::InvalidParameter(format!(
                "unknown density scaling '{other}' (expected density or spectrum)"
            ))),
        }
    }
}

impl fmt::Display for DensityScaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DensityScaling::Density => "density",
            DensityScaling::Spectrum => "spectrum",
        })
    }
}

/// Analysis parameters. `None` fields fall back to the defaults:
/// `nperseg = min(256, N)`, `noverlap = nperseg / 8`, `nfft = nperseg`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpectrogramConfig {
    pub window: WindowKind,
    pub nperseg: Option<usize>,
    pub noverlap: Option<usize>,
    pub nfft: Option<usize>,
    pub detrend: Detrend,
    pub scaling: DensityScaling,
}

/// Concrete segment layout for one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentPlan {
    pub nperseg: usize,
    pub noverlap: usize,
    pub nfft: usize,
    pub segments: usize,
}

impl SegmentPlan {
    /// Distance in samples between the starts of consecutive segments.
    pub fn step(&self) -> usize {
        self.nperseg - self.noverlap
    }
}

impl SpectrogramConfig {
    /// Resolve the defaults against a signal of `len` samples and check
    /// that the parameters are consistent.
    pub fn plan(&self, len: usize) -> Result<SegmentPlan> {
        self.window.validate()?;

        let nperseg = match self.nperseg {
            Some(n) if n < MIN_SAMPLES => {
                return Err(SpectroError::InvalidParameter(format!(
                    "segment length must be at least {MIN_SAMPLES}, got {n}"
                )))
            }
            Some(n) if n > len => {
                log::warn!("segment length {n} exceeds signal length {len}, using {len}");
                len
            }
            Some(n) => n,
            None => DEFAULT_NPERSEG.min(len),
        };

        let noverlap = self.noverlap.unwrap_or(nperseg / 8);
        if noverlap >= nperseg {
            return Err(SpectroError::InvalidParameter(format!(
                "overlap ({noverlap}) must be smaller than the segment length ({nperseg})"
            )));
        }

        let nfft = self.nfft.unwrap_or(nperseg);
        if nfft < nperseg {
            return Err(SpectroError::InvalidParameter(format!(
                "FFT length ({nfft}) must not be smaller than the segment length ({nperseg})"
            )));
        }

        let step = nperseg - noverlap;
        let segments = (len - noverlap) / step;

        Ok(SegmentPlan {
            nperseg,
            noverlap,
            nfft,
            segments,
        })
    }
}

// ---------------------------------------------------------------------------
// Spectrogram
// ---------------------------------------------------------------------------

/// Short-time power estimate of one signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrogram {
    /// Frequency of each row, Hz, ascending from 0.
    pub f: Vec<f64>,
    /// Centre time of each segment, seconds, ascending.
    pub t: Vec<f64>,
    /// Power, `sxx[freq_bin][segment]`.
    pub sxx: Vec<Vec<f64>>,
}

impl Spectrogram {
    pub fn num_freqs(&self) -> usize {
        self.f.len()
    }

    pub fn num_segments(&self) -> usize {
        self.t.len()
    }

    /// Frequency bin holding the most power in `segment`.
    pub fn peak_bin(&self, segment: usize) -> Option<usize> {
        self.sxx
            .iter()
            .enumerate()
            .filter_map(|(bin, row)| row.get(segment).map(|&p| (bin, p)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(bin, _)| bin)
    }
}

/// Spectrogram of `samples` at sample rate `fs` with the default analysis
/// parameters (Hann window, 256-sample segments, 1/8 overlap).
pub fn compute(samples: &[f64], fs: f64) -> Result<Spectrogram> {
    compute_with(samples, fs, &SpectrogramConfig::default())
}

/// Spectrogram of `samples` at sample rate `fs`.
///
/// Each segment is detrended, windowed and transformed with a real FFT; the
/// one-sided `|X|²` is scaled to a power spectral density (or power
/// spectrum) with every bin except DC and Nyquist doubled.
pub fn compute_with(samples: &[f64], fs: f64, config: &SpectrogramConfig) -> Result<Spectrogram> {
    if !fs.is_finite() || fs <= 0.0 {
        return Err(SpectroError::InvalidParameter(format!(
            "sample rate must be a positive number, got {fs}"
        )));
    }
    if samples.is_empty() {
        return Err(SpectroError::InvalidParameter("signal is empty".to_string()));
    }
    if samples.len() < MIN_SAMPLES {
        return Err(SpectroError::InsufficientData(format!(
            "{} sample(s) cannot form an analysis segment, need at least {MIN_SAMPLES}",
            samples.len()
        )));
    }

    let plan = config.plan(samples.len())?;
    let SegmentPlan {
        nperseg,
        nfft,
        segments,
        ..
    } = plan;
    let step = plan.step();
    log::debug!(
        "spectrogram: n={} fs={fs} window={} nperseg={nperseg} noverlap={} nfft={nfft} segments={segments}",
        samples.len(),
        config.window,
        plan.noverlap,
    );

    let window = config.window.coefficients(nperseg);
    let scale = match config.scaling {
        DensityScaling::Density => 1.0 / (fs * window.iter().map(|w| w * w).sum::<f64>()),
        DensityScaling::Spectrum => 1.0 / window.iter().sum::<f64>().powi(2),
    };

    let mut planner = RealFftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nfft);
    let mut frame_time = fft.make_input_vec();
    let mut frame_freq = fft.make_output_vec();
    let mut scratch = fft.make_scratch_vec();

    let bins = nfft / 2 + 1;
    let nyquist_bin = (nfft % 2 == 0).then_some(nfft / 2);
    let mut sxx = vec![vec![0.0; segments]; bins];

    for seg in 0..segments {
        let start = seg * step;
        let segment = &samples[start..start + nperseg];
        let offset = match config.detrend {
            Detrend::Constant => segment.iter().sum::<f64>() / nperseg as f64,
            Detrend::None => 0.0,
        };

        // The FFT consumes its input buffer, so refill it every segment,
        // zero-padding up to nfft.
        frame_time.fill(0.0);
        for ((dst, &x), &w) in frame_time.iter_mut().zip(segment).zip(&window) {
            *dst = (x - offset) * w;
        }

        fft.process_with_scratch(&mut frame_time, &mut frame_freq, &mut scratch)
            .map_err(|e| SpectroError::Fft(e.to_string()))?;

        for (bin, c) in frame_freq.iter().enumerate() {
            let mut power = c.norm_sqr() * scale;
            if bin != 0 && Some(bin) != nyquist_bin {
                power *= 2.0;
            }
            sxx[bin][seg] = power;
        }
    }

    let f = (0..bins).map(|k| k as f64 * fs / nfft as f64).collect();
    let t = (0..segments)
        .map(|seg| ((seg * step) as f64 + nperseg as f64 / 2.0) / fs)
        .collect();

    Ok(Spectrogram { f, t, sxx })
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    fn sine(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    #[test]
    fn default_plan_matches_reference_convention() {
        let plan = SpectrogramConfig::default().plan(1000).unwrap();
        assert_eq!(
            plan,
            SegmentPlan {
                nperseg: 256,
                noverlap: 32,
                nfft: 256,
                segments: 4,
            }
        );
        assert_eq!(plan.step(), 224);
    }

    #[test]
    fn short_signal_uses_whole_signal_as_segment() {
        let plan = SpectrogramConfig::default().plan(100).unwrap();
        assert_eq!(plan.nperseg, 100);
        assert_eq!(plan.noverlap, 12);
        assert_eq!(plan.segments, 1);
    }

    #[test]
    fn explicit_segment_length_is_clamped() {
        let config = SpectrogramConfig {
            nperseg: Some(512),
            ..Default::default()
        };
        assert_eq!(config.plan(300).unwrap().nperseg, 300);
    }

    #[test]
    fn inconsistent_parameters_are_rejected() {
        let overlap = SpectrogramConfig {
            nperseg: Some(64),
            noverlap: Some(64),
            ..Default::default()
        };
        assert!(matches!(
            overlap.plan(1000),
            Err(SpectroError::InvalidParameter(_))
        ));

        let nfft = SpectrogramConfig {
            nperseg: Some(64),
            nfft: Some(32),
            ..Default::default()
        };
        assert!(matches!(nfft.plan(1000), Err(SpectroError::InvalidParameter(_))));

        let tiny = SpectrogramConfig {
            nperseg: Some(1),
            ..Default::default()
        };
        assert!(matches!(tiny.plan(1000), Err(SpectroError::InvalidParameter(_))));
    }

    #[test]
    fn rejects_bad_sample_rate_and_empty_signal() {
        for fs in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                compute(&[1.0, 2.0, 3.0], fs),
                Err(SpectroError::InvalidParameter(_))
            ));
        }
        assert!(matches!(
            compute(&[], 320.0),
            Err(SpectroError::InvalidParameter(_))
        ));
        assert!(matches!(
            compute(&[1.0], 320.0),
            Err(SpectroError::InsufficientData(_))
        ));
    }

    #[test]
    fn two_samples_form_one_segment() {
        let spec = compute(&[1.0, -1.0], 10.0).unwrap();
        assert_eq!(spec.f, vec![0.0, 5.0]);
        assert_eq!(spec.t, vec![0.1]);
        assert_eq!(spec.sxx.len(), 2);
        assert!(spec.sxx.iter().all(|row| row.len() == 1 && row[0] >= 0.0));
    }

    #[test]
    fn axes_follow_fft_and_segment_layout() {
        let fs = 320.0;
        let spec = compute(&sine(10.0, fs, 1000), fs).unwrap();
        assert_eq!(spec.num_freqs(), 129);
        assert_eq!(spec.num_segments(), 4);
        assert_eq!(spec.f[0], 0.0);
        assert_eq!(spec.f[1], 1.25);
        assert_eq!(*spec.f.last().unwrap(), 160.0);
        assert_eq!(spec.t, vec![0.4, 1.1, 1.8, 2.5]);
    }

    #[test]
    fn odd_fft_length_stops_below_nyquist() {
        let fs = 100.0;
        let config = SpectrogramConfig {
            nperseg: Some(15),
            ..Default::default()
        };
        let spec = compute_with(&sine(7.0, fs, 200), fs, &config).unwrap();
        assert_eq!(spec.num_freqs(), 8);
        let last = *spec.f.last().unwrap();
        assert!(last < fs / 2.0 && last > fs / 2.0 - fs / 15.0);
    }

    #[test]
    fn sine_peaks_at_its_frequency() {
        let fs = 320.0;
        let spec = compute(&sine(40.0, fs, 320), fs).unwrap();
        for seg in 0..spec.num_segments() {
            let bin = spec.peak_bin(seg).unwrap();
            assert_eq!(spec.f[bin], 40.0);
        }
    }

    #[test]
    fn constant_detrend_removes_offset() {
        let fs = 64.0;
        let offset: Vec<f64> = vec![3.0; 128];
        let spec = compute(&offset, fs).unwrap();
        assert!(spec.sxx.iter().flatten().all(|&p| p.abs() < 1e-20));

        let raw = SpectrogramConfig {
            detrend: Detrend::None,
            ..Default::default()
        };
        let spec = compute_with(&offset, fs, &raw).unwrap();
        assert!(spec.sxx[0][0] > 1.0);
    }

    #[test]
    fn density_integrates_to_signal_power() {
        // A unit sine has mean power 1/2; the PSD summed over frequency
        // (times the bin width) must recover it.
        let fs = 256.0;
        let spec = compute(&sine(32.0, fs, 256 * 4), fs).unwrap();
        let df = spec.f[1] - spec.f[0];
        for seg in 0..spec.num_segments() {
            let total: f64 = spec.sxx.iter().map(|row| row[seg]).sum::<f64>() * df;
            assert!((total - 0.5).abs() < 1e-9, "segment {seg}: {total}");
        }
    }

    #[test]
    fn spectrum_scaling_reports_sine_power() {
        // With spectrum scaling a bin-centred unit sine reads its mean power.
        let fs = 256.0;
        let config = SpectrogramConfig {
            scaling: DensityScaling::Spectrum,
            ..Default::default()
        };
        let spec = compute_with(&sine(32.0, fs, 512), fs, &config).unwrap();
        let bin = spec.peak_bin(0).unwrap();
        assert!((spec.sxx[bin][0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_padding_refines_frequency_grid() {
        let fs = 320.0;
        let config = SpectrogramConfig {
            nfft: Some(512),
            ..Default::default()
        };
        let spec = compute_with(&sine(40.0, fs, 640), fs, &config).unwrap();
        assert_eq!(spec.num_freqs(), 257);
        assert_eq!(spec.f[1], 0.625);
        assert_eq!(spec.f[spec.peak_bin(0).unwrap()], 40.0);
    }

    #[test]
    fn parses_option_names() {
        assert_eq!("none".parse::<Detrend>().unwrap(), Detrend::None);
        assert_eq!("constant".parse::<Detrend>().unwrap(), Detrend::Constant);
        assert!("linear".parse::<Detrend>().is_err());
        assert_eq!(
            "spectrum".parse::<DensityScaling>().unwrap(),
            DensityScaling::Spectrum
        );
        assert!("psd".parse::<DensityScaling>().is_err());
    }
}
