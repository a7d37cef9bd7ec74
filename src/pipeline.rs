use crate::data::model::{Channel, TelemetryDataset};
use crate::dsp::scale::{DisplayMatrix, ScaleKind};
use crate::dsp::spectrogram::{self, Spectrogram, SpectrogramConfig};
use crate::error::Result;

/// Everything a renderer needs: the axes and the scaled matrix.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub spectrogram: Spectrogram,
    pub display: DisplayMatrix,
}

impl Analysis {
    /// Frequency axis, Hz.
    pub fn f(&self) -> &[f64] {
        &self.spectrogram.f
    }

    /// Time axis, seconds.
    pub fn t(&self) -> &[f64] {
        &self.spectrogram.t
    }
}

/// Run one channel of `dataset` through the spectrogram and the display scale.
pub fn analyze(
    dataset: &TelemetryDataset,
    channel: Channel,
    fs: f64,
    scale: ScaleKind,
    config: &SpectrogramConfig,
) -> Result<Analysis> {
    let series = dataset.signal(channel);
    let spectrogram = spectrogram::compute_with(&series.samples, fs, config)?;
    log::info!(
        "{channel}: {} samples at {fs} Hz → {} frequency bins × {} segments",
        series.len(),
        spectrogram.num_freqs(),
        spectrogram.num_segments()
    );

    let display = DisplayMatrix::new(channel.name(), &spectrogram, scale);
    Ok(Analysis {
        spectrogram,
        display,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpectroError;

    #[test]
    fn analyzes_requested_channel_only() {
        // roll is silent, pitch carries an alternating signal
        let rows: Vec<[f64; 5]> = (0..64)
            .map(|i| [0.0, if i % 2 == 0 { 1.0 } else { -1.0 }, 0.0, 0.0, 9.81])
            .collect();
        let ds = TelemetryDataset::from_rows(&rows).unwrap();
        let config = SpectrogramConfig::default();

        let roll = analyze(&ds, Channel::Roll, 64.0, ScaleKind::Linear, &config).unwrap();
        assert_eq!(roll.display.title, "roll");
        assert!(roll.display.values.iter().flatten().all(|&v| v == 0.0));

        let pitch = analyze(&ds, Channel::Pitch, 64.0, ScaleKind::RootPsd, &config).unwrap();
        assert_eq!(pitch.display.scale, ScaleKind::RootPsd);
        // Alternating samples put everything in the Nyquist bin.
        assert_eq!(pitch.spectrogram.peak_bin(0), Some(pitch.f().len() - 1));
        assert_eq!(pitch.t().len(), pitch.display.dims().1);
    }

    #[test]
    fn engine_errors_surface_unchanged() {
        let ds = TelemetryDataset::from_rows(&[[1.0; 5]]).unwrap();
        let err = analyze(
            &ds,
            Channel::Ax,
            320.0,
            ScaleKind::Linear,
            &SpectrogramConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SpectroError::InsufficientData(_)));
    }
}
