//! Spectrograms of attitude/acceleration telemetry.
//!
//! The pipeline runs once per invocation:
//!
//! ```text
//!  CSV ──loader──▶ TelemetryDataset ──signal(ch)──▶ samples
//!      ──spectrogram::compute──▶ Spectrogram (f, t, sxx)
//!      ──scale::apply──▶ DisplayMatrix ──▶ viewer / PNG
//! ```

pub mod color;
pub mod data;
pub mod dsp;
pub mod error;
pub mod export;
pub mod pipeline;

pub use data::model::{Channel, TelemetryDataset, TimeSeries};
pub use dsp::scale::{DisplayMatrix, ScaleKind};
pub use dsp::spectrogram::{Spectrogram, SpectrogramConfig};
pub use error::{Result, SpectroError};
