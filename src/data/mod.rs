/// Data layer: channel model and CSV loading.
///
/// Architecture:
/// ```text
///  telemetry.csv  (no header: roll,pitch,ax,ay,az)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate rows → TelemetryDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ TelemetryDataset  │  one TimeSeries per Channel
///   └──────────────────┘
///        │  signal(Channel)
///        ▼
///     &TimeSeries  → dsp::spectrogram
/// ```

pub mod loader;
pub mod model;
