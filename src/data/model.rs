use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectroError};

// ---------------------------------------------------------------------------
// Channel – one column of the telemetry table
// ---------------------------------------------------------------------------

/// The fixed set of telemetry channels, in CSV column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Roll,
    Pitch,
    Ax,
    Ay,
    Az,
}

impl Channel {
    /// All channels in column order.
    pub const ALL: [Channel; 5] = [
        Channel::Roll,
        Channel::Pitch,
        Channel::Ax,
        Channel::Ay,
        Channel::Az,
    ];

    /// Lowercase name, as used on the command line and in plot titles.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Roll => "roll",
            Channel::Pitch => "pitch",
            Channel::Ax => "ax",
            Channel::Ay => "ay",
            Channel::Az => "az",
        }
    }

    /// Zero-based column index in the input table.
    pub fn column(self) -> usize {
        match self {
            Channel::Roll => 0,
            Channel::Pitch => 1,
            Channel::Ax => 2,
            Channel::Ay => 3,
            Channel::Az => 4,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = SpectroError;

    fn from_str(s: &str) -> Result<Self> {
        Channel::ALL
            .into_iter()
            .find(|ch| ch.name() == s)
            .ok_or_else(|| SpectroError::UnknownChannel(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// TimeSeries – the samples of one channel
// ---------------------------------------------------------------------------

/// Uniformly sampled values of a single channel. The sample rate is supplied
/// separately by the caller; there are no timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub channel: Channel,
    pub samples: Vec<f64>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Signal duration in seconds at sample rate `fs`.
    pub fn duration(&self, fs: f64) -> f64 {
        self.samples.len() as f64 / fs
    }
}

// ---------------------------------------------------------------------------
// TelemetryDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The parsed table, one field per channel. Every series has the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryDataset {
    roll: TimeSeries,
    pitch: TimeSeries,
    ax: TimeSeries,
    ay: TimeSeries,
    az: TimeSeries,
}

impl TelemetryDataset {
    /// Build the dataset from parsed rows, each holding one value per channel
    /// in column order.
    pub fn from_rows(rows: &[[f64; 5]]) -> Result<Self> {
        if rows.is_empty() {
            return Err(SpectroError::MalformedInput(
                "table contains no data rows".to_string(),
            ));
        }
        let column = |ch: Channel| TimeSeries {
            channel: ch,
            samples: rows.iter().map(|row| row[ch.column()]).collect(),
        };
        Ok(TelemetryDataset {
            roll: column(Channel::Roll),
            pitch: column(Channel::Pitch),
            ax: column(Channel::Ax),
            ay: column(Channel::Ay),
            az: column(Channel::Az),
        })
    }

    /// The series recorded for `channel`.
    pub fn signal(&self, channel: Channel) -> &TimeSeries {
        match channel {
            Channel::Roll => &self.roll,
            Channel::Pitch => &self.pitch,
            Channel::Ax => &self.ax,
            Channel::Ay => &self.ay,
            Channel::Az => &self.az,
        }
    }

    /// Look a series up by channel name, failing on names outside the fixed set.
    pub fn signal_by_name(&self, name: &str) -> Result<&TimeSeries> {
        let channel: Channel = name.parse()?;
        Ok(self.signal(channel))
    }

    /// Number of rows (samples per channel).
    pub fn len(&self) -> usize {
        self.roll.len()
    }

    /// Always false for a dataset built through [`TelemetryDataset::from_rows`].
    pub fn is_empty(&self) -> bool {
        self.roll.is_empty()
    }
}
