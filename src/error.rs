use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the showspec library.
///
/// Every variant is terminal: nothing in the pipeline retries, so errors are
/// raised where they are detected and handed straight back to the caller.
#[derive(Debug, Error)]
pub enum SpectroError {
    /// The input table is structurally wrong or holds a non-numeric cell.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A channel name outside roll/pitch/ax/ay/az.
    #[error("unknown channel '{0}' (expected one of roll, pitch, ax, ay, az)")]
    UnknownChannel(String),

    /// A scale name outside linear/log/rootpsd.
    #[error("unknown scale '{0}' (expected one of linear, log, rootpsd)")]
    UnknownScale(String),

    /// Non-positive sample rate, empty signal or inconsistent analysis settings.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The signal is too short to form a single analysis segment.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Opening or reading the input file failed.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// FFT backend failure.
    #[error("FFT failed: {0}")]
    Fft(String),
}

/// Convenience alias so callers can write `Result<T>` instead of `Result<T, SpectroError>`.
pub type Result<T> = std::result::Result<T, SpectroError>;
