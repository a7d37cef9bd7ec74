//! Signal processing: segment windows, the short-time spectrogram and the
//! display scales applied to its power values.

pub mod scale;
pub mod spectrogram;
pub mod window;
