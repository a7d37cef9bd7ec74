mod app;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use showspec::data::loader;
use showspec::dsp::spectrogram::{DensityScaling, Detrend, SpectrogramConfig};
use showspec::dsp::window::WindowKind;
use showspec::{export, pipeline, Channel, ScaleKind};

use app::SpectrogramApp;
use state::ViewState;

/// Show the spectrogram of one telemetry channel.
#[derive(Debug, Parser)]
#[command(name = "showspec", version, about)]
struct Args {
    /// Header-less CSV with columns roll,pitch,ax,ay,az
    filename: PathBuf,

    /// Channel to analyse: roll, pitch, ax, ay or az
    signal: Channel,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 320.0)]
    fs: f64,

    /// Display scale: linear, log or rootpsd
    #[arg(long, default_value_t = ScaleKind::Linear)]
    scale: ScaleKind,

    /// Segment length in samples [default: min(256, signal length)]
    #[arg(long)]
    nperseg: Option<usize>,

    /// Samples shared by consecutive segments [default: nperseg / 8]
    #[arg(long)]
    noverlap: Option<usize>,

    /// FFT length, zero-padding each segment [default: nperseg]
    #[arg(long)]
    nfft: Option<usize>,

    /// Segment window: hann, boxcar, tukey or tukey:<alpha>
    #[arg(long, default_value_t = WindowKind::Hann)]
    window: WindowKind,

    /// Per-segment detrending: constant or none
    #[arg(long, default_value_t = Detrend::Constant)]
    detrend: Detrend,

    /// Power normalisation: density (units²/Hz) or spectrum (units²)
    #[arg(long, default_value_t = DensityScaling::Density)]
    density_scaling: DensityScaling,

    /// Write the heatmap to this PNG file instead of opening a window
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Also dump f, t and the display matrix as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

impl Args {
    fn spectrogram_config(&self) -> SpectrogramConfig {
        SpectrogramConfig {
            window: self.window,
            nperseg: self.nperseg,
            noverlap: self.noverlap,
            nfft: self.nfft,
            detrend: self.detrend,
            scaling: self.density_scaling,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::debug!("{args:?}");

    let dataset = loader::load_file(&args.filename)
        .with_context(|| format!("loading {}", args.filename.display()))?;

    let analysis = pipeline::analyze(
        &dataset,
        args.signal,
        args.fs,
        args.scale,
        &args.spectrogram_config(),
    )
    .with_context(|| format!("computing the {} spectrogram of '{}'", args.scale, args.signal))?;

    if let Some(path) = &args.json {
        export::write_json(path, &analysis)?;
    }

    if let Some(path) = &args.output {
        return export::write_png(path, &analysis.display);
    }

    let title = format!("showspec – {}", analysis.display.title);
    let state = ViewState::new(analysis, args.filename.display().to_string());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([500.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(SpectrogramApp::new(state)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
