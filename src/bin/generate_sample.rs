use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Write a synthetic telemetry recording (roll, pitch, ax, ay, az) as a
/// header-less CSV.
#[derive(Debug, Parser)]
struct Args {
    /// Output file
    #[arg(default_value = "sample_telemetry.csv")]
    output: PathBuf,

    /// Recording length in seconds
    #[arg(long, default_value_t = 30.0)]
    seconds: f64,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 320.0)]
    fs: f64,

    /// PRNG seed for the sensor noise
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// One row of the recording at time `t`.
///
/// A slow attitude sway, a rotor-like vibration whose frequency sweeps from
/// 40 Hz to 100 Hz over the recording, and gravity on the z axis.
fn sample(t: f64, duration: f64, rng: &mut SimpleRng) -> [f64; 5] {
    let sweep_start = 40.0;
    let sweep_end = 100.0;
    let rate = (sweep_end - sweep_start) / duration;
    // Phase of a linear chirp: 2π (f0 t + k t² / 2)
    let chirp = 2.0 * PI * (sweep_start * t + rate * t * t / 2.0);

    let roll = 5.0 * (2.0 * PI * 0.2 * t).sin() + 0.3 * chirp.sin() + rng.gauss(0.0, 0.05);
    let pitch = 3.0 * (2.0 * PI * 0.13 * t).cos() + 0.2 * (2.0 * PI * 12.0 * t).sin() + rng.gauss(0.0, 0.05);
    let ax = 0.8 * chirp.sin() + 0.1 * (2.0 * PI * 25.0 * t).sin() + rng.gauss(0.0, 0.02);
    let ay = 0.6 * chirp.cos() + rng.gauss(0.0, 0.02);
    let az = 9.81 + 0.4 * (2.0 * chirp).sin() + rng.gauss(0.0, 0.02);
    [roll, pitch, ax, ay, az]
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    anyhow::ensure!(args.fs > 0.0, "sample rate must be positive");
    anyhow::ensure!(args.seconds > 0.0, "duration must be positive");

    let n = (args.seconds * args.fs).round() as usize;
    let mut rng = SimpleRng::new(args.seed);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    for i in 0..n {
        let t = i as f64 / args.fs;
        let row = sample(t, args.seconds, &mut rng);
        writer
            .write_record(row.iter().map(|v| format!("{v:.6}")))
            .context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;

    log::info!(
        "Wrote {n} samples ({} s at {} Hz) to {}",
        args.seconds,
        args.fs,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_is_deterministic() {
        let mut a = SimpleRng::new(7);
        let mut b = SimpleRng::new(7);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        let u = a.next_f64();
        assert!((0.0..1.0).contains(&u));
    }

    #[test]
    fn gravity_sits_on_z() {
        let mut rng = SimpleRng::new(1);
        let mean_az: f64 = (0..320)
            .map(|i| sample(i as f64 / 320.0, 1.0, &mut rng)[4])
            .sum::<f64>()
            / 320.0;
        assert!((mean_az - 9.81).abs() < 0.1);
    }
}
