//! Writes a synthetic vibMonFft log so the viewer can be tried without a
//! sensor: a motor order sweeping up in frequency, its second harmonic, a
//! fixed structural resonance and a noise floor.
//!
//! Usage: `generate_sample [output]` (default `vibFftAcf_z_flatTop.txt`).

use anyhow::{Context, Result};

const SAMPLING_HZ: f64 = 2000.0;
const BIN_COUNT: usize = 256;
const SAMPLE_COUNT: usize = 240;
const PERIOD_US: u64 = 250_000;
const START_US: u64 = 12_345_678;
const G0: f64 = 9.80665;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Deterministic xoshiro256** generator, enough for a noise floor.
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut state = [0u64; 4];
        let mut x = seed;
        for slot in &mut state {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state }
    }

    fn next_u64(&mut self) -> u64 {
        let s = &mut self.state;
        let result = s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = s[1] << 17;
        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];
        s[2] ^= t;
        s[3] = s[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Frequency of bin `i`, as the logger computes it.
fn bin_frequency(i: usize) -> f64 {
    i as f64 * (SAMPLING_HZ / (BIN_COUNT as f64 * 2.0))
}

/// One spectrum in m/s² at sweep position `progress` (0 → 1).
fn spectrum(frequencies: &[f64], progress: f64, rng: &mut SimpleRng) -> Vec<f64> {
    let motor_hz = 80.0 + 220.0 * progress;
    let motor_g = 0.4 + 1.2 * progress;

    frequencies
        .iter()
        .map(|&f| {
            let signal_g = gaussian(f, motor_hz, 6.0, motor_g)
                + gaussian(f, 2.0 * motor_hz, 9.0, 0.35 * motor_g)
                + gaussian(f, 612.0, 15.0, 0.25);
            let noise_g = 0.01 + 0.02 * rng.next_f64();
            (signal_g + noise_g) * G0
        })
        .collect()
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "vibFftAcf_z_flatTop.txt".to_string());

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .quote_style(csv::QuoteStyle::Never)
        .from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let frequencies: Vec<f64> = (0..BIN_COUNT).map(bin_frequency).collect();

    writer.write_record([format!(
        "vibMonFft (z, flatTop) - ACF (Amplitude Correction Factor) - fSampling: {SAMPLING_HZ:.9}Hz - binCount: {BIN_COUNT}"
    )])?;

    let mut axis_line = vec!["timestamp".to_string()];
    axis_line.extend(frequencies.iter().map(|f| format!("{f:.2}")));
    writer.write_record(&axis_line)?;

    let mut units_line = vec!["(us)".to_string()];
    units_line.extend(std::iter::repeat("(m.s^-2)".to_string()).take(BIN_COUNT));
    writer.write_record(&units_line)?;

    let mut rng = SimpleRng::new(42);
    for i in 0..SAMPLE_COUNT {
        let progress = i as f64 / (SAMPLE_COUNT - 1) as f64;
        let timestamp = START_US + i as u64 * PERIOD_US;

        let mut row = vec![timestamp.to_string()];
        row.extend(
            spectrum(&frequencies, progress, &mut rng)
                .iter()
                .map(|m| format!("{m:.9}")),
        );
        writer
            .write_record(&row)
            .with_context(|| format!("writing sample {i}"))?;
    }

    writer.flush().context("flushing output")?;

    println!(
        "Wrote {SAMPLE_COUNT} spectra ({BIN_COUNT} bins each) to {output_path}"
    );
    Ok(())
}
