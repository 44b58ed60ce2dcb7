//! Spectrum analyzer - windowed FFT with band aggregation
//!
//! Mono samples accumulate in a 1024-sample ring; each `write` recomputes
//! the Hann-windowed FFT over the ring, exponentially smooths the magnitude
//! spectrum, and lets per-bin peaks decay. Display code reads either raw
//! smoothed bins or a fixed number of aggregated bands (logarithmic by
//! default, matching how hearing distributes octaves).
//!
//! The FFT plan and every buffer are allocated at construction; `write` is
//! allocation-free and safe to call from the audio thread.

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

pub const SPECTRUM_FFT_SIZE: usize = 1024;
const NUM_BINS: usize = SPECTRUM_FFT_SIZE / 2;

/// FFT-based spectrum analyzer with smoothing and peak hold.
pub struct SpectrumAnalyzer {
    sample_rate: f32,
    ring: Vec<f32>,
    window: Vec<f32>,
    write_pos: usize,
    fft: Arc<dyn Fft<f32>>,
    fft_buffer: Vec<Complex32>,
    scratch: Vec<Complex32>,
    magnitudes: Vec<f32>,
    smoothed: Vec<f32>,
    peaks: Vec<f32>,
    smoothing: f32,
    peak_decay: f32,
    logarithmic: bool,
}

impl SpectrumAnalyzer {
    pub fn new(sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(SPECTRUM_FFT_SIZE);
        let scratch_len = fft.get_inplace_scratch_len();

        let window: Vec<f32> = (0..SPECTRUM_FFT_SIZE)
            .map(|i| {
                let phase =
                    std::f32::consts::TAU * i as f32 / (SPECTRUM_FFT_SIZE as f32 - 1.0);
                0.5 * (1.0 - phase.cos())
            })
            .collect();

        Self {
            sample_rate,
            ring: vec![0.0; SPECTRUM_FFT_SIZE],
            window,
            write_pos: 0,
            fft,
            fft_buffer: vec![Complex32::new(0.0, 0.0); SPECTRUM_FFT_SIZE],
            scratch: vec![Complex32::new(0.0, 0.0); scratch_len],
            magnitudes: vec![0.0; NUM_BINS],
            smoothed: vec![0.0; NUM_BINS],
            peaks: vec![0.0; NUM_BINS],
            smoothing: 0.8,
            peak_decay: 0.99,
            logarithmic: true,
        }
    }

    /// Exponential smoothing factor in [0, 1): higher = slower display.
    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 0.999);
    }

    pub fn set_peak_decay(&mut self, decay: f32) {
        self.peak_decay = decay.clamp(0.5, 1.0);
    }

    pub fn set_logarithmic(&mut self, logarithmic: bool) {
        self.logarithmic = logarithmic;
    }

    /// Feed a mono block and recompute the spectrum.
    pub fn write(&mut self, mono: &[f32]) {
        for &sample in mono {
            self.ring[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % SPECTRUM_FFT_SIZE;
        }

        // Unroll the ring into time order, windowed
        for i in 0..SPECTRUM_FFT_SIZE {
            let idx = (self.write_pos + i) % SPECTRUM_FFT_SIZE;
            self.fft_buffer[i] = Complex32::new(self.ring[idx] * self.window[i], 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.fft_buffer, &mut self.scratch);

        for (mag, bin) in self.magnitudes.iter_mut().zip(self.fft_buffer.iter()) {
            *mag = bin.norm() / SPECTRUM_FFT_SIZE as f32;
        }

        for k in 0..NUM_BINS {
            self.smoothed[k] =
                self.smoothing * self.smoothed[k] + (1.0 - self.smoothing) * self.magnitudes[k];
            if self.magnitudes[k] > self.peaks[k] {
                self.peaks[k] = self.magnitudes[k];
            } else {
                self.peaks[k] *= self.peak_decay;
            }
        }
    }

    /// Raw smoothed magnitude bins (length 512).
    pub fn magnitudes(&self) -> &[f32] {
        &self.smoothed
    }

    /// Frequency of the strongest raw bin in the last analysis.
    pub fn dominant_frequency(&self) -> f32 {
        let mut best = 0;
        let mut best_mag = 0.0;
        for (k, &mag) in self.magnitudes.iter().enumerate() {
            if mag > best_mag {
                best_mag = mag;
                best = k;
            }
        }
        best as f32 * self.sample_rate / SPECTRUM_FFT_SIZE as f32
    }

    /// Aggregate the smoothed bins into `out.len()` display bands.
    pub fn bands(&self, out: &mut [f32]) {
        let num_bands = out.len();
        if num_bands == 0 {
            return;
        }

        if self.logarithmic {
            let log_max = (NUM_BINS as f32).ln();
            for (b, slot) in out.iter_mut().enumerate() {
                let start_log = b as f32 * log_max / num_bands as f32;
                let end_log = (b + 1) as f32 * log_max / num_bands as f32;
                let mut start_bin = start_log.exp() as usize;
                let mut end_bin = end_log.exp() as usize;

                start_bin = start_bin.min(NUM_BINS - 1);
                end_bin = end_bin.clamp(start_bin + 1, NUM_BINS);

                let sum: f32 = self.smoothed[start_bin..end_bin].iter().sum();
                *slot = sum / (end_bin - start_bin) as f32;
            }
        } else {
            let bins_per_band = (NUM_BINS / num_bands).max(1);
            for (b, slot) in out.iter_mut().enumerate() {
                let start = (b * bins_per_band).min(NUM_BINS - 1);
                let end = ((b + 1) * bins_per_band).min(NUM_BINS);
                let sum: f32 = self.smoothed[start..end].iter().sum();
                *slot = sum / (end - start) as f32;
            }
        }
    }

    /// Per-band peak values with the same band layout as `bands`.
    pub fn band_peaks(&self, out: &mut [f32]) {
        let num_bands = out.len();
        if num_bands == 0 {
            return;
        }
        let bins_per_band = (NUM_BINS / num_bands).max(1);
        for (b, slot) in out.iter_mut().enumerate() {
            let start = (b * bins_per_band).min(NUM_BINS - 1);
            let end = ((b + 1) * bins_per_band).min(NUM_BINS);
            *slot = self.peaks[start..end]
                .iter()
                .fold(0.0f32, |m, &v| m.max(v));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TWO_PI;

    #[test]
    fn test_dominant_bin_finds_sine() {
        let sr = 48000.0;
        let mut analyzer = SpectrumAnalyzer::new(sr);
        let tone: Vec<f32> = (0..4096)
            .map(|i| (i as f32 * 1000.0 * TWO_PI / sr).sin())
            .collect();
        for chunk in tone.chunks(256) {
            analyzer.write(chunk);
        }
        let dominant = analyzer.dominant_frequency();
        let bin_width = sr / SPECTRUM_FFT_SIZE as f32;
        assert!(
            (dominant - 1000.0).abs() <= bin_width,
            "dominant {} should be within one bin of 1 kHz",
            dominant
        );
    }

    #[test]
    fn test_silence_gives_zero_spectrum() {
        let mut analyzer = SpectrumAnalyzer::new(48000.0);
        analyzer.write(&vec![0.0; 2048]);
        assert!(analyzer.magnitudes().iter().all(|&m| m == 0.0));
        assert_eq!(analyzer.dominant_frequency(), 0.0);
    }

    #[test]
    fn test_smoothing_lags_transients() {
        let sr = 48000.0;
        let mut fast = SpectrumAnalyzer::new(sr);
        fast.set_smoothing(0.0);
        let mut slow = SpectrumAnalyzer::new(sr);
        slow.set_smoothing(0.95);

        let tone: Vec<f32> = (0..1024)
            .map(|i| (i as f32 * 2000.0 * TWO_PI / sr).sin())
            .collect();
        fast.write(&tone);
        slow.write(&tone);

        let fast_total: f32 = fast.magnitudes().iter().sum();
        let slow_total: f32 = slow.magnitudes().iter().sum();
        assert!(
            fast_total > slow_total * 2.0,
            "heavy smoothing should lag a sudden tone"
        );
    }

    #[test]
    fn test_band_aggregation_sane() {
        let sr = 48000.0;
        let mut analyzer = SpectrumAnalyzer::new(sr);
        let tone: Vec<f32> = (0..4096)
            .map(|i| (i as f32 * 100.0 * TWO_PI / sr).sin())
            .collect();
        for chunk in tone.chunks(256) {
            analyzer.write(chunk);
        }

        let mut bands = vec![0.0; 16];
        analyzer.bands(&mut bands);
        assert!(bands.iter().all(|b| b.is_finite() && *b >= 0.0));
        // 100 Hz is bin ~2: energy should sit in the low bands
        let low: f32 = bands[..4].iter().sum();
        let high: f32 = bands[12..].iter().sum();
        assert!(low > high, "low tone should land in low bands");

        let mut peaks = vec![0.0; 16];
        analyzer.band_peaks(&mut peaks);
        assert!(peaks.iter().all(|p| p.is_finite() && *p >= 0.0));
    }
}
