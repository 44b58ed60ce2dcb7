//! Spectral processor - frequency-domain freeze, blur, shift, and robotize
//!
//! Frame-based STFT manipulation: 1024-point real FFT frames with a Hann
//! window and 256-sample hop (75% overlap-add). The four modes:
//!
//! - **Freeze**: capture the current magnitude spectrum and sustain it
//!   indefinitely, advancing each bin's phase at its natural rate so the
//!   output is a stable, steady spectrum rather than a buzzing loop
//! - **Blur**: smooth magnitudes across neighboring bins (phase untouched)
//! - **Shift**: offset every bin upward/downward by a frequency amount
//! - **Robotize**: zero all phases per frame, collapsing pitch to the frame
//!   rate's monotone buzz
//!
//! The dry path is delayed by one FFT frame to stay time-aligned with the
//! wet path for mixing. All FFT plans and scratch buffers are allocated at
//! construction; `process` never allocates.

use crate::math::clamp;
use num_complex::Complex32;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use std::sync::Arc;

const FFT_SIZE: usize = 1024;
const HOP_SIZE: usize = 256;
const NUM_BINS: usize = FFT_SIZE / 2 + 1;

/// Frequency-domain processing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectralMode {
    Freeze,
    Blur,
    Shift,
    Robotize,
}

/// Streaming STFT processor.
pub struct SpectralProcessor {
    mode: SpectralMode,
    frozen: bool,
    blur_amount: f32,
    shift_hz: f32,
    mix: f32,
    sample_rate: f32,

    // Analysis/synthesis state
    window: Vec<f32>,
    frame: Vec<f32>,       // sliding analysis buffer (last FFT_SIZE inputs)
    in_fifo: Vec<f32>,     // incoming samples for the current hop
    out_accum: Vec<f32>,   // overlap-add accumulator
    out_ready: Vec<f32>,   // finished samples for the current hop
    dry_delay: Vec<f32>,   // dry path alignment (FFT_SIZE latency)
    dry_pos: usize,
    fifo_pos: usize,

    // FFT machinery (planned once)
    r2c: Arc<dyn RealToComplex<f32>>,
    c2r: Arc<dyn ComplexToReal<f32>>,
    spectrum: Vec<Complex32>,
    shifted: Vec<Complex32>,
    windowed: Vec<f32>,
    synth: Vec<f32>,
    magnitudes: Vec<f32>,

    // Freeze state
    frozen_mag: Vec<f32>,
    frozen_phase: Vec<f32>,
    capture_pending: bool,
}

impl SpectralProcessor {
    pub fn new(sample_rate: f32) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let r2c = planner.plan_fft_forward(FFT_SIZE);
        let c2r = planner.plan_fft_inverse(FFT_SIZE);

        let window: Vec<f32> = (0..FFT_SIZE)
            .map(|i| {
                let phase = std::f32::consts::TAU * i as f32 / FFT_SIZE as f32;
                0.5 * (1.0 - phase.cos())
            })
            .collect();

        Self {
            mode: SpectralMode::Freeze,
            frozen: false,
            blur_amount: 0.3,
            shift_hz: 0.0,
            mix: 1.0,
            sample_rate,
            window,
            frame: vec![0.0; FFT_SIZE],
            in_fifo: vec![0.0; HOP_SIZE],
            out_accum: vec![0.0; FFT_SIZE],
            out_ready: vec![0.0; HOP_SIZE],
            dry_delay: vec![0.0; FFT_SIZE],
            dry_pos: 0,
            fifo_pos: 0,
            r2c,
            c2r,
            spectrum: vec![Complex32::new(0.0, 0.0); NUM_BINS],
            shifted: vec![Complex32::new(0.0, 0.0); NUM_BINS],
            windowed: vec![0.0; FFT_SIZE],
            synth: vec![0.0; FFT_SIZE],
            magnitudes: vec![0.0; NUM_BINS],
            frozen_mag: vec![0.0; NUM_BINS],
            frozen_phase: vec![0.0; NUM_BINS],
            capture_pending: false,
        }
    }

    pub fn set_mode(&mut self, mode: SpectralMode) {
        self.mode = mode;
    }

    /// Engage/release the freeze. Engaging captures the next analysis frame.
    pub fn set_freeze(&mut self, frozen: bool) {
        if frozen && !self.frozen {
            self.capture_pending = true;
        }
        self.frozen = frozen;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Blur radius control in [0, 1].
    pub fn set_blur(&mut self, amount: f32) {
        self.blur_amount = clamp(amount, 0.0, 1.0);
    }

    /// Bin shift in Hz (positive = upward).
    pub fn set_shift(&mut self, hz: f32) {
        self.shift_hz = hz;
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = clamp(mix, 0.0, 1.0);
    }

    /// Latency of the wet (and aligned dry) path in samples.
    pub fn latency(&self) -> usize {
        FFT_SIZE
    }

    pub fn reset(&mut self) {
        self.frame.fill(0.0);
        self.in_fifo.fill(0.0);
        self.out_accum.fill(0.0);
        self.out_ready.fill(0.0);
        self.dry_delay.fill(0.0);
        self.dry_pos = 0;
        self.fifo_pos = 0;
        self.frozen = false;
        self.capture_pending = false;
    }

    fn process_frame(&mut self) {
        // Slide the analysis buffer and append the new hop
        self.frame.copy_within(HOP_SIZE.., 0);
        let tail = FFT_SIZE - HOP_SIZE;
        self.frame[tail..].copy_from_slice(&self.in_fifo);

        for (i, w) in self.windowed.iter_mut().enumerate() {
            *w = self.frame[i] * self.window[i];
        }
        // realfft scratch-free process; forward errors cannot occur on
        // matched lengths
        let _ = self.r2c.process(&mut self.windowed, &mut self.spectrum);

        match self.mode {
            SpectralMode::Freeze => self.apply_freeze(),
            SpectralMode::Blur => self.apply_blur(),
            SpectralMode::Shift => self.apply_shift(),
            SpectralMode::Robotize => self.apply_robotize(),
        }

        // Real inverse requires purely real DC and Nyquist bins
        self.spectrum[0].im = 0.0;
        self.spectrum[NUM_BINS - 1].im = 0.0;
        let _ = self.c2r.process(&mut self.spectrum, &mut self.synth);

        // Inverse is unnormalized; Hann^2 at 75% overlap sums to 1.5
        let norm = 1.0 / (FFT_SIZE as f32 * 1.5);
        for i in 0..FFT_SIZE {
            self.out_accum[i] += self.synth[i] * self.window[i] * norm;
        }

        self.out_ready.copy_from_slice(&self.out_accum[..HOP_SIZE]);
        self.out_accum.copy_within(HOP_SIZE.., 0);
        self.out_accum[tail..].fill(0.0);
    }

    fn apply_freeze(&mut self) {
        if self.capture_pending {
            for (k, bin) in self.spectrum.iter().enumerate() {
                self.frozen_mag[k] = bin.norm();
                self.frozen_phase[k] = bin.arg();
            }
            self.capture_pending = false;
        }
        if !self.frozen {
            return; // passthrough while released
        }
        // Sustain the captured magnitudes, phases advancing naturally
        let phase_inc = std::f32::consts::TAU * HOP_SIZE as f32 / FFT_SIZE as f32;
        for k in 0..NUM_BINS {
            self.frozen_phase[k] += phase_inc * k as f32;
            // Keep phase wrapped so it never loses float precision
            if self.frozen_phase[k] > std::f32::consts::TAU {
                self.frozen_phase[k] %= std::f32::consts::TAU;
            }
            self.spectrum[k] = Complex32::from_polar(self.frozen_mag[k], self.frozen_phase[k]);
        }
    }

    fn apply_blur(&mut self) {
        let radius = (self.blur_amount * 8.0) as usize;
        if radius == 0 {
            return;
        }
        for (k, mag) in self.magnitudes.iter_mut().enumerate() {
            let lo = k.saturating_sub(radius);
            let hi = (k + radius + 1).min(NUM_BINS);
            let sum: f32 = self.spectrum[lo..hi].iter().map(|c| c.norm()).sum();
            *mag = sum / (hi - lo) as f32;
        }
        for k in 0..NUM_BINS {
            let phase = self.spectrum[k].arg();
            self.spectrum[k] = Complex32::from_polar(self.magnitudes[k], phase);
        }
    }

    fn apply_shift(&mut self) {
        let bin_width = self.sample_rate / FFT_SIZE as f32;
        let offset = (self.shift_hz / bin_width).round() as i64;

        for bin in self.shifted.iter_mut() {
            *bin = Complex32::new(0.0, 0.0);
        }
        for k in 0..NUM_BINS {
            let target = k as i64 + offset;
            if (0..NUM_BINS as i64).contains(&target) {
                self.shifted[target as usize] = self.spectrum[k];
            }
        }
        self.spectrum.copy_from_slice(&self.shifted);
    }

    fn apply_robotize(&mut self) {
        for bin in self.spectrum.iter_mut() {
            *bin = Complex32::new(bin.norm(), 0.0);
        }
    }

    /// Process a mono buffer in place.
    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            let input = *sample;

            // Dry path delayed to match the analysis/synthesis latency
            let dry = self.dry_delay[self.dry_pos];
            self.dry_delay[self.dry_pos] = input;
            self.dry_pos = (self.dry_pos + 1) % FFT_SIZE;

            self.in_fifo[self.fifo_pos] = input;
            let wet = self.out_ready[self.fifo_pos];
            self.fifo_pos += 1;

            if self.fifo_pos == HOP_SIZE {
                self.process_frame();
                self.fifo_pos = 0;
            }

            *sample = dry + (wet - dry) * self.mix;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TWO_PI;

    fn sine(freq: f32, sr: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (i as f32 * freq * TWO_PI / sr).sin())
            .collect()
    }

    fn rms(buf: &[f32]) -> f32 {
        (buf.iter().map(|&s| (s as f64) * (s as f64)).sum::<f64>() / buf.len() as f64).sqrt()
            as f32
    }

    #[test]
    fn test_unfrozen_freeze_mode_passes_signal() {
        let sr = 48000.0;
        let mut proc = SpectralProcessor::new(sr);
        proc.set_mode(SpectralMode::Freeze); // not engaged

        let mut buf = sine(440.0, sr, 4 * FFT_SIZE);
        proc.process(&mut buf);
        // After the latency settles, the resynthesis should carry the energy
        let tail_rms = rms(&buf[2 * FFT_SIZE..]);
        assert!(
            (tail_rms - 0.707).abs() < 0.15,
            "passthrough resynthesis should preserve RMS, got {}",
            tail_rms
        );
    }

    #[test]
    fn test_freeze_sustains_after_input_stops() {
        let sr = 48000.0;
        let mut proc = SpectralProcessor::new(sr);
        proc.set_mode(SpectralMode::Freeze);

        // Feed a tone, then engage the freeze
        let mut tone = sine(440.0, sr, 4 * FFT_SIZE);
        proc.process(&mut tone);
        proc.set_freeze(true);

        // Push silence: a frozen processor keeps emitting the spectrum
        let mut silence = vec![0.0; 8 * FFT_SIZE];
        proc.process(&mut silence);
        let sustained = rms(&silence[4 * FFT_SIZE..]);
        assert!(
            sustained > 0.2,
            "frozen spectrum should sustain through silence, rms {}",
            sustained
        );

        // Stability: two later windows have nearly equal energy
        let w1 = rms(&silence[4 * FFT_SIZE..5 * FFT_SIZE]);
        let w2 = rms(&silence[6 * FFT_SIZE..7 * FFT_SIZE]);
        assert!(
            (w1 - w2).abs() < 0.1 * w1.max(w2),
            "frozen output should be steady: {} vs {}",
            w1,
            w2
        );
    }

    #[test]
    fn test_release_freeze_returns_to_input() {
        let sr = 48000.0;
        let mut proc = SpectralProcessor::new(sr);
        proc.set_mode(SpectralMode::Freeze);
        let mut tone = sine(440.0, sr, 4 * FFT_SIZE);
        proc.process(&mut tone);
        proc.set_freeze(true);
        let mut silence = vec![0.0; 4 * FFT_SIZE];
        proc.process(&mut silence);

        proc.set_freeze(false);
        let mut more_silence = vec![0.0; 8 * FFT_SIZE];
        proc.process(&mut more_silence);
        assert!(
            rms(&more_silence[4 * FFT_SIZE..]) < 0.05,
            "released freeze over silence should fade out"
        );
    }

    #[test]
    fn test_robotize_finite_and_continuous() {
        let sr = 48000.0;
        let mut proc = SpectralProcessor::new(sr);
        proc.set_mode(SpectralMode::Robotize);
        let mut buf = sine(330.0, sr, 8 * FFT_SIZE);
        proc.process(&mut buf);
        assert!(buf.iter().all(|s| s.is_finite()));
        assert!(rms(&buf[4 * FFT_SIZE..]) > 0.05, "robotize should keep energy");
    }

    #[test]
    fn test_shift_moves_dominant_frequency() {
        use rustfft::FftPlanner;

        let sr = 48000.0;
        let mut proc = SpectralProcessor::new(sr);
        proc.set_mode(SpectralMode::Shift);
        proc.set_shift(1000.0);

        let mut buf = sine(1000.0, sr, 16 * FFT_SIZE);
        proc.process(&mut buf);

        // FFT of the settled tail; dominant bin should sit near 2000 Hz
        let n = 8192;
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n);
        let mut spectrum: Vec<Complex32> = buf[8 * FFT_SIZE..8 * FFT_SIZE + n]
            .iter()
            .map(|&s| Complex32::new(s, 0.0))
            .collect();
        fft.process(&mut spectrum);

        let dominant = spectrum[..n / 2]
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.norm().partial_cmp(&b.1.norm()).unwrap())
            .unwrap()
            .0;
        let dominant_hz = dominant as f32 * sr / n as f32;
        assert!(
            (dominant_hz - 2000.0).abs() < 100.0,
            "1 kHz shifted by 1 kHz should peak near 2 kHz, got {}",
            dominant_hz
        );
    }

    #[test]
    fn test_blur_bounded() {
        let sr = 48000.0;
        let mut proc = SpectralProcessor::new(sr);
        proc.set_mode(SpectralMode::Blur);
        proc.set_blur(1.0);
        let mut buf = sine(440.0, sr, 8 * FFT_SIZE);
        proc.process(&mut buf);
        assert!(buf.iter().all(|s| s.is_finite() && s.abs() < 4.0));
    }

    #[test]
    fn test_dry_mix_is_delayed_identity() {
        let sr = 48000.0;
        let mut proc = SpectralProcessor::new(sr);
        proc.set_mix(0.0);
        let input = sine(123.0, sr, 4 * FFT_SIZE);
        let mut buf = input.clone();
        proc.process(&mut buf);
        // Output equals input delayed by FFT_SIZE samples
        for i in FFT_SIZE..buf.len() {
            assert!(
                (buf[i] - input[i - FFT_SIZE]).abs() < 1e-3,
                "dry path should be a pure delay at sample {}",
                i
            );
        }
    }
}
