//! Fractal oscillator - harmonic weights from Julia-set escape times
//!
//! Sixteen harmonic amplitudes are derived by iterating z -> z^2 + c for
//! starting points swept along the real axis and recording how quickly each
//! escapes. Moving `c` around the Julia parameter plane reshapes the
//! spectrum in the characteristically non-smooth fractal way. The weight
//! table is recomputed lazily when parameters change.

use crate::math::TWO_PI;

const MAX_HARMONICS: usize = 64;

/// Julia-escape additive oscillator.
pub struct FractalOscillator {
    real_c: f64,
    imag_c: f64,
    max_iterations: u32,
    harmonic_weights: [f32; MAX_HARMONICS],
    num_harmonics: usize,
    phases: [f32; MAX_HARMONICS],
    base_frequency: f32,
    sample_rate: f32,
    needs_recalc: bool,
}

impl FractalOscillator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            real_c: -0.7,
            imag_c: 0.27015,
            max_iterations: 32,
            harmonic_weights: [0.0; MAX_HARMONICS],
            num_harmonics: 16,
            phases: [0.0; MAX_HARMONICS],
            base_frequency: 220.0,
            sample_rate,
            needs_recalc: true,
        }
    }

    pub fn set_frequency(&mut self, freq: f32) {
        self.base_frequency = freq;
    }

    /// Move the Julia constant; the weight table rebuilds on the next sample.
    pub fn set_coordinates(&mut self, real: f64, imag: f64) {
        self.real_c = real;
        self.imag_c = imag;
        self.needs_recalc = true;
    }

    pub fn set_harmonic_count(&mut self, count: usize) {
        self.num_harmonics = count.clamp(1, MAX_HARMONICS);
        self.needs_recalc = true;
    }

    /// Rebuild harmonic weights from escape-iteration counts.
    fn recalculate(&mut self) {
        for i in 0..self.num_harmonics {
            let mut zr = i as f64 / self.num_harmonics as f64 * 2.0 - 1.0;
            let mut zi = 0.0f64;

            let mut iter = 0;
            while zr * zr + zi * zi < 4.0 && iter < self.max_iterations {
                let tmp = zr * zr - zi * zi + self.real_c;
                zi = 2.0 * zr * zi + self.imag_c;
                zr = tmp;
                iter += 1;
            }

            self.harmonic_weights[i] = iter as f32 / self.max_iterations as f32;
        }
        self.needs_recalc = false;
    }

    pub fn reset(&mut self) {
        self.phases = [0.0; MAX_HARMONICS];
    }

    pub fn process(&mut self) -> f32 {
        if self.needs_recalc {
            self.recalculate();
        }

        let mut out = 0.0;
        let base_inc = self.base_frequency / self.sample_rate;

        for i in 0..self.num_harmonics {
            let freq_ratio = (i + 1) as f32;
            out += self.harmonic_weights[i] * (self.phases[i] * TWO_PI).sin();

            self.phases[i] += base_inc * freq_ratio;
            if self.phases[i] >= 1.0 {
                self.phases[i] -= 1.0;
            }
        }

        out * 0.5
    }

    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_computed_once_then_cached() {
        let mut osc = FractalOscillator::new(48000.0);
        osc.process();
        let weights = osc.harmonic_weights;
        for _ in 0..1000 {
            osc.process();
        }
        assert_eq!(weights, osc.harmonic_weights, "weights must be cached");
    }

    #[test]
    fn test_coordinates_reshape_spectrum() {
        let mut osc = FractalOscillator::new(48000.0);
        osc.process();
        let before = osc.harmonic_weights;

        osc.set_coordinates(0.285, 0.01);
        osc.process();
        let after = osc.harmonic_weights;

        assert_ne!(
            &before[..16],
            &after[..16],
            "different Julia constants should give different spectra"
        );
    }

    #[test]
    fn test_output_bounded_and_deterministic() {
        let mut a = FractalOscillator::new(48000.0);
        let mut b = FractalOscillator::new(48000.0);
        for _ in 0..8192 {
            let sa = a.process();
            assert!(sa.is_finite() && sa.abs() <= 0.5 * 16.0);
            assert_eq!(sa, b.process());
        }
    }

    #[test]
    fn test_weights_normalized_range() {
        let mut osc = FractalOscillator::new(48000.0);
        osc.process();
        for (i, &w) in osc.harmonic_weights.iter().take(16).enumerate() {
            assert!(
                (0.0..=1.0).contains(&w),
                "weight {} out of [0,1]: {}",
                i,
                w
            );
        }
    }
}
