//! Additive oscillator - weighted sum of independent sine partials
//!
//! Up to 64 partials, each with its own frequency ratio, amplitude, and
//! independently wrapped phase. Defaults to an 8-harmonic series with 1/n
//! rolloff; `set_harmonic_series` rebuilds the series with a configurable
//! rolloff exponent and `set_partial` edits individual partials for
//! inharmonic spectra.

use crate::math::TWO_PI;

pub const ADDITIVE_MAX_PARTIALS: usize = 64;

/// Partial-summation additive oscillator.
pub struct AdditiveOscillator {
    amplitudes: [f32; ADDITIVE_MAX_PARTIALS],
    ratios: [f32; ADDITIVE_MAX_PARTIALS],
    phases: [f32; ADDITIVE_MAX_PARTIALS],
    num_partials: usize,
    base_frequency: f32,
    sample_rate: f32,
}

impl AdditiveOscillator {
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            amplitudes: [0.0; ADDITIVE_MAX_PARTIALS],
            ratios: [0.0; ADDITIVE_MAX_PARTIALS],
            phases: [0.0; ADDITIVE_MAX_PARTIALS],
            num_partials: 0,
            base_frequency: 440.0,
            sample_rate,
        };
        osc.set_harmonic_series(8, 1.0);
        osc
    }

    pub fn set_frequency(&mut self, freq: f32) {
        self.base_frequency = freq;
    }

    /// Rebuild partials as a harmonic series: ratio n, amplitude (1/n)^rolloff.
    pub fn set_harmonic_series(&mut self, num_harmonics: usize, rolloff: f32) {
        self.num_partials = num_harmonics.min(ADDITIVE_MAX_PARTIALS);
        for i in 0..self.num_partials {
            self.ratios[i] = (i + 1) as f32;
            self.amplitudes[i] = (1.0 / (i + 1) as f32).powf(rolloff);
        }
    }

    /// Set one partial's frequency ratio and amplitude directly.
    pub fn set_partial(&mut self, index: usize, freq_ratio: f32, amplitude: f32) {
        if index < ADDITIVE_MAX_PARTIALS {
            self.ratios[index] = freq_ratio;
            self.amplitudes[index] = amplitude;
            if index >= self.num_partials {
                self.num_partials = index + 1;
            }
        }
    }

    pub fn reset(&mut self) {
        self.phases = [0.0; ADDITIVE_MAX_PARTIALS];
    }

    pub fn process(&mut self) -> f32 {
        let mut out = 0.0;
        let base_inc = self.base_frequency / self.sample_rate;

        for i in 0..self.num_partials {
            out += self.amplitudes[i] * (self.phases[i] * TWO_PI).sin();

            self.phases[i] += base_inc * self.ratios[i];
            if self.phases[i] >= 1.0 {
                self.phases[i] -= 1.0;
            }
        }
        out
    }

    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process();
        }
    }
}
