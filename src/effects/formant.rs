//! Formant filter - vowel shaping through parallel bandpass filters
//!
//! Three bandpass state-variable filters tuned to the first three formant
//! frequencies of the vowels A, E, I, O, U. The vowel control is continuous
//! in [0, 4] and linearly interpolates between adjacent vowel formant sets,
//! so sweeping it produces the classic "talking filter" morph.

use super::svf::{FilterOutput, StateVariableFilter};
use crate::math::{clamp, lerp};

/// First three formant frequencies for A, E, I, O, U.
const VOWEL_FORMANTS: [[f32; 3]; 5] = [
    [800.0, 1150.0, 2900.0], // A
    [350.0, 2000.0, 2800.0], // E
    [270.0, 2140.0, 2950.0], // I
    [450.0, 800.0, 2830.0],  // O
    [325.0, 700.0, 2700.0],  // U
];

/// Vowel-morphing triple-bandpass filter.
pub struct FormantFilter {
    filters: [StateVariableFilter; 3],
    gains: [f32; 3],
    vowel_blend: f32,
}

impl FormantFilter {
    pub fn new(sample_rate: f32) -> Self {
        let make_bandpass = || {
            let mut f = StateVariableFilter::new(sample_rate);
            f.set_output(FilterOutput::Bandpass);
            f
        };
        let mut filter = Self {
            filters: [make_bandpass(), make_bandpass(), make_bandpass()],
            gains: [1.0 / 3.0; 3],
            vowel_blend: 0.0,
        };
        filter.set_vowel(0.0);
        filter
    }

    /// Vowel position in [0, 4]: 0=A, 1=E, 2=I, 3=O, 4=U, fractional values
    /// interpolate between neighbors.
    pub fn set_vowel(&mut self, vowel: f32) {
        self.vowel_blend = clamp(vowel, 0.0, 4.0);

        let v1 = self.vowel_blend as usize;
        let v2 = (v1 + 1).min(4);
        let frac = self.vowel_blend - v1 as f32;

        for (i, filter) in self.filters.iter_mut().enumerate() {
            let freq = lerp(VOWEL_FORMANTS[v1][i], VOWEL_FORMANTS[v2][i], frac);
            filter.set_cutoff(freq);
            filter.set_resonance(0.8);
        }
    }

    pub fn vowel(&self) -> f32 {
        self.vowel_blend
    }

    pub fn reset(&mut self) {
        for filter in self.filters.iter_mut() {
            filter.reset();
        }
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let mut out = 0.0;
        for (filter, &gain) in self.filters.iter_mut().zip(self.gains.iter()) {
            out += filter.process(input) * gain;
        }
        out
    }

    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TWO_PI;

    fn band_energy(filter: &mut FormantFilter, freq: f32, sr: f32) -> f32 {
        filter.reset();
        let mut sum = 0.0f64;
        for i in 0..8192 {
            let x = (i as f32 * freq * TWO_PI / sr).sin();
            let y = filter.process(x);
            if i >= 4096 {
                sum += (y as f64) * (y as f64);
            }
        }
        (sum / 4096.0).sqrt() as f32
    }

    #[test]
    fn test_vowel_a_emphasizes_its_formants() {
        let sr = 48000.0;
        let mut filter = FormantFilter::new(sr);
        filter.set_vowel(0.0); // A: formants at 800/1150/2900

        let on_formant = band_energy(&mut filter, 800.0, sr);
        let off_formant = band_energy(&mut filter, 5000.0, sr);
        assert!(
            on_formant > off_formant * 2.0,
            "800 Hz should resonate for vowel A: {} vs {}",
            on_formant,
            off_formant
        );
    }

    #[test]
    fn test_vowel_blend_clamps() {
        let mut filter = FormantFilter::new(48000.0);
        filter.set_vowel(17.0);
        assert_eq!(filter.vowel(), 4.0);
        filter.set_vowel(-2.0);
        assert_eq!(filter.vowel(), 0.0);
    }

    #[test]
    fn test_blend_moves_spectrum_continuously() {
        let sr = 48000.0;
        let mut filter = FormantFilter::new(sr);

        // Sweeping the vowel every sample must not click
        let mut prev = 0.0f32;
        for i in 0..sr as usize {
            let vowel = 4.0 * (i as f32 / sr);
            filter.set_vowel(vowel);
            let x = (i as f32 * 300.0 * TWO_PI / sr).sin();
            let y = filter.process(x);
            assert!(y.is_finite());
            assert!(
                (y - prev).abs() < 0.8,
                "vowel sweep discontinuity at sample {}",
                i
            );
            prev = y;
        }
    }
}
