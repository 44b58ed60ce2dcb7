//! Moog-style ladder filter
//!
//! Four cascaded one-pole lowpass stages with resonance feedback from the
//! last stage back to the input, 24 dB/octave rolloff. Optional tanh
//! saturation ahead of the first stage keeps the feedback path bounded and
//! adds the familiar warmth. Resonance approaching 1.0 drives the filter
//! toward self-oscillation at the cutoff frequency.

use crate::math::{clamp, fast_tanh};

/// Four-pole ladder lowpass.
pub struct MoogFilter {
    cutoff: f32,
    resonance: f32,
    sample_rate: f32,
    saturate: bool,
    // Derived coefficients
    tune: f32,
    res_quad: f32,
    // Per-stage one-pole state
    stage: [f32; 4],
    delay: [f32; 4],
}

impl MoogFilter {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            cutoff: 1000.0,
            resonance: 0.0,
            sample_rate,
            saturate: true,
            tune: 0.0,
            res_quad: 0.0,
            stage: [0.0; 4],
            delay: [0.0; 4],
        };
        filter.set_cutoff(1000.0);
        filter
    }

    /// Cutoff in Hz, clamped to [20, 0.45 * sample_rate].
    ///
    /// Both coefficients are recomputed here because the resonance feedback
    /// scale depends on the tuning coefficient.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff = clamp(cutoff, 20.0, self.sample_rate * 0.45);
        let fc = self.cutoff / self.sample_rate;
        self.tune = 1.16 * fc;
        self.update_resonance_coefficient();
    }

    /// Resonance in [0, 1]; near 1.0 the filter approaches self-oscillation.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = clamp(resonance, 0.0, 1.0);
        self.update_resonance_coefficient();
    }

    fn update_resonance_coefficient(&mut self) {
        self.res_quad = 4.0 * self.resonance * (1.0 + 0.22 * self.tune);
    }

    /// Enable/disable tanh saturation before the first stage.
    pub fn set_saturation(&mut self, enabled: bool) {
        self.saturate = enabled;
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    pub fn reset(&mut self) {
        self.stage = [0.0; 4];
        self.delay = [0.0; 4];
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let mut x = input - self.res_quad * self.delay[3];

        if self.saturate {
            x = fast_tanh(x);
        }

        self.stage[0] = x * self.tune + self.delay[0] * (1.0 - self.tune);
        self.delay[0] = self.stage[0];

        for i in 1..4 {
            self.stage[i] = self.stage[i - 1] * self.tune + self.delay[i] * (1.0 - self.tune);
            self.delay[i] = self.stage[i];
        }

        self.stage[3]
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

    fn rms(buf: &[f32]) -> f32 {
        (buf.iter().map(|&s| (s as f64) * (s as f64)).sum::<f64>() / buf.len() as f64).sqrt()
            as f32
    }

    #[test]
    fn test_lowpass_attenuates_high_frequencies() {
        let sr = 48000.0;
        let mut filter = MoogFilter::new(sr);
        filter.set_cutoff(500.0);

        let mut low: Vec<f32> = (0..8192)
            .map(|i| (i as f32 * 110.0 * TWO_PI / sr).sin())
            .collect();
        filter.process_block(&mut low);
        let low_rms = rms(&low[4096..]);

        filter.reset();
        let mut high: Vec<f32> = (0..8192)
            .map(|i| (i as f32 * 8000.0 * TWO_PI / sr).sin())
            .collect();
        filter.process_block(&mut high);
        let high_rms = rms(&high[4096..]);

        assert!(
            high_rms < low_rms * 0.1,
            "24 dB/oct ladder should crush 8 kHz vs 110 Hz: {} vs {}",
            high_rms,
            low_rms
        );
    }

    #[test]
    fn test_stability_under_full_sweep() {
        // Cutoff swept across its whole range for 10 s with high resonance:
        // no NaN/Inf allowed.
        let sr = 48000.0;
        let total = (sr as usize) * 10;
        let mut filter = MoogFilter::new(sr);
        filter.set_resonance(1.0);

        for i in 0..total {
            let t = i as f32 / total as f32;
            filter.set_cutoff(20.0 + t * (sr * 0.45 - 20.0));
            let input = (i as f32 * 220.0 * TWO_PI / sr).sin() * 0.8;
            let out = filter.process(input);
            assert!(out.is_finite(), "ladder blew up at sample {}", i);
        }
    }

    #[test]
    fn test_resonance_boosts_cutoff_region() {
        let sr = 48000.0;
        let run = |resonance: f32| {
            let mut filter = MoogFilter::new(sr);
            filter.set_cutoff(1000.0);
            filter.set_resonance(resonance);
            let mut buf: Vec<f32> = (0..8192)
                .map(|i| (i as f32 * 1000.0 * TWO_PI / sr).sin() * 0.3)
                .collect();
            filter.process_block(&mut buf);
            rms(&buf[4096..])
        };
        assert!(
            run(0.9) > run(0.0),
            "resonance should emphasize input at the cutoff frequency"
        );
    }

    #[test]
    fn test_unsaturated_path() {
        let mut filter = MoogFilter::new(48000.0);
        filter.set_saturation(false);
        filter.set_cutoff(2000.0);
        for i in 0..4096 {
            let out = filter.process((i as f32 * 0.05).sin());
            assert!(out.is_finite());
        }
    }
}
