//! Phaser - LFO-swept cascade of first-order allpass stages
//!
//! Up to twelve allpass stages share one coefficient swept by a sine LFO
//! between a min and max frequency. Feedback from the last stage's state
//! back into the input deepens the notches. The damped state update keeps
//! the cascade stable while the coefficient moves every sample.

use crate::math::{clamp, lerp, TWO_PI};

pub const PHASER_MAX_STAGES: usize = 12;

/// Swept-allpass phaser.
pub struct Phaser {
    num_stages: usize,
    lfo_phase: f32,
    rate: f32,
    depth: f32,
    feedback: f32,
    min_freq: f32,
    max_freq: f32,
    mix: f32,
    zm1: [f32; PHASER_MAX_STAGES],
    sample_rate: f32,
}

impl Phaser {
    pub fn new(sample_rate: f32, num_stages: usize) -> Self {
        Self {
            num_stages: num_stages.clamp(1, PHASER_MAX_STAGES),
            lfo_phase: 0.0,
            rate: 0.3,
            depth: 0.6,
            feedback: 0.7,
            min_freq: 200.0,
            max_freq: 4000.0,
            mix: 0.5,
            zm1: [0.0; PHASER_MAX_STAGES],
            sample_rate,
        }
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = clamp(rate, 0.01, 10.0);
    }

    pub fn set_depth(&mut self, depth: f32) {
        self.depth = clamp(depth, 0.0, 1.0);
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = clamp(feedback, 0.0, 0.95);
    }

    /// Sweep range; both ends clamped below Nyquist.
    pub fn set_frequency_range(&mut self, min_freq: f32, max_freq: f32) {
        let nyquist = self.sample_rate * 0.49;
        self.min_freq = clamp(min_freq, 20.0, nyquist);
        self.max_freq = clamp(max_freq, self.min_freq, nyquist);
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = clamp(mix, 0.0, 1.0);
    }

    pub fn reset(&mut self) {
        self.zm1 = [0.0; PHASER_MAX_STAGES];
        self.lfo_phase = 0.0;
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let lfo = 0.5 + 0.5 * (self.lfo_phase * TWO_PI).sin();
        self.lfo_phase += self.rate / self.sample_rate;
        if self.lfo_phase >= 1.0 {
            self.lfo_phase -= 1.0;
        }

        let freq = self.min_freq + lfo * self.depth * (self.max_freq - self.min_freq);
        let w = TWO_PI * freq / self.sample_rate;
        let a1 = (1.0 - w) / (1.0 + w);

        let mut y = input + self.zm1[self.num_stages - 1] * self.feedback;

        for i in 0..self.num_stages {
            let x = y;
            y = a1 * (x - self.zm1[i]) + self.zm1[i];
            // Damped state update keeps the swept cascade from ringing off
            self.zm1[i] = lerp(self.zm1[i], y, 0.9);
            y = x - a1 * y;
        }

        lerp(input, y, self.mix)
    }

    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}
