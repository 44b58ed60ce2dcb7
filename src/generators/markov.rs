//! Markov-chain melody generator
//!
//! A 12x12 pitch-class transition matrix sampled with a temperature control.
//! The default matrix favors a major scale with an exponential preference
//! for small intervals, which is enough to sound intentional without any
//! training data. Independent probabilities gate rests and octave jumps.
//!
//! Temperature reshapes each row as `p^(1/T)` before renormalizing: low
//! temperatures sharpen toward the most likely transition, high temperatures
//! flatten toward a uniform walk.

use crate::math::clamp;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Temperature-sampled Markov melody source.
pub struct MarkovMelody {
    transitions: [[f32; 12]; 12],
    current_state: usize,
    octave: i32,
    octave_jump_prob: f32,
    rest_prob: f32,
    temperature: f32,
    rng: StdRng,
}

impl MarkovMelody {
    pub fn new(seed: u64) -> Self {
        // Major scale membership per pitch class
        let scale = [1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];

        let mut transitions = [[0.0f32; 12]; 12];
        for (from, row) in transitions.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (to, p) in row.iter_mut().enumerate() {
                let interval = ((to as i32 - from as i32).rem_euclid(12)) as f32;
                // Scale tones only, preferring small intervals
                *p = scale[to] * (-interval * 0.3).exp();
                sum += *p;
            }
            for p in row.iter_mut() {
                *p /= sum;
            }
        }

        Self {
            transitions,
            current_state: 0,
            octave: 4,
            octave_jump_prob: 0.1,
            rest_prob: 0.05,
            temperature: 0.5,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Replace one transition row (renormalized).
    pub fn set_transition_row(&mut self, from: usize, row: [f32; 12]) {
        if from >= 12 {
            return;
        }
        let sum: f32 = row.iter().map(|p| p.max(0.0)).sum();
        if sum <= 0.0 {
            return;
        }
        for (to, &p) in row.iter().enumerate() {
            self.transitions[from][to] = p.max(0.0) / sum;
        }
    }

    pub fn transition(&self, from: usize, to: usize) -> f32 {
        self.transitions[from][to]
    }

    pub fn set_temperature(&mut self, temperature: f32) {
        self.temperature = clamp(temperature, 0.05, 4.0);
    }

    pub fn set_rest_probability(&mut self, prob: f32) {
        self.rest_prob = clamp(prob, 0.0, 1.0);
    }

    pub fn set_octave_jump_probability(&mut self, prob: f32) {
        self.octave_jump_prob = clamp(prob, 0.0, 1.0);
    }

    /// Next MIDI note, or `None` for a rest.
    pub fn next_note(&mut self) -> Option<i32> {
        if self.rng.gen::<f32>() < self.rest_prob {
            return None;
        }

        if self.rng.gen::<f32>() < self.octave_jump_prob {
            self.octave += if self.rng.gen::<f32>() < 0.5 { -1 } else { 1 };
            self.octave = self.octave.clamp(2, 6);
        }

        // Temperature-adjusted, renormalized sampling of the current row
        let r = self.rng.gen::<f32>();
        let mut probs = [0.0f32; 12];
        let mut sum = 0.0;
        for (i, p) in probs.iter_mut().enumerate() {
            *p = self.transitions[self.current_state][i].powf(1.0 / self.temperature);
            sum += *p;
        }

        let mut cumulative = 0.0;
        for (i, &p) in probs.iter().enumerate() {
            cumulative += p / sum;
            if r < cumulative {
                self.current_state = i;
                return Some(self.octave * 12 + i as i32);
            }
        }

        // Float rounding fell off the end of the distribution
        Some(self.octave * 12 + self.current_state as i32)
    }
}
