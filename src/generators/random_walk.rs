//! Scale-quantized random-walk note generator
//!
//! Steps the current note by a bounded random interval, clamps it to a
//! note range, and optionally snaps the result to the nearest degree of a
//! scale (pentatonic by default, which makes even a drunk walk listenable).
//! A step bias leans the walk upward or downward over time.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_SCALE: usize = 12;

/// Bounded, scale-aware note walk.
pub struct RandomWalk {
    current_note: i32,
    min_note: i32,
    max_note: i32,
    max_step: i32,
    step_bias: f32,
    scale: [i32; MAX_SCALE],
    scale_size: usize,
    quantize: bool,
    rng: StdRng,
}

impl RandomWalk {
    pub fn new(start: i32, min_note: i32, max_note: i32, seed: u64) -> Self {
        let (min_note, max_note) = if min_note <= max_note {
            (min_note, max_note)
        } else {
            (max_note, min_note)
        };
        let mut scale = [0i32; MAX_SCALE];
        scale[..5].copy_from_slice(&[0, 2, 4, 7, 9]); // pentatonic
        Self {
            current_note: start.clamp(min_note, max_note),
            min_note,
            max_note,
            max_step: 5,
            step_bias: 0.0,
            scale,
            scale_size: 5,
            quantize: true,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn set_scale(&mut self, scale: &[i32]) {
        self.scale_size = scale.len().min(MAX_SCALE);
        self.scale[..self.scale_size].copy_from_slice(&scale[..self.scale_size]);
    }

    pub fn set_quantize(&mut self, quantize: bool) {
        self.quantize = quantize;
    }

    pub fn set_max_step(&mut self, step: i32) {
        self.max_step = step.max(1);
    }

    /// Bias in [-1, 1]: negative drifts down, positive drifts up.
    pub fn set_step_bias(&mut self, bias: f32) {
        self.step_bias = bias.clamp(-1.0, 1.0);
    }

    fn quantize_to_scale(&self, note: i32) -> i32 {
        let octave = note.div_euclid(12);
        let degree = note.rem_euclid(12);

        let mut closest = self.scale[0];
        let mut min_dist = 12;
        for &s in &self.scale[..self.scale_size] {
            let dist = (s - degree).abs();
            if dist < min_dist {
                min_dist = dist;
                closest = s;
            }
        }
        octave * 12 + closest
    }

    /// Take one step and return the (possibly quantized) note.
    pub fn next(&mut self) -> i32 {
        let r = self.rng.gen::<f32>();
        let step = ((r - 0.5 + self.step_bias * 0.5) * 2.0 * self.max_step as f32) as i32;

        self.current_note = (self.current_note + step).clamp(self.min_note, self.max_note);

        if self.quantize && self.scale_size > 0 {
            self.quantize_to_scale(self.current_note)
        } else {
            self.current_note
        }
    }

    /// Fill a melody buffer.
    pub fn sequence(&mut self, notes: &mut [i32]) {
        for slot in notes.iter_mut() {
            *slot = self.next();
        }
    }
}
