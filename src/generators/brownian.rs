//! Brownian-motion value generator
//!
//! A momentum-damped random walk bounded to a [min, max] range with
//! reflective boundaries: touching an edge inverts and halves the velocity
//! instead of sticking. Optional attraction pulls the walk toward a target
//! value, turning it into a wandering parameter-automation source (filter
//! sweeps, pan drift, humanized velocity).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bounded momentum random walk.
pub struct BrownianMotion {
    position: f32,
    velocity: f32,
    min_val: f32,
    max_val: f32,
    step_size: f32,
    momentum: f32,
    attraction: f32,
    target: f32,
    rng: StdRng,
}

impl BrownianMotion {
    pub fn new(min_val: f32, max_val: f32, seed: u64) -> Self {
        let (min_val, max_val) = if min_val <= max_val {
            (min_val, max_val)
        } else {
            (max_val, min_val)
        };
        Self {
            position: (min_val + max_val) * 0.5,
            velocity: 0.0,
            min_val,
            max_val,
            step_size: (max_val - min_val) * 0.1,
            momentum: 0.5,
            attraction: 0.0,
            target: (min_val + max_val) * 0.5,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Random step magnitude per call.
    pub fn set_step_size(&mut self, step: f32) {
        self.step_size = step.max(0.0);
    }

    /// Momentum in [0, 1): how much of the previous velocity survives.
    pub fn set_momentum(&mut self, momentum: f32) {
        self.momentum = momentum.clamp(0.0, 0.99);
    }

    /// Pull strength toward `target` (0 disables).
    pub fn set_attraction(&mut self, target: f32, strength: f32) {
        self.target = target;
        self.attraction = strength.max(0.0);
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    /// Advance one step and return the new position.
    pub fn next(&mut self) -> f32 {
        let mut accel = (self.rng.gen::<f32>() - 0.5) * 2.0 * self.step_size;

        if self.attraction > 0.0 {
            accel += (self.target - self.position) * self.attraction;
        }

        self.velocity = self.velocity * self.momentum + accel * (1.0 - self.momentum);
        self.position += self.velocity;

        // Reflective boundaries: invert and attenuate velocity
        if self.position < self.min_val {
            self.position = self.min_val;
            self.velocity = -self.velocity * 0.5;
        }
        if self.position > self.max_val {
            self.position = self.max_val;
            self.velocity = -self.velocity * 0.5;
        }

        self.position
    }
}
