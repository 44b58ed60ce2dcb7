//! Stochastic step sequencer
//!
//! A fixed-length loop of steps, each with an independent trigger
//! probability, note, velocity, and duration. A global density control
//! scales every step's probability at once, and triggered velocities get a
//! bounded random variance so repeats breathe.

use crate::math::clamp;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MAX_STEPS: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub probability: f32,
    pub note: i32,
    pub velocity: f32,
    pub duration: f32,
}

impl Default for Step {
    fn default() -> Self {
        Self {
            probability: 0.5,
            note: 60,
            velocity: 0.8,
            duration: 1.0,
        }
    }
}

/// A fired step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepEvent {
    pub note: i32,
    pub velocity: f32,
    pub duration: f32,
}

/// Probability-gated step sequencer.
pub struct StochasticSequencer {
    steps: [Step; MAX_STEPS],
    num_steps: usize,
    current_step: usize,
    density: f32,
    velocity_variance: f32,
    rng: StdRng,
}

impl StochasticSequencer {
    pub fn new(num_steps: usize, seed: u64) -> Self {
        Self {
            steps: [Step::default(); MAX_STEPS],
            num_steps: num_steps.clamp(1, MAX_STEPS),
            current_step: 0,
            density: 1.0,
            velocity_variance: 0.1,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    pub fn set_step(&mut self, index: usize, step: Step) {
        if index < self.num_steps {
            self.steps[index] = Step {
                probability: clamp(step.probability, 0.0, 1.0),
                velocity: clamp(step.velocity, 0.0, 1.0),
                ..step
            };
        }
    }

    /// Global probability multiplier in [0, 1].
    pub fn set_density(&mut self, density: f32) {
        self.density = clamp(density, 0.0, 1.0);
    }

    pub fn set_velocity_variance(&mut self, variance: f32) {
        self.velocity_variance = clamp(variance, 0.0, 1.0);
    }

    pub fn reset(&mut self) {
        self.current_step = 0;
    }

    /// Advance to the next step; returns the event if the step fired.
    pub fn advance(&mut self) -> Option<StepEvent> {
        let step = self.steps[self.current_step];
        self.current_step = (self.current_step + 1) % self.num_steps;

        let adjusted = step.probability * self.density;
        if self.rng.gen::<f32>() > adjusted {
            return None;
        }

        let velocity = clamp(
            step.velocity + (self.rng.gen::<f32>() - 0.5) * self.velocity_variance,
            0.0,
            1.0,
        );

        Some(StepEvent {
            note: step.note,
            velocity,
            duration: step.duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certain_steps_always_fire() {
        let mut seq = StochasticSequencer::new(8, 1);
        for i in 0..8 {
            seq.set_step(
                i,
                Step {
                    probability: 1.0,
                    note: 60 + i as i32,
                    ..Step::default()
                },
            );
        }
        for round in 0..4 {
            for i in 0..8 {
                let event = seq.advance();
                assert!(event.is_some(), "p=1 step must fire");
                assert_eq!(
                    event.unwrap().note,
                    60 + i as i32,
                    "wrong note at round {} step {}",
                    round,
                    i
                );
            }
        }
    }

    #[test]
    fn test_zero_density_silences_everything() {
        let mut seq = StochasticSequencer::new(16, 2);
        seq.set_density(0.0);
        for _ in 0..1000 {
            assert_eq!(seq.advance(), None);
        }
    }

    #[test]
    fn test_trigger_rate_tracks_probability() {
        let mut seq = StochasticSequencer::new(4, 42);
        for i in 0..4 {
            seq.set_step(
                i,
                Step {
                    probability: 0.25,
                    ..Step::default()
                },
            );
        }
        let fired = (0..40_000).filter(|_| seq.advance().is_some()).count();
        let rate = fired as f32 / 40_000.0;
        assert!(
            (rate - 0.25).abs() < 0.02,
            "trigger rate {} should approximate 0.25",
            rate
        );
    }

    #[test]
    fn test_velocity_variance_bounded() {
        let mut seq = StochasticSequencer::new(1, 9);
        seq.set_step(
            0,
            Step {
                probability: 1.0,
                velocity: 0.9,
                ..Step::default()
            },
        );
        seq.set_velocity_variance(0.5);
        for _ in 0..5000 {
            let event = seq.advance().unwrap();
            assert!((0.0..=1.0).contains(&event.velocity));
            assert!((event.velocity - 0.9).abs() <= 0.25 + 1e-6);
        }
    }

    #[test]
    fn test_deterministic() {
        let mut a = StochasticSequencer::new(7, 123);
        let mut b = StochasticSequencer::new(7, 123);
        for _ in 0..500 {
            assert_eq!(a.advance(), b.advance());
        }
    }
}
