//! Granular synthesis engine
//!
//! A fixed pool of 128 grains reads short, enveloped fragments from a
//! caller-supplied sample buffer. A spawn timer accumulates once per sample
//! and fires every `sample_rate / density` samples, claiming the first free
//! grain with position, size, pitch, pan, and amplitude each jittered
//! around their base values by a spread parameter. Grains advance their own
//! read position (scaled by pitch ratio, wrapped over the source) and
//! deactivate when their envelope phase reaches 1.0.
//!
//! With no source buffer loaded the engine degrades to silence - an audio
//! thread must never be interrupted for a missing sample.

use crate::math::{clamp, TWO_PI};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MAX_GRAINS: usize = 128;

/// Grain amplitude envelope shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrainEnvelope {
    Gaussian,
    Hann,
    Trapezoid,
}

fn grain_envelope(shape: GrainEnvelope, phase: f32) -> f32 {
    match shape {
        GrainEnvelope::Gaussian => (-8.0 * (phase - 0.5) * (phase - 0.5)).exp(),
        GrainEnvelope::Hann => 0.5 * (1.0 - (TWO_PI * phase).cos()),
        GrainEnvelope::Trapezoid => {
            if phase < 0.1 {
                phase / 0.1
            } else if phase > 0.9 {
                (1.0 - phase) / 0.1
            } else {
                1.0
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Grain {
    start_pos: usize,
    current_pos: usize,
    length: usize,
    phase: f32,
    pitch_ratio: f32,
    pan: f32,
    amplitude: f32,
    envelope: GrainEnvelope,
    active: bool,
}

impl Default for Grain {
    fn default() -> Self {
        Self {
            start_pos: 0,
            current_pos: 0,
            length: 0,
            phase: 0.0,
            pitch_ratio: 1.0,
            pan: 0.5,
            amplitude: 0.0,
            envelope: GrainEnvelope::Hann,
            active: false,
        }
    }
}

/// Fixed-pool granular engine over a loaded source buffer.
pub struct GranularEngine {
    grains: [Grain; MAX_GRAINS],
    source: Vec<f32>,
    spawn_timer: f32,
    position: f32,
    position_spread: f32,
    grain_size: f32,
    grain_size_spread: f32,
    density: f32,
    pitch: f32,
    pitch_spread: f32,
    pan_spread: f32,
    envelope: GrainEnvelope,
    sample_rate: f32,
    rng: StdRng,
}

impl GranularEngine {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        Self {
            grains: [Grain::default(); MAX_GRAINS],
            source: Vec::new(),
            spawn_timer: 0.0,
            position: 0.5,
            position_spread: 0.1,
            grain_size: 0.05,
            grain_size_spread: 0.02,
            density: 20.0,
            pitch: 1.0,
            pitch_spread: 0.0,
            pan_spread: 0.5,
            envelope: GrainEnvelope::Hann,
            sample_rate,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Copy a decoded sample buffer into the engine (init-time allocation).
    /// Returns false for an empty buffer.
    pub fn load_buffer(&mut self, data: &[f32]) -> bool {
        if data.is_empty() {
            return false;
        }
        self.source = data.to_vec();
        true
    }

    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    /// Normalized read position in the source, [0, 1].
    pub fn set_position(&mut self, position: f32) {
        self.position = clamp(position, 0.0, 1.0);
    }

    pub fn set_position_spread(&mut self, spread: f32) {
        self.position_spread = clamp(spread, 0.0, 1.0);
    }

    /// Grain length in seconds.
    pub fn set_grain_size(&mut self, size: f32) {
        self.grain_size = size.max(0.001);
    }

    pub fn set_grain_size_spread(&mut self, spread: f32) {
        self.grain_size_spread = spread.max(0.0);
    }

    /// Grains per second.
    pub fn set_density(&mut self, density: f32) {
        self.density = clamp(density, 0.1, 1000.0);
    }

    /// Playback rate of each grain (1.0 = original pitch).
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch;
    }

    pub fn set_pitch_spread(&mut self, spread: f32) {
        self.pitch_spread = spread.max(0.0);
    }

    pub fn set_pan_spread(&mut self, spread: f32) {
        self.pan_spread = clamp(spread, 0.0, 1.0);
    }

    pub fn set_envelope(&mut self, envelope: GrainEnvelope) {
        self.envelope = envelope;
    }

    pub fn active_grains(&self) -> usize {
        self.grains.iter().filter(|g| g.active).count()
    }

    pub fn reset(&mut self) {
        self.grains = [Grain::default(); MAX_GRAINS];
        self.spawn_timer = 0.0;
    }

    fn spawn_grain(&mut self) {
        let slot = match self.grains.iter().position(|g| !g.active) {
            Some(i) => i,
            None => return, // pool exhausted: skip, never steal a live grain
        };

        let jitter = |rng: &mut StdRng| rng.gen::<f32>() - 0.5;

        let pos = clamp(
            self.position + jitter(&mut self.rng) * self.position_spread,
            0.0,
            1.0,
        );
        let size = (self.grain_size + jitter(&mut self.rng) * self.grain_size_spread).max(0.001);
        let pitch = self.pitch + jitter(&mut self.rng) * self.pitch_spread;
        let pan = clamp(0.5 + jitter(&mut self.rng) * self.pan_spread, 0.0, 1.0);
        let amplitude = 0.8 + self.rng.gen::<f32>() * 0.2;

        self.grains[slot] = Grain {
            start_pos: (pos * self.source.len() as f32) as usize,
            current_pos: 0,
            length: ((size * self.sample_rate) as usize).max(1),
            phase: 0.0,
            pitch_ratio: pitch,
            pan,
            amplitude,
            envelope: self.envelope,
            active: true,
        };
    }

    /// Render one stereo block, summing all active grains.
    pub fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        if self.source.is_empty() {
            left[..frames].fill(0.0);
            right[..frames].fill(0.0);
            return;
        }

        let spawn_interval = self.sample_rate / self.density;
        let source_len = self.source.len();

        for i in 0..frames {
            let mut out_l = 0.0;
            let mut out_r = 0.0;

            self.spawn_timer += 1.0;
            if self.spawn_timer >= spawn_interval {
                self.spawn_grain();
                self.spawn_timer -= spawn_interval;
            }

            for grain in self.grains.iter_mut() {
                if !grain.active {
                    continue;
                }

                let read_pos =
                    grain.start_pos as f32 + grain.current_pos as f32 * grain.pitch_ratio;
                let idx = (read_pos.max(0.0) as usize) % source_len;

                let env = grain_envelope(grain.envelope, grain.phase);
                let sample = self.source[idx] * env * grain.amplitude;

                out_l += sample * (1.0 - grain.pan);
                out_r += sample * grain.pan;

                grain.current_pos += 1;
                grain.phase = grain.current_pos as f32 / grain.length as f32;
                if grain.current_pos >= grain.length {
                    grain.active = false;
                }
            }

            left[i] = out_l;
            right[i] = out_r;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_engine(seed: u64) -> GranularEngine {
        let mut engine = GranularEngine::new(48000.0, seed);
        let source: Vec<f32> = (0..48000)
            .map(|i| (i as f32 * 440.0 * TWO_PI / 48000.0).sin())
            .collect();
        assert!(engine.load_buffer(&source));
        engine
    }

    #[test]
    fn test_no_source_degrades_to_silence() {
        let mut engine = GranularEngine::new(48000.0, 1);
        let mut l = vec![0.5; 256];
        let mut r = vec![0.5; 256];
        engine.process_stereo(&mut l, &mut r);
        assert!(l.iter().all(|&s| s == 0.0));
        assert!(r.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_grains_produce_sound() {
        let mut engine = loaded_engine(42);
        engine.set_density(50.0);
        let mut l = vec![0.0; 48000];
        let mut r = vec![0.0; 48000];
        engine.process_stereo(&mut l, &mut r);
        let energy: f32 = l.iter().map(|s| s * s).sum();
        assert!(energy > 1.0, "granular engine should produce audio");
        assert!(l.iter().chain(r.iter()).all(|s| s.is_finite()));
    }

    #[test]
    fn test_density_controls_spawn_rate() {
        // With a short grain size, the steady-state active count tracks
        // density * grain_size.
        let count_at = |density: f32| {
            let mut engine = loaded_engine(7);
            engine.set_density(density);
            engine.set_grain_size(0.02);
            engine.set_grain_size_spread(0.0);
            let mut l = vec![0.0; 24000];
            let mut r = vec![0.0; 24000];
            engine.process_stereo(&mut l, &mut r);
            engine.active_grains()
        };
        assert!(
            count_at(200.0) > count_at(20.0),
            "higher density should keep more grains alive"
        );
    }

    #[test]
    fn test_pool_never_exceeds_capacity() {
        let mut engine = loaded_engine(3);
        engine.set_density(1000.0);
        engine.set_grain_size(2.0); // grains outlive the spawn interval
        let mut l = vec![0.0; 48000];
        let mut r = vec![0.0; 48000];
        engine.process_stereo(&mut l, &mut r);
        assert!(engine.active_grains() <= MAX_GRAINS);
        assert!(l.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_grains_expire() {
        let mut engine = loaded_engine(5);
        engine.set_density(10.0);
        engine.set_grain_size(0.01);
        let mut l = vec![0.0; 4800];
        let mut r = vec![0.0; 4800];
        engine.process_stereo(&mut l, &mut r);
        let mid_count = engine.active_grains();

        // Stop spawning by dropping density to the floor and render on
        engine.set_density(0.1);
        let mut l2 = vec![0.0; 48000];
        let mut r2 = vec![0.0; 48000];
        engine.process_stereo(&mut l2, &mut r2);
        assert!(
            engine.active_grains() <= mid_count.max(1),
            "grains should deactivate when their envelope completes"
        );
    }

    #[test]
    fn test_deterministic_given_seed() {
        let mut a = loaded_engine(99);
        let mut b = loaded_engine(99);
        let mut la = vec![0.0; 4096];
        let mut ra = vec![0.0; 4096];
        let mut lb = vec![0.0; 4096];
        let mut rb = vec![0.0; 4096];
        a.process_stereo(&mut la, &mut ra);
        b.process_stereo(&mut lb, &mut rb);
        assert_eq!(la, lb);
        assert_eq!(ra, rb);
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let mut engine = GranularEngine::new(48000.0, 1);
        assert!(!engine.load_buffer(&[]));
    }
}
