//! Gesture-driven envelope and filter control
//!
//! Maps a normalized hand/cursor position onto synthesis parameters.
//! [`GestureEnvelope`] turns x/y/z into ADSR times (x = attack, y = decay
//! and sustain, z = release) driving an exponential one-pole envelope;
//! [`MotionFilter`] smooths x/y and maps them onto filter cutoff
//! (logarithmic) and resonance (linear).

use crate::math::clamp;

/// Gesture-shaped exponential envelope.
pub struct GestureEnvelope {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
    attack_coef: f32,
    decay_coef: f32,
    release_coef: f32,
    current_level: f32,
    gate: bool,
    sample_rate: f32,
}

impl GestureEnvelope {
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            attack: 0.01,
            decay: 0.2,
            sustain: 0.7,
            release: 0.3,
            attack_coef: 0.0,
            decay_coef: 0.0,
            release_coef: 0.0,
            current_level: 0.0,
            gate: false,
            sample_rate,
        };
        env.update(0.0, 0.7, 0.3);
        env
    }

    /// Map a normalized gesture position onto the envelope shape:
    /// x -> attack (left fast, right slow), y -> decay and sustain,
    /// z -> release.
    pub fn update(&mut self, x: f32, y: f32, z: f32) {
        let x = clamp(x, 0.0, 1.0);
        let y = clamp(y, 0.0, 1.0);
        let z = clamp(z, 0.0, 1.0);

        self.attack = 0.001 + x * 0.5;
        self.decay = 0.05 + (1.0 - y) * 0.5;
        self.sustain = y;
        self.release = 0.01 + z * 1.0;

        self.attack_coef = (-1.0 / (self.attack * self.sample_rate)).exp();
        self.decay_coef = (-1.0 / (self.decay * self.sample_rate)).exp();
        self.release_coef = (-1.0 / (self.release * self.sample_rate)).exp();
    }

    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    pub fn gate_on(&mut self) {
        self.gate = true;
    }

    pub fn gate_off(&mut self) {
        self.gate = false;
    }

    pub fn level(&self) -> f32 {
        self.current_level
    }

    /// Advance one sample of the envelope.
    pub fn process(&mut self) -> f32 {
        if self.gate {
            if self.current_level < self.sustain {
                // Attack toward full level
                self.current_level = 1.0 - self.attack_coef * (1.0 - self.current_level);
                if self.current_level >= 0.99 {
                    self.current_level = 1.0;
                }
            } else {
                // Decay toward sustain
                self.current_level =
                    self.sustain + self.decay_coef * (self.current_level - self.sustain);
            }
        } else {
            self.current_level *= self.release_coef;
        }
        self.current_level
    }
}

/// Smoothed motion-to-filter mapper.
pub struct MotionFilter {
    x: f32,
    y: f32,
    smoothing: f32,
    cutoff_range: (f32, f32),
    resonance_range: (f32, f32),
}

impl MotionFilter {
    pub fn new() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            smoothing: 0.9,
            cutoff_range: (100.0, 8000.0),
            resonance_range: (0.1, 0.9),
        }
    }

    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = clamp(smoothing, 0.0, 0.999);
    }

    pub fn set_cutoff_range(&mut self, min_hz: f32, max_hz: f32) {
        self.cutoff_range = (min_hz.max(1.0), max_hz.max(min_hz.max(1.0)));
    }

    pub fn set_resonance_range(&mut self, min: f32, max: f32) {
        self.resonance_range = (min, max.max(min));
    }

    /// Feed a new normalized position; movement is exponentially smoothed.
    pub fn update(&mut self, x: f32, y: f32) {
        let x = clamp(x, 0.0, 1.0);
        let y = clamp(y, 0.0, 1.0);
        self.x = self.smoothing * self.x + (1.0 - self.smoothing) * x;
        self.y = self.smoothing * self.y + (1.0 - self.smoothing) * y;
    }

    /// Current (cutoff, resonance): log-mapped cutoff, linear resonance.
    pub fn params(&self) -> (f32, f32) {
        let log_min = self.cutoff_range.0.ln();
        let log_max = self.cutoff_range.1.ln();
        let cutoff = (log_min + self.x * (log_max - log_min)).exp();

        let resonance =
            self.resonance_range.0 + self.y * (self.resonance_range.1 - self.resonance_range.0);
        (cutoff, resonance)
    }
}

impl Default for MotionFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_rises_and_releases() {
        let mut env = GestureEnvelope::new(48000.0);
        env.update(0.0, 0.7, 0.1); // fast attack
        env.gate_on();
        for _ in 0..4800 {
            env.process();
        }
        assert!(env.level() > 0.6, "gated envelope should rise: {}", env.level());

        env.gate_off();
        for _ in 0..48000 {
            env.process();
        }
        assert!(env.level() < 0.01, "released envelope should fall: {}", env.level());
    }

    #[test]
    fn test_envelope_bounded() {
        let mut env = GestureEnvelope::new(48000.0);
        env.update(1.0, 1.0, 1.0);
        env.gate_on();
        for _ in 0..96_000 {
            let level = env.process();
            assert!((0.0..=1.0).contains(&level), "envelope escaped [0,1]: {}", level);
        }
    }

    #[test]
    fn test_gesture_maps_to_adsr() {
        let mut slow = GestureEnvelope::new(48000.0);
        slow.update(1.0, 0.5, 0.5);
        let mut fast = GestureEnvelope::new(48000.0);
        fast.update(0.0, 0.5, 0.5);

        slow.gate_on();
        fast.gate_on();
        for _ in 0..480 {
            slow.process();
            fast.process();
        }
        assert!(
            fast.level() > slow.level(),
            "x=0 should attack faster than x=1"
        );
    }

    #[test]
    fn test_motion_filter_log_mapping() {
        let mut filter = MotionFilter::new();
        filter.set_smoothing(0.0); // follow instantly for the test

        filter.update(0.0, 0.0);
        let (lo_cut, lo_res) = filter.params();
        assert!((lo_cut - 100.0).abs() < 1.0);
        assert!((lo_res - 0.1).abs() < 1e-3);

        filter.update(1.0, 1.0);
        let (hi_cut, hi_res) = filter.params();
        assert!((hi_cut - 8000.0).abs() < 10.0);
        assert!((hi_res - 0.9).abs() < 1e-3);

        // Log midpoint of 100..8000 is ~894, far below the linear midpoint
        filter.update(0.5, 0.5);
        filter.update(0.5, 0.5);
        let (mid_cut, _) = filter.params();
        assert!(
            (mid_cut - 894.0).abs() < 20.0,
            "cutoff should map logarithmically: {}",
            mid_cut
        );
    }

    #[test]
    fn test_motion_smoothing_lags() {
        let mut filter = MotionFilter::new();
        filter.set_smoothing(0.95);
        filter.update(1.0, 1.0);
        let (cutoff, _) = filter.params();
        assert!(cutoff < 1000.0, "smoothed motion must lag a jump: {}", cutoff);
    }
}
