//! Morphing oscillator - two waveforms blended from one phase accumulator
//!
//! Generates two of the five basic waveforms from a single phase in [0, 1)
//! and linearly interpolates between them by a morph amount. Morphing at
//! audio rate is glitch-free because both waveforms share the same phase.

use crate::math::{clamp, lerp, TWO_PI};

/// Basic waveform shapes available to the morphing oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Saw,
    Square,
    Triangle,
    Pulse,
}

/// Evaluate a waveform at `phase` in [0, 1). `pulse_width` only affects
/// [`Waveform::Pulse`].
#[inline]
fn generate_waveform(wave: Waveform, phase: f32, pulse_width: f32) -> f32 {
    match wave {
        Waveform::Sine => (phase * TWO_PI).sin(),
        Waveform::Saw => 2.0 * phase - 1.0,
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => {
            if phase < 0.5 {
                4.0 * phase - 1.0
            } else {
                3.0 - 4.0 * phase
            }
        }
        Waveform::Pulse => {
            if phase < pulse_width {
                1.0
            } else {
                -1.0
            }
        }
    }
}

/// Two-waveform morphing oscillator.
///
/// Defaults: sine morphing to saw, morph 0.0 (pure sine), 440 Hz,
/// pulse width 0.5, no detune.
pub struct MorphOscillator {
    waveform_a: Waveform,
    waveform_b: Waveform,
    morph: f32,
    phase: f32,
    frequency: f32,
    detune_cents: f32,
    pulse_width: f32,
    sample_rate: f32,
    phase_increment: f32,
}

impl MorphOscillator {
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            waveform_a: Waveform::Sine,
            waveform_b: Waveform::Saw,
            morph: 0.0,
            phase: 0.0,
            frequency: 440.0,
            detune_cents: 0.0,
            pulse_width: 0.5,
            sample_rate,
            phase_increment: 0.0,
        };
        osc.update_increment();
        osc
    }

    fn update_increment(&mut self) {
        let detune_ratio = 2.0_f32.powf(self.detune_cents / 1200.0);
        self.phase_increment = self.frequency * detune_ratio / self.sample_rate;
    }

    pub fn set_frequency(&mut self, freq: f32) {
        self.frequency = freq;
        self.update_increment();
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Detune in cents, folded into the phase increment.
    pub fn set_detune(&mut self, cents: f32) {
        self.detune_cents = cents;
        self.update_increment();
    }

    pub fn set_waveforms(&mut self, a: Waveform, b: Waveform) {
        self.waveform_a = a;
        self.waveform_b = b;
    }

    /// Morph blend: 0.0 = waveform A, 1.0 = waveform B. Clamped.
    pub fn set_morph(&mut self, morph: f32) {
        self.morph = clamp(morph, 0.0, 1.0);
    }

    pub fn set_pulse_width(&mut self, width: f32) {
        self.pulse_width = clamp(width, 0.0, 1.0);
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Advance one sample and return it.
    pub fn process(&mut self) -> f32 {
        let a = generate_waveform(self.waveform_a, self.phase, self.pulse_width);
        let b = generate_waveform(self.waveform_b, self.phase, self.pulse_width);
        let out = lerp(a, b, self.morph);

        self.phase += self.phase_increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }

    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process();
        }
    }
}
