//! Subtractive synth voice
//!
//! Two slightly detuned morphing oscillators plus a noise layer through one
//! state-variable lowpass, with exponential one-pole envelopes for
//! amplitude and filter cutoff. This is the engine's workhorse "just give
//! me a note" voice; richer patches come from the oscillator bank and
//! effect chains.

use crate::effects::svf::StateVariableFilter;
use crate::math::midi_to_freq;
use crate::oscillators::morph::MorphOscillator;
use crate::oscillators::noise::{NoiseGenerator, NoiseType};

/// Two-oscillator subtractive voice with filter and amp envelopes.
pub struct SubtractiveSynth {
    osc1: MorphOscillator,
    osc2: MorphOscillator,
    noise: NoiseGenerator,
    filter: StateVariableFilter,

    pub osc1_level: f32,
    pub osc2_level: f32,
    pub noise_level: f32,

    amp_attack: f32,
    amp_decay: f32,
    amp_sustain: f32,
    amp_release: f32,

    filter_attack: f32,
    filter_decay: f32,
    filter_sustain: f32,
    filter_release: f32,
    filter_env_amount: f32,
    filter_base_cutoff: f32,

    amp_env_level: f32,
    filter_env_level: f32,
    gate: bool,
    sample_rate: f32,
}

impl SubtractiveSynth {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = StateVariableFilter::new(sample_rate);
        filter.set_cutoff(1000.0);
        filter.set_resonance(0.5);

        Self {
            osc1: MorphOscillator::new(sample_rate),
            osc2: MorphOscillator::new(sample_rate),
            noise: NoiseGenerator::new(NoiseType::White, 0),
            filter,
            osc1_level: 0.5,
            osc2_level: 0.3,
            noise_level: 0.0,
            amp_attack: 0.01,
            amp_decay: 0.2,
            amp_sustain: 0.7,
            amp_release: 0.3,
            filter_attack: 0.05,
            filter_decay: 0.3,
            filter_sustain: 0.5,
            filter_release: 0.4,
            filter_env_amount: 2000.0,
            filter_base_cutoff: 500.0,
            amp_env_level: 0.0,
            filter_env_level: 0.0,
            gate: false,
            sample_rate,
        }
    }

    pub fn set_amp_envelope(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.amp_attack = attack.max(0.001);
        self.amp_decay = decay.max(0.001);
        self.amp_sustain = sustain.clamp(0.0, 1.0);
        self.amp_release = release.max(0.001);
    }

    pub fn set_filter_envelope(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.filter_attack = attack.max(0.001);
        self.filter_decay = decay.max(0.001);
        self.filter_sustain = sustain.clamp(0.0, 1.0);
        self.filter_release = release.max(0.001);
    }

    pub fn set_filter(&mut self, base_cutoff: f32, env_amount: f32, resonance: f32) {
        self.filter_base_cutoff = base_cutoff;
        self.filter_env_amount = env_amount;
        self.filter.set_resonance(resonance);
    }

    pub fn filter_env_amount(&self) -> f32 {
        self.filter_env_amount
    }

    pub fn is_gated(&self) -> bool {
        self.gate
    }

    /// Trigger a note; osc2 runs a hair sharp for width.
    pub fn note_on(&mut self, note: i32, _velocity: f32) {
        let freq = midi_to_freq(note as f32);
        self.osc1.set_frequency(freq);
        self.osc2.set_frequency(freq * 1.005);

        self.gate = true;
        self.amp_env_level = 0.0;
        self.filter_env_level = 0.0;
    }

    pub fn note_off(&mut self) {
        self.gate = false;
    }

    pub fn reset(&mut self) {
        self.gate = false;
        self.amp_env_level = 0.0;
        self.filter_env_level = 0.0;
        self.filter.reset();
        self.osc1.reset();
        self.osc2.reset();
    }

    pub fn process(&mut self) -> f32 {
        let mut osc = self.osc1_level * self.osc1.process();
        osc += self.osc2_level * self.osc2.process();
        osc += self.noise_level * self.noise.process();

        // One-pole envelope segments: pick target and coefficient by stage
        let (amp_target, amp_coef, filter_target, filter_coef) = if self.gate {
            let (at, ac) = if self.amp_env_level < 0.99 {
                (1.0, (-1.0 / (self.amp_attack * self.sample_rate)).exp())
            } else {
                (
                    self.amp_sustain,
                    (-1.0 / (self.amp_decay * self.sample_rate)).exp(),
                )
            };
            let (ft, fc) = if self.filter_env_level < 0.99 {
                (1.0, (-1.0 / (self.filter_attack * self.sample_rate)).exp())
            } else {
                (
                    self.filter_sustain,
                    (-1.0 / (self.filter_decay * self.sample_rate)).exp(),
                )
            };
            (at, ac, ft, fc)
        } else {
            (
                0.0,
                (-1.0 / (self.amp_release * self.sample_rate)).exp(),
                0.0,
                (-1.0 / (self.filter_release * self.sample_rate)).exp(),
            )
        };

        self.amp_env_level = amp_coef * (self.amp_env_level - amp_target) + amp_target;
        self.filter_env_level =
            filter_coef * (self.filter_env_level - filter_target) + filter_target;

        let cutoff = self.filter_base_cutoff + self.filter_env_level * self.filter_env_amount;
        self.filter.set_cutoff(cutoff);

        self.filter.process(osc) * self.amp_env_level
    }

    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process();
        }
    }
}
