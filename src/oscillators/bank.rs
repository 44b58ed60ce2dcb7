//! Oscillator bank - fixed 32-slot arena of typed oscillators
//!
//! Each slot owns one oscillator (a closed sum over the seven families) plus
//! gain and pan. `add` claims the first free slot and builds a fresh
//! instance, so reuse can never inherit a previous tenant's state; `remove`
//! frees a slot without disturbing its neighbors. `process_stereo` zeroes
//! the output buffers first - silence is the correct output of an empty bank.

use super::additive::AdditiveOscillator;
use super::chaos::ChaosOscillator;
use super::fm::FmOscillator;
use super::fractal::FractalOscillator;
use super::morph::MorphOscillator;
use super::noise::{NoiseGenerator, NoiseType};
use super::wavetable::WavetableOscillator;
use crate::math::clamp;

pub const MAX_OSCILLATORS: usize = 32;

/// Selector used when allocating a bank slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorKind {
    Morph,
    Chaos,
    Wavetable,
    Fm,
    Additive,
    Noise,
    Fractal,
}

/// One oscillator instance; the closed sum type behind every bank slot.
pub enum Oscillator {
    Morph(MorphOscillator),
    Chaos(ChaosOscillator),
    Wavetable(WavetableOscillator),
    Fm(FmOscillator),
    Additive(AdditiveOscillator),
    Noise(NoiseGenerator),
    Fractal(FractalOscillator),
}

impl Oscillator {
    fn new(kind: OscillatorKind, sample_rate: f32) -> Self {
        match kind {
            OscillatorKind::Morph => Oscillator::Morph(MorphOscillator::new(sample_rate)),
            OscillatorKind::Chaos => Oscillator::Chaos(ChaosOscillator::new(sample_rate)),
            OscillatorKind::Wavetable => {
                Oscillator::Wavetable(WavetableOscillator::new(sample_rate))
            }
            OscillatorKind::Fm => Oscillator::Fm(FmOscillator::new(sample_rate, 4)),
            OscillatorKind::Additive => Oscillator::Additive(AdditiveOscillator::new(sample_rate)),
            OscillatorKind::Noise => Oscillator::Noise(NoiseGenerator::new(NoiseType::White, 0)),
            OscillatorKind::Fractal => Oscillator::Fractal(FractalOscillator::new(sample_rate)),
        }
    }

    pub fn kind(&self) -> OscillatorKind {
        match self {
            Oscillator::Morph(_) => OscillatorKind::Morph,
            Oscillator::Chaos(_) => OscillatorKind::Chaos,
            Oscillator::Wavetable(_) => OscillatorKind::Wavetable,
            Oscillator::Fm(_) => OscillatorKind::Fm,
            Oscillator::Additive(_) => OscillatorKind::Additive,
            Oscillator::Noise(_) => OscillatorKind::Noise,
            Oscillator::Fractal(_) => OscillatorKind::Fractal,
        }
    }

    pub fn set_frequency(&mut self, freq: f32) {
        match self {
            Oscillator::Morph(o) => o.set_frequency(freq),
            Oscillator::Chaos(_) => {} // frequency-free; runs on its own clock
            Oscillator::Wavetable(o) => o.set_frequency(freq),
            Oscillator::Fm(o) => o.set_frequency(freq),
            Oscillator::Additive(o) => o.set_frequency(freq),
            Oscillator::Noise(_) => {}
            Oscillator::Fractal(o) => o.set_frequency(freq),
        }
    }

    pub fn process(&mut self) -> f32 {
        match self {
            Oscillator::Morph(o) => o.process(),
            Oscillator::Chaos(o) => o.process(),
            Oscillator::Wavetable(o) => o.process(),
            Oscillator::Fm(o) => o.process(),
            Oscillator::Additive(o) => o.process(),
            Oscillator::Noise(o) => o.process(),
            Oscillator::Fractal(o) => o.process(),
        }
    }
}

struct Slot {
    osc: Oscillator,
    gain: f32,
    pan: f32,
}

/// Fixed-capacity bank of oscillator slots mixed to stereo.
pub struct OscillatorBank {
    slots: Vec<Option<Slot>>,
    sample_rate: f32,
}

impl OscillatorBank {
    pub fn new(sample_rate: f32) -> Self {
        let mut slots = Vec::with_capacity(MAX_OSCILLATORS);
        slots.resize_with(MAX_OSCILLATORS, || None);
        Self { slots, sample_rate }
    }

    /// Allocate the first free slot for a fresh oscillator of `kind`.
    /// Returns `None` when all slots are taken.
    pub fn add(&mut self, kind: OscillatorKind) -> Option<usize> {
        let index = self.slots.iter().position(|s| s.is_none())?;
        self.slots[index] = Some(Slot {
            osc: Oscillator::new(kind, self.sample_rate),
            gain: 1.0,
            pan: 0.5,
        });
        Some(index)
    }

    /// Free a slot. Other slots keep their state and indices.
    pub fn remove(&mut self, slot: usize) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = None;
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Direct access to a slot's oscillator for type-specific setters.
    pub fn oscillator_mut(&mut self, slot: usize) -> Option<&mut Oscillator> {
        self.slots.get_mut(slot)?.as_mut().map(|s| &mut s.osc)
    }

    pub fn set_frequency(&mut self, slot: usize, freq: f32) {
        if let Some(osc) = self.oscillator_mut(slot) {
            osc.set_frequency(freq);
        }
    }

    pub fn set_gain(&mut self, slot: usize, gain: f32) {
        if let Some(Some(s)) = self.slots.get_mut(slot) {
            s.gain = gain.max(0.0);
        }
    }

    /// Pan in [0, 1]: 0 = hard left, 0.5 = center, 1 = hard right.
    pub fn set_pan(&mut self, slot: usize, pan: f32) {
        if let Some(Some(s)) = self.slots.get_mut(slot) {
            s.pan = clamp(pan, 0.0, 1.0);
        }
    }

    /// Sum all active slots into the stereo pair. Buffers are zeroed first.
    pub fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        left[..frames].fill(0.0);
        right[..frames].fill(0.0);

        for slot in self.slots.iter_mut().flatten() {
            let gain_l = slot.gain * (1.0 - slot.pan);
            let gain_r = slot.gain * slot.pan;
            for i in 0..frames {
                let sample = slot.osc.process();
                left[i] += sample * gain_l;
                right[i] += sample * gain_r;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bank_outputs_silence() {
        let mut bank = OscillatorBank::new(48000.0);
        let mut left = vec![1.0; 128];
        let mut right = vec![-1.0; 128];
        bank.process_stereo(&mut left, &mut right);
        assert!(left.iter().all(|&s| s == 0.0), "empty bank must zero the buffer");
        assert!(right.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_add_fills_first_free_slot() {
        let mut bank = OscillatorBank::new(48000.0);
        assert_eq!(bank.add(OscillatorKind::Morph), Some(0));
        assert_eq!(bank.add(OscillatorKind::Noise), Some(1));
        bank.remove(0);
        // Freed slot is reused first
        assert_eq!(bank.add(OscillatorKind::Fm), Some(0));
        assert_eq!(bank.active_count(), 2);
    }

    #[test]
    fn test_capacity_exhaustion_returns_none() {
        let mut bank = OscillatorBank::new(48000.0);
        for i in 0..MAX_OSCILLATORS {
            assert_eq!(bank.add(OscillatorKind::Morph), Some(i));
        }
        assert_eq!(bank.add(OscillatorKind::Morph), None);
    }

    #[test]
    fn test_removal_preserves_other_slots() {
        let mut bank = OscillatorBank::new(48000.0);
        let a = bank.add(OscillatorKind::Morph).unwrap();
        let b = bank.add(OscillatorKind::Morph).unwrap();
        bank.set_frequency(a, 100.0);
        bank.set_frequency(b, 200.0);

        // Render, remove a, render again; b must continue seamlessly
        let mut l = vec![0.0; 64];
        let mut r = vec![0.0; 64];
        bank.process_stereo(&mut l, &mut r);
        bank.remove(a);
        bank.process_stereo(&mut l, &mut r);
        assert!(l.iter().any(|&s| s.abs() > 0.0), "remaining slot still sounds");
    }

    #[test]
    fn test_pan_law() {
        let mut bank = OscillatorBank::new(48000.0);
        let slot = bank.add(OscillatorKind::Morph).unwrap();
        bank.set_pan(slot, 0.0);

        let mut l = vec![0.0; 256];
        let mut r = vec![0.0; 256];
        bank.process_stereo(&mut l, &mut r);
        let left_energy: f32 = l.iter().map(|s| s * s).sum();
        let right_energy: f32 = r.iter().map(|s| s * s).sum();
        assert!(left_energy > 0.0);
        assert_eq!(right_energy, 0.0, "hard-left pan must silence the right channel");
    }

    #[test]
    fn test_reused_slot_state_is_fresh() {
        let mut bank = OscillatorBank::new(48000.0);
        let slot = bank.add(OscillatorKind::Morph).unwrap();
        bank.set_frequency(slot, 440.0);

        let mut l1 = vec![0.0; 256];
        let mut r1 = vec![0.0; 256];
        bank.process_stereo(&mut l1, &mut r1);

        // Replace with a fresh oscillator of the same type: phase restarts
        bank.remove(slot);
        let slot2 = bank.add(OscillatorKind::Morph).unwrap();
        assert_eq!(slot, slot2);
        bank.set_frequency(slot2, 440.0);

        let mut l2 = vec![0.0; 256];
        let mut r2 = vec![0.0; 256];
        bank.process_stereo(&mut l2, &mut r2);
        assert_eq!(l1, l2, "reinitialized slot must restart from initial state");
    }
}
