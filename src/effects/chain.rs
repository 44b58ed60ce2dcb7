//! Effect chain - ordered, bounded list of effect slots
//!
//! Up to sixteen slots, processed strictly in slot order over a stereo
//! buffer. Each slot owns its effect's full state plus a bypass flag and a
//! wet/dry mix; removing a slot shifts later slots down without touching
//! their state, and a freed position is always rebuilt from scratch on the
//! next `add` (no stale state can leak between effect types).
//!
//! Sample-serial effects (filters, waveshaper, phaser, bitcrusher) carry an
//! independent state instance per channel so the left and right signals
//! never contaminate each other's filter memory. Inherently stereo effects
//! (delay, reverb, chorus) and the stereo-linked compressor process the
//! pair directly.

use super::bitcrusher::Bitcrusher;
use super::chorus::Chorus;
use super::compressor::Compressor;
use super::delay::MultiTapDelay;
use super::formant::FormantFilter;
use super::moog::MoogFilter;
use super::phaser::Phaser;
use super::reverb::Reverb;
use super::svf::StateVariableFilter;
use super::waveshaper::Waveshaper;
use crate::math::{clamp, lerp};

pub const MAX_EFFECTS: usize = 16;

/// Selector used when loading a chain slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Filter,
    MoogFilter,
    Formant,
    Delay,
    Reverb,
    Waveshaper,
    Compressor,
    Chorus,
    Phaser,
    Bitcrusher,
}

/// One effect instance; mono algorithms hold a left/right state pair.
pub enum Effect {
    Filter(StateVariableFilter, StateVariableFilter),
    MoogFilter(MoogFilter, MoogFilter),
    Formant(FormantFilter, FormantFilter),
    Delay(MultiTapDelay),
    Reverb(Reverb),
    Waveshaper(Waveshaper, Waveshaper),
    Compressor(Compressor),
    Chorus(Chorus),
    Phaser(Phaser, Phaser),
    Bitcrusher(Bitcrusher, Bitcrusher),
}

impl Effect {
    pub fn new(kind: EffectKind, sample_rate: f32) -> Self {
        match kind {
            EffectKind::Filter => Effect::Filter(
                StateVariableFilter::new(sample_rate),
                StateVariableFilter::new(sample_rate),
            ),
            EffectKind::MoogFilter => {
                Effect::MoogFilter(MoogFilter::new(sample_rate), MoogFilter::new(sample_rate))
            }
            EffectKind::Formant => Effect::Formant(
                FormantFilter::new(sample_rate),
                FormantFilter::new(sample_rate),
            ),
            EffectKind::Delay => {
                let mut delay = MultiTapDelay::new(sample_rate, 2.0);
                delay.add_tap(0.375, 0.5, 0.3);
                delay.add_tap(0.5, 0.35, 0.7);
                Effect::Delay(delay)
            }
            EffectKind::Reverb => Effect::Reverb(Reverb::new(sample_rate)),
            EffectKind::Waveshaper => Effect::Waveshaper(
                Waveshaper::new(sample_rate),
                Waveshaper::new(sample_rate),
            ),
            EffectKind::Compressor => Effect::Compressor(Compressor::new(sample_rate)),
            EffectKind::Chorus => Effect::Chorus(Chorus::new(sample_rate, 4)),
            EffectKind::Phaser => {
                Effect::Phaser(Phaser::new(sample_rate, 6), Phaser::new(sample_rate, 6))
            }
            EffectKind::Bitcrusher => Effect::Bitcrusher(
                Bitcrusher::new(sample_rate),
                Bitcrusher::new(sample_rate),
            ),
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::Filter(..) => EffectKind::Filter,
            Effect::MoogFilter(..) => EffectKind::MoogFilter,
            Effect::Formant(..) => EffectKind::Formant,
            Effect::Delay(..) => EffectKind::Delay,
            Effect::Reverb(..) => EffectKind::Reverb,
            Effect::Waveshaper(..) => EffectKind::Waveshaper,
            Effect::Compressor(..) => EffectKind::Compressor,
            Effect::Chorus(..) => EffectKind::Chorus,
            Effect::Phaser(..) => EffectKind::Phaser,
            Effect::Bitcrusher(..) => EffectKind::Bitcrusher,
        }
    }

    /// Process a stereo buffer pair in place.
    pub fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        match self {
            Effect::Filter(l, r) => {
                l.process_block(left);
                r.process_block(right);
            }
            Effect::MoogFilter(l, r) => {
                l.process_block(left);
                r.process_block(right);
            }
            Effect::Formant(l, r) => {
                l.process_block(left);
                r.process_block(right);
            }
            Effect::Delay(delay) => delay.process_stereo(left, right),
            Effect::Reverb(reverb) => reverb.process_stereo(left, right),
            Effect::Waveshaper(l, r) => {
                l.process_block(left);
                r.process_block(right);
            }
            Effect::Compressor(comp) => comp.process_stereo(left, right),
            Effect::Chorus(chorus) => chorus.process_stereo(left, right),
            Effect::Phaser(l, r) => {
                l.process_block(left);
                r.process_block(right);
            }
            Effect::Bitcrusher(l, r) => {
                l.process_block(left);
                r.process_block(right);
            }
        }
    }

    /// Clear all internal delay/filter memory.
    pub fn reset(&mut self) {
        match self {
            Effect::Filter(l, r) => {
                l.reset();
                r.reset();
            }
            Effect::MoogFilter(l, r) => {
                l.reset();
                r.reset();
            }
            Effect::Formant(l, r) => {
                l.reset();
                r.reset();
            }
            Effect::Delay(delay) => delay.reset(),
            Effect::Reverb(reverb) => reverb.reset(),
            Effect::Waveshaper(l, r) => {
                l.reset();
                r.reset();
            }
            Effect::Compressor(comp) => comp.reset(),
            Effect::Chorus(chorus) => chorus.reset(),
            Effect::Phaser(l, r) => {
                l.reset();
                r.reset();
            }
            Effect::Bitcrusher(l, r) => {
                l.reset();
                r.reset();
            }
        }
    }
}

struct Slot {
    effect: Effect,
    bypass: bool,
    mix: f32,
}

/// Ordered effect chain over a stereo buffer.
pub struct EffectChain {
    slots: Vec<Slot>,
    sample_rate: f32,
    // Dry copies for per-slot wet/dry blending; sized once at construction
    dry_l: Vec<f32>,
    dry_r: Vec<f32>,
}

impl EffectChain {
    /// `max_block` fixes the largest block `process_stereo` will see; the
    /// blend scratch is allocated here and never again.
    pub fn new(sample_rate: f32, max_block: usize) -> Self {
        Self {
            slots: Vec::with_capacity(MAX_EFFECTS),
            sample_rate,
            dry_l: vec![0.0; max_block],
            dry_r: vec![0.0; max_block],
        }
    }

    /// Append an effect; returns its slot index, or `None` when full.
    pub fn add(&mut self, kind: EffectKind) -> Option<usize> {
        if self.slots.len() >= MAX_EFFECTS {
            return None;
        }
        self.slots.push(Slot {
            effect: Effect::new(kind, self.sample_rate),
            bypass: false,
            mix: 1.0,
        });
        Some(self.slots.len() - 1)
    }

    /// Remove a slot; later slots shift down, preserving relative order.
    pub fn remove(&mut self, index: usize) {
        if index < self.slots.len() {
            self.slots.remove(index);
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn set_bypass(&mut self, index: usize, bypass: bool) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.bypass = bypass;
        }
    }

    /// Per-slot wet/dry on top of whatever mix the effect itself applies.
    pub fn set_mix(&mut self, index: usize, mix: f32) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.mix = clamp(mix, 0.0, 1.0);
        }
    }

    pub fn effect_mut(&mut self, index: usize) -> Option<&mut Effect> {
        self.slots.get_mut(index).map(|s| &mut s.effect)
    }

    pub fn kind_at(&self, index: usize) -> Option<EffectKind> {
        self.slots.get(index).map(|s| s.effect.kind())
    }

    pub fn reset(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.effect.reset();
        }
    }

    /// Run every active, non-bypassed slot in order, in place.
    pub fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len()).min(self.dry_l.len());

        for slot in self.slots.iter_mut() {
            if slot.bypass {
                continue;
            }

            if slot.mix >= 1.0 {
                slot.effect
                    .process_stereo(&mut left[..frames], &mut right[..frames]);
            } else {
                self.dry_l[..frames].copy_from_slice(&left[..frames]);
                self.dry_r[..frames].copy_from_slice(&right[..frames]);
                slot.effect
                    .process_stereo(&mut left[..frames], &mut right[..frames]);
                for i in 0..frames {
                    left[i] = lerp(self.dry_l[i], left[i], slot.mix);
                    right[i] = lerp(self.dry_r[i], right[i], slot.mix);
                }
            }
        }
    }
}
