//! Algorithmic reverb - Schroeder/Moorer comb and allpass network
//!
//! Eight parallel comb filters per channel build the dense late tail, each
//! with a lowpass in its feedback loop so high frequencies die faster
//! (damping). Four serial allpass filters per channel smear the comb output
//! into a diffuse wash. The comb lengths are the classic mutually-prime
//! sample counts, scaled by the ratio of the actual sample rate to 44.1 kHz
//! so the tail character survives a sample-rate change.

use super::svf::StateVariableFilter;
use crate::math::{clamp, lerp};

const COMB_LENGTHS: [usize; 8] = [1557, 1617, 1491, 1422, 1277, 1356, 1188, 1116];
const ALLPASS_LENGTHS: [usize; 4] = [225, 556, 441, 341];
const NUM_COMBS: usize = 8;
const NUM_ALLPASS: usize = 4;

struct Comb {
    buffer: Vec<f32>,
    pos: usize,
}

impl Comb {
    fn new(size: usize) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            pos: 0,
        }
    }

    #[inline]
    fn process(&mut self, input: f32, feedback: f32, damp: &mut StateVariableFilter) -> f32 {
        let delayed = self.buffer[self.pos];
        let filtered = damp.process(delayed);
        self.buffer[self.pos] = input + filtered * feedback;
        self.pos = (self.pos + 1) % self.buffer.len();
        delayed
    }
}

struct Allpass {
    buffer: Vec<f32>,
    pos: usize,
    gain: f32,
}

impl Allpass {
    fn new(size: usize) -> Self {
        Self {
            buffer: vec![0.0; size.max(1)],
            pos: 0,
            gain: 0.5,
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.pos];
        let out = -input + delayed;
        self.buffer[self.pos] = input + delayed * self.gain;
        self.pos = (self.pos + 1) % self.buffer.len();
        out
    }
}

/// Stereo Schroeder/Moorer reverb.
pub struct Reverb {
    combs_l: Vec<Comb>,
    combs_r: Vec<Comb>,
    allpass_l: Vec<Allpass>,
    allpass_r: Vec<Allpass>,
    damping_l: StateVariableFilter,
    damping_r: StateVariableFilter,
    room_size: f32,
    width: f32,
    mix: f32,
}

impl Reverb {
    pub fn new(sample_rate: f32) -> Self {
        let scale = sample_rate / 44100.0;

        let combs = |lengths: &[usize]| -> Vec<Comb> {
            lengths
                .iter()
                .map(|&len| Comb::new((len as f32 * scale) as usize))
                .collect()
        };
        let allpasses = |lengths: &[usize]| -> Vec<Allpass> {
            lengths
                .iter()
                .map(|&len| Allpass::new((len as f32 * scale) as usize))
                .collect()
        };

        let mut damping_l = StateVariableFilter::new(sample_rate);
        let mut damping_r = StateVariableFilter::new(sample_rate);
        damping_l.set_cutoff(4000.0);
        damping_r.set_cutoff(4000.0);

        Self {
            combs_l: combs(&COMB_LENGTHS),
            combs_r: combs(&COMB_LENGTHS),
            allpass_l: allpasses(&ALLPASS_LENGTHS),
            allpass_r: allpasses(&ALLPASS_LENGTHS),
            damping_l,
            damping_r,
            room_size: 0.5,
            width: 1.0,
            mix: 0.3,
        }
    }

    /// Room size in [0, 1]; comb feedback = 0.7 + room_size * 0.28.
    pub fn set_room_size(&mut self, size: f32) {
        self.room_size = clamp(size, 0.0, 1.0);
    }

    /// Damping in [0, 1] maps to the feedback lowpass cutoff (dark to open).
    pub fn set_damping(&mut self, damping: f32) {
        let damping = clamp(damping, 0.0, 1.0);
        let cutoff = lerp(8000.0, 1000.0, damping);
        self.damping_l.set_cutoff(cutoff);
        self.damping_r.set_cutoff(cutoff);
    }

    /// Stereo width in [0, 1]: 0 collapses the wet signal to mono.
    pub fn set_width(&mut self, width: f32) {
        self.width = clamp(width, 0.0, 1.0);
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = clamp(mix, 0.0, 1.0);
    }

    pub fn reset(&mut self) {
        for comb in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            comb.buffer.fill(0.0);
        }
        for ap in self.allpass_l.iter_mut().chain(self.allpass_r.iter_mut()) {
            ap.buffer.fill(0.0);
        }
        self.damping_l.reset();
        self.damping_r.reset();
    }

    pub fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        let feedback = 0.7 + self.room_size * 0.28;
        let frames = left.len().min(right.len());

        for i in 0..frames {
            let in_l = left[i];
            let in_r = right[i];
            let mono = (in_l + in_r) * 0.5;

            // Parallel combs
            let mut comb_l = 0.0;
            let mut comb_r = 0.0;
            for comb in self.combs_l.iter_mut() {
                comb_l += comb.process(mono, feedback, &mut self.damping_l);
            }
            for comb in self.combs_r.iter_mut() {
                comb_r += comb.process(mono, feedback, &mut self.damping_r);
            }
            comb_l /= NUM_COMBS as f32;
            comb_r /= NUM_COMBS as f32;

            // Serial allpass diffusion
            let mut ap_l = comb_l;
            let mut ap_r = comb_r;
            for ap in self.allpass_l.iter_mut() {
                ap_l = ap.process(ap_l);
            }
            for ap in self.allpass_r.iter_mut() {
                ap_r = ap.process(ap_r);
            }

            // Width: cross-mix the wet channels
            let wet_l = ap_l + ap_r * (1.0 - self.width);
            let wet_r = ap_r + ap_l * (1.0 - self.width);

            left[i] = lerp(in_l, wet_l, self.mix);
            right[i] = lerp(in_r, wet_r, self.mix);
        }
    }
}

// Comb/allpass counts are compile-time constants; keep the arrays honest.
const _: () = assert!(COMB_LENGTHS.len() == NUM_COMBS);
const _: () = assert!(ALLPASS_LENGTHS.len() == NUM_ALLPASS);
