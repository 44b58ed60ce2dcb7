//! Universal processing-node interface
//!
//! The capability set every processor - built-in oscillator, effect, or a
//! hosted external plugin wrapper - must implement to participate in
//! uniform graph composition and hot-swap: lifecycle, audio/MIDI
//! processing, parameter discovery and access, seeded random mutation
//! ("happy accidents"), and opaque state serialization for presets.
//!
//! [`NodeHost`] wraps a node with the flags the engine needs around it:
//! active/bypass, and an atomic reset request that a control thread sets
//! and the audio thread consumes at the next block boundary - no lock is
//! ever taken on either side.

use crate::engine::EngineError;
use crate::math::clamp;
use crate::synth::SubtractiveSynth;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// A MIDI event with a sample offset into the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent {
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
    pub channel: u8,
    pub frame_offset: u32,
}

pub const MIDI_NOTE_ON: u8 = 0x90;
pub const MIDI_NOTE_OFF: u8 = 0x80;
pub const MIDI_CC: u8 = 0xB0;

/// Descriptor for one automatable parameter.
#[derive(Debug, Clone)]
pub struct ParameterInfo {
    pub id: u32,
    pub name: &'static str,
    pub min_value: f32,
    pub max_value: f32,
    pub default_value: f32,
    pub step: f32,
    pub unit: &'static str,
    pub automatable: bool,
}

/// The universal processor contract.
///
/// `process_audio`/`process_midi` run on the audio thread and must not
/// allocate or block; everything else is control-thread territory.
pub trait ProcessorNode: Send {
    /// Human-readable node name.
    fn name(&self) -> &str;

    /// Prepare for processing at the given rate/block size.
    fn init(&mut self, sample_rate: f32, max_block_size: usize) -> Result<(), EngineError>;

    /// Enter the processing state.
    fn activate(&mut self) {}

    /// Leave the processing state.
    fn deactivate(&mut self) {}

    /// Clear delays, envelopes, and filter memory.
    fn reset(&mut self);

    /// Process one block. `inputs` may be empty for pure generators.
    fn process_audio(&mut self, inputs: &[&[f32]], outputs: &mut [Vec<f32>]);

    /// Consume MIDI events for this block.
    fn process_midi(&mut self, _events: &[MidiEvent]) {}

    /// Parameter table; ids index into `get_parameter`/`set_parameter`.
    fn parameters(&self) -> &[ParameterInfo];

    fn get_parameter(&self, id: u32) -> Option<f32>;

    /// Out-of-range values are clamped to the parameter's documented range.
    fn set_parameter(&mut self, id: u32, value: f32);

    /// Randomly perturb automatable parameters by up to `amount` of each
    /// parameter's range. Seeded, so a mutation can be reproduced.
    fn mutate(&mut self, amount: f32, seed: u64) {
        let amount = clamp(amount, 0.0, 1.0);
        let mut rng = StdRng::seed_from_u64(seed);
        let params: Vec<ParameterInfo> = self.parameters().to_vec();
        for info in params {
            if !info.automatable {
                continue;
            }
            let current = self.get_parameter(info.id).unwrap_or(info.default_value);
            let range = info.max_value - info.min_value;
            let offset = (rng.gen::<f32>() - 0.5) * 2.0 * amount * range;
            self.set_parameter(info.id, clamp(current + offset, info.min_value, info.max_value));
        }
    }

    /// Serialize state for presets/undo; fails if it exceeds `max_size`.
    fn save_state(&self, max_size: usize) -> Result<Vec<u8>, EngineError>;

    /// Restore previously saved state.
    fn load_state(&mut self, data: &[u8]) -> Result<(), EngineError>;
}

/// Engine-side wrapper: bypass/active flags plus the lock-free reset
/// handshake between control and audio threads.
pub struct NodeHost {
    node: Box<dyn ProcessorNode>,
    pub active: bool,
    pub bypassed: bool,
    needs_reset: AtomicBool,
}

impl NodeHost {
    pub fn new(node: Box<dyn ProcessorNode>) -> Self {
        Self {
            node,
            active: false,
            bypassed: false,
            needs_reset: AtomicBool::new(false),
        }
    }

    pub fn node(&self) -> &dyn ProcessorNode {
        self.node.as_ref()
    }

    pub fn node_mut(&mut self) -> &mut dyn ProcessorNode {
        self.node.as_mut()
    }

    /// Control-thread side: ask the audio thread to reset the node.
    pub fn request_reset(&self) {
        self.needs_reset.store(true, Ordering::Release);
    }

    /// Audio-thread side: call at the start of each block; applies a
    /// pending reset exactly once.
    pub fn apply_pending_reset(&mut self) -> bool {
        if self.needs_reset.swap(false, Ordering::AcqRel) {
            self.node.reset();
            true
        } else {
            false
        }
    }

    pub fn is_ready(&self) -> bool {
        self.active && !self.bypassed
    }
}

// ---------------------------------------------------------------------------
// Built-in implementer: the subtractive synth voice as a processor node
// ---------------------------------------------------------------------------

/// Serialized SynthNode state blob.
#[derive(Serialize, Deserialize)]
struct SynthNodeState {
    osc1_level: f32,
    osc2_level: f32,
    noise_level: f32,
    cutoff: f32,
    env_amount: f32,
}

const PARAM_OSC1_LEVEL: u32 = 0;
const PARAM_OSC2_LEVEL: u32 = 1;
const PARAM_NOISE_LEVEL: u32 = 2;
const PARAM_CUTOFF: u32 = 3;
const PARAM_ENV_AMOUNT: u32 = 4;

static SYNTH_PARAMS: [ParameterInfo; 5] = [
    ParameterInfo {
        id: PARAM_OSC1_LEVEL,
        name: "osc1_level",
        min_value: 0.0,
        max_value: 1.0,
        default_value: 0.5,
        step: 0.0,
        unit: "",
        automatable: true,
    },
    ParameterInfo {
        id: PARAM_OSC2_LEVEL,
        name: "osc2_level",
        min_value: 0.0,
        max_value: 1.0,
        default_value: 0.3,
        step: 0.0,
        unit: "",
        automatable: true,
    },
    ParameterInfo {
        id: PARAM_NOISE_LEVEL,
        name: "noise_level",
        min_value: 0.0,
        max_value: 1.0,
        default_value: 0.0,
        step: 0.0,
        unit: "",
        automatable: true,
    },
    ParameterInfo {
        id: PARAM_CUTOFF,
        name: "cutoff",
        min_value: 20.0,
        max_value: 12000.0,
        default_value: 500.0,
        step: 0.0,
        unit: "Hz",
        automatable: true,
    },
    ParameterInfo {
        id: PARAM_ENV_AMOUNT,
        name: "filter_env_amount",
        min_value: 0.0,
        max_value: 8000.0,
        default_value: 2000.0,
        step: 0.0,
        unit: "Hz",
        automatable: true,
    },
];

/// The subtractive voice wrapped as a [`ProcessorNode`].
pub struct SynthNode {
    synth: SubtractiveSynth,
    cutoff: f32,
    env_amount: f32,
    sample_rate: f32,
}

impl SynthNode {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            synth: SubtractiveSynth::new(sample_rate),
            cutoff: 500.0,
            env_amount: 2000.0,
            sample_rate,
        }
    }
}

impl ProcessorNode for SynthNode {
    fn name(&self) -> &str {
        "subtractive-synth"
    }

    fn init(&mut self, sample_rate: f32, _max_block_size: usize) -> Result<(), EngineError> {
        if sample_rate <= 0.0 {
            return Err(EngineError::InvalidParameter);
        }
        self.sample_rate = sample_rate;
        self.synth = SubtractiveSynth::new(sample_rate);
        self.synth.set_filter(self.cutoff, self.env_amount, 0.5);
        Ok(())
    }

    fn reset(&mut self) {
        self.synth.reset();
    }

    fn process_audio(&mut self, _inputs: &[&[f32]], outputs: &mut [Vec<f32>]) {
        // Mono voice: render the first output, copy to any others
        if let Some((first, rest)) = outputs.split_first_mut() {
            for sample in first.iter_mut() {
                *sample = self.synth.process();
            }
            for other in rest {
                let n = other.len().min(first.len());
                other[..n].copy_from_slice(&first[..n]);
            }
        }
    }

    fn process_midi(&mut self, events: &[MidiEvent]) {
        for event in events {
            match event.status & 0xF0 {
                MIDI_NOTE_ON if event.data2 > 0 => {
                    self.synth
                        .note_on(event.data1 as i32, event.data2 as f32 / 127.0);
                }
                MIDI_NOTE_ON | MIDI_NOTE_OFF => {
                    self.synth.note_off();
                }
                _ => {}
            }
        }
    }

    fn parameters(&self) -> &[ParameterInfo] {
        &SYNTH_PARAMS
    }

    fn get_parameter(&self, id: u32) -> Option<f32> {
        match id {
            PARAM_OSC1_LEVEL => Some(self.synth.osc1_level),
            PARAM_OSC2_LEVEL => Some(self.synth.osc2_level),
            PARAM_NOISE_LEVEL => Some(self.synth.noise_level),
            PARAM_CUTOFF => Some(self.cutoff),
            PARAM_ENV_AMOUNT => Some(self.env_amount),
            _ => None,
        }
    }

    fn set_parameter(&mut self, id: u32, value: f32) {
        match id {
            PARAM_OSC1_LEVEL => self.synth.osc1_level = clamp(value, 0.0, 1.0),
            PARAM_OSC2_LEVEL => self.synth.osc2_level = clamp(value, 0.0, 1.0),
            PARAM_NOISE_LEVEL => self.synth.noise_level = clamp(value, 0.0, 1.0),
            PARAM_CUTOFF => {
                self.cutoff = clamp(value, 20.0, 12000.0);
                self.synth.set_filter(self.cutoff, self.env_amount, 0.5);
            }
            PARAM_ENV_AMOUNT => {
                self.env_amount = clamp(value, 0.0, 8000.0);
                self.synth.set_filter(self.cutoff, self.env_amount, 0.5);
            }
            _ => {}
        }
    }

    fn save_state(&self, max_size: usize) -> Result<Vec<u8>, EngineError> {
        let state = SynthNodeState {
            osc1_level: self.synth.osc1_level,
            osc2_level: self.synth.osc2_level,
            noise_level: self.synth.noise_level,
            cutoff: self.cutoff,
            env_amount: self.env_amount,
        };
        let blob = bincode::serialize(&state).map_err(|_| EngineError::InvalidParameter)?;
        if blob.len() > max_size {
            return Err(EngineError::BufferOverflow);
        }
        Ok(blob)
    }

    fn load_state(&mut self, data: &[u8]) -> Result<(), EngineError> {
        let state: SynthNodeState =
            bincode::deserialize(data).map_err(|_| EngineError::InvalidParameter)?;
        self.set_parameter(PARAM_OSC1_LEVEL, state.osc1_level);
        self.set_parameter(PARAM_OSC2_LEVEL, state.osc2_level);
        self.set_parameter(PARAM_NOISE_LEVEL, state.noise_level);
        self.set_parameter(PARAM_CUTOFF, state.cutoff);
        self.set_parameter(PARAM_ENV_AMOUNT, state.env_amount);
        Ok(())
    }
}
