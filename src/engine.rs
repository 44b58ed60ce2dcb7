//! Audio engine - tracks, transport, master bus, and block processing
//!
//! The engine owns a bounded collection of tracks (each an oscillator bank
//! plus an effect chain plus mix parameters), a master effect chain,
//! transport state, the analysis units, and the lock-free output ring.
//! [`AudioEngine::process_block`] is the single entry point the platform
//! driver calls once per hardware period; it allocates nothing, takes no
//! locks, and always produces a defined output (silence when stopped).
//!
//! There is no global "current engine": the caller owns the instance and
//! passes it explicitly.

use crate::analysis::{LevelMeter, PhaseCorrelator, SpectrumAnalyzer, WaveformScope};
use crate::effects::EffectChain;
use crate::math::{clamp, soft_clip};
use crate::oscillators::OscillatorBank;
use crate::ring_buffer::SpscRing;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::info;

pub const MAX_TRACKS: usize = 64;

/// Errors from initialization and structural operations. Per-block
/// processing never returns errors - it degrades to silence instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    InvalidParameter,
    BufferOverflow,
    NotInitialized,
    AlreadyRunning,
    CapacityExhausted,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            EngineError::InvalidParameter => "parameter out of documented range",
            EngineError::BufferOverflow => "write would exceed a fixed-capacity buffer",
            EngineError::NotInitialized => "operation invoked before initialization",
            EngineError::AlreadyRunning => "engine is already running",
            EngineError::CapacityExhausted => "fixed-capacity structure is full",
        };
        write!(f, "{}", msg)
    }
}

impl std::error::Error for EngineError {}

/// Engine configuration, fixed for the engine's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub sample_rate: u32,
    pub buffer_size: usize,
    pub channels: u32,
    /// Informational; the engine processes f32 internally.
    pub bit_depth: u32,
    pub realtime_priority: bool,
    pub simd_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 256,
            channels: 2,
            bit_depth: 24,
            realtime_priority: true,
            simd_enabled: true,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON (host settings files).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Transport state machine: Stopped -> Playing -> Stopped, and
/// Playing <-> Paused. Only Playing advances tracks and the playhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stopped,
    Playing,
    Paused,
}

/// One mixer track: oscillator bank, effect chain, and mix parameters.
pub struct Track {
    pub id: usize,
    pub name: String,
    pub oscillators: OscillatorBank,
    pub effects: EffectChain,
    pub volume: f32,
    pub pan: f32,
    pub mute: bool,
    pub solo: bool,
    pub armed: bool,
    // Per-block scratch, sized at creation so process_block never allocates
    scratch_l: Vec<f32>,
    scratch_r: Vec<f32>,
}

impl Track {
    fn new(id: usize, name: &str, sample_rate: f32, buffer_size: usize) -> Self {
        Self {
            id,
            name: name.to_string(),
            oscillators: OscillatorBank::new(sample_rate),
            effects: EffectChain::new(sample_rate, buffer_size),
            volume: 1.0,
            pan: 0.5,
            mute: false,
            solo: false,
            armed: false,
            scratch_l: vec![0.0; buffer_size],
            scratch_r: vec![0.0; buffer_size],
        }
    }
}

/// The block-processing audio engine.
pub struct AudioEngine {
    config: EngineConfig,
    tracks: Vec<Track>,
    master_effects: EffectChain,
    master_volume: f32,
    tempo: f32,
    current_sample: u64,
    beat_position: f64,
    transport: Transport,
    running: bool,

    mix_l: Vec<f32>,
    mix_r: Vec<f32>,
    mono_scratch: Vec<f32>,
    interleave_scratch: Vec<f32>,

    pub scope: WaveformScope,
    pub spectrum: SpectrumAnalyzer,
    pub phase: PhaseCorrelator,
    pub meter: LevelMeter,
    output_ring: Arc<SpscRing>,
}

impl AudioEngine {
    /// Allocate every fixed-capacity buffer the engine will ever need.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        if config.sample_rate == 0 || config.buffer_size == 0 || config.channels == 0 {
            return Err(EngineError::InvalidParameter);
        }

        let sample_rate = config.sample_rate as f32;
        let buffer_size = config.buffer_size;
        // Two seconds of interleaved output
        let ring_capacity = config.sample_rate as usize * 2 * config.channels as usize;

        info!(
            sample_rate = config.sample_rate,
            buffer_size = config.buffer_size,
            channels = config.channels,
            "audio engine initialized"
        );

        Ok(Self {
            master_effects: EffectChain::new(sample_rate, buffer_size),
            master_volume: 1.0,
            tempo: 120.0,
            current_sample: 0,
            beat_position: 0.0,
            transport: Transport::Stopped,
            running: false,
            tracks: Vec::with_capacity(MAX_TRACKS),
            mix_l: vec![0.0; buffer_size],
            mix_r: vec![0.0; buffer_size],
            mono_scratch: vec![0.0; buffer_size],
            interleave_scratch: vec![0.0; buffer_size * 2],
            scope: WaveformScope::new(),
            spectrum: SpectrumAnalyzer::new(sample_rate),
            phase: PhaseCorrelator::new(),
            meter: LevelMeter::new(sample_rate),
            output_ring: Arc::new(SpscRing::new(ring_capacity)),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Clone a handle to the output ring for a consumer thread (WAV
    /// writer, streaming encoder, visualizer).
    pub fn output_ring(&self) -> Arc<SpscRing> {
        Arc::clone(&self.output_ring)
    }

    // --- lifecycle ---------------------------------------------------------

    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.running {
            return Err(EngineError::AlreadyRunning);
        }
        self.running = true;
        info!("engine started");
        Ok(())
    }

    pub fn stop(&mut self) {
        self.running = false;
        info!("engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // --- transport ---------------------------------------------------------

    pub fn play(&mut self) {
        self.transport = Transport::Playing;
    }

    pub fn pause(&mut self) {
        if self.transport == Transport::Playing {
            self.transport = Transport::Paused;
        }
    }

    /// Stop the transport and rewind the playhead to zero.
    pub fn stop_transport(&mut self) {
        self.transport = Transport::Stopped;
        self.current_sample = 0;
        self.beat_position = 0.0;
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Tempo in BPM, clamped to [20, 300].
    pub fn set_tempo(&mut self, bpm: f32) {
        self.tempo = clamp(bpm, 20.0, 300.0);
    }

    pub fn tempo(&self) -> f32 {
        self.tempo
    }

    /// Jump the playhead; beat position is rederived from the tempo.
    pub fn set_position(&mut self, sample: u64) {
        self.current_sample = sample;
        let samples_per_beat = (60.0 / self.tempo as f64) * self.config.sample_rate as f64;
        self.beat_position = sample as f64 / samples_per_beat;
    }

    pub fn position(&self) -> u64 {
        self.current_sample
    }

    pub fn beat_position(&self) -> f64 {
        self.beat_position
    }

    // --- tracks ------------------------------------------------------------

    /// Add a track; fails with `CapacityExhausted` at the track limit.
    pub fn add_track(&mut self, name: &str) -> Result<usize, EngineError> {
        if self.tracks.len() >= MAX_TRACKS {
            return Err(EngineError::CapacityExhausted);
        }
        let id = self.tracks.len();
        self.tracks.push(Track::new(
            id,
            name,
            self.config.sample_rate as f32,
            self.config.buffer_size,
        ));
        info!(track = id, name = name, "track added");
        Ok(id)
    }

    /// Remove a track; later tracks shift down and take new ids, keeping
    /// the id/index contract intact.
    ///
    /// Structural mutation: the caller must not run this concurrently with
    /// `process_block`.
    pub fn remove_track(&mut self, track_id: usize) {
        if track_id >= self.tracks.len() {
            return;
        }
        self.tracks.remove(track_id);
        for (i, track) in self.tracks.iter_mut().enumerate() {
            track.id = i;
        }
        info!(track = track_id, "track removed");
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn track(&self, track_id: usize) -> Option<&Track> {
        self.tracks.get(track_id)
    }

    pub fn track_mut(&mut self, track_id: usize) -> Option<&mut Track> {
        self.tracks.get_mut(track_id)
    }

    /// Volume in [0, 2] (unity = 1).
    pub fn set_track_volume(&mut self, track_id: usize, volume: f32) {
        if let Some(track) = self.tracks.get_mut(track_id) {
            track.volume = clamp(volume, 0.0, 2.0);
        }
    }

    /// Pan in [0, 1]: 0 = left, 0.5 = center, 1 = right.
    pub fn set_track_pan(&mut self, track_id: usize, pan: f32) {
        if let Some(track) = self.tracks.get_mut(track_id) {
            track.pan = clamp(pan, 0.0, 1.0);
        }
    }

    pub fn set_track_mute(&mut self, track_id: usize, mute: bool) {
        if let Some(track) = self.tracks.get_mut(track_id) {
            track.mute = mute;
        }
    }

    pub fn set_track_solo(&mut self, track_id: usize, solo: bool) {
        if let Some(track) = self.tracks.get_mut(track_id) {
            track.solo = solo;
        }
    }

    pub fn master_effects_mut(&mut self) -> &mut EffectChain {
        &mut self.master_effects
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = clamp(volume, 0.0, 2.0);
    }

    // --- block processing --------------------------------------------------

    /// Produce one stereo block. Called from the audio thread; performs no
    /// allocation and no locking, and always fills the outputs.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left
            .len()
            .min(right.len())
            .min(self.config.buffer_size);

        self.mix_l[..frames].fill(0.0);
        self.mix_r[..frames].fill(0.0);

        if !self.running {
            left[..frames].fill(0.0);
            right[..frames].fill(0.0);
            return;
        }

        if self.transport == Transport::Playing {
            // Solo semantics: any engaged solo restricts the mix to soloed
            // tracks; mute always wins.
            let any_solo = self.tracks.iter().any(|t| t.solo);

            for track in self.tracks.iter_mut() {
                if track.mute || (any_solo && !track.solo) {
                    continue;
                }

                track
                    .oscillators
                    .process_stereo(&mut track.scratch_l[..frames], &mut track.scratch_r[..frames]);
                track
                    .effects
                    .process_stereo(&mut track.scratch_l[..frames], &mut track.scratch_r[..frames]);

                let gain_l = track.volume * (1.0 - track.pan);
                let gain_r = track.volume * track.pan;
                for i in 0..frames {
                    self.mix_l[i] += track.scratch_l[i] * gain_l;
                    self.mix_r[i] += track.scratch_r[i] * gain_r;
                }
            }

            self.current_sample += frames as u64;
            let samples_per_beat = (60.0 / self.tempo as f64) * self.config.sample_rate as f64;
            self.beat_position = self.current_sample as f64 / samples_per_beat;
        }

        // Master chain keeps running outside of Playing so delay and reverb
        // tails finish decaying naturally.
        self.master_effects
            .process_stereo(&mut self.mix_l[..frames], &mut self.mix_r[..frames]);

        for i in 0..frames {
            self.mix_l[i] = soft_clip(self.mix_l[i] * self.master_volume);
            self.mix_r[i] = soft_clip(self.mix_r[i] * self.master_volume);
        }

        // Analysis taps observe the final signal; none of them block.
        self.scope.write(&self.mix_l[..frames], &self.mix_r[..frames]);
        for i in 0..frames {
            self.mono_scratch[i] = (self.mix_l[i] + self.mix_r[i]) * 0.5;
        }
        self.spectrum.write(&self.mono_scratch[..frames]);
        self.phase.analyze(&self.mix_l[..frames], &self.mix_r[..frames]);
        self.meter.analyze(&self.mix_l[..frames], &self.mix_r[..frames]);

        // Interleave into the output ring; a full ring drops, never blocks.
        for i in 0..frames {
            self.interleave_scratch[i * 2] = self.mix_l[i];
            self.interleave_scratch[i * 2 + 1] = self.mix_r[i];
        }
        let _ = self.output_ring.write(&self.interleave_scratch[..frames * 2]);

        left[..frames].copy_from_slice(&self.mix_l[..frames]);
        right[..frames].copy_from_slice(&self.mix_r[..frames]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oscillators::OscillatorKind;

    fn running_engine() -> AudioEngine {
        let mut engine = AudioEngine::new(EngineConfig::default()).unwrap();
        engine.start().unwrap();
        engine.play();
        engine
    }

    fn render(engine: &mut AudioEngine, blocks: usize) -> (Vec<f32>, Vec<f32>) {
        let size = engine.config().buffer_size;
        let mut all_l = Vec::new();
        let mut all_r = Vec::new();
        let mut l = vec![0.0; size];
        let mut r = vec![0.0; size];
        for _ in 0..blocks {
            engine.process_block(&mut l, &mut r);
            all_l.extend_from_slice(&l);
            all_r.extend_from_slice(&r);
        }
        (all_l, all_r)
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = EngineConfig {
            sample_rate: 44100,
            buffer_size: 512,
            ..EngineConfig::default()
        };
        let parsed = EngineConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(parsed.sample_rate, 44100);
        assert_eq!(parsed.buffer_size, 512);
        assert_eq!(parsed.channels, 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            sample_rate: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            AudioEngine::new(config),
            Err(EngineError::InvalidParameter)
        ));
    }

    #[test]
    fn test_duplicate_start_rejected() {
        let mut engine = AudioEngine::new(EngineConfig::default()).unwrap();
        engine.start().unwrap();
        assert_eq!(engine.start(), Err(EngineError::AlreadyRunning));
        engine.stop();
        assert!(engine.start().is_ok());
    }

    #[test]
    fn test_empty_engine_outputs_silence() {
        let mut engine = running_engine();
        let (l, r) = render(&mut engine, 4);
        assert!(l.iter().all(|&s| s == 0.0), "no tracks must mean silence");
        assert!(r.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_muted_tracks_output_silence() {
        let mut engine = running_engine();
        let t = engine.add_track("muted").unwrap();
        engine.track_mut(t).unwrap().oscillators.add(OscillatorKind::Morph).unwrap();
        engine.set_track_mute(t, true);
        let (l, _) = render(&mut engine, 4);
        assert!(l.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_track_produces_audio() {
        let mut engine = running_engine();
        let t = engine.add_track("osc").unwrap();
        let slot = engine
            .track_mut(t)
            .unwrap()
            .oscillators
            .add(OscillatorKind::Morph)
            .unwrap();
        engine.track_mut(t).unwrap().oscillators.set_frequency(slot, 440.0);

        let (l, r) = render(&mut engine, 8);
        assert!(l.iter().any(|&s| s.abs() > 0.01));
        assert!(r.iter().any(|&s| s.abs() > 0.01));
    }

    #[test]
    fn test_solo_excludes_unsoloed_tracks() {
        let mut engine = running_engine();
        let a = engine.add_track("a").unwrap();
        let b = engine.add_track("b").unwrap();
        for t in [a, b] {
            let slot = engine
                .track_mut(t)
                .unwrap()
                .oscillators
                .add(OscillatorKind::Morph)
                .unwrap();
            engine.track_mut(t).unwrap().oscillators.set_frequency(slot, 220.0);
        }
        // Solo track a, hard-pan the two tracks apart to tell them apart
        engine.set_track_solo(a, true);
        engine.set_track_pan(a, 0.0);
        engine.set_track_pan(b, 1.0);

        let (l, r) = render(&mut engine, 8);
        let left_energy: f32 = l.iter().map(|s| s * s).sum();
        let right_energy: f32 = r.iter().map(|s| s * s).sum();
        assert!(left_energy > 0.01, "soloed track should sound");
        assert_eq!(right_energy, 0.0, "unsoloed track must be excluded");
    }

    #[test]
    fn test_mute_beats_solo() {
        let mut engine = running_engine();
        let t = engine.add_track("both").unwrap();
        engine.track_mut(t).unwrap().oscillators.add(OscillatorKind::Morph).unwrap();
        engine.set_track_solo(t, true);
        engine.set_track_mute(t, true);
        let (l, _) = render(&mut engine, 4);
        assert!(l.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_output_bounded_after_soft_clip() {
        let mut engine = running_engine();
        // Pile up loud tracks to push the mix past unity
        for i in 0..8 {
            let t = engine.add_track(&format!("t{}", i)).unwrap();
            let slot = engine
                .track_mut(t)
                .unwrap()
                .oscillators
                .add(OscillatorKind::Morph)
                .unwrap();
            let bank = &mut engine.track_mut(t).unwrap().oscillators;
            bank.set_frequency(slot, 110.0 * (i + 1) as f32);
            bank.set_gain(slot, 2.0);
            engine.set_track_volume(t, 2.0);
        }
        let (l, r) = render(&mut engine, 16);
        for &s in l.iter().chain(r.iter()) {
            assert!(s.abs() <= 1.0, "soft clip must bound the master: {}", s);
            assert!(s.is_finite());
        }
    }

    #[test]
    fn test_transport_gates_playhead() {
        let mut engine = running_engine();
        let mut l = vec![0.0; 256];
        let mut r = vec![0.0; 256];
        engine.process_block(&mut l, &mut r);
        assert_eq!(engine.position(), 256);

        engine.pause();
        engine.process_block(&mut l, &mut r);
        assert_eq!(engine.position(), 256, "paused transport must hold position");

        engine.play();
        engine.process_block(&mut l, &mut r);
        assert_eq!(engine.position(), 512);

        engine.stop_transport();
        assert_eq!(engine.position(), 0, "stop must rewind the playhead");
    }

    #[test]
    fn test_beat_position_follows_tempo() {
        let mut engine = running_engine();
        engine.set_tempo(120.0); // 2 beats per second
        let mut l = vec![0.0; 256];
        let mut r = vec![0.0; 256];
        // One second of blocks at 48 kHz / 256
        for _ in 0..(48000 / 256) {
            engine.process_block(&mut l, &mut r);
        }
        assert!(
            (engine.beat_position() - 2.0).abs() < 0.02,
            "one second at 120 BPM is 2 beats, got {}",
            engine.beat_position()
        );
    }

    #[test]
    fn test_tempo_clamped() {
        let mut engine = AudioEngine::new(EngineConfig::default()).unwrap();
        engine.set_tempo(1000.0);
        assert_eq!(engine.tempo(), 300.0);
        engine.set_tempo(1.0);
        assert_eq!(engine.tempo(), 20.0);
    }

    #[test]
    fn test_track_capacity() {
        let mut engine = AudioEngine::new(EngineConfig::default()).unwrap();
        for i in 0..MAX_TRACKS {
            assert_eq!(engine.add_track(&format!("t{}", i)), Ok(i));
        }
        assert_eq!(
            engine.add_track("overflow"),
            Err(EngineError::CapacityExhausted)
        );
    }

    #[test]
    fn test_remove_track_reassigns_ids() {
        let mut engine = AudioEngine::new(EngineConfig::default()).unwrap();
        engine.add_track("a").unwrap();
        engine.add_track("b").unwrap();
        engine.add_track("c").unwrap();
        engine.remove_track(1);

        assert_eq!(engine.track_count(), 2);
        assert_eq!(engine.track(0).unwrap().name, "a");
        assert_eq!(engine.track(1).unwrap().name, "c");
        assert_eq!(engine.track(1).unwrap().id, 1);
    }

    #[test]
    fn test_ring_receives_interleaved_output() {
        let mut engine = running_engine();
        let t = engine.add_track("osc").unwrap();
        engine.track_mut(t).unwrap().oscillators.add(OscillatorKind::Morph).unwrap();

        let ring = engine.output_ring();
        let mut l = vec![0.0; 256];
        let mut r = vec![0.0; 256];
        engine.process_block(&mut l, &mut r);

        let mut out = vec![0.0; 512];
        assert_eq!(ring.read(&mut out), 512, "one block = 512 interleaved samples");
        for i in 0..256 {
            assert_eq!(out[i * 2], l[i], "left channel interleave mismatch at {}", i);
            assert_eq!(out[i * 2 + 1], r[i]);
        }
    }

    #[test]
    fn test_not_running_outputs_silence() {
        let mut engine = AudioEngine::new(EngineConfig::default()).unwrap();
        engine.play();
        let t = engine.add_track("osc").unwrap();
        engine.track_mut(t).unwrap().oscillators.add(OscillatorKind::Morph).unwrap();
        let mut l = vec![0.9; 256];
        let mut r = vec![0.9; 256];
        engine.process_block(&mut l, &mut r);
        assert!(l.iter().all(|&s| s == 0.0), "stopped engine fills silence");
    }

    #[test]
    fn test_determinism_across_instances() {
        let build = || {
            let mut engine = running_engine();
            let t = engine.add_track("osc").unwrap();
            let slot = engine
                .track_mut(t)
                .unwrap()
                .oscillators
                .add(OscillatorKind::Morph)
                .unwrap();
            engine.track_mut(t).unwrap().oscillators.set_frequency(slot, 333.0);
            engine
        };
        let (l1, r1) = render(&mut build(), 8);
        let (l2, r2) = render(&mut build(), 8);
        assert_eq!(l1, l2, "identical engines must render identical blocks");
        assert_eq!(r1, r2);
    }
}
