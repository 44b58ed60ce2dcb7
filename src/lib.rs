//! # Magnon - Real-Time Audio Synthesis Engine
//!
//! Magnon is a block-based audio synthesis and processing engine built around
//! a fixed-topology graph: oscillator banks feed per-track effect chains,
//! tracks are summed onto a master bus, and finished blocks are handed to the
//! caller (an audio callback, an offline renderer, or the lock-free output
//! ring). Everything on the processing path runs without allocation, locks,
//! or blocking, so `process_block` is safe to call from a hardware callback.
//!
//! ## Core Features
//!
//! - **Oscillator Bank**: 7 oscillator families (waveform morphing, Lorenz
//!   chaos, band-limited wavetables, 6-operator FM, additive partials, four
//!   noise colors, Julia-set fractal harmonics) in a 32-slot bank
//! - **Effect Chains**: 10 effect processors (SVF, Moog ladder, formant,
//!   multi-tap delay, Schroeder reverb, waveshaper, compressor, chorus,
//!   phaser, bitcrusher) in ordered 16-slot chains with bypass and wet/dry
//! - **Generative Sequencing**: Markov melodies, cellular-automata rhythms,
//!   genetic melody evolution, L-systems, Brownian motion, stochastic steps,
//!   diatonic chord progressions - all seeded and deterministic
//! - **Media Mapping**: text, color, pixel, image, gesture, and emoji inputs
//!   mapped to notes, chords, envelopes, and filter parameters
//! - **Granular & Spectral**: a 128-grain granular engine over caller-supplied
//!   buffers, and an FFT freeze/blur/shift/robotize processor
//! - **Analysis**: oscilloscope, FFT spectrum bands, stereo phase correlation,
//!   peak/RMS metering, pitch-to-color mapping - all non-blocking, poll-safe
//!   from a UI thread
//! - **Lock-Free Output**: a single-producer/single-consumer sample ring with
//!   atomic cursors moves finished blocks off the audio thread
//!
//! ## Quick Start
//!
//! ### Rendering a tone through the engine
//!
//! ```rust
//! use magnon::engine::{AudioEngine, EngineConfig};
//! use magnon::oscillators::OscillatorKind;
//!
//! let mut engine = AudioEngine::new(EngineConfig::default()).unwrap();
//! let track = engine.add_track("lead").unwrap();
//!
//! // One morphing oscillator at 440 Hz
//! let slot = engine.track_mut(track).unwrap()
//!     .oscillators
//!     .add(OscillatorKind::Morph)
//!     .unwrap();
//! engine.track_mut(track).unwrap().oscillators.set_frequency(slot, 440.0);
//!
//! engine.start().unwrap();
//! engine.play();
//!
//! let mut left = vec![0.0f32; 256];
//! let mut right = vec![0.0f32; 256];
//! engine.process_block(&mut left, &mut right);
//! assert!(left.iter().any(|s| s.abs() > 0.0));
//! ```
//!
//! ### Generative melody
//!
//! ```rust
//! use magnon::generators::MarkovMelody;
//!
//! let mut markov = MarkovMelody::new(42);
//! for _ in 0..16 {
//!     match markov.next_note() {
//!         Some(note) => println!("note {}", note),
//!         None => println!("rest"),
//!     }
//! }
//! ```

pub mod analysis;
pub mod effects;
pub mod engine;
pub mod generators;
pub mod granular;
pub mod math;
pub mod media;
pub mod node;
pub mod oscillators;
pub mod render;
pub mod ring_buffer;
pub mod spectral;
pub mod synth;

pub use engine::{AudioEngine, EngineConfig, EngineError, Transport};
pub use ring_buffer::SpscRing;
