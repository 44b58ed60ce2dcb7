//! Oscillator implementations
//!
//! Seven independently stateful generator families plus the slot bank that
//! mixes them. Every oscillator advances its own phase/iteration state once
//! per `process()` call and exposes `process_block` for buffer filling.
//!
//! # Oscillator Families
//!
//! - [`morph::MorphOscillator`] - two basic waveforms blended from one phase
//!   accumulator
//! - [`chaos::ChaosOscillator`] - Lorenz attractor integrated at audio rate
//! - [`wavetable::WavetableOscillator`] - band-limited tables with bilinear
//!   interpolation
//! - [`fm::FmOscillator`] - up to 6 operators with a free modulation matrix
//! - [`additive::AdditiveOscillator`] - up to 64 independent partials
//! - [`noise::NoiseGenerator`] - white, pink, brown, and velvet noise
//! - [`fractal::FractalOscillator`] - harmonic weights from Julia-set escape
//!   times
//! - [`bank::OscillatorBank`] - fixed 32-slot arena summing active slots to
//!   stereo

pub mod additive;
pub mod bank;
pub mod chaos;
pub mod fm;
pub mod fractal;
pub mod morph;
pub mod noise;
pub mod wavetable;

pub use additive::AdditiveOscillator;
pub use bank::{OscillatorBank, OscillatorKind, MAX_OSCILLATORS};
pub use chaos::ChaosOscillator;
pub use fm::FmOscillator;
pub use fractal::FractalOscillator;
pub use morph::{MorphOscillator, Waveform};
pub use noise::{NoiseGenerator, NoiseType};
pub use wavetable::WavetableOscillator;
