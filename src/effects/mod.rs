//! Audio effect processors
//!
//! Ten stateful effect units plus the ordered chain that hosts them. Every
//! effect recomputes its coefficients immediately inside its parameter
//! setters (never deferred to the audio callback), clamps frequency
//! parameters below Nyquist, and clamps normalized parameters to their
//! documented ranges.
//!
//! # Effect Units
//!
//! - [`svf::StateVariableFilter`] - trapezoidal SVF with simultaneous
//!   LP/HP/BP/notch outputs
//! - [`moog::MoogFilter`] - four-stage ladder lowpass with resonance feedback
//! - [`formant::FormantFilter`] - vowel-morphing triple bandpass
//! - [`delay::MultiTapDelay`] - one write head, up to 8 read taps, filtered
//!   feedback
//! - [`reverb::Reverb`] - Schroeder/Moorer comb + allpass network
//! - [`waveshaper::Waveshaper`] - eight shaping algorithms with drive and tone
//! - [`compressor::Compressor`] - dB-domain soft-knee dynamics
//! - [`chorus::Chorus`] - multi-voice modulated delay
//! - [`phaser::Phaser`] - LFO-swept allpass cascade
//! - [`bitcrusher::Bitcrusher`] - sample-rate and bit-depth reduction
//! - [`chain::EffectChain`] - ordered 16-slot chain with bypass and wet/dry

pub mod bitcrusher;
pub mod chain;
pub mod chorus;
pub mod compressor;
pub mod delay;
pub mod formant;
pub mod moog;
pub mod phaser;
pub mod reverb;
pub mod svf;
pub mod waveshaper;

pub use bitcrusher::Bitcrusher;
pub use chain::{Effect, EffectChain, EffectKind, MAX_EFFECTS};
pub use chorus::Chorus;
pub use compressor::Compressor;
pub use delay::MultiTapDelay;
pub use formant::FormantFilter;
pub use moog::MoogFilter;
pub use phaser::Phaser;
pub use reverb::Reverb;
pub use svf::{FilterOutput, StateVariableFilter};
pub use waveshaper::{ShaperAlgorithm, Waveshaper};
