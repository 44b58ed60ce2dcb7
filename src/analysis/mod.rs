//! Analysis and visualization units
//!
//! These consume the processed audio non-destructively for display: a
//! triggered oscilloscope ring, an FFT spectrum analyzer with band
//! aggregation, a stereo phase correlator, a peak/RMS level meter, a
//! fluid-simulation parameter bridge, and the pitch-to-color
//! (chromasynesthesia) mapper.
//!
//! None of them block, allocate after construction, or feed anything back
//! into the signal path; their snapshots are safe to poll from a UI thread
//! at any rate.

pub mod chroma;
pub mod fluid;
pub mod meter;
pub mod phase;
pub mod scope;
pub mod spectrum;

pub use chroma::{frequency_to_color, note_to_color, spectrum_to_colors, Color};
pub use fluid::{FluidBridge, FluidParams};
pub use meter::LevelMeter;
pub use phase::PhaseCorrelator;
pub use scope::WaveformScope;
pub use spectrum::SpectrumAnalyzer;
