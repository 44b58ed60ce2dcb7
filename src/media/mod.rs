//! Media-to-music input adapters
//!
//! Deterministic mappings from external signals (characters, pixels,
//! colors, hand positions, emoji codepoints) to musical values (notes,
//! chords, envelope parameters, filter settings, drum hits). The mapping
//! tables are part of the contract: the same input always produces the
//! same musical output, so callers can cache, replay, and test against
//! them.

pub mod color;
pub mod emoji;
pub mod gesture;
pub mod image;
pub mod pixel;
pub mod text;

pub use color::ColorHarmony;
pub use emoji::{DrumType, EmojiDrums};
pub use gesture::{GestureEnvelope, MotionFilter};
pub use image::ImageSpectrum;
pub use pixel::PixelRhythm;
pub use text::TextMelody;
