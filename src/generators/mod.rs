//! Generative note and rhythm sources
//!
//! Synchronous pull-based generators: each exposes a "produce next value"
//! operation, owns its own seeded RNG, and never blocks. They run at
//! musical-event granularity (a step, a bar, a phrase), driven by whatever
//! schedules notes - not per audio sample.
//!
//! Determinism contract: for a fixed seed and parameter sequence, every
//! generator reproduces the same output sequence bit for bit.

pub mod brownian;
pub mod cellular;
pub mod chords;
pub mod genetic;
pub mod lsystem;
pub mod markov;
pub mod random_walk;
pub mod stochastic;

pub use brownian::BrownianMotion;
pub use cellular::CellularRhythm;
pub use chords::{Chord, ChordGenerator, ChordQuality};
pub use genetic::{GeneticMelody, GENOME_LENGTH};
pub use lsystem::LSystemMelody;
pub use markov::MarkovMelody;
pub use random_walk::RandomWalk;
pub use stochastic::{StepEvent, StochasticSequencer};
