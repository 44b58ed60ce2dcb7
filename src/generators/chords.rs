//! Functional chord-progression generator
//!
//! Samples a fixed diatonic progression table (roots as scale-degree
//! offsets, with the matching chord qualities) and expands each pick into
//! its chord tones from an interval table. Deliberately simple: the point
//! is harmonic plausibility from a seeded stream, not voice leading.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chord qualities with their interval shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Major7,
    Minor7,
    Dominant7,
}

impl ChordQuality {
    /// Semitone offsets from the root; triads have three tones.
    pub fn intervals(self) -> &'static [i32] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
        }
    }
}

/// One generated chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    pub root: i32,
    pub quality: ChordQuality,
    pub notes: Vec<i32>,
}

// Progression table: scale-degree roots with their diatonic qualities
// (I IV V I iii IV V I shape).
const PROGRESSION_ROOTS: [i32; 8] = [0, 5, 7, 0, 4, 5, 7, 0];
const PROGRESSION_QUALITIES: [ChordQuality; 8] = [
    ChordQuality::Major,
    ChordQuality::Major,
    ChordQuality::Major,
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Major,
    ChordQuality::Major,
    ChordQuality::Major,
];

/// Seeded diatonic chord source.
pub struct ChordGenerator {
    key_root: i32,
    last_degree: usize,
    rng: StdRng,
}

impl ChordGenerator {
    pub fn new(key_root: i32, seed: u64) -> Self {
        Self {
            key_root,
            last_degree: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn set_key(&mut self, root: i32) {
        self.key_root = root;
    }

    /// Index into the progression table the last chord came from.
    pub fn last_degree(&self) -> usize {
        self.last_degree
    }

    /// Sample the progression table and expand the chord tones.
    pub fn next(&mut self) -> Chord {
        let step = self.rng.gen_range(0..PROGRESSION_ROOTS.len());
        let root = self.key_root + PROGRESSION_ROOTS[step];
        let quality = PROGRESSION_QUALITIES[step];

        let notes = quality.intervals().iter().map(|&i| root + i).collect();

        self.last_degree = step;
        Chord {
            root,
            quality,
            notes,
        }
    }
}
