//! Emoji-to-drums mapping
//!
//! Unicode codepoints hash into a 128-bucket table of drum types, with the
//! default mapping assigning bucket bands to kick, snare, hi-hat, tom, and
//! crash. The mapping is deliberately a coarse hash: any emoji string
//! becomes a playable drum pattern, and the same string always becomes the
//! same pattern.

const BUCKETS: usize = 128;

/// Drum voice selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrumType {
    Kick,
    Snare,
    HiHat,
    TomLow,
    TomMid,
    TomHigh,
    Crash,
    Ride,
}

/// Codepoint-bucketed drum mapper.
pub struct EmojiDrums {
    map: [DrumType; BUCKETS],
}

impl EmojiDrums {
    /// Default band mapping: faces to kick, hands to snare, objects to
    /// hi-hat, nature to toms, symbols to crash, the rest to ride.
    pub fn new() -> Self {
        let mut map = [DrumType::Ride; BUCKETS];
        for (i, slot) in map.iter_mut().enumerate() {
            *slot = match i {
                0..=19 => DrumType::Kick,
                20..=39 => DrumType::Snare,
                40..=59 => DrumType::HiHat,
                60..=79 => DrumType::TomMid,
                80..=99 => DrumType::Crash,
                _ => DrumType::Ride,
            };
        }
        Self { map }
    }

    /// Override one bucket.
    pub fn set_mapping(&mut self, bucket: usize, drum: DrumType) {
        if bucket < BUCKETS {
            self.map[bucket] = drum;
        }
    }

    /// Drum for a single codepoint.
    pub fn drum_for(&self, codepoint: u32) -> DrumType {
        self.map[(codepoint as usize) % BUCKETS]
    }

    /// Map every character of a string to its drum.
    pub fn parse_sequence(&self, text: &str) -> Vec<DrumType> {
        text.chars().map(|c| self.drum_for(c as u32)).collect()
    }
}

impl Default for EmojiDrums {
    fn default() -> Self {
        Self::new()
    }
}
