//! Chromasynesthesia - deterministic pitch-to-color mapping
//!
//! Each pitch class gets a fixed hue (C = red at 0 degrees, stepping 30
//! degrees per semitone around the wheel), octave maps to brightness, and
//! the result converts HSB -> RGB. Spectrum coloring applies the same
//! mapping per frequency bin with magnitude driving brightness. Display
//! only; nothing here touches the signal path.

use crate::math::{clamp, freq_to_midi};

/// An RGB color with the brightness that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub brightness: f32,
}

/// Hue per pitch class: C=red, stepping 30 degrees per semitone.
const NOTE_HUES: [f32; 12] = [
    0.0,   // C
    30.0,  // C#
    60.0,  // D
    90.0,  // D#
    120.0, // E
    150.0, // F
    180.0, // F#
    210.0, // G
    240.0, // G#
    270.0, // A
    300.0, // A#
    330.0, // B
];

fn hsb_to_rgb(h: f32, s: f32, b: f32) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let c = b * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = b - c;

    let (rf, gf, bf) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((rf + m) * 255.0) as u8,
        ((gf + m) * 255.0) as u8,
        ((bf + m) * 255.0) as u8,
    )
}

/// Color for a MIDI note: pitch class -> hue, octave -> brightness.
pub fn note_to_color(midi_note: i32) -> Color {
    let pitch_class = midi_note.rem_euclid(12) as usize;
    let octave = midi_note.div_euclid(12);

    let hue = NOTE_HUES[pitch_class];
    let saturation = 0.8;
    let brightness = clamp(0.3 + octave as f32 / 10.0 * 0.7, 0.0, 1.0);

    let (r, g, b) = hsb_to_rgb(hue, saturation, brightness);
    Color {
        r,
        g,
        b,
        brightness,
    }
}

/// Color for a frequency: rounds to the nearest MIDI note first.
pub fn frequency_to_color(freq: f32) -> Color {
    let midi = freq_to_midi(freq.max(1.0)).round() as i32;
    note_to_color(midi)
}

/// Color a magnitude spectrum: bin frequency drives hue, magnitude drives
/// brightness. Sub-audio bins render dark gray, ultrasonic bins white.
pub fn spectrum_to_colors(magnitudes: &[f32], colors: &mut [Color], sample_rate: f32) {
    let bins = magnitudes.len().min(colors.len());
    if bins == 0 {
        return;
    }
    let bin_freq = sample_rate / (magnitudes.len() as f32 * 2.0);

    for i in 0..bins {
        let freq = i as f32 * bin_freq;
        let magnitude = magnitudes[i];

        colors[i] = if freq < 20.0 {
            Color {
                r: 30,
                g: 30,
                b: 30,
                brightness: magnitude,
            }
        } else if freq > 20000.0 {
            Color {
                r: 255,
                g: 255,
                b: 255,
                brightness: magnitude,
            }
        } else {
            let base = frequency_to_color(freq);
            let scale = clamp(magnitude * 10.0, 0.0, 1.0);
            Color {
                r: (base.r as f32 * scale) as u8,
                g: (base.g as f32 * scale) as u8,
                b: (base.b as f32 * scale) as u8,
                brightness: magnitude,
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_is_red() {
        // Middle C: hue 0 -> pure red family
        let color = note_to_color(60);
        assert!(color.r > color.g && color.r > color.b, "C should be red: {:?}", color);
    }

    #[test]
    fn test_octave_controls_brightness() {
        let low = note_to_color(24);
        let high = note_to_color(96);
        assert!(
            high.brightness > low.brightness,
            "higher octaves should be brighter"
        );
    }

    #[test]
    fn test_same_pitch_class_same_hue() {
        // C3 and C5 share a hue; brightness differs
        let c3 = note_to_color(48);
        let c5 = note_to_color(72);
        // Both reds: dominant channel identical ordering
        assert!(c3.r > c3.g && c5.r > c5.g);
    }

    #[test]
    fn test_a440_maps_like_midi_69() {
        assert_eq!(frequency_to_color(440.0), note_to_color(69));
    }

    #[test]
    fn test_spectrum_edges() {
        let magnitudes = vec![0.5; 512];
        let mut colors = vec![
            Color {
                r: 0,
                g: 0,
                b: 0,
                brightness: 0.0
            };
            512
        ];
        spectrum_to_colors(&magnitudes, &mut colors, 48000.0);

        // Bin 0 is sub-audio gray
        assert_eq!((colors[0].r, colors[0].g, colors[0].b), (30, 30, 30));
        // Top bins are ultrasonic white (bin 511 at ~23.9 kHz)
        assert_eq!((colors[511].r, colors[511].g, colors[511].b), (255, 255, 255));
        // Mid bins are colored
        let mid = colors[100];
        assert!(mid.r != mid.g || mid.g != mid.b, "audible bins should be hued");
    }

    #[test]
    fn test_determinism() {
        for note in 0..128 {
            assert_eq!(note_to_color(note), note_to_color(note));
        }
    }
}
