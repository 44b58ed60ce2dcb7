//! Wavetable oscillator with band-limited tables
//!
//! Four 2048-sample tables: a pure sine plus saw, square, and triangle built
//! by additive harmonic summation up to the 16th harmonic so the classic
//! shapes stay alias-free into the upper octaves. Playback interpolates
//! bilinearly: linearly inside each table by phase and linearly between
//! adjacent tables by a fractional table position.
//!
//! The tables are computed once per process and shared read-only by every
//! oscillator instance.

use crate::math::{clamp, lerp, TWO_PI};
use lazy_static::lazy_static;

pub const WAVETABLE_SIZE: usize = 2048;
pub const NUM_TABLES: usize = 4;

lazy_static! {
    /// Shared band-limited table set: sine, saw, square, triangle.
    static ref TABLES: [Vec<f32>; NUM_TABLES] = build_tables();
}

fn build_tables() -> [Vec<f32>; NUM_TABLES] {
    let mut sine = vec![0.0f32; WAVETABLE_SIZE];
    let mut saw = vec![0.0f32; WAVETABLE_SIZE];
    let mut square = vec![0.0f32; WAVETABLE_SIZE];
    let mut triangle = vec![0.0f32; WAVETABLE_SIZE];

    for i in 0..WAVETABLE_SIZE {
        let phase = i as f32 / WAVETABLE_SIZE as f32;

        sine[i] = (phase * TWO_PI).sin();

        // Saw: all harmonics at 1/h
        let mut s = 0.0f32;
        for h in 1..=16 {
            s += (1.0 / h as f32) * (h as f32 * phase * TWO_PI).sin();
        }
        saw[i] = s * 0.5;

        // Square: odd harmonics at 1/h
        let mut q = 0.0f32;
        let mut h = 1;
        while h <= 16 {
            q += (1.0 / h as f32) * (h as f32 * phase * TWO_PI).sin();
            h += 2;
        }
        square[i] = q * 0.8;

        // Triangle: odd harmonics at 1/h^2 with alternating sign
        let mut t = 0.0f32;
        let mut h = 1;
        while h <= 16 {
            let sign = if ((h - 1) / 2) % 2 == 1 { -1.0 } else { 1.0 };
            t += sign * (1.0 / (h * h) as f32) * (h as f32 * phase * TWO_PI).sin();
            h += 2;
        }
        triangle[i] = t * 0.8;
    }

    [sine, saw, square, triangle]
}

/// Band-limited wavetable oscillator with table-position morphing.
pub struct WavetableOscillator {
    table_position: f32,
    phase: f32,
    frequency: f32,
    sample_rate: f32,
    phase_increment: f32,
}

impl WavetableOscillator {
    pub fn new(sample_rate: f32) -> Self {
        let mut osc = Self {
            table_position: 0.0,
            phase: 0.0,
            frequency: 440.0,
            sample_rate,
            phase_increment: 0.0,
        };
        osc.set_frequency(440.0);
        osc
    }

    pub fn set_frequency(&mut self, freq: f32) {
        self.frequency = freq;
        self.phase_increment = freq / self.sample_rate;
    }

    /// Fractional position across the table set, clamped to [0, tables-1].
    /// 0 = sine, 1 = saw, 2 = square, 3 = triangle.
    pub fn set_position(&mut self, position: f32) {
        self.table_position = clamp(position, 0.0, (NUM_TABLES - 1) as f32);
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn process(&mut self) -> f32 {
        let table_a = self.table_position as usize;
        let table_b = (table_a + 1).min(NUM_TABLES - 1);
        let table_frac = self.table_position - table_a as f32;

        let index = self.phase * WAVETABLE_SIZE as f32;
        let idx_a = (index as usize) % WAVETABLE_SIZE;
        let idx_b = (idx_a + 1) % WAVETABLE_SIZE;
        let frac = index - index.floor();

        // Bilinear interpolation: within each table, then across tables
        let val_a = lerp(TABLES[table_a][idx_a], TABLES[table_a][idx_b], frac);
        let val_b = lerp(TABLES[table_b][idx_a], TABLES[table_b][idx_b], frac);
        let out = lerp(val_a, val_b, table_frac);

        self.phase += self.phase_increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }

    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process();
        }
    }
}
