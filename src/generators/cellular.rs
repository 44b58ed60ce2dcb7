//! Cellular-automaton rhythm generator
//!
//! A fixed-width row of cells evolved one generation per `step` by a
//! Wolfram elementary rule (the rule byte indexes the 3-neighbor pattern
//! table). Neighbors wrap around, so patterns circulate instead of dying at
//! the edges. Live cells become per-lane drum triggers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const CELLULAR_MAX_WIDTH: usize = 64;

/// Wolfram-rule rhythm automaton.
pub struct CellularRhythm {
    cells: [u8; CELLULAR_MAX_WIDTH],
    next_cells: [u8; CELLULAR_MAX_WIDTH],
    width: usize,
    rule: u8,
    generation: u64,
    rng: StdRng,
}

impl CellularRhythm {
    /// Starts with a single live cell in the center.
    pub fn new(width: usize, rule: u8, seed: u64) -> Self {
        let width = width.clamp(1, CELLULAR_MAX_WIDTH);
        let mut cells = [0u8; CELLULAR_MAX_WIDTH];
        cells[width / 2] = 1;
        Self {
            cells,
            next_cells: [0u8; CELLULAR_MAX_WIDTH],
            width,
            rule,
            generation: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn set_rule(&mut self, rule: u8) {
        self.rule = rule;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Re-seed the row randomly with the given live-cell density.
    pub fn randomize(&mut self, density: f32) {
        for cell in self.cells.iter_mut().take(self.width) {
            *cell = if self.rng.gen::<f32>() < density { 1 } else { 0 };
        }
    }

    /// Reset to the single-center-cell state.
    pub fn reset(&mut self) {
        self.cells = [0u8; CELLULAR_MAX_WIDTH];
        self.cells[self.width / 2] = 1;
        self.generation = 0;
    }

    /// Advance one generation with wraparound neighbors.
    pub fn step(&mut self) {
        for i in 0..self.width {
            let left = self.cells[(i + self.width - 1) % self.width];
            let center = self.cells[i];
            let right = self.cells[(i + 1) % self.width];

            let pattern = (left << 2) | (center << 1) | right;
            self.next_cells[i] = (self.rule >> pattern) & 1;
        }
        self.cells[..self.width].copy_from_slice(&self.next_cells[..self.width]);
        self.generation += 1;
    }

    /// Current generation as boolean triggers, one per lane.
    pub fn triggers(&self, out: &mut [bool]) {
        for (i, slot) in out.iter_mut().enumerate().take(self.width) {
            *slot = self.cells[i] != 0;
        }
    }

    pub fn cell(&self, index: usize) -> bool {
        index < self.width && self.cells[index] != 0
    }
}
