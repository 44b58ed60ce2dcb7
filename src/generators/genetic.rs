//! Genetic-algorithm melody evolver
//!
//! A fixed population of 16-note genomes evolved by tournament selection,
//! single-point crossover, and per-note mutation. The fitness function
//! encodes simple counterpoint taste: reward stepwise motion and a final
//! resolution to the tonic, penalize wide leaps and notes outside the
//! comfortable range. The best genome ever seen is tracked separately, so
//! its fitness never decreases across generations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const POPULATION: usize = 32;
pub const GENOME_LENGTH: usize = 16;

#[derive(Debug, Clone, Copy)]
pub struct Genome {
    pub notes: [i32; GENOME_LENGTH],
    pub fitness: f32,
}

impl Default for Genome {
    fn default() -> Self {
        Self {
            notes: [60; GENOME_LENGTH],
            fitness: 0.0,
        }
    }
}

/// Evolving melody population.
pub struct GeneticMelody {
    population: [Genome; POPULATION],
    best: Genome,
    mutation_rate: f32,
    crossover_rate: f32,
    generation: u64,
    root_note: i32,
    scale: [i32; 7],
    rng: StdRng,
}

impl GeneticMelody {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let scale = [0, 2, 4, 5, 7, 9, 11]; // major
        let root_note = 60;

        let mut population = [Genome::default(); POPULATION];
        for genome in population.iter_mut() {
            for note in genome.notes.iter_mut() {
                let degree = rng.gen_range(0..scale.len());
                let octave = rng.gen_range(-1..=1);
                *note = root_note + scale[degree] + octave * 12;
            }
        }

        Self {
            population,
            best: Genome::default(),
            mutation_rate: 0.1,
            crossover_rate: 0.7,
            generation: 0,
            root_note,
            scale,
            rng,
        }
    }

    pub fn set_mutation_rate(&mut self, rate: f32) {
        self.mutation_rate = rate.clamp(0.0, 1.0);
    }

    pub fn set_crossover_rate(&mut self, rate: f32) {
        self.crossover_rate = rate.clamp(0.0, 1.0);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The best genome seen across all generations so far.
    pub fn best(&self) -> &Genome {
        &self.best
    }

    fn evaluate(root_note: i32, genome: &Genome) -> f32 {
        let mut fitness = 100.0f32;

        for i in 1..GENOME_LENGTH {
            let interval = (genome.notes[i] - genome.notes[i - 1]).abs();
            if interval > 12 {
                fitness -= 5.0;
            } else if interval > 7 {
                fitness -= 2.0;
            } else if interval <= 2 {
                fitness += 1.0; // stepwise motion
            }
        }

        // Resolution to the tonic on the final note
        if genome.notes[GENOME_LENGTH - 1].rem_euclid(12) == root_note.rem_euclid(12) {
            fitness += 10.0;
        }

        for &note in &genome.notes {
            if !(48..=84).contains(&note) {
                fitness -= 3.0;
            }
        }

        fitness.max(0.0)
    }

    /// One generation: evaluate, select, crossover, mutate.
    pub fn evolve(&mut self) {
        for genome in self.population.iter_mut() {
            genome.fitness = Self::evaluate(self.root_note, genome);
            if genome.fitness > self.best.fitness {
                self.best = *genome;
            }
        }

        let mut new_population = [Genome::default(); POPULATION];

        for child in new_population.iter_mut() {
            // Tournament-of-two selection, twice
            let mut pick = |rng: &mut StdRng| {
                let a = rng.gen_range(0..POPULATION);
                let b = rng.gen_range(0..POPULATION);
                if self.population[a].fitness > self.population[b].fitness {
                    self.population[a]
                } else {
                    self.population[b]
                }
            };
            let parent1 = pick(&mut self.rng);
            let parent2 = pick(&mut self.rng);

            // Single-point crossover
            if self.rng.gen::<f32>() < self.crossover_rate {
                let point = self.rng.gen_range(1..GENOME_LENGTH - 1);
                for n in 0..GENOME_LENGTH {
                    child.notes[n] = if n < point {
                        parent1.notes[n]
                    } else {
                        parent2.notes[n]
                    };
                }
            } else {
                child.notes = parent1.notes;
            }

            // Per-note mutation: small chromatic drift
            for note in child.notes.iter_mut() {
                if self.rng.gen::<f32>() < self.mutation_rate {
                    *note += self.rng.gen_range(-3..=3);
                }
            }
        }

        self.population = new_population;
        self.generation += 1;
    }

    /// Copy of the best melody for playback.
    pub fn best_melody(&self) -> [i32; GENOME_LENGTH] {
        self.best.notes
    }
}
