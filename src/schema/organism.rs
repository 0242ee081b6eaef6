//! Organism and population types.

use serde::{Deserialize, Serialize};

/// A candidate solution: a domain-owned genome plus its cost once scored.
///
/// Lower fitness is better and `0.0` is the conventional optimum. The genome
/// is never modified in place; crossover and mutation build new genomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organism<G> {
    /// The genome.
    pub genome: G,
    /// Cost assigned by the score function, `None` until evaluated.
    pub fitness: Option<f64>,
}

impl<G> Organism<G> {
    /// Wrap a freshly created genome. Fitness starts absent.
    pub fn new(genome: G) -> Self {
        Self {
            genome,
            fitness: None,
        }
    }

    /// Build an organism whose cost is already known.
    pub fn scored(genome: G, fitness: f64) -> Self {
        Self {
            genome,
            fitness: Some(fitness),
        }
    }

    /// Whether the score function has been applied.
    #[inline]
    pub fn is_scored(&self) -> bool {
        self.fitness.is_some()
    }
}

/// One generation of organisms.
pub type Population<G> = Vec<Organism<G>>;
