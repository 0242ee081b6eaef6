//! Fitness evaluation with per-organism caching.

use crate::schema::Population;

use super::domain::{Domain, EvolutionError, PluginStage};

/// Attaches costs to unscored organisms and counts score-function calls.
///
/// Organisms that already carry a fitness pass through untouched, so an
/// elite carried across generations is never scored twice.
#[derive(Debug, Default)]
pub struct FitnessEvaluator {
    evaluations: u64,
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total score-function invocations so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Score every organism whose fitness is absent, in population order.
    pub fn evaluate<D: Domain>(
        &mut self,
        domain: &D,
        mut population: Population<D::Genome>,
    ) -> Result<Population<D::Genome>, EvolutionError> {
        for (index, organism) in population.iter_mut().enumerate() {
            if organism.fitness.is_some() {
                continue;
            }

            let fitness = domain
                .score(&organism.genome)
                .map_err(|e| EvolutionError::plugin(PluginStage::Score, e))?;
            self.evaluations += 1;

            if fitness.is_nan() {
                return Err(EvolutionError::InvalidScore { index });
            }
            organism.fitness = Some(fitness);
        }

        Ok(population)
    }
}
