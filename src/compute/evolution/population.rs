//! Population construction and best-of-population lookup.

use rand::Rng;

use crate::schema::{Organism, Population, validate_population_size};

use super::domain::{Domain, EvolutionError, PluginStage};

/// Build the initial population by calling the domain factory `size` times.
///
/// The size is validated before the factory is touched.
pub fn initialize<D, R>(domain: &D, size: usize, rng: &mut R) -> Result<Population<D::Genome>, EvolutionError>
where
    D: Domain,
    R: Rng + ?Sized,
{
    validate_population_size(size)?;

    (0..size)
        .map(|_| {
            domain
                .random_genome(rng)
                .map(Organism::new)
                .map_err(|e| EvolutionError::plugin(PluginStage::Initialize, e))
        })
        .collect()
}

/// Index of the organism with the lowest fitness.
///
/// Ties go to the leftmost organism. Unscored organisms never win, so the
/// result is `None` only when nothing has been scored.
pub fn best_index<G>(population: &[Organism<G>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, organism) in population.iter().enumerate() {
        let Some(fitness) = organism.fitness else {
            continue;
        };
        match best {
            Some((_, current)) if current <= fitness => {}
            _ => best = Some((index, fitness)),
        }
    }

    best.map(|(index, _)| index)
}

/// The best organism of a population, see [`best_index`].
pub fn best_of<G>(population: &[Organism<G>]) -> Option<&Organism<G>> {
    best_index(population).map(|i| &population[i])
}

/// Fitness values of a fully scored population.
pub(crate) fn fitness_values<G>(population: &[Organism<G>]) -> Vec<f64> {
    population.iter().filter_map(|o| o.fitness).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::domain::testing::CountingDomain;
    use crate::schema::ConfigError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scored(values: &[f64]) -> Vec<Organism<usize>> {
        values
            .iter()
            .enumerate()
            .map(|(i, &f)| Organism::scored(i, f))
            .collect()
    }

    #[test]
    fn test_initialize_builds_unscored_population() {
        let domain = CountingDomain::new(0);
        let mut rng = StdRng::seed_from_u64(1);

        let population = initialize(&domain, 12, &mut rng).unwrap();

        assert_eq!(population.len(), 12);
        assert!(population.iter().all(|o| o.fitness.is_none()));
        assert_eq!(domain.random_calls.get(), 12);
    }

    #[test]
    fn test_initialize_rejects_bad_size_before_factory() {
        let domain = CountingDomain::new(0);
        let mut rng = StdRng::seed_from_u64(1);

        let err = initialize(&domain, 10, &mut rng).unwrap_err();

        assert!(matches!(
            err,
            EvolutionError::Config(ConfigError::InvalidPopulationSize(10))
        ));
        assert_eq!(domain.random_calls.get(), 0);
    }

    #[test]
    fn test_best_index_leftmost_wins_ties() {
        let population = scored(&[4.0, 2.0, 7.0, 2.0]);
        assert_eq!(best_index(&population), Some(1));
        assert_eq!(best_of(&population).unwrap().genome, 1);
    }

    #[test]
    fn test_best_index_skips_unscored() {
        let mut population = scored(&[4.0, 2.0]);
        population.insert(0, Organism::new(99));

        assert_eq!(best_index(&population), Some(2));
        assert_eq!(best_index::<usize>(&[Organism::new(1)]), None);
        assert_eq!(best_index::<usize>(&[]), None);
    }
}
