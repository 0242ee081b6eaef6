//! Best-half truncation selection and adjacent pairing.

use crate::schema::{Organism, Population};

use super::domain::EvolutionError;

/// Keep the better half of an evaluated population.
///
/// The population is stably sorted worst-first (descending cost) and the
/// trailing half is kept, so the survivors come out ordered from the
/// weakest kept organism to the best, and equal costs keep their input order.
pub fn select_survivors<G>(mut population: Population<G>) -> Result<Population<G>, EvolutionError> {
    if let Some(index) = population.iter().position(|o| o.fitness.is_none()) {
        return Err(EvolutionError::UnscoredOrganism { index });
    }
    if population.len() % 2 != 0 {
        return Err(EvolutionError::OddSurvivorCount(population.len()));
    }

    population.sort_by(|a, b| cost(b).total_cmp(&cost(a)));

    let half = population.len() / 2;
    Ok(population.split_off(half))
}

/// Group survivors into adjacent breeding pairs `(s[0], s[1]), (s[2], s[3]), ...`.
pub fn pair_survivors<G>(survivors: Population<G>) -> Result<Vec<(Organism<G>, Organism<G>)>, EvolutionError> {
    if survivors.len() % 2 != 0 {
        return Err(EvolutionError::OddSurvivorCount(survivors.len()));
    }

    let mut pairs = Vec::with_capacity(survivors.len() / 2);
    let mut iter = survivors.into_iter();
    while let (Some(first), Some(second)) = (iter.next(), iter.next()) {
        pairs.push((first, second));
    }
    Ok(pairs)
}

fn cost<G>(organism: &Organism<G>) -> f64 {
    organism.fitness.unwrap_or(f64::INFINITY)
}
