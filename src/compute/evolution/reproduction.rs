//! Offspring generation with elitist carry-over.

use log::trace;
use rand::Rng;

use crate::schema::{Organism, Population};

use super::domain::{Domain, EvolutionError, PluginStage};

/// Offspring bred from each pair, in addition to the carried-over elite.
pub const OFFSPRING_PER_PAIR: usize = 3;

/// Build the next generation from breeding pairs.
///
/// Each pair yields three independently crossed-over and mutated children
/// followed by the fitter parent, unchanged and still scored. When both
/// parents cost the same, the second one is kept.
pub fn reproduce<D, R>(
    domain: &D,
    pairs: Vec<(Organism<D::Genome>, Organism<D::Genome>)>,
    rng: &mut R,
) -> Result<Population<D::Genome>, EvolutionError>
where
    D: Domain,
    R: Rng + ?Sized,
{
    let mut next = Vec::with_capacity(pairs.len() * (OFFSPRING_PER_PAIR + 1));

    for (first, second) in pairs {
        for _ in 0..OFFSPRING_PER_PAIR {
            next.push(breed(domain, &first, &second, rng)?);
        }

        let elite = if is_strictly_better(&first, &second) {
            first
        } else {
            second
        };
        trace!("Carrying over elite with fitness {:?}", elite.fitness);
        next.push(elite);
    }

    Ok(next)
}

/// One child: `mutate(crossover(first, second))`, unscored.
fn breed<D, R>(
    domain: &D,
    first: &Organism<D::Genome>,
    second: &Organism<D::Genome>,
    rng: &mut R,
) -> Result<Organism<D::Genome>, EvolutionError>
where
    D: Domain,
    R: Rng + ?Sized,
{
    let child = domain
        .crossover(&first.genome, &second.genome, rng)
        .map_err(|e| EvolutionError::plugin(PluginStage::Crossover, e))?;
    let child = domain
        .mutate(&child, rng)
        .map_err(|e| EvolutionError::plugin(PluginStage::Mutate, e))?;
    Ok(Organism::new(child))
}

fn is_strictly_better<G>(a: &Organism<G>, b: &Organism<G>) -> bool {
    match (a.fitness, b.fitness) {
        (Some(a), Some(b)) => a < b,
        _ => false,
    }
}
