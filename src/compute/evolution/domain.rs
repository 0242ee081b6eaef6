//! Problem-domain plugin interface.
//!
//! The engine never inspects a genome. Everything that knows what a genome
//! means (how to create one, what it costs, how two combine, how one
//! changes) lives behind [`Domain`].

use std::fmt;

use rand::Rng;

/// Capability set a problem domain supplies to the engine.
///
/// All operations are fallible; an `Err` aborts the run and is returned to
/// the caller of [`EvolutionEngine::run`](super::EvolutionEngine::run)
/// without retry.
pub trait Domain {
    /// Domain-owned candidate representation.
    type Genome;
    /// Failure raised by any of the plugin operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a fresh random genome for the initial population.
    fn random_genome<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self::Genome, Self::Error>;

    /// Cost of a genome. Lower is better, `0.0` is the conventional optimum.
    ///
    /// May be expensive; the engine calls it at most once per organism.
    fn score(&self, genome: &Self::Genome) -> Result<f64, Self::Error>;

    /// Combine two parent genomes into one child genome.
    fn crossover<R: Rng + ?Sized>(
        &self,
        first: &Self::Genome,
        second: &Self::Genome,
        rng: &mut R,
    ) -> Result<Self::Genome, Self::Error>;

    /// Produce a perturbed copy of a genome.
    fn mutate<R: Rng + ?Sized>(
        &self,
        genome: &Self::Genome,
        rng: &mut R,
    ) -> Result<Self::Genome, Self::Error>;
}

impl<D: Domain + ?Sized> Domain for &D {
    type Genome = D::Genome;
    type Error = D::Error;

    fn random_genome<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self::Genome, Self::Error> {
        (**self).random_genome(rng)
    }

    fn score(&self, genome: &Self::Genome) -> Result<f64, Self::Error> {
        (**self).score(genome)
    }

    fn crossover<R: Rng + ?Sized>(
        &self,
        first: &Self::Genome,
        second: &Self::Genome,
        rng: &mut R,
    ) -> Result<Self::Genome, Self::Error> {
        (**self).crossover(first, second, rng)
    }

    fn mutate<R: Rng + ?Sized>(
        &self,
        genome: &Self::Genome,
        rng: &mut R,
    ) -> Result<Self::Genome, Self::Error> {
        (**self).mutate(genome, rng)
    }
}

/// Plugin operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginStage {
    Initialize,
    Score,
    Crossover,
    Mutate,
}

impl fmt::Display for PluginStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initialize => "random genome",
            Self::Score => "score",
            Self::Crossover => "crossover",
            Self::Mutate => "mutate",
        };
        f.write_str(name)
    }
}

/// Errors raised while running the evolution engine.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] crate::schema::ConfigError),
    #[error("Plugin {stage} operation failed: {source}")]
    Plugin {
        stage: PluginStage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Score function returned NaN for organism {index}")]
    InvalidScore { index: usize },
    #[error("Organism {index} reached selection without a fitness value")]
    UnscoredOrganism { index: usize },
    #[error("Survivors must form whole pairs, got {0}")]
    OddSurvivorCount(usize),
    #[error("Population has no scored organism")]
    EmptyPopulation,
}

impl EvolutionError {
    /// Wrap a domain error raised during `stage`.
    pub fn plugin<E>(stage: PluginStage, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Plugin {
            stage,
            source: Box::new(error),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Small deterministic domains shared by the engine tests.

    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    use rand::Rng;

    use super::Domain;

    #[derive(Debug, thiserror::Error)]
    #[error("{0}")]
    pub struct TestError(pub &'static str);

    /// Genome is a single integer; cost is its distance to `target`.
    ///
    /// Every genome gets a unique id so score calls can be counted per
    /// organism lifetime.
    #[derive(Debug, Default)]
    pub struct CountingDomain {
        pub target: i64,
        pub next_id: Cell<u64>,
        pub score_calls: RefCell<HashMap<u64, usize>>,
        pub random_calls: Cell<usize>,
        pub fail_score_after: Option<usize>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Tagged {
        pub id: u64,
        pub value: i64,
    }

    impl CountingDomain {
        pub fn new(target: i64) -> Self {
            Self {
                target,
                ..Default::default()
            }
        }

        fn tag(&self, value: i64) -> Tagged {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            Tagged { id, value }
        }

        pub fn total_score_calls(&self) -> usize {
            self.score_calls.borrow().values().sum()
        }

        pub fn max_calls_per_genome(&self) -> usize {
            self.score_calls.borrow().values().copied().max().unwrap_or(0)
        }
    }

    impl Domain for CountingDomain {
        type Genome = Tagged;
        type Error = TestError;

        fn random_genome<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Tagged, TestError> {
            self.random_calls.set(self.random_calls.get() + 1);
            Ok(self.tag(rng.gen_range(-1000..=1000)))
        }

        fn score(&self, genome: &Tagged) -> Result<f64, TestError> {
            if let Some(limit) = self.fail_score_after
                && self.total_score_calls() >= limit
            {
                return Err(TestError("score exploded"));
            }
            *self.score_calls.borrow_mut().entry(genome.id).or_default() += 1;
            Ok((genome.value - self.target).abs() as f64)
        }

        fn crossover<R: Rng + ?Sized>(
            &self,
            first: &Tagged,
            second: &Tagged,
            rng: &mut R,
        ) -> Result<Tagged, TestError> {
            let value = if rng.gen_bool(0.5) {
                first.value
            } else {
                second.value
            };
            Ok(self.tag(value))
        }

        fn mutate<R: Rng + ?Sized>(&self, genome: &Tagged, rng: &mut R) -> Result<Tagged, TestError> {
            Ok(self.tag(genome.value + rng.gen_range(-5..=5)))
        }
    }
}
