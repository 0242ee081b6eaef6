//! Evolution driver: the evaluate → select → reproduce loop.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::schema::{
    ConfigError, EvolutionConfig, EvolutionHistory, EvolutionPhase, EvolutionResult,
    EvolutionStats, Organism, Population, mean_and_std,
};

use super::domain::{Domain, EvolutionError};
use super::fitness::FitnessEvaluator;
use super::observer::{GenerationObserver, GenerationProgress};
use super::population::{best_index, fitness_values, initialize};
use super::reproduction::reproduce;
use super::selection::{pair_survivors, select_survivors};
use super::termination::{ConfiguredPolicy, TerminationPolicy};

/// Evolution engine that runs the search for a single domain.
pub struct EvolutionEngine<D: Domain> {
    config: EvolutionConfig,
    domain: D,
    rng: StdRng,
    evaluator: FitnessEvaluator,
    phase: EvolutionPhase,
    generation: usize,
    cancelled: Arc<AtomicBool>,
}

impl<D: Domain> EvolutionEngine<D> {
    /// Create a new evolution engine.
    ///
    /// The configuration is validated here, before any plugin is called.
    pub fn new(config: EvolutionConfig, domain: D) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            domain,
            rng,
            evaluator: FitnessEvaluator::new(),
            phase: EvolutionPhase::Initializing,
            generation: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Replace the random source driving initialization and reproduction.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    pub fn phase(&self) -> EvolutionPhase {
        self.phase
    }

    /// Completed generations of the current or last run.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Get cancellation handle.
    ///
    /// Raising the flag stops a run driven by the configured policy at the
    /// next stop check.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Termination policy described by the configuration.
    pub fn configured_policy(&self) -> ConfiguredPolicy {
        ConfiguredPolicy::from_config(&self.config, self.cancel_handle())
    }

    /// Run evolution (blocking) with the configured termination policy.
    pub fn run(&mut self) -> Result<EvolutionResult<D::Genome>, EvolutionError> {
        let policy = self.configured_policy();
        self.run_with(policy, &mut |_: &GenerationProgress, _: &Organism<D::Genome>| {})
    }

    /// Run evolution with the configured policy and a per-generation callback.
    pub fn run_with_callback<F>(
        &mut self,
        mut callback: F,
    ) -> Result<EvolutionResult<D::Genome>, EvolutionError>
    where
        F: FnMut(&GenerationProgress, &Organism<D::Genome>),
    {
        let policy = self.configured_policy();
        self.run_with(policy, &mut callback)
    }

    /// Run evolution until `policy` fires, notifying `observer` once per
    /// completed generation.
    ///
    /// The policy sees the best organism of each evaluated population and
    /// the number of generations completed before it, so a budget of `n`
    /// produces exactly `n` new generations.
    pub fn run_with<P, O>(
        &mut self,
        mut policy: P,
        observer: &mut O,
    ) -> Result<EvolutionResult<D::Genome>, EvolutionError>
    where
        P: TerminationPolicy<D::Genome>,
        O: GenerationObserver<D::Genome> + ?Sized,
    {
        let start_time = Instant::now();

        self.phase = EvolutionPhase::Initializing;
        self.generation = 0;
        self.evaluator = FitnessEvaluator::new();
        let mut history = EvolutionHistory::default();

        info!(
            "Starting evolution: population={}, max_iterations={:?}, acceptable_score={:?}",
            self.config.population_size, self.config.max_iterations, self.config.acceptable_score
        );

        let mut population: Population<D::Genome> =
            initialize(&self.domain, self.config.population_size, &mut self.rng)?;
        self.phase = EvolutionPhase::Stepping;

        let best = loop {
            population = self.evaluator.evaluate(&self.domain, population)?;

            let fitness = fitness_values(&population);
            history.record(&fitness);

            let best = best_index(&population);
            if policy.should_stop(best.map(|i| &population[i]), self.generation) {
                break best;
            }
            let best = best.ok_or(EvolutionError::EmptyPopulation)?;
            let best_fitness = population[best]
                .fitness
                .ok_or(EvolutionError::UnscoredOrganism { index: best })?;

            self.generation += 1;

            let (avg_fitness, _) = mean_and_std(&fitness);
            let progress = GenerationProgress {
                generation: self.generation,
                best_fitness,
                avg_fitness,
                evaluations: self.evaluator.evaluations(),
            };
            debug!(
                "Generation {}: best={:.4} avg={:.4} evaluations={}",
                progress.generation, best_fitness, avg_fitness, progress.evaluations
            );
            observer.on_generation(&progress, &population[best]);

            let survivors = select_survivors(population)?;
            let pairs = pair_survivors(survivors)?;
            population = reproduce(&self.domain, pairs, &mut self.rng)?;
        };

        self.phase = EvolutionPhase::Done;

        let best = best.ok_or(EvolutionError::EmptyPopulation)?;
        let final_fitness = fitness_values(&population);
        let (final_avg_fitness, _) = mean_and_std(&final_fitness);
        let best = population.swap_remove(best);

        let stats = EvolutionStats {
            generations: self.generation,
            total_evaluations: self.evaluator.evaluations(),
            best_fitness: best.fitness.unwrap_or(f64::INFINITY),
            final_avg_fitness,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
            stop_reason: policy.reason(),
        };

        info!(
            "Evolution finished after {} generations ({:?}): best={:.4}, evaluations={}",
            stats.generations, stats.stop_reason, stats.best_fitness, stats.total_evaluations
        );

        Ok(EvolutionResult {
            best,
            stats,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::domain::PluginStage;
    use crate::compute::evolution::domain::testing::{CountingDomain, Tagged};
    use crate::compute::evolution::termination::{MaxIterations, TerminationPolicyExt};
    use crate::schema::StopReason;
    use std::sync::atomic::Ordering;

    fn config(population_size: usize, max_iterations: usize) -> EvolutionConfig {
        EvolutionConfig {
            population_size,
            max_iterations: Some(max_iterations),
            acceptable_score: None,
            stagnation_limit: None,
            random_seed: Some(42),
        }
    }

    #[test]
    fn test_invalid_population_size_runs_nothing() {
        let domain = CountingDomain::new(0);

        let result = EvolutionEngine::new(config(10, 5), &domain);

        assert!(matches!(result, Err(ConfigError::InvalidPopulationSize(10))));
        assert_eq!(domain.random_calls.get(), 0);
        assert_eq!(domain.total_score_calls(), 0);
    }

    #[test]
    fn test_budget_runs_exact_generation_count() {
        let domain = CountingDomain::new(0);
        let mut engine = EvolutionEngine::new(config(8, 7), &domain).unwrap();

        let mut seen = Vec::new();
        let result = engine
            .run_with_callback(|p, _| seen.push(p.generation))
            .unwrap();

        assert_eq!(result.stats.generations, 7);
        assert_eq!(result.stats.stop_reason, StopReason::MaxIterations);
        assert_eq!(seen, (1..=7).collect::<Vec<_>>());
        // One evaluated population per generation plus the initial one.
        assert_eq!(result.history.len(), 8);
        assert_eq!(engine.phase(), EvolutionPhase::Done);
        assert_eq!(engine.generation(), 7);
    }

    #[test]
    fn test_stops_on_first_firing_cycle() {
        let domain = CountingDomain::new(0);
        let mut engine = EvolutionEngine::new(config(4, 100), &domain).unwrap();

        let mut checked = Vec::new();
        let policy = |_: Option<&Organism<Tagged>>, iteration: usize| {
            checked.push(iteration);
            iteration == 3
        };
        let result = engine.run_with(policy, &mut |_: &GenerationProgress, _: &Organism<Tagged>| {}).unwrap();

        assert_eq!(checked, vec![0, 1, 2, 3]);
        assert_eq!(result.stats.generations, 3);
        assert_eq!(result.stats.stop_reason, StopReason::Custom);
    }

    #[test]
    fn test_each_organism_scored_once_and_size_kept() {
        let domain = CountingDomain::new(0);
        let mut engine = EvolutionEngine::new(config(12, 20), &domain).unwrap();

        let result = engine.run().unwrap();

        // Initial population, then 3 fresh children per pair each generation.
        let expected = 12 + 20 * 9;
        assert_eq!(result.stats.total_evaluations, expected);
        assert_eq!(domain.total_score_calls() as u64, expected);
        assert_eq!(domain.max_calls_per_genome(), 1);
    }

    #[test]
    fn test_best_fitness_never_regresses() {
        let domain = CountingDomain::new(0);
        let mut engine = EvolutionEngine::new(config(16, 60), &domain).unwrap();

        let result = engine.run().unwrap();
        let best = &result.history.best_fitness;

        assert!(best.windows(2).all(|w| w[1] <= w[0]), "best regressed: {best:?}");
        assert_eq!(result.stats.best_fitness, *best.last().unwrap());
        assert_eq!(result.best.fitness, Some(result.stats.best_fitness));
    }

    #[test]
    fn test_reaches_acceptable_score() {
        let domain = CountingDomain::new(0);
        let config = EvolutionConfig {
            population_size: 20,
            max_iterations: Some(5000),
            acceptable_score: Some(0.0),
            stagnation_limit: None,
            random_seed: Some(7),
        };
        let mut engine = EvolutionEngine::new(config, &domain).unwrap();

        let result = engine.run().unwrap();

        assert_eq!(result.stats.stop_reason, StopReason::TargetReached);
        assert_eq!(result.best.fitness, Some(0.0));
        assert_eq!(result.best.genome.value, 0);
    }

    #[test]
    fn test_same_seed_same_result() {
        let run = || {
            let domain = CountingDomain::new(3);
            let mut engine = EvolutionEngine::new(config(8, 25), &domain).unwrap();
            let result = engine.run().unwrap();
            (result.best.genome, result.history.best_fitness)
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_with_rng_overrides_seed() {
        let domain = CountingDomain::new(0);
        let a = EvolutionEngine::new(config(4, 0), &domain)
            .unwrap()
            .with_rng(StdRng::seed_from_u64(1))
            .run()
            .unwrap();
        let b = EvolutionEngine::new(config(4, 0), &domain)
            .unwrap()
            .with_rng(StdRng::seed_from_u64(1))
            .run()
            .unwrap();

        assert_eq!(a.best.genome.value, b.best.genome.value);
        assert_eq!(a.stats.generations, 0);
    }

    #[test]
    fn test_cancellation() {
        let domain = CountingDomain::new(0);
        let mut engine = EvolutionEngine::new(config(8, 100), &domain).unwrap();

        // Cancel immediately
        engine.cancel_handle().store(true, Ordering::Relaxed);

        let result = engine.run().unwrap();
        assert_eq!(result.stats.stop_reason, StopReason::Cancelled);
        assert_eq!(result.stats.generations, 0);
        assert!(result.best.fitness.is_some());
    }

    #[test]
    fn test_combined_policy() {
        let domain = CountingDomain::new(0);
        let mut engine = EvolutionEngine::new(config(8, 100), &domain).unwrap();

        let policy = MaxIterations(4).or(|_: Option<&Organism<Tagged>>, _: usize| false);
        let result = engine.run_with(policy, &mut |_: &GenerationProgress, _: &Organism<Tagged>| {}).unwrap();

        assert_eq!(result.stats.generations, 4);
        assert_eq!(result.stats.stop_reason, StopReason::MaxIterations);
    }

    #[test]
    fn test_plugin_failure_propagates() {
        let domain = CountingDomain {
            fail_score_after: Some(30),
            ..CountingDomain::new(0)
        };
        let mut engine = EvolutionEngine::new(config(8, 100), &domain).unwrap();

        let err = engine.run().unwrap_err();
        assert!(matches!(
            err,
            EvolutionError::Plugin {
                stage: PluginStage::Score,
                ..
            }
        ));
    }
}
