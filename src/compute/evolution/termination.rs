//! Termination policies.
//!
//! A policy is consulted once per cycle with the best organism of the
//! freshly evaluated population and the number of completed generations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::schema::{EvolutionConfig, Organism, StopReason};

/// Decides when the evolution loop stops.
pub trait TerminationPolicy<G> {
    /// Return `true` to stop. `best` is `None` when nothing is scored yet.
    fn should_stop(&mut self, best: Option<&Organism<G>>, iteration: usize) -> bool;

    /// Why the policy fired. Only meaningful after `should_stop` returned `true`.
    fn reason(&self) -> StopReason {
        StopReason::Custom
    }
}

/// Combinators available on every policy.
pub trait TerminationPolicyExt: Sized {
    /// Stop when either policy says so.
    fn or<P>(self, other: P) -> Either<Self, P> {
        Either {
            left: self,
            right: other,
            fired: None,
        }
    }
}

impl<T> TerminationPolicyExt for T {}

impl<G, F> TerminationPolicy<G> for F
where
    F: FnMut(Option<&Organism<G>>, usize) -> bool,
{
    fn should_stop(&mut self, best: Option<&Organism<G>>, iteration: usize) -> bool {
        self(best, iteration)
    }
}

/// Generation budget: stops once the completed generation count reaches the limit.
#[derive(Debug, Clone, Copy)]
pub struct MaxIterations(pub usize);

impl<G> TerminationPolicy<G> for MaxIterations {
    fn should_stop(&mut self, _best: Option<&Organism<G>>, iteration: usize) -> bool {
        iteration >= self.0
    }

    fn reason(&self) -> StopReason {
        StopReason::MaxIterations
    }
}

/// Score threshold: stops once the best cost is at or below the threshold.
#[derive(Debug, Clone, Copy)]
pub struct AcceptableScore(pub f64);

impl<G> TerminationPolicy<G> for AcceptableScore {
    fn should_stop(&mut self, best: Option<&Organism<G>>, _iteration: usize) -> bool {
        best.and_then(|o| o.fitness).is_some_and(|f| f <= self.0)
    }

    fn reason(&self) -> StopReason {
        StopReason::TargetReached
    }
}

/// Stops after `limit` consecutive generations without a strictly lower best cost.
#[derive(Debug, Clone)]
pub struct Stagnation {
    limit: usize,
    best_fitness: Option<f64>,
    stagnation_count: usize,
}

impl Stagnation {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            best_fitness: None,
            stagnation_count: 0,
        }
    }

    /// Generations since the best cost last improved.
    pub fn stagnation_count(&self) -> usize {
        self.stagnation_count
    }
}

impl<G> TerminationPolicy<G> for Stagnation {
    fn should_stop(&mut self, best: Option<&Organism<G>>, _iteration: usize) -> bool {
        let Some(fitness) = best.and_then(|o| o.fitness) else {
            return false;
        };

        match self.best_fitness {
            Some(previous) if fitness >= previous => self.stagnation_count += 1,
            _ => {
                self.best_fitness = Some(fitness);
                self.stagnation_count = 0;
            }
        }

        self.stagnation_count >= self.limit
    }

    fn reason(&self) -> StopReason {
        StopReason::Stagnation
    }
}

/// Stops when the shared flag is raised.
#[derive(Debug, Clone)]
pub struct Cancellation(pub Arc<AtomicBool>);

impl<G> TerminationPolicy<G> for Cancellation {
    fn should_stop(&mut self, _best: Option<&Organism<G>>, _iteration: usize) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn reason(&self) -> StopReason {
        StopReason::Cancelled
    }
}

/// Logical OR of two policies, see [`TerminationPolicyExt::or`].
///
/// Both sides are consulted every cycle so stateful policies keep counting.
/// When both fire, the left reason wins.
#[derive(Debug, Clone)]
pub struct Either<A, B> {
    left: A,
    right: B,
    fired: Option<StopReason>,
}

impl<G, A, B> TerminationPolicy<G> for Either<A, B>
where
    A: TerminationPolicy<G>,
    B: TerminationPolicy<G>,
{
    fn should_stop(&mut self, best: Option<&Organism<G>>, iteration: usize) -> bool {
        let left = self.left.should_stop(best, iteration);
        let right = self.right.should_stop(best, iteration);

        self.fired = if left {
            Some(self.left.reason())
        } else if right {
            Some(self.right.reason())
        } else {
            None
        };

        left || right
    }

    fn reason(&self) -> StopReason {
        self.fired.unwrap_or(StopReason::Custom)
    }
}

/// Policy that never fires on its own; the neutral element for [`Either`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl<G> TerminationPolicy<G> for Never {
    fn should_stop(&mut self, _best: Option<&Organism<G>>, _iteration: usize) -> bool {
        false
    }
}

/// Policy assembled from an [`EvolutionConfig`] plus a cancellation flag.
///
/// Checks, in order: cancellation, generation budget, acceptable score,
/// stagnation. Every configured check runs each cycle.
#[derive(Debug, Clone)]
pub struct ConfiguredPolicy {
    cancellation: Cancellation,
    max_iterations: Option<MaxIterations>,
    acceptable_score: Option<AcceptableScore>,
    stagnation: Option<Stagnation>,
    fired: Option<StopReason>,
}

impl ConfiguredPolicy {
    pub fn from_config(config: &EvolutionConfig, cancelled: Arc<AtomicBool>) -> Self {
        Self {
            cancellation: Cancellation(cancelled),
            max_iterations: config.max_iterations.map(MaxIterations),
            acceptable_score: config.acceptable_score.map(AcceptableScore),
            stagnation: config.stagnation_limit.map(Stagnation::new),
            fired: None,
        }
    }
}

impl<G> TerminationPolicy<G> for ConfiguredPolicy {
    fn should_stop(&mut self, best: Option<&Organism<G>>, iteration: usize) -> bool {
        let cancelled = TerminationPolicy::<G>::should_stop(&mut self.cancellation, best, iteration);
        let exhausted = self
            .max_iterations
            .as_mut()
            .is_some_and(|p| TerminationPolicy::<G>::should_stop(p, best, iteration));
        let reached = self
            .acceptable_score
            .as_mut()
            .is_some_and(|p| p.should_stop(best, iteration));
        let stagnated = self
            .stagnation
            .as_mut()
            .is_some_and(|p| p.should_stop(best, iteration));

        self.fired = [
            (cancelled, StopReason::Cancelled),
            (exhausted, StopReason::MaxIterations),
            (reached, StopReason::TargetReached),
            (stagnated, StopReason::Stagnation),
        ]
        .into_iter()
        .find_map(|(fired, reason)| fired.then_some(reason));

        self.fired.is_some()
    }

    fn reason(&self) -> StopReason {
        self.fired.unwrap_or(StopReason::Custom)
    }
}
