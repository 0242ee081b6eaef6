//! Run reports produced by the evolution engine.

use serde::{Deserialize, Serialize};

use super::Organism;

/// Evolution history for plotting.
///
/// One entry per evaluated population, including the final one.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvolutionHistory {
    /// Best (lowest) fitness per generation.
    pub best_fitness: Vec<f64>,
    /// Mean fitness per generation.
    pub avg_fitness: Vec<f64>,
    /// Standard deviation per generation.
    pub fitness_std: Vec<f64>,
}

impl EvolutionHistory {
    /// Append the statistics of one evaluated population.
    pub fn record(&mut self, fitness: &[f64]) {
        let Some(best) = fitness.iter().copied().reduce(f64::min) else {
            return;
        };
        let (avg, std) = mean_and_std(fitness);

        self.best_fitness.push(best);
        self.avg_fitness.push(avg);
        self.fitness_std.push(std);
    }

    /// Number of recorded generations.
    pub fn len(&self) -> usize {
        self.best_fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_fitness.is_empty()
    }
}

/// Mean and population standard deviation.
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Current phase of the evolution driver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EvolutionPhase {
    /// Building the initial population.
    #[default]
    Initializing,
    /// Running evaluate/select/reproduce cycles.
    Stepping,
    /// A termination policy fired.
    Done,
}

/// Reason evolution stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Reached the generation budget.
    MaxIterations,
    /// Best fitness reached the acceptable score.
    TargetReached,
    /// Best fitness stopped improving.
    Stagnation,
    /// Cancelled through the engine's cancel handle.
    Cancelled,
    /// A caller-supplied policy fired.
    Custom,
}

/// Statistics from an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Completed generations.
    pub generations: usize,
    /// Score function invocations. Cached fitness values are not counted.
    pub total_evaluations: u64,
    /// Fitness of the returned best organism.
    pub best_fitness: f64,
    /// Mean fitness of the final population.
    pub final_avg_fitness: f64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Reason for stopping.
    pub stop_reason: StopReason,
}

/// Final result of an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult<G> {
    /// Best organism of the final evaluated population.
    pub best: Organism<G>,
    /// Statistics from the run.
    pub stats: EvolutionStats,
    /// Full history for analysis.
    pub history: EvolutionHistory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - 2.0).abs() < 1e-12);

        assert_eq!(mean_and_std(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_history_record() {
        let mut history = EvolutionHistory::default();
        history.record(&[3.0, 1.0, 2.0]);
        history.record(&[]);

        assert_eq!(history.len(), 1);
        assert_eq!(history.best_fitness, vec![1.0]);
        assert!((history.avg_fitness[0] - 2.0).abs() < 1e-12);
    }
}
