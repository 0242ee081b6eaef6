//! Generation observers and in-memory snapshot recording.

use serde::{Deserialize, Serialize};

use crate::schema::Organism;

/// Summary of a completed generation handed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationProgress {
    /// Completed generations, counting the one just evaluated.
    pub generation: usize,
    /// Fitness of the best organism of the evaluated population.
    pub best_fitness: f64,
    /// Mean fitness of the evaluated population.
    pub avg_fitness: f64,
    /// Score-function calls so far.
    pub evaluations: u64,
}

/// Hook invoked synchronously once per completed generation.
///
/// Observers cannot influence the run.
pub trait GenerationObserver<G> {
    fn on_generation(&mut self, progress: &GenerationProgress, best: &Organism<G>);
}

impl<G, F> GenerationObserver<G> for F
where
    F: FnMut(&GenerationProgress, &Organism<G>),
{
    fn on_generation(&mut self, progress: &GenerationProgress, best: &Organism<G>) {
        self(progress, best)
    }
}

/// Configuration for snapshot recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Record every Nth generation (1 = every generation).
    pub frame_skip: usize,
    /// Maximum snapshots to record (0 = unlimited).
    pub max_frames: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            frame_skip: 5,
            max_frames: 0,
        }
    }
}

/// Best organism captured at a given generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<G> {
    pub generation: usize,
    pub genome: G,
    pub fitness: f64,
}

/// Observer that keeps a copy of the best genome every few generations.
///
/// Snapshots stay in memory; replaying or storing them is up to the caller.
///
/// ```ignore
/// let mut recorder = SnapshotRecorder::new(RecorderConfig::default());
/// let result = engine.run_with(policy, &mut recorder)?;
/// for snapshot in recorder.snapshots() { /* draw */ }
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotRecorder<G> {
    config: RecorderConfig,
    snapshots: Vec<Snapshot<G>>,
    step_counter: usize,
}

impl<G> SnapshotRecorder<G> {
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            snapshots: Vec::new(),
            step_counter: 0,
        }
    }

    /// Recorded snapshots in generation order.
    pub fn snapshots(&self) -> &[Snapshot<G>] {
        &self.snapshots
    }

    pub fn into_snapshots(self) -> Vec<Snapshot<G>> {
        self.snapshots
    }

    /// Whether the frame limit has been hit.
    pub fn is_full(&self) -> bool {
        self.config.max_frames > 0 && self.snapshots.len() >= self.config.max_frames
    }
}

impl<G: Clone> GenerationObserver<G> for SnapshotRecorder<G> {
    fn on_generation(&mut self, progress: &GenerationProgress, best: &Organism<G>) {
        self.step_counter += 1;

        if self.step_counter < self.config.frame_skip.max(1) {
            return;
        }
        self.step_counter = 0;

        if self.is_full() {
            return;
        }

        self.snapshots.push(Snapshot {
            generation: progress.generation,
            genome: best.genome.clone(),
            fitness: progress.best_fitness,
        });
    }
}
