//! Generic genetic search over pluggable problem domains.
//!
//! The engine owns the loop and the population; a [`Domain`] owns everything
//! that knows what a genome is.
//!
//! # Overview
//!
//! One generation runs through these stages:
//!
//! - **Fitness** (`fitness`): score every organism that has no cached fitness
//! - **Termination** (`termination`): consult the stop policy
//! - **Selection** (`selection`): keep the best half, pair neighbours
//! - **Reproduction** (`reproduction`): three children per pair plus the elite
//!
//! Observers (`observer`) see the best organism of every completed generation.
//!
//! # Example
//!
//! ```rust,no_run
//! use genetic_search::compute::evolution::EvolutionEngine;
//! use genetic_search::domains::PhraseDomain;
//! use genetic_search::schema::EvolutionConfig;
//!
//! let domain = PhraseDomain::new("Hello").unwrap();
//! let mut engine = EvolutionEngine::new(EvolutionConfig::default(), domain).unwrap();
//! let result = engine
//!     .run_with_callback(|progress, _best| {
//!         println!("Generation {}: best = {:.1}", progress.generation, progress.best_fitness);
//!     })
//!     .unwrap();
//!
//! println!("Best fitness: {:?}", result.best.fitness);
//! ```

mod domain;
mod fitness;
mod observer;
mod population;
mod reproduction;
mod search;
mod selection;
mod termination;

pub use domain::{Domain, EvolutionError, PluginStage};
pub use fitness::FitnessEvaluator;
pub use observer::{GenerationObserver, GenerationProgress, RecorderConfig, Snapshot, SnapshotRecorder};
pub use population::{best_index, best_of, initialize};
pub use reproduction::{OFFSPRING_PER_PAIR, reproduce};
pub use search::EvolutionEngine;
pub use selection::{pair_survivors, select_survivors};
pub use termination::{
    AcceptableScore, Cancellation, ConfiguredPolicy, Either, MaxIterations, Never, Stagnation,
    TerminationPolicy, TerminationPolicyExt,
};
