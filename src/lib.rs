//! Genetic Search - Elitist genetic algorithm engine with pluggable domains.
//!
//! This crate evolves a fixed-size population of candidate solutions toward
//! the lowest cost a problem domain can express. The engine knows nothing
//! about genomes; a [`Domain`] supplies random creation, scoring, crossover
//! and mutation.
//!
//! # Architecture
//!
//! The crate is split into three main modules:
//!
//! - `schema`: Configuration, organism and run report types
//! - `compute`: The evolution engine (fitness, selection, reproduction, termination)
//! - `domains`: Reference problem domains
//!
//! # Example
//!
//! ```rust,no_run
//! use genetic_search::{
//!     compute::EvolutionEngine,
//!     domains::PhraseDomain,
//!     schema::EvolutionConfig,
//! };
//!
//! let config = EvolutionConfig {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//! let domain = PhraseDomain::new("Hello World").unwrap();
//!
//! let mut engine = EvolutionEngine::new(config, domain).unwrap();
//! let result = engine.run().unwrap();
//!
//! println!(
//!     "Best after {} generations: {}",
//!     result.stats.generations,
//!     PhraseDomain::decode(&result.best.genome)
//! );
//! ```

pub mod compute;
pub mod domains;
pub mod schema;

// Re-export commonly used types
pub use compute::{Domain, EvolutionEngine, EvolutionError};
pub use schema::{ConfigError, EvolutionConfig, EvolutionResult, Organism, Population};
