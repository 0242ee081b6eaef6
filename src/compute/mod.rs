//! Compute module - The evolution engine and its stages.

pub mod evolution;

pub use evolution::{Domain, EvolutionEngine, EvolutionError};
