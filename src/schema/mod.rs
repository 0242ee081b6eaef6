//! Schema module - Configuration, organism and report types.

mod evolution;
mod organism;
mod report;

pub use evolution::*;
pub use organism::*;
pub use report::*;
