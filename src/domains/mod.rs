//! Domains module - Problem domains the engine can search.

mod phrase;

pub use phrase::*;
