//! Domain models for the medicine catalog.

mod medicine;
mod search;

pub use medicine::*;
pub use search::*;
