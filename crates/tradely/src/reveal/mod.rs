//! Progressive reveal of analysis narratives

mod engine;
mod units;

pub use engine::{EMPTY_MESSAGE, RevealEngine};
pub use units::{RevealedUnit, is_highlighted, split_units};
