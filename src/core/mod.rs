//! Core types shared across the search engine: errors and deterministic RNG.

pub mod error;
pub mod rng;

pub use error::SearchError;
pub use rng::{derive_seed, SearchRng};
