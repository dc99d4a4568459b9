//! Shared utilities.

pub mod validation;

pub use validation::{most_severe, Validation};
