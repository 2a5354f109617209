//! contest-core: Shared types for the contest engine and its command layers
//!
//! This crate contains the identifier newtypes, the contest state enum, and
//! the input validation used by both the engine and anything embedding it.

pub mod errors;
pub mod types;
pub mod validation;

pub use errors::*;
pub use types::*;
pub use validation::*;
