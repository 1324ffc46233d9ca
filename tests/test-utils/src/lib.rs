//! Shared fixtures for the milk price pipeline tests
//!
//! - [`fixtures`]: synthetic raw tables and a temp workspace holding them
//! - [`helpers`]: logging and small config helpers
//! - [`assertions`]: float and file comparisons

pub mod assertions;
pub mod fixtures;
pub mod helpers;

pub use assertions::*;
pub use fixtures::*;
pub use helpers::*;
