//! Common configuration, paths and types for the milk price pipeline

#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod layout;
pub mod logging;
pub mod types;

pub use crate::config::*;
pub use crate::errors::*;
pub use layout::ArtifactLayout;
pub use logging::init_tracing;
pub use types::*;
