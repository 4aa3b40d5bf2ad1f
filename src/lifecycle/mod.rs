//! Runtime orchestration and lifecycle management.
//!
//! - [`RelaySystem`] - spawns the session actor and shuts it down
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod relay_system;
pub mod tracing;

pub use relay_system::*;
pub use tracing::*;
