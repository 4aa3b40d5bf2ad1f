//! Generic serial-actor framework.
//!
//! This module provides the building blocks for running stateful work on a
//! single task and reaching it from anywhere through a cloneable client.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait the actor's state implements
//! - [`SerialActor`] - Generic actor processing one request at a time
//! - [`BridgeClient`] - Submits requests and awaits replies, optionally with a timeout
//! - [`FrameworkError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test callers without spawning the actor.

pub mod core;
pub mod mock;

// Re-export core types for convenience
pub use core::*;
