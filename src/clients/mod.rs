//! Type-safe wrappers around [`BridgeClient`](crate::framework::BridgeClient).

pub mod actor_client;
pub mod session_client;

pub use actor_client::*;
pub use session_client::*;
