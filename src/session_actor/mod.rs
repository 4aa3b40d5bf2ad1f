//! The chat-session actor: the single owner of the Discord session.
//!
//! Checkouts and button presses arrive from HTTP handlers on many tasks and are
//! funnelled into one [`SerialActor`], so channel creation and permission edits
//! never race each other.

pub mod entity;
pub mod error;
pub mod render;

pub use entity::*;
pub use error::*;

use crate::clients::SessionClient;
use crate::framework::SerialActor;
use std::time::Duration;

/// Creates the session actor and its client.
///
/// The actor does nothing until [`SerialActor::run`] is given a platform.
pub fn new(settings: SessionSettings, timeout: Duration) -> (SerialActor<ChatSession>, SessionClient) {
    let (actor, bridge) = SerialActor::new(ChatSession::new(settings), 32);
    (actor, SessionClient::new(bridge, timeout))
}
