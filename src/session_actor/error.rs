//! Error types for the session actor.

use thiserror::Error;

use crate::platform::PlatformError;

/// Errors that can occur while processing a checkout or a button press.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An id supplied by the storefront is not a Discord snowflake.
    #[error("invalid Discord id: {0:?}")]
    InvalidSnowflake(String),

    /// A chat-platform call failed.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The actor answered with a reply of the wrong kind.
    #[error("unexpected reply from session actor")]
    UnexpectedReply,

    /// An error occurred while communicating with the actor.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
