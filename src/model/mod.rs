//! Plain data carried between the HTTP layer and the session actor.

pub mod language;
pub mod order;

pub use language::*;
pub use order::*;
