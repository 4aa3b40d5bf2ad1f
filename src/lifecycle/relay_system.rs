use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::clients::SessionClient;
use crate::platform::ChatPlatform;
use crate::session_actor::SessionSettings;

/// The runtime orchestrator for the relay.
///
/// `RelaySystem` owns the session actor task and hands out the client the HTTP
/// layer uses to reach it.
///
/// # Example
///
/// ```ignore
/// let platform: Arc<dyn ChatPlatform> = Arc::new(DiscordRest::new(token, DEFAULT_API_BASE, Duration::from_secs(10))?);
/// let system = RelaySystem::start(settings, Duration::from_secs(30), platform);
///
/// let receipt = system.session_client.checkout(order).await?;
///
/// // Every clone of the client must be gone before this returns.
/// system.shutdown().await?;
/// ```
pub struct RelaySystem {
    /// Client for interacting with the session actor
    pub session_client: SessionClient,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl RelaySystem {
    /// Spawns the session actor with `platform` injected as its context.
    pub fn start(
        settings: SessionSettings,
        bridge_timeout: Duration,
        platform: Arc<dyn ChatPlatform>,
    ) -> Self {
        let (session_actor, session_client) = crate::session_actor::new(settings, bridge_timeout);
        let session_handle = tokio::spawn(session_actor.run(platform));

        Self {
            session_client,
            handles: vec![session_handle],
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the client closes the actor's channel once every other clone
    /// (e.g. the one inside the HTTP router) is gone too; the actor then
    /// finishes its queue and exits.
    pub async fn shutdown(self) -> Result<(), tokio::task::JoinError> {
        info!("Shutting down system...");
        drop(self.session_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(e);
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
