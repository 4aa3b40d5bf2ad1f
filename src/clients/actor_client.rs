use crate::framework::{ActorEntity, BridgeClient, FrameworkError};
use async_trait::async_trait;
use std::time::Duration;

/// Trait for actor-specific clients to inherit the bounded request path.
///
/// Implementors only say which bridge they wrap, how long callers may wait,
/// and how framework failures become their own error type.
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The actor-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic BridgeClient.
    fn inner(&self) -> &BridgeClient<T>;

    /// Upper bound for queueing plus handling of one request.
    fn timeout(&self) -> Duration;

    /// Map framework errors to the specific actor error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Submit a request and wait for its reply within [`ActorClient::timeout`].
    #[tracing::instrument(skip_all)]
    async fn request(&self, request: T::Request) -> Result<T::Reply, Self::Error> {
        tracing::debug!(?request, "Sending request");
        self.inner()
            .call_within(request, self.timeout())
            .await
            .map_err(Self::map_error)
    }
}
