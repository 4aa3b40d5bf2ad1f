//! # Core Actor Framework
//!
//! This module defines the generic building blocks for the serial actor that
//! owns the chat-platform connection.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: The trait the actor's state implements.
//! - [`SerialActor`]: The generic actor that runs one request at a time.
//! - [`BridgeClient`]: The cloneable handle used to submit work and await the reply.
//! - [`FrameworkError`]: Common errors (e.g., ActorClosed, TimedOut).

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that the state owned by a [`SerialActor`] must implement.
///
/// # Architecture Note
/// The actor loop is written *once* and knows nothing about orders or channels.
/// The entity decides what a request means; the loop only guarantees that
/// requests are handled strictly one after another, so the entity never needs
/// a `Mutex` around its own state.
///
/// # Async & Context
/// `#[async_trait]` lets hooks perform network I/O. The `Context` type is
/// injected into every hook by [`SerialActor::run`] ("late binding"), which is
/// how the chat-platform client reaches the entity without being part of it.
///
/// # Follow-up work
/// Some requests must answer the caller *before* their side effects run (an
/// interaction reply should go out before the channel it lives in is deleted).
/// [`Handled::then`] attaches such work; the loop runs it through
/// [`ActorEntity::follow_up`] right after the reply has been released.
///
/// Released means handed to the caller's oneshot, nothing more. The caller
/// may still be writing its own response when the follow-up starts, so the
/// follow-up can reach the outside world first.
#[async_trait]
pub trait ActorEntity: Send + 'static {
    /// Work submitted by callers.
    type Request: Send + Debug + 'static;

    /// Successful answer to a request.
    type Reply: Send + Debug + 'static;

    /// Deferred work executed after the reply is sent.
    type FollowUp: Send + Debug + 'static;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync + 'static;

    /// The error type for this entity.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Called once before the first request is processed.
    async fn on_start(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle one request.
    async fn handle(
        &mut self,
        request: Self::Request,
        ctx: &Self::Context,
    ) -> Result<Handled<Self::Reply, Self::FollowUp>, Self::Error>;

    /// Run deferred work attached by [`ActorEntity::handle`].
    async fn follow_up(
        &mut self,
        _work: Self::FollowUp,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// The outcome of [`ActorEntity::handle`]: a reply plus optional deferred work.
#[derive(Debug)]
pub struct Handled<R, F> {
    pub reply: R,
    pub follow_up: Option<F>,
}

impl<R, F> Handled<R, F> {
    /// A reply with nothing to do afterwards.
    pub fn reply(reply: R) -> Self {
        Self {
            reply,
            follow_up: None,
        }
    }

    /// Attach work to run once the reply has been delivered.
    pub fn then(mut self, work: F) -> Self {
        self.follow_up = Some(work);
        self
    }
}

// =============================================================================
// 2. MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("bridge call timed out after {0:?}")]
    TimedOut(Duration),
    #[error("{0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// A request travelling from a [`BridgeClient`] to its [`SerialActor`].
#[derive(Debug)]
pub struct Envelope<T: ActorEntity> {
    pub request: T::Request,
    pub respond_to: Response<T::Reply>,
}

// =============================================================================
// 3. THE ACTOR SERVER
// =============================================================================

/// The generic actor owning an [`ActorEntity`].
///
/// **Concurrency Model**:
/// Callers on any number of tasks submit [`Envelope`]s into a bounded channel;
/// this loop pops them one at a time and awaits each handler to completion
/// before looking at the next. Suspension points inside a handler (network
/// calls) never let a second request start.
pub struct SerialActor<T: ActorEntity> {
    receiver: mpsc::Receiver<Envelope<T>>,
    entity: T,
}

impl<T: ActorEntity> SerialActor<T> {
    /// Creates the actor and its client.
    ///
    /// `buffer_size` bounds the number of queued requests; when full, callers
    /// wait for space (and their timeout keeps running).
    pub fn new(entity: T, buffer_size: usize) -> (Self, BridgeClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, entity };
        (actor, BridgeClient::new(sender))
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "ChatSession")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        if let Err(e) = self.entity.on_start(&context).await {
            warn!(entity_type, error = %e, "on_start failed");
        }

        let mut handled = 0u64;
        while let Some(Envelope {
            request,
            respond_to,
        }) = self.receiver.recv().await
        {
            debug!(entity_type, ?request, "Request");
            handled += 1;

            let follow_up = match self.entity.handle(request, &context).await {
                Ok(Handled { reply, follow_up }) => {
                    if respond_to.send(Ok(reply)).is_err() {
                        debug!(entity_type, "Caller went away before the reply");
                    }
                    follow_up
                }
                Err(e) => {
                    warn!(entity_type, error = %e, "Request failed");
                    let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                    None
                }
            };

            if let Some(work) = follow_up {
                debug!(entity_type, ?work, "Follow-up");
                if let Err(e) = self.entity.follow_up(work, &context).await {
                    warn!(entity_type, error = %e, "Follow-up failed");
                }
            }
        }

        info!(entity_type, handled, "Shutdown");
    }
}

// =============================================================================
// 4. THE CLIENT
// =============================================================================

/// A cloneable handle for submitting work to a [`SerialActor`].
pub struct BridgeClient<T: ActorEntity> {
    sender: mpsc::Sender<Envelope<T>>,
}

impl<T: ActorEntity> Clone for BridgeClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ActorEntity> BridgeClient<T> {
    pub fn new(sender: mpsc::Sender<Envelope<T>>) -> Self {
        Self { sender }
    }

    /// Submit a request and wait for the reply, however long it takes.
    pub async fn call(&self, request: T::Request) -> Result<T::Reply, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(Envelope {
                request,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Submit a request and wait at most `limit` for queueing plus handling.
    ///
    /// On timeout the request may still run inside the actor; only the caller
    /// stops waiting.
    pub async fn call_within(
        &self,
        request: T::Request,
        limit: Duration,
    ) -> Result<T::Reply, FrameworkError> {
        tokio::time::timeout(limit, self.call(request))
            .await
            .map_err(|_| FrameworkError::TimedOut(limit))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // --- Domain Definition ---

    #[derive(Debug, thiserror::Error)]
    #[error("counter refused: {0}")]
    struct CounterError(String);

    #[derive(Debug)]
    enum CounterRequest {
        Add(u32),
        AddThenLog(u32),
        Fail,
        Slow(u64),
    }

    #[derive(Default)]
    struct Counter {
        total: u32,
    }

    #[async_trait]
    impl ActorEntity for Counter {
        type Request = CounterRequest;
        type Reply = u32;
        type FollowUp = u32;
        type Context = Arc<AtomicUsize>;
        type Error = CounterError;

        async fn handle(
            &mut self,
            request: CounterRequest,
            _ctx: &Self::Context,
        ) -> Result<Handled<u32, u32>, CounterError> {
            match request {
                CounterRequest::Add(n) => {
                    // Yield inside the handler so interleaving would show up if it existed.
                    let before = self.total;
                    tokio::task::yield_now().await;
                    self.total = before + n;
                    Ok(Handled::reply(self.total))
                }
                CounterRequest::AddThenLog(n) => {
                    self.total += n;
                    Ok(Handled::reply(self.total).then(n))
                }
                CounterRequest::Fail => Err(CounterError("no".into())),
                CounterRequest::Slow(ms) => {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    Ok(Handled::reply(self.total))
                }
            }
        }

        async fn follow_up(&mut self, work: u32, ctx: &Self::Context) -> Result<(), CounterError> {
            tokio::time::sleep(Duration::from_millis(work.into())).await;
            ctx.fetch_add(work as usize, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_requests_are_serialized() {
        let (actor, client) = SerialActor::new(Counter::default(), 8);
        tokio::spawn(actor.run(Arc::new(AtomicUsize::new(0))));

        let mut handles = vec![];
        for _ in 0..20 {
            let client = client.clone();
            handles.push(tokio::spawn(async move { client.call(CounterRequest::Add(1)).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let total = client.call(CounterRequest::Add(0)).await.unwrap();
        assert_eq!(total, 20);
    }

    #[tokio::test]
    async fn test_entity_error_reaches_caller() {
        let (actor, client) = SerialActor::new(Counter::default(), 8);
        tokio::spawn(actor.run(Arc::new(AtomicUsize::new(0))));

        let err = client.call(CounterRequest::Fail).await.unwrap_err();
        assert!(matches!(err, FrameworkError::EntityError(_)));
        assert_eq!(err.to_string(), "counter refused: no");
    }

    #[tokio::test]
    async fn test_follow_up_runs_after_reply() {
        let log = Arc::new(AtomicUsize::new(0));
        let (actor, client) = SerialActor::new(Counter::default(), 8);
        tokio::spawn(actor.run(log.clone()));

        assert_eq!(client.call(CounterRequest::AddThenLog(5)).await.unwrap(), 5);
        // The next request is only handled once the follow-up finished.
        client.call(CounterRequest::Add(0)).await.unwrap();
        assert_eq!(log.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_reply_does_not_wait_for_follow_up() {
        let log = Arc::new(AtomicUsize::new(0));
        let (actor, client) = SerialActor::new(Counter::default(), 8);
        tokio::spawn(actor.run(log.clone()));

        let started = tokio::time::Instant::now();
        assert_eq!(client.call(CounterRequest::AddThenLog(300)).await.unwrap(), 300);
        assert!(started.elapsed() < Duration::from_millis(300));
        assert_eq!(log.load(Ordering::SeqCst), 0);

        client.call(CounterRequest::Add(0)).await.unwrap();
        assert_eq!(log.load(Ordering::SeqCst), 300);
    }

    #[tokio::test]
    async fn test_call_within_times_out() {
        let (actor, client) = SerialActor::new(Counter::default(), 8);
        tokio::spawn(actor.run(Arc::new(AtomicUsize::new(0))));

        let err = client
            .call_within(CounterRequest::Slow(500), Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, FrameworkError::TimedOut(_)));
    }

    #[tokio::test]
    async fn test_closed_actor() {
        let (actor, client) = SerialActor::new(Counter::default(), 8);
        drop(actor);

        let err = client.call(CounterRequest::Add(1)).await.unwrap_err();
        assert!(matches!(err, FrameworkError::ActorClosed));
    }
}
